use rand::Rng;

use crate::error::GridError;
use crate::grid::{Board, Cell, neighbors8};

/// One in `SEED_ODDS` cells starts alive on a random board.
const SEED_ODDS: u32 = 5;

/// Number of live cells among the 8 neighbors of `(x, y)`.
/// Cells past the border count as dead; the board does not wrap.
#[inline]
pub fn live_neighbors(board: &Board, x: usize, y: usize) -> u8 {
    neighbors8(x, y, board.width(), board.height())
        .filter(|&(nx, ny)| board.get(nx, ny).is_alive())
        .count() as u8
}

/// Conway's B3/S23 rule for a single cell.
#[inline]
pub fn next_state(cell: Cell, live: u8) -> Cell {
    match (cell, live) {
        (Cell::Alive, 2 | 3) | (Cell::Dead, 3) => Cell::Alive,
        _ => Cell::Dead,
    }
}

/// Advance the board by one generation.
///
/// Every output cell depends only on `board`, so rows are filled in parallel
/// and the input is never touched.
pub fn tick(board: &Board) -> Board {
    board.par_map_rows(|y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            *out = next_state(board.get(x, y), live_neighbors(board, x, y));
        }
    })
}

/// Random starting board: each cell is alive with probability 1/5.
pub fn random_board<R: Rng>(w: usize, h: usize, rng: &mut R) -> Result<Board, GridError> {
    let mut board = Board::new(w, h)?;
    for y in 0..h {
        for x in 0..w {
            if rng.gen_range(0..SEED_ODDS) >= SEED_ODDS - 1 {
                board.set(x, y, Cell::Alive);
            }
        }
    }
    Ok(board)
}

pub fn population(board: &Board) -> usize {
    board.data().iter().filter(|c| c.is_alive()).count()
}
