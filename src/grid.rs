use crate::error::GridError;

/// Row-major flat grid. No per-cell objects.
/// Bounded topology: positions outside `0..w` x `0..h` do not exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    data: Vec<T>,
    w: usize,
    h: usize,
}

/// State of a single Life cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}

pub const ALIVE_GLYPH: char = '█';
pub const DEAD_GLYPH: char = ' ';

impl Cell {
    #[inline]
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    #[inline]
    pub fn glyph(self) -> char {
        match self {
            Cell::Alive => ALIVE_GLYPH,
            Cell::Dead => DEAD_GLYPH,
        }
    }

    /// Anything that is not the dead glyph reads as alive.
    #[inline]
    pub fn from_glyph(c: char) -> Self {
        if c == DEAD_GLYPH { Cell::Dead } else { Cell::Alive }
    }
}

/// A Life board.
pub type Board = Grid<Cell>;

impl<T: Copy + Default> Grid<T> {
    pub fn new(w: usize, h: usize) -> Result<Self, GridError> {
        let len = checked_len(w, h)?;
        Ok(Self {
            data: vec![T::default(); len],
            w,
            h,
        })
    }

    /// Wrap an existing row-major buffer. `data.len()` must equal `w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<T>) -> Result<Self, GridError> {
        let len = checked_len(w, h)?;
        if data.len() != len {
            return Err(GridError::LengthMismatch {
                expected: len,
                found: data.len(),
            });
        }
        Ok(Self { data, w, h })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        &self.data[y * self.w..(y + 1) * self.w]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks_exact(self.w)
    }

    /// Build a same-sized grid by mapping every row of `self` in parallel.
    /// `f` receives the row index and the output row to fill.
    pub fn par_map_rows<U, F>(&self, f: F) -> Grid<U>
    where
        U: Copy + Default + Send,
        F: Fn(usize, &mut [U]) + Sync,
    {
        use rayon::prelude::*;

        let mut data = vec![U::default(); self.w * self.h];
        data.par_chunks_mut(self.w)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
        Grid {
            data,
            w: self.w,
            h: self.h,
        }
    }
}

/// Cell count of a `w` x `h` grid. Both sides must be positive and the
/// product must fit in `usize`.
#[inline]
fn checked_len(w: usize, h: usize) -> Result<usize, GridError> {
    if w == 0 || h == 0 {
        return Err(GridError::ZeroSized { w, h });
    }
    w.checked_mul(h).ok_or(GridError::TooLarge { w, h })
}

/// Offset `(x, y)` by `(dx, dy)`. Returns None when the result leaves the grid.
#[inline]
fn offset_xy(x: usize, y: usize, dx: i32, dy: i32, w: usize, h: usize) -> Option<(usize, usize)> {
    let nx = x as i64 + dx as i64;
    let ny = y as i64 + dy as i64;
    if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
        return None; // no wrap on any edge
    }
    Some((nx as usize, ny as usize))
}

/// 8-connected neighbors, clipped at the borders.
pub fn neighbors8(x: usize, y: usize, w: usize, h: usize) -> impl Iterator<Item = (usize, usize)> {
    let offsets: [(i32, i32); 8] = [
        (-1, -1), (0, -1), (1, -1),
        (-1, 0),           (1, 0),
        (-1, 1),  (0, 1),  (1, 1),
    ];
    let mut out = [(0usize, 0usize); 8];
    let mut n = 0;
    for (dx, dy) in offsets {
        if let Some(pos) = offset_xy(x, y, dx, dy, w, h) {
            out[n] = pos;
            n += 1;
        }
    }
    out.into_iter().take(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sized_rejected() {
        assert!(Board::new(0, 3).is_err());
        assert!(Board::new(3, 0).is_err());
        assert!(Board::new(1, 1).is_ok());
    }

    #[test]
    fn test_oversized_rejected() {
        let side = 1usize << (usize::BITS / 2 + 1);
        assert_eq!(
            Board::new(side, side),
            Err(GridError::TooLarge { w: side, h: side })
        );
        assert_eq!(
            Board::from_vec(usize::MAX, 2, Vec::new()),
            Err(GridError::TooLarge { w: usize::MAX, h: 2 })
        );
    }

    #[test]
    fn test_from_vec_length_checked() {
        assert_eq!(
            Board::from_vec(2, 2, vec![Cell::Dead; 3]),
            Err(GridError::LengthMismatch { expected: 4, found: 3 })
        );
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        let corner: Vec<_> = neighbors8(0, 0, 5, 5).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1), (1, 1)]);
        assert_eq!(neighbors8(4, 4, 5, 5).count(), 3);
        assert_eq!(neighbors8(2, 0, 5, 5).count(), 5);
        assert_eq!(neighbors8(2, 2, 5, 5).count(), 8);
    }

    #[test]
    fn test_single_cell_has_no_neighbors() {
        assert_eq!(neighbors8(0, 0, 1, 1).count(), 0);
    }

    #[test]
    fn test_rows_are_row_major() {
        let mut g = Grid::<u8>::new(3, 2).unwrap();
        g.set(2, 1, 7);
        let rows: Vec<_> = g.rows().collect();
        assert_eq!(rows, vec![&[0, 0, 0][..], &[0, 0, 7][..]]);
        assert_eq!(g.row(1), &[0, 0, 7]);
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(Cell::from_glyph(' '), Cell::Dead);
        assert_eq!(Cell::from_glyph('█'), Cell::Alive);
        assert_eq!(Cell::from_glyph('#'), Cell::Alive);
        assert_eq!(Cell::Alive.glyph(), ALIVE_GLYPH);
    }
}
