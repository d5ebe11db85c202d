//! `.board` snapshot files.
//!
//! One record per grid row: the row's glyphs, the sentinel `e`, then a newline.
//! On load, the dead glyph is a dead cell and any other character is alive.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{LoadError, SimError};
use crate::grid::{Board, Cell};
use crate::render::write_rows;
use crate::viewport::Viewport;

pub const EXTENSION: &str = "board";
const ROW_END: &str = "e\n";
const SENTINEL: char = 'e';

/// Full board (never cropped) in snapshot format.
pub fn board_text(board: &Board) -> String {
    let mut s = String::with_capacity((board.width() * 3 + ROW_END.len()) * board.height());
    // Writing into a String cannot fail.
    let _ = write_rows(board, Viewport::full(board.width(), board.height()), ROW_END, &mut s);
    s
}

/// Parse snapshot text. Every row must hold the same number of cells.
/// CRLF line endings are read as LF.
pub fn parse_board(text: &str) -> Result<Board, LoadError> {
    let text = text.replace("\r\n", "\n");
    let mut records: Vec<&str> = text.split(ROW_END).collect();

    // Whatever follows the last terminator: nothing, a stray blank line, or a
    // final record whose newline was dropped.
    let tail = records.pop().unwrap_or_default();
    match tail {
        "" | "\n" => {}
        t if !t.contains('\n') && t.ends_with(SENTINEL) => {
            records.push(&t[..t.len() - SENTINEL.len_utf8()]);
        }
        _ => return Err(LoadError::Malformed { row: records.len() }),
    }
    if records.is_empty() {
        return Err(LoadError::Empty);
    }

    let w = records[0].chars().count();
    let mut data = Vec::with_capacity(w * records.len());
    for (row, record) in records.iter().enumerate() {
        if record.contains('\n') {
            return Err(LoadError::Malformed { row });
        }
        let found = record.chars().count();
        if found != w {
            return Err(LoadError::RaggedRow {
                row,
                expected: w,
                found,
            });
        }
        data.extend(record.chars().map(Cell::from_glyph));
    }
    Ok(Board::from_vec(w, records.len(), data)?)
}

/// Load a `.board` file.
pub fn load_board(path: &Path) -> Result<Board, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
        return Err(LoadError::Extension(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_board(&text)
}

/// Writes one snapshot file per generation into a directory.
#[derive(Debug)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    /// Create `dir` (and parents) if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, SimError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| SimError::Export {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, generation: u64) -> PathBuf {
        self.dir.join(format!("gen{generation:06}.{EXTENSION}"))
    }

    pub fn write(&self, generation: u64, board: &Board) -> Result<PathBuf, SimError> {
        let path = self.path_for(generation);
        fs::write(&path, board_text(board)).map_err(|source| SimError::Export {
            path: path.clone(),
            source,
        })?;
        debug!("exported generation {generation} to {}", path.display());
        Ok(path)
    }
}
