use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {w}x{h}")]
    ZeroSized { w: usize, h: usize },
    #[error("grid of {w}x{h} cells does not fit in memory")]
    TooLarge { w: usize, h: usize },
    #[error("grid buffer holds {found} cells, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown argument `{0}`")]
    UnknownArgument(String),
    #[error("missing value for `{0}`")]
    MissingValue(String),
    #[error("invalid value `{value}` for `{flag}`")]
    InvalidValue { flag: String, value: String },
    #[error("width and height must be at least 1, got {width}x{height}")]
    Dimensions { width: i64, height: i64 },
    #[error("a {width}x{height} board is too large")]
    BoardTooLarge { width: i64, height: i64 },
    #[error("generation count must be -1 (endless) or non-negative, got {0}")]
    Generations(i64),
    #[error("sleep must be a non-negative number of seconds, got {0}")]
    Sleep(f64),
    #[error("max fps must be -1 (uncapped) or positive, got {0}")]
    MaxFps(f64),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("board file {0} does not exist")]
    NotFound(PathBuf),
    #[error("board file {0} must have the .board extension")]
    Extension(PathBuf),
    #[error("failed to read board file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("board file contains no rows")]
    Empty,
    #[error("row {row} is missing its `e` terminator")]
    Malformed { row: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("failed to export generation to {path}")]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("terminal output failed")]
    Terminal(#[source] io::Error),
    #[error("failed to encode statistics")]
    Stats(#[from] serde_json::Error),
    #[error("simulation worker stopped unexpectedly")]
    Worker(#[from] tokio::task::JoinError),
}
