use std::path::PathBuf;

use thiserror::Error;

/// Why a lyrics strategy gave up. The resolver logs these and moves on.
#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no timed lines in {0}")]
    NoTimedLines(PathBuf),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("lyrics service returned {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed lyrics payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("lyrics payload has no lines")]
    Empty,
    #[error("no lyrics available")]
    NoLyricsAvailable,
}
