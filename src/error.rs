use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("bad face sprite {path}: {reason}")]
    Sprite { path: PathBuf, reason: String },

    #[error("audio unavailable: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, Error>;
