use thiserror::Error;

use std::io;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serde_json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no such file or folder: {0}")]
    NotFound(String),

    #[error("Invalid folder. Could not create CSV.")]
    InvalidFolder,

    #[error("Please enter a filename")]
    EmptyFileName,

    #[error("File \"{0}\" already exists.")]
    NameTaken(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("view is closed")]
    ViewClosed,

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = core::result::Result<T, Error>;
