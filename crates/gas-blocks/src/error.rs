//! Error types for gas-blocks

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] gas_fs::Error),

    #[error("Markup path has no file name: {path}")]
    NoFileName { path: PathBuf },
}
