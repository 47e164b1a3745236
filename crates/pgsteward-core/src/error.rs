//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unsupported Postgres version: {version}")]
    UnsupportedVersion { version: String },

    #[error("invalid cluster manifest: {message}")]
    InvalidManifest { message: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
