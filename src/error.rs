use std::path::PathBuf;

use thiserror::Error;
use transmuter::TransmuterError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Transmuter(#[from] TransmuterError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Manifest {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("write error: {0}")]
    Output(#[from] std::io::Error),

    #[error("no owner wallet: pass --owner or set WALLET")]
    MissingOwner,

    #[error("no mutation: pass --manifest or --mutation")]
    MissingMutation,

    #[error("interrupted")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, CliError>;
