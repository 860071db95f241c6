use std::path::PathBuf;

use thiserror::Error;

/// Why a data source could not be turned into a [`Dataset`](crate::data::model::Dataset).
///
/// Fatal for the current render, never for the process: the UI shows the
/// message and waits for another file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data source not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("data source is empty: {}", .path.display())]
    Empty { path: PathBuf },

    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("failed to read {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },
}

/// The active filters exclude every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no data matches your filters")]
pub struct EmptyResultError;
