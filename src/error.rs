use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The scan target could not be used.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read directory '{}'", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Problems reading operator input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input closed before an answer was given")]
    Closed,

    #[error("series name cannot be empty")]
    EmptySeriesName,

    #[error("failed to read input")]
    Io(#[from] io::Error),
}

/// Why a single rename did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameFailure {
    AlreadyExists,
    NoPermission,
    SourceNotFound,
    CrossDevice,
    Other,
}

impl RenameFailure {
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::AlreadyExists => RenameFailure::AlreadyExists,
            io::ErrorKind::PermissionDenied => RenameFailure::NoPermission,
            io::ErrorKind::NotFound => RenameFailure::SourceNotFound,
            io::ErrorKind::CrossesDevices => RenameFailure::CrossDevice,
            _ => RenameFailure::Other,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            RenameFailure::AlreadyExists => "target already exists",
            RenameFailure::NoPermission => "permission denied",
            RenameFailure::SourceNotFound => "source file not found",
            RenameFailure::CrossDevice => "cannot rename across devices",
            RenameFailure::Other => "rename failed",
        }
    }
}

#[derive(Debug, Error)]
#[error("{}: '{}' -> '{}'", .kind.describe(), .from.display(), .to.display())]
pub struct RenameError {
    pub from: PathBuf,
    pub to: PathBuf,
    pub kind: RenameFailure,
    #[source]
    pub source: io::Error,
}

impl RenameError {
    pub fn new(from: PathBuf, to: PathBuf, source: io::Error) -> Self {
        Self {
            kind: RenameFailure::from_io(&source),
            from,
            to,
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("refusing to rename: several files would be renamed to {}", .0.join(", "))]
    DuplicateDestinations(Vec<String>),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pattern must be between 1 and {max}, got {got}")]
    InvalidPattern { got: usize, max: usize },

    #[error("series name cannot be empty")]
    EmptySeriesName,

    #[error("file limit must be at least 1")]
    InvalidMaxFiles,

    #[error("--json needs both a pattern and a series name")]
    JsonNeedsSelection,
}

/// Everything that ends a run early.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("no video files found in '{}'", .0.display())]
    NoVideoFiles(PathBuf),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("failed to serialize rename plan")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output")]
    Output(#[from] io::Error),
}
