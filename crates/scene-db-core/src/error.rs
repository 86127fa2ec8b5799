use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Base scene name '{name}' is not unique in {category}/{sub_project}")]
    NameCollision {
        name: String,
        category: String,
        sub_project: String,
        /// The record that already owns the name, left untouched.
        existing: Box<crate::storage::models::BaseScene>,
    },

    #[error("Database file is corrupted: {}: {reason}", path.display())]
    CorruptDatabase { path: PathBuf, reason: String },

    #[error("Path {} is outside the project root {}", path.display(), root.display())]
    PathOutsideProject { path: PathBuf, root: PathBuf },

    #[error("File in database doesn't exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("This is not a base scene: {0}")]
    NotABaseScene(String),

    #[error("Reference of '{name}' points at version {version} but {} is missing", path.display())]
    DanglingReference {
        name: String,
        version: u32,
        path: PathBuf,
    },

    #[error("Invalid name '{0}'")]
    InvalidName(String),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Unknown sub-project '{0}'")]
    UnknownSubProject(String),

    #[error("Base scene '{name}' has no version {version}")]
    VersionNotFound { name: String, version: u32 },

    #[error("Base scene '{name}' has {found} versions on disk, expected {expected}")]
    VersionConflict {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Thumbnail size {width}x{height} is empty")]
    InvalidThumbnailSize { width: u32, height: u32 },

    #[error("Host error: {0}")]
    Host(String),

    #[error("Thumbnail error: {0}")]
    Thumbnail(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O failure with the path it happened on. A missing file
    /// becomes `PathNotFound` so callers can tell it apart from other I/O.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::PathNotFound(path)
        } else {
            Error::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_becomes_path_not_found() {
        let err = Error::io(
            "scenes/Rig/CharA",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, Error::PathNotFound(_)));

        let err = Error::io(
            "scenes/Rig/CharA",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, Error::Io { .. }));
    }
}
