//! Error types for the classdraw command-line tool.
//!
//! Extraction and emission cannot fail; everything here comes from reading
//! sources, writing diagrams, or running the renderer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for classdraw operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the file and renderer plumbing around the core
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read a source file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a diagram file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Refused to overwrite an existing diagram
    #[error("file already exists: '{path}' (use --force to overwrite)")]
    FileExists { path: PathBuf },

    /// Source file extension is not one we read
    #[error("unsupported source file '{path}': expected one of .cpp, .h, .hpp, .cc, .cxx")]
    UnsupportedExtension { path: PathBuf },

    /// The PlantUML jar could not be located
    #[error("PlantUML jar not found at '{path}': {source}")]
    JarNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The renderer process could not be started or waited on
    #[error("failed to run renderer '{program}': {source}")]
    RendererIo {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer did not finish in time and was killed
    #[error("renderer timed out after {seconds}s on '{path}'")]
    RendererTimeout { path: PathBuf, seconds: u64 },

    /// The renderer exited with a failure status
    #[error("renderer failed on '{path}' (exit code {code:?}): {stderr}")]
    RendererFailed {
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// The renderer succeeded but the image is not where it should be
    #[error("renderer produced no output at '{path}'")]
    ArtifactMissing { path: PathBuf },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new unsupported extension error
    pub fn unsupported_extension(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedExtension { path: path.into() }
    }

    /// Creates a new renderer I/O error
    pub fn renderer_io(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::RendererIo {
            program: program.into(),
            source,
        }
    }

    /// Returns true if the failure only concerns one source file, so a
    /// directory run can skip it and continue
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. }
                | Self::FileExists { .. }
                | Self::UnsupportedExtension { .. }
                | Self::RendererTimeout { .. }
                | Self::RendererFailed { .. }
                | Self::ArtifactMissing { .. }
        )
    }
}
