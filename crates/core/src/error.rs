//! Error kinds shared by the core transformations and the publishing shell.

use std::fmt;

/// A single failure in the publishing pipeline, classified by kind.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conversion failed: {0}")]
    Conversion(String),

    #[error("Failed to upload image: {0}")]
    Upload(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

/// The kind of an [`Error`] without its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Conversion,
    Upload,
    Protocol,
    Timeout,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Conversion(_) => ErrorKind::Conversion,
            Error::Upload(_) => ErrorKind::Upload,
            Error::Protocol(_) => ErrorKind::Protocol,
            Error::Timeout(_) => ErrorKind::Timeout,
        }
    }
}

/// Pipeline stages, in the order a publish operation walks through them.
///
/// A failure is attributed to the stage that was being *entered* when it
/// happened, e.g. a pandoc failure is reported as `Converted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    MetadataExtracted,
    Converted,
    Normalized,
    ImagesResolved,
    ImagesUploaded,
    EntryBuilt,
    Submitted,
}

impl Stage {
    pub fn description(&self) -> &'static str {
        match self {
            Stage::Idle => "starting",
            Stage::MetadataExtracted => "reading the org file",
            Stage::Converted => "converting org to markdown",
            Stage::Normalized => "normalizing markdown",
            Stage::ImagesResolved => "resolving image links",
            Stage::ImagesUploaded => "uploading images",
            Stage::EntryBuilt => "building the atom entry",
            Stage::Submitted => "submitting the entry",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// An [`Error`] tagged with the pipeline stage that produced it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed while {stage}: {error}")]
pub struct PublishError {
    pub stage: Stage,
    pub error: Error,
}

impl PublishError {
    pub fn new(stage: Stage, error: Error) -> Self {
        Self { stage, error }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}
