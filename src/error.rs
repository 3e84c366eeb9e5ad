//! Error types for bounceback

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Folder access error: {0}")]
    FolderAccess(String),

    #[error("Folder creation error: {0}")]
    FolderCreate(String),

    #[error("Enumeration error: {0}")]
    Enumeration(String),

    #[error("Move error: {0}")]
    Move(String),

    #[error("Email parsing error: {0}")]
    Parse(String),
}

impl Error {
    /// Whether the error only concerns a single message.
    ///
    /// Recoverable errors are skipped by the scanner; everything else
    /// aborts the run.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Move(_) | Self::Parse(_))
    }

    /// Process exit code for this error class.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 1,
            Self::Connection(_) | Self::Tls(_) | Self::Io(_) => 2,
            Self::FolderAccess(_) | Self::FolderCreate(_) => 3,
            Self::Enumeration(_) | Self::Move(_) | Self::Parse(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
