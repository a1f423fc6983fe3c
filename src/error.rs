//! Error types shared across the store, import and tracker layers

use std::fmt;

use thiserror::Error;

/// Failure at the persistence layer
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("failed to acquire connection lock: {0}")]
    Lock(String),

    #[error("no user named '{0}'")]
    UserNotFound(String),

    #[error("level {0} is out of range (expected 1-6)")]
    InvalidLevel(i64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Whole-file import failure. Per-row problems are reported as [`ImportRowError`].
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("failed to open import file: {0}")]
    Open(String),

    #[error("failed to read import file: {0}")]
    Read(String),

    #[error("no sheets found in workbook")]
    NoSheets,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Why a single import row was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptySource,
    EmptyTarget,
    MissingColumns,
    InvalidLevel(String),
    InvalidEncoding,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptySource => write!(f, "empty source text"),
            SkipReason::EmptyTarget => write!(f, "empty target text"),
            SkipReason::MissingColumns => write!(f, "not enough columns"),
            SkipReason::InvalidLevel(raw) => write!(f, "invalid level '{raw}'"),
            SkipReason::InvalidEncoding => write!(f, "text is not valid UTF-8"),
        }
    }
}

/// A malformed import record. `row` is 1-based, counting header rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row {row}: {reason}")]
pub struct ImportRowError {
    pub row: usize,
    pub reason: SkipReason,
}

/// Crate-level error returned by the tracker, session and bootstrap layers
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("user not found: {0}")]
    NotFound(String),

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("no level is active in this session")]
    NoActiveLevel,

    #[error("level {0} has no words left to answer")]
    LevelComplete(u8),

    #[error("cannot build choices: {0}")]
    Choices(String),
}

pub type Result<T> = std::result::Result<T, Error>;
