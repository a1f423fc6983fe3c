//! Row types for users, words and per-user difficulty

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{StorageError, StorageResult};

/// One of the six difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(value: i64) -> StorageResult<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Level(value as u8))
        } else {
            Err(StorageError::InvalidLevel(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All levels in ascending order
    pub fn all() -> impl Iterator<Item = Level> {
        (Self::MIN..=Self::MAX).map(Level)
    }
}

impl Default for Level {
    fn default() -> Self {
        Level(Self::MIN)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Level {
    type Error = StorageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value as i64)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl ToSql for Level {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0 as i64))
    }
}

impl FromSql for Level {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = i64::column_result(value)?;
        Level::new(raw).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A learner, keyed externally by `username`
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub current_level: u8,
    pub current_word_index: u32,
    pub score: i64,
}

impl User {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            current_level: row.get(2)?,
            current_word_index: row.get(3)?,
            score: row.get(4)?,
        })
    }
}

/// Vocabulary entry. Ids grow with insertion, which gives the in-level order.
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: i64,
    pub level: u8,
    pub source_text: String,
    pub target_text: String,
    pub audio_path: Option<String>,
}

impl Word {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Word {
            id: row.get(0)?,
            level: row.get(1)?,
            source_text: row.get(2)?,
            target_text: row.get(3)?,
            audio_path: row.get(4)?,
        })
    }
}

/// Word data before it has an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWord {
    pub level: Level,
    pub source_text: String,
    pub target_text: String,
    pub audio_path: Option<String>,
}

impl NewWord {
    pub fn new(level: Level, source_text: impl Into<String>, target_text: impl Into<String>) -> Self {
        NewWord {
            level,
            source_text: source_text.into(),
            target_text: target_text.into(),
            audio_path: None,
        }
    }
}

/// A word whose error count for one user reached the difficulty threshold
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultWord {
    pub word_id: i64,
    pub level: u8,
    pub source_text: String,
    pub target_text: String,
    pub error_count: u32,
}
