//! Login session context and the device-local resume preference

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageResult;
use crate::models::{Level, User, Word};

/// File name of the preference document inside the data directory
pub const PREFERENCES_FILE: &str = "preferences.json";

/// State of one logged-in learner. Created at login, dropped at logout.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) user_id: i64,
    pub(crate) username: String,
    pub(crate) active: Option<ActiveLevel>,
}

/// The level being learned, with its word list captured when the level was entered
#[derive(Debug, Clone)]
pub(crate) struct ActiveLevel {
    pub(crate) level: Level,
    pub(crate) words: Vec<Word>,
    pub(crate) index: usize,
    /// Set once the current word was answered wrong; cleared when the index moves
    pub(crate) missed_current: bool,
}

impl Session {
    pub(crate) fn new(user: &User) -> Self {
        Session {
            user_id: user.id,
            username: user.username.clone(),
            active: None,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn active_level(&self) -> Option<Level> {
        self.active.as_ref().map(|a| a.level)
    }

    /// Position within the active level
    pub fn index(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.index)
    }

    /// Word waiting for an answer, `None` when no level is active or it is finished
    pub fn current_word(&self) -> Option<&Word> {
        self.active.as_ref().and_then(|a| a.words.get(a.index))
    }

    pub fn level_words(&self) -> &[Word] {
        self.active.as_ref().map(|a| a.words.as_slice()).unwrap_or(&[])
    }

    pub fn is_level_complete(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.index >= a.words.len())
    }
}

/// Device-local preferences persisted as JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub last_username: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Preferences {
    /// Load preferences, treating a missing file as defaults
    pub fn load(path: &Path) -> StorageResult<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> StorageResult<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }

    pub fn remember(&mut self, username: &str) {
        self.last_username = Some(username.to_string());
        self.last_login_at = Some(Utc::now());
    }

    pub fn forget(&mut self) {
        self.last_username = None;
        self.last_login_at = None;
    }
}

pub fn preferences_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PREFERENCES_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_preferences_load_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(&preferences_path(dir.path())).unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn preferences_survive_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = preferences_path(dir.path());

        let mut prefs = Preferences::default();
        prefs.remember("ali");
        prefs.save(&path).unwrap();
        let loaded = Preferences::load(&path).unwrap();
        assert_eq!(loaded.last_username.as_deref(), Some("ali"));
        assert!(loaded.last_login_at.is_some());

        prefs.forget();
        prefs.save(&path).unwrap();
        assert_eq!(Preferences::load(&path).unwrap().last_username, None);
    }

    #[test]
    fn corrupt_preferences_surface_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = preferences_path(dir.path());
        fs::write(&path, "{not json").unwrap();
        assert!(Preferences::load(&path).is_err());
    }
}
