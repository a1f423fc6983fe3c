//! Startup sequence and the application handle used by a UI host
//!
//! `bootstrap` is the only way to get an [`App`]: resolve a writable directory,
//! open the store (which migrates it), seed baseline words, load preferences.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::db::Store;
use crate::error::{Error, ImportError, Result};
use crate::excel::{import_file, ImportReport};
use crate::models::Level;
use crate::seed::seed_if_empty;
use crate::session::{preferences_path, Preferences, Session};
use crate::tracker::{Policy, Tracker};

/// Resolves a writable directory for application data on the current platform
pub trait AppDirs {
    fn data_dir(&self) -> io::Result<PathBuf>;
}

/// A directory chosen up front by the host or the configuration
#[derive(Debug, Clone)]
pub struct FixedDir(pub PathBuf);

impl AppDirs for FixedDir {
    fn data_dir(&self) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.0)?;
        Ok(self.0.clone())
    }
}

/// The directory named by the configuration (`MASTERY_DATA_DIR`), anchored to the
/// working directory when relative
#[derive(Debug, Clone)]
pub struct EnvDirs {
    configured: PathBuf,
}

impl EnvDirs {
    pub fn new(config: &Config) -> Self {
        Self {
            configured: config.data_dir.clone(),
        }
    }

    fn resolve(&self) -> io::Result<PathBuf> {
        if self.configured.is_absolute() {
            Ok(self.configured.clone())
        } else {
            Ok(env::current_dir()?.join(&self.configured))
        }
    }
}

impl AppDirs for EnvDirs {
    fn data_dir(&self) -> io::Result<PathBuf> {
        let dir = self.resolve()?;
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

pub struct App {
    store: Store,
    policy: Policy,
    data_dir: PathBuf,
    preferences: Preferences,
}

/// Open-or-create the store, migrate, seed, and hand back a ready [`App`]
pub fn bootstrap(config: &Config, dirs: &dyn AppDirs) -> Result<App> {
    let data_dir = dirs.data_dir().map_err(crate::error::StorageError::from)?;
    let db_path = data_dir.join(&config.db_file);
    let store = Store::open(&db_path)?;

    if config.seed_baseline {
        seed_if_empty(&store)?;
    }
    let preferences = Preferences::load(&preferences_path(&data_dir))?;

    tracing::info!(
        db = %db_path.display(),
        schema = store.schema_version()?,
        "application data ready"
    );
    Ok(App {
        store,
        policy: config.policy,
        data_dir,
        preferences,
    })
}

/// Bootstrap with the directory named in the configuration
pub fn bootstrap_from_config(config: &Config) -> Result<App> {
    bootstrap(config, &EnvDirs::new(config))
}

/// Full host startup: `.env` and environment config, logging, then [`bootstrap`]
pub fn bootstrap_from_env() -> Result<App> {
    let config = Config::load();
    crate::logging::init_tracing(&config.log);
    bootstrap_from_config(&config)
}

impl App {
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn tracker(&self) -> Tracker<'_> {
        Tracker::new(&self.store, self.policy)
    }

    pub fn last_username(&self) -> Option<&str> {
        self.preferences.last_username.as_deref()
    }

    /// Log in (creating the user if needed) and remember the name for next start
    pub fn login(&mut self, username: &str) -> Result<Session> {
        let session = self.tracker().login(username)?;
        self.preferences.remember(session.username());
        self.preferences.save(&preferences_path(&self.data_dir))?;
        Ok(session)
    }

    /// Resume the remembered user, if any. A stale name is forgotten.
    pub fn resume(&mut self) -> Result<Option<Session>> {
        let Some(username) = self.preferences.last_username.clone() else {
            return Ok(None);
        };
        let resumed = self.tracker().resume(&username);
        match resumed {
            Ok(session) => Ok(Some(session)),
            Err(Error::NotFound(_)) => {
                tracing::warn!(username = %username, "remembered user no longer exists");
                self.forget_last_user()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// End the session and clear the remembered name
    pub fn logout(&mut self, session: Session) -> Result<()> {
        tracing::info!(username = session.username(), "logged out");
        drop(session);
        self.forget_last_user()
    }

    pub fn import(&self, file_path: &Path, default_level: Level) -> std::result::Result<ImportReport, ImportError> {
        import_file(&self.store, file_path, default_level)
    }

    fn forget_last_user(&mut self) -> Result<()> {
        self.preferences.forget();
        self.preferences.save(&preferences_path(&self.data_dir))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_data_dir_is_anchored_to_working_directory() {
        let config = Config {
            data_dir: PathBuf::from("relative/data"),
            ..Config::default()
        };
        let resolved = EnvDirs::new(&config).resolve().unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, env::current_dir().unwrap().join("relative/data"));
    }

    #[test]
    fn absolute_data_dir_is_created_as_is() {
        let root = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: root.path().join("app"),
            ..Config::default()
        };
        let dir = EnvDirs::new(&config).data_dir().unwrap();
        assert_eq!(dir, root.path().join("app"));
        assert!(dir.is_dir());
    }
}
