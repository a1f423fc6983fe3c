use std::io;
use std::path::PathBuf;

use mastery_core::{bootstrap, bootstrap_from_config, AppDirs, Config, Error, FixedDir, Level, StartMode, StorageError};

fn config_for(dir: &std::path::Path) -> Config {
    Config {
        data_dir: dir.to_path_buf(),
        ..Config::default()
    }
}

#[test]
fn bootstrap_seeds_once_and_creates_directory() {
    let root = tempfile::tempdir().unwrap();
    let data_dir = root.path().join("nested").join("data");
    let config = config_for(&data_dir);

    let app = bootstrap(&config, &FixedDir(data_dir.clone())).unwrap();
    assert!(data_dir.join("vocabulary.db").exists());
    assert_eq!(app.store().count_words().unwrap(), 60);
    drop(app);

    let app = bootstrap(&config, &FixedDir(data_dir)).unwrap();
    assert_eq!(app.store().count_words().unwrap(), 60);
}

#[test]
fn seeding_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        seed_baseline: false,
        ..config_for(dir.path())
    };
    let app = bootstrap(&config, &FixedDir(dir.path().to_path_buf())).unwrap();
    assert_eq!(app.store().count_words().unwrap(), 0);
}

#[test]
fn login_is_remembered_until_logout() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    let dirs = FixedDir(dir.path().to_path_buf());

    let mut app = bootstrap(&config, &dirs).unwrap();
    assert!(app.resume().unwrap().is_none());
    let mut session = app.login("  ali ").unwrap();
    assert_eq!(session.username(), "ali");
    app.tracker()
        .start_level(&mut session, Level::new(1).unwrap(), StartMode::Continue)
        .unwrap();
    app.tracker().submit_answer(&mut session, true).unwrap();
    drop(app);

    let mut app = bootstrap(&config, &dirs).unwrap();
    assert_eq!(app.last_username(), Some("ali"));
    let session = app.resume().unwrap().expect("remembered session");
    assert_eq!(session.username(), "ali");
    assert_eq!(session.active_level(), None);
    assert_eq!(app.tracker().user(&session).unwrap().score, 10);

    app.logout(session).unwrap();
    drop(app);

    let mut app = bootstrap(&config, &dirs).unwrap();
    assert!(app.resume().unwrap().is_none());
}

struct ReadOnlyDirs;

impl AppDirs for ReadOnlyDirs {
    fn data_dir(&self) -> io::Result<PathBuf> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "no writable directory"))
    }
}

#[test]
fn unresolvable_directory_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = bootstrap(&config_for(dir.path()), &ReadOnlyDirs).err().unwrap();
    assert!(matches!(err, Error::Storage(StorageError::Io(_))));
}

#[test]
fn bootstrap_from_config_uses_configured_directory() {
    let root = tempfile::tempdir().unwrap();
    let data_dir = root.path().join("from-config");
    let app = bootstrap_from_config(&config_for(&data_dir)).unwrap();
    assert_eq!(app.data_dir(), data_dir.as_path());
    assert!(data_dir.join("vocabulary.db").exists());
}
