#![allow(dead_code)]

use mastery_core::{Level, NewWord, Store};
use tempfile::TempDir;

/// File-backed store in a fresh temp directory. Keep the `TempDir` alive.
pub fn create_test_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = Store::open(dir.path().join("vocabulary.db")).expect("failed to open test store");
    (dir, store)
}

pub fn level(n: i64) -> Level {
    Level::new(n).expect("valid level")
}

/// Insert `n` words into `lvl`, returning their ids in insertion order
pub fn add_words(store: &Store, lvl: i64, n: usize) -> Vec<i64> {
    (0..n)
        .map(|i| {
            store
                .add_word(&NewWord::new(level(lvl), format!("word-{lvl}-{i}"), format!("كلمة-{i}")))
                .expect("insert word")
        })
        .collect()
}
