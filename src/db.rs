//! Database operations for users and vocabulary storage

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::error::{StorageError, StorageResult};
use crate::models::{Level, NewWord, User, Word};

/// Schema version written to `PRAGMA user_version` after all migrations
pub const SCHEMA_VERSION: i32 = 2;

const MIGRATIONS: &[(i32, &str)] = &[
    (
        1,
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            current_level INTEGER NOT NULL DEFAULT 1,
            current_word_index INTEGER NOT NULL DEFAULT 0,
            score INTEGER NOT NULL DEFAULT 0 CHECK (score >= 0)
        );
        CREATE TABLE IF NOT EXISTS words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            level INTEGER NOT NULL CHECK (level BETWEEN 1 AND 6),
            source_text TEXT NOT NULL,
            target_text TEXT NOT NULL,
            audio_path TEXT
        );
        CREATE TABLE IF NOT EXISTS level_progress (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            level INTEGER NOT NULL,
            word_index INTEGER NOT NULL DEFAULT 0,
            UNIQUE(username, level)
        );
        CREATE TABLE IF NOT EXISTS word_errors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            word_id INTEGER NOT NULL,
            error_count INTEGER NOT NULL DEFAULT 0,
            UNIQUE(username, word_id)
        );",
    ),
    (
        2,
        "CREATE INDEX IF NOT EXISTS idx_words_level_id ON words(level, id);
        CREATE INDEX IF NOT EXISTS idx_word_errors_user_count
            ON word_errors(username, error_count);",
    ),
];

const USER_COLUMNS: &str = "id, username, current_level, current_word_index, score";
const WORD_COLUMNS: &str = "id, level, source_text, target_text, audio_path";

/// Local vocabulary store. One connection, serialized behind a mutex.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) a database file and bring its schema up to date
    pub fn open<P: AsRef<Path>>(db_path: P) -> StorageResult<Self> {
        let conn = Connection::open(db_path.as_ref())?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;
        tracing::debug!(path = %db_path.as_ref().display(), "opened vocabulary database");
        Self::with_connection(conn)
    }

    /// In-memory store, used by tests and throwaway sessions
    pub fn in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(mut conn: Connection) -> StorageResult<Self> {
        migrate(&mut conn)?;
        Ok(Store {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    pub fn schema_version(&self) -> StorageResult<i32> {
        let conn = self.conn()?;
        Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    // ============= Users =============

    /// Look a user up by display name
    pub fn get_user(&self, username: &str) -> StorageResult<Option<User>> {
        let conn = self.conn()?;
        get_user_internal(&conn, username)
    }

    /// Create a user with level 1, index 0 and score 0, or return the existing row
    pub fn create_user(&self, username: &str) -> StorageResult<User> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO users (username) VALUES (?1) ON CONFLICT(username) DO NOTHING",
            params![username],
        )?;
        if inserted > 0 {
            tracing::info!(username, "created user");
        }
        get_user_internal(&conn, username)?
            .ok_or(StorageError::Database(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Set current level and index, adding `score_delta` to the stored score
    pub fn update_user_progress(
        &self,
        username: &str,
        level: Level,
        index: u32,
        score_delta: u32,
    ) -> StorageResult<()> {
        let conn = self.conn()?;
        update_user_progress_internal(&conn, username, level, index, score_delta)
    }

    /// Make `level` current and reset its resume point to 0, atomically
    pub fn reset_user_progress_for_level(&self, username: &str, level: Level) -> StorageResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let updated = tx.execute(
            "UPDATE users SET current_level = ?1, current_word_index = 0 WHERE username = ?2",
            params![level, username],
        )?;
        if updated == 0 {
            // dropping `tx` rolls back
            return Err(StorageError::UserNotFound(username.to_string()));
        }
        crate::progress::set_level_progress_internal(&tx, username, level, 0)?;
        tx.commit()?;
        tracing::info!(username, %level, "level progress reset");
        Ok(())
    }

    /// Update the user row and the per-level resume point in one transaction
    pub fn advance_progress(
        &self,
        username: &str,
        level: Level,
        index: u32,
        score_delta: u32,
    ) -> StorageResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        update_user_progress_internal(&tx, username, level, index, score_delta)?;
        crate::progress::set_level_progress_internal(&tx, username, level, index)?;
        tx.commit()?;
        Ok(())
    }

    // ============= Words =============

    /// All words of a level in insertion order
    pub fn get_words_by_level(&self, level: Level) -> StorageResult<Vec<Word>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {WORD_COLUMNS} FROM words WHERE level = ?1 ORDER BY id"
        ))?;
        let words = stmt
            .query_map(params![level], Word::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(words)
    }

    pub fn get_word(&self, word_id: i64) -> StorageResult<Option<Word>> {
        let conn = self.conn()?;
        let word = conn
            .query_row(
                &format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?1"),
                params![word_id],
                Word::from_row,
            )
            .optional()?;
        Ok(word)
    }

    /// Add a single word, returning its id
    pub fn add_word(&self, word: &NewWord) -> StorageResult<i64> {
        let conn = self.conn()?;
        insert_word_internal(&conn, word)?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a batch of words in one transaction
    pub fn insert_words(&self, words: &[NewWord]) -> StorageResult<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for word in words {
            insert_word_internal(&tx, word)?;
        }
        tx.commit()?;
        Ok(words.len())
    }

    /// Edit the texts of a word in place. Level and audio are left alone.
    pub fn update_word(&self, word_id: i64, source_text: &str, target_text: &str) -> StorageResult<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE words SET source_text = ?1, target_text = ?2 WHERE id = ?3",
            params![source_text, target_text, word_id],
        )?;
        Ok(changed > 0)
    }

    /// Delete a word together with any error rows pointing at it
    pub fn delete_word(&self, word_id: i64) -> StorageResult<bool> {
        Ok(self.delete_words_bulk(&[word_id])? > 0)
    }

    /// Delete several words in one transaction. Empty input is a no-op.
    pub fn delete_words_bulk(&self, word_ids: &[i64]) -> StorageResult<usize> {
        if word_ids.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; word_ids.len()].join(",");
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        // First delete orphan error rows
        tx.execute(
            &format!("DELETE FROM word_errors WHERE word_id IN ({placeholders})"),
            params_from_iter(word_ids.iter()),
        )?;
        let deleted = tx.execute(
            &format!("DELETE FROM words WHERE id IN ({placeholders})"),
            params_from_iter(word_ids.iter()),
        )?;
        tx.commit()?;
        tracing::info!(requested = word_ids.len(), deleted, "deleted words");
        Ok(deleted)
    }

    /// Number of words per level. Levels without words are absent.
    pub fn get_word_count_by_level(&self) -> StorageResult<BTreeMap<u8, i64>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT level, COUNT(*) FROM words GROUP BY level ORDER BY level")?;
        let counts = stmt
            .query_map([], |row| Ok((row.get::<_, u8>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
        Ok(counts)
    }

    pub fn count_words(&self) -> StorageResult<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?)
    }
}

fn migrate(conn: &mut Connection) -> StorageResult<()> {
    let current: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if current > SCHEMA_VERSION {
        return Err(StorageError::Migration(format!(
            "database schema v{current} is newer than supported v{SCHEMA_VERSION}"
        )));
    }
    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn.transaction()?;
        tx.execute_batch(sql)
            .map_err(|e| StorageError::Migration(format!("v{version}: {e}")))?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        tracing::info!(version, "applied schema migration");
    }
    Ok(())
}

fn get_user_internal(conn: &Connection, username: &str) -> StorageResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            User::from_row,
        )
        .optional()?;
    Ok(user)
}

fn update_user_progress_internal(
    conn: &Connection,
    username: &str,
    level: Level,
    index: u32,
    score_delta: u32,
) -> StorageResult<()> {
    let updated = conn.execute(
        "UPDATE users
         SET current_level = ?1, current_word_index = ?2, score = score + ?3
         WHERE username = ?4",
        params![level, index, score_delta, username],
    )?;
    if updated == 0 {
        return Err(StorageError::UserNotFound(username.to_string()));
    }
    Ok(())
}

fn insert_word_internal(conn: &Connection, word: &NewWord) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO words (level, source_text, target_text, audio_path) VALUES (?1, ?2, ?3, ?4)",
        params![word.level, word.source_text, word.target_text, word.audio_path],
    )?;
    Ok(())
}
