//! Progress tracking - per-level resume points and per-word error counts

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::Store;
use crate::error::StorageResult;
use crate::models::{DifficultWord, Level};

/// Error count at which a word is considered difficult
pub const DEFAULT_DIFFICULT_THRESHOLD: u32 = 3;

impl Store {
    /// Saved word index for a level, 0 when the level was never visited
    pub fn get_level_progress(&self, username: &str, level: Level) -> StorageResult<u32> {
        let conn = self.conn()?;
        let index = conn
            .query_row(
                "SELECT word_index FROM level_progress WHERE username = ?1 AND level = ?2",
                params![username, level],
                |row| row.get(0),
            )
            .optional()?;
        Ok(index.unwrap_or(0))
    }

    pub fn set_level_progress(&self, username: &str, level: Level, index: u32) -> StorageResult<()> {
        let conn = self.conn()?;
        set_level_progress_internal(&conn, username, level, index)
    }

    /// Record one wrong answer, returning the new count
    pub fn increment_word_error(&self, username: &str, word_id: i64) -> StorageResult<u32> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "INSERT INTO word_errors (username, word_id, error_count)
             VALUES (?1, ?2, 1)
             ON CONFLICT(username, word_id)
             DO UPDATE SET error_count = error_count + 1
             RETURNING error_count",
            params![username, word_id],
            |row| row.get(0),
        )?;
        tracing::debug!(username, word_id, count, "recorded word error");
        Ok(count)
    }

    pub fn get_word_error_count(&self, username: &str, word_id: i64) -> StorageResult<u32> {
        let conn = self.conn()?;
        let count = conn
            .query_row(
                "SELECT error_count FROM word_errors WHERE username = ?1 AND word_id = ?2",
                params![username, word_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0))
    }

    /// Words with at least `min_errors` recorded errors, most errors first
    pub fn get_difficult_words(&self, username: &str, min_errors: u32) -> StorageResult<Vec<DifficultWord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT w.id, w.level, w.source_text, w.target_text, we.error_count
             FROM word_errors we
             JOIN words w ON we.word_id = w.id
             WHERE we.username = ?1 AND we.error_count >= ?2
             ORDER BY we.error_count DESC, w.id ASC",
        )?;
        let words = stmt
            .query_map(params![username, min_errors], |row| {
                Ok(DifficultWord {
                    word_id: row.get(0)?,
                    level: row.get(1)?,
                    source_text: row.get(2)?,
                    target_text: row.get(3)?,
                    error_count: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(words)
    }

    /// Drop the error row entirely, clearing difficult status
    pub fn remove_from_difficult(&self, username: &str, word_id: i64) -> StorageResult<bool> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM word_errors WHERE username = ?1 AND word_id = ?2",
            params![username, word_id],
        )?;
        Ok(removed > 0)
    }
}

pub(crate) fn set_level_progress_internal(
    conn: &Connection,
    username: &str,
    level: Level,
    index: u32,
) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO level_progress (username, level, word_index) VALUES (?1, ?2, ?3)
         ON CONFLICT(username, level) DO UPDATE SET word_index = excluded.word_index",
        params![username, level, index],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewWord;

    fn store_with_words(n: usize) -> (Store, Vec<i64>) {
        let store = Store::in_memory().unwrap();
        let level = Level::new(1).unwrap();
        let ids = (0..n)
            .map(|i| {
                store
                    .add_word(&NewWord::new(level, format!("word{i}"), format!("كلمة{i}")))
                    .unwrap()
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn level_progress_defaults_to_zero_and_upserts() {
        let store = Store::in_memory().unwrap();
        let level = Level::new(3).unwrap();
        assert_eq!(store.get_level_progress("ali", level).unwrap(), 0);
        store.set_level_progress("ali", level, 4).unwrap();
        store.set_level_progress("ali", level, 6).unwrap();
        assert_eq!(store.get_level_progress("ali", level).unwrap(), 6);
        assert_eq!(store.get_level_progress("omar", level).unwrap(), 0);
    }

    #[test]
    fn increments_accumulate() {
        let (store, ids) = store_with_words(1);
        for expected in 1..=5 {
            assert_eq!(store.increment_word_error("ali", ids[0]).unwrap(), expected);
        }
        assert_eq!(store.get_word_error_count("ali", ids[0]).unwrap(), 5);
    }

    #[test]
    fn difficult_words_sorted_and_scoped_to_user() {
        let (store, ids) = store_with_words(4);
        let errors = [(ids[0], 3), (ids[1], 5), (ids[2], 2), (ids[3], 3)];
        for (id, n) in errors {
            for _ in 0..n {
                store.increment_word_error("ali", id).unwrap();
            }
        }
        for _ in 0..9 {
            store.increment_word_error("omar", ids[2]).unwrap();
        }

        let difficult = store.get_difficult_words("ali", 3).unwrap();
        let got: Vec<_> = difficult.iter().map(|d| (d.word_id, d.error_count)).collect();
        assert_eq!(got, vec![(ids[1], 5), (ids[0], 3), (ids[3], 3)]);
    }

    #[test]
    fn remove_from_difficult_resets_fully() {
        let (store, ids) = store_with_words(2);
        for _ in 0..3 {
            store.increment_word_error("ali", ids[0]).unwrap();
        }
        store.increment_word_error("ali", ids[1]).unwrap();

        assert!(store.remove_from_difficult("ali", ids[0]).unwrap());
        let remaining = store.get_difficult_words("ali", 1).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].word_id, ids[1]);
        assert_eq!(store.get_word_error_count("ali", ids[0]).unwrap(), 0);
        assert!(!store.remove_from_difficult("ali", ids[0]).unwrap());
    }
}
