//! Python bindings for a UI host. Every call opens the store at `db_path`.

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

use crate::db::Store;
use crate::excel::import_file;
use crate::fuzzy::{check_answer, MatchResult, DEFAULT_MATCH_THRESHOLD};
use crate::models::{DifficultWord, Level, User, Word};
use crate::progress::DEFAULT_DIFFICULT_THRESHOLD;
use crate::seed::seed_if_empty;

fn to_py_err(e: impl std::fmt::Display) -> PyErr {
    PyRuntimeError::new_err(e.to_string())
}

fn open(db_path: &str) -> PyResult<Store> {
    Store::open(db_path).map_err(to_py_err)
}

fn level(value: i64) -> PyResult<Level> {
    Level::new(value).map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "init_database", signature = (db_path, seed = true))]
pub fn py_init_database(db_path: &str, seed: bool) -> PyResult<usize> {
    let store = open(db_path)?;
    if seed {
        seed_if_empty(&store).map_err(to_py_err)
    } else {
        Ok(0)
    }
}

#[pyfunction]
#[pyo3(name = "get_user")]
pub fn py_get_user(db_path: &str, username: &str) -> PyResult<Option<User>> {
    open(db_path)?.get_user(username).map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "create_user")]
pub fn py_create_user(db_path: &str, username: &str) -> PyResult<User> {
    open(db_path)?.create_user(username).map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "get_words_by_level")]
pub fn py_get_words_by_level(db_path: &str, level_num: i64) -> PyResult<Vec<Word>> {
    open(db_path)?
        .get_words_by_level(level(level_num)?)
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "update_user_progress", signature = (db_path, username, level_num, index, score_delta = 0))]
pub fn py_update_user_progress(
    db_path: &str,
    username: &str,
    level_num: i64,
    index: u32,
    score_delta: u32,
) -> PyResult<()> {
    open(db_path)?
        .update_user_progress(username, level(level_num)?, index, score_delta)
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "reset_user_progress_for_level")]
pub fn py_reset_user_progress_for_level(db_path: &str, username: &str, level_num: i64) -> PyResult<()> {
    open(db_path)?
        .reset_user_progress_for_level(username, level(level_num)?)
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "get_level_progress")]
pub fn py_get_level_progress(db_path: &str, username: &str, level_num: i64) -> PyResult<u32> {
    open(db_path)?
        .get_level_progress(username, level(level_num)?)
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "set_level_progress")]
pub fn py_set_level_progress(db_path: &str, username: &str, level_num: i64, index: u32) -> PyResult<()> {
    open(db_path)?
        .set_level_progress(username, level(level_num)?, index)
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "increment_word_error")]
pub fn py_increment_word_error(db_path: &str, username: &str, word_id: i64) -> PyResult<u32> {
    open(db_path)?
        .increment_word_error(username, word_id)
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "get_difficult_words", signature = (db_path, username, min_errors = DEFAULT_DIFFICULT_THRESHOLD))]
pub fn py_get_difficult_words(db_path: &str, username: &str, min_errors: u32) -> PyResult<Vec<DifficultWord>> {
    open(db_path)?
        .get_difficult_words(username, min_errors)
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "remove_from_difficult")]
pub fn py_remove_from_difficult(db_path: &str, username: &str, word_id: i64) -> PyResult<bool> {
    open(db_path)?
        .remove_from_difficult(username, word_id)
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "update_word")]
pub fn py_update_word(db_path: &str, word_id: i64, source_text: &str, target_text: &str) -> PyResult<bool> {
    open(db_path)?
        .update_word(word_id, source_text, target_text)
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "delete_words")]
pub fn py_delete_words(db_path: &str, word_ids: Vec<i64>) -> PyResult<usize> {
    open(db_path)?
        .delete_words_bulk(&word_ids)
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "get_word_count_by_level")]
pub fn py_get_word_count_by_level(db_path: &str) -> PyResult<BTreeMap<u8, i64>> {
    open(db_path)?.get_word_count_by_level().map_err(to_py_err)
}

/// Returns `(inserted, skipped row messages)`
#[pyfunction]
#[pyo3(name = "import_file")]
pub fn py_import_file(db_path: &str, file_path: &str, level_num: i64) -> PyResult<(usize, Vec<String>)> {
    let store = open(db_path)?;
    let report = import_file(&store, Path::new(file_path), level(level_num)?).map_err(to_py_err)?;
    let skipped = report.skipped.iter().map(|e| e.to_string()).collect();
    Ok((report.inserted, skipped))
}

#[pyfunction]
#[pyo3(name = "check_answer", signature = (user_input, expected, threshold = DEFAULT_MATCH_THRESHOLD))]
pub fn py_check_answer(user_input: &str, expected: &str, threshold: f64) -> MatchResult {
    check_answer(user_input, expected, threshold)
}
