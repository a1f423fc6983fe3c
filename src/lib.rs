//! English Mastery core - vocabulary progress and error tracking
//!
//! Provides the SQLite store for users, words, per-level progress and word errors,
//! the answer policy on top of it, word import, answer grading and choice building.

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod excel;
pub mod fuzzy;
pub mod logging;
pub mod models;
pub mod progress;
pub mod questions;
pub mod seed;
pub mod session;
pub mod tracker;

#[cfg(feature = "python")]
mod python;

pub use bootstrap::{bootstrap, bootstrap_from_config, bootstrap_from_env, App, AppDirs, EnvDirs, FixedDir};
pub use config::Config;
pub use db::Store;
pub use error::{Error, ImportError, ImportRowError, Result, SkipReason, StorageError, StorageResult};
pub use excel::{import_file, import_rows, ImportReport};
pub use fuzzy::{check_answer, MatchResult};
pub use logging::{init_tracing, LogConfig};
pub use models::{DifficultWord, Level, NewWord, User, Word};
pub use questions::{build_choices, Choices};
pub use session::{Preferences, Session};
pub use tracker::{AnswerOutcome, Policy, ReviewOutcome, StartMode, Tracker};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// English Mastery Python module
#[cfg(feature = "python")]
#[pymodule]
fn mastery_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Store setup
    m.add_function(wrap_pyfunction!(python::py_init_database, m)?)?;

    // Users and progress
    m.add_function(wrap_pyfunction!(python::py_get_user, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_create_user, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_update_user_progress, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_reset_user_progress_for_level, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_get_level_progress, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_set_level_progress, m)?)?;

    // Word errors
    m.add_function(wrap_pyfunction!(python::py_increment_word_error, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_get_difficult_words, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_remove_from_difficult, m)?)?;

    // Words
    m.add_function(wrap_pyfunction!(python::py_get_words_by_level, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_update_word, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_delete_words, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_get_word_count_by_level, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_import_file, m)?)?;

    // Answer grading
    m.add_function(wrap_pyfunction!(python::py_check_answer, m)?)?;

    m.add_class::<User>()?;
    m.add_class::<Word>()?;
    m.add_class::<DifficultWord>()?;
    m.add_class::<MatchResult>()?;
    m.add_class::<Choices>()?;

    Ok(())
}
