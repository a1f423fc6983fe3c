//! Multiple-choice question generation for the learning flow

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::Word;

/// Number of options shown for a word, including the correct one
pub const DEFAULT_OPTION_COUNT: usize = 4;

/// A prompt with shuffled answer options
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choices {
    pub word_id: i64,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl Choices {
    pub fn is_correct(&self, picked: usize) -> bool {
        picked == self.correct_index
    }
}

/// Build options for `target` using target texts of other words in `pool` as distractors
pub fn build_choices<R: Rng>(
    target: &Word,
    pool: &[Word],
    option_count: usize,
    rng: &mut R,
) -> Result<Choices> {
    if option_count < 2 {
        return Err(Error::Choices(format!("need at least 2 options, got {option_count}")));
    }
    let correct_answer = target.target_text.trim().to_string();

    let mut distractors: Vec<String> = Vec::new();
    for word in pool.iter().filter(|w| w.id != target.id) {
        let text = word.target_text.trim();
        if !text.is_empty() && text != correct_answer && !distractors.iter().any(|d| d == text) {
            distractors.push(text.to_string());
        }
    }

    let needed = option_count - 1;
    if distractors.len() < needed {
        return Err(Error::Choices(format!(
            "only {} distinct distractors for '{}', need {}",
            distractors.len(),
            target.source_text,
            needed
        )));
    }

    distractors.shuffle(&mut *rng);
    distractors.truncate(needed);

    let correct_index = rng.gen_range(0..option_count);
    let mut options = distractors;
    options.insert(correct_index, correct_answer);

    Ok(Choices {
        word_id: target.id,
        prompt: target.source_text.clone(),
        options,
        correct_index,
    })
}
