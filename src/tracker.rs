//! Answer policy: turns learner events into store updates
//!
//! A wrong answer keeps the learner on the same word until it is answered
//! correctly. Points are only awarded when the word was right on the first try.

use rand::Rng;

use crate::db::Store;
use crate::error::{Error, Result};
use crate::fuzzy::{check_answer, MatchResult};
use crate::models::{DifficultWord, Level, User, Word};
use crate::progress::DEFAULT_DIFFICULT_THRESHOLD;
use crate::questions::{build_choices, Choices, DEFAULT_OPTION_COUNT};
use crate::session::{ActiveLevel, Session};

/// Points for a first-try correct answer
pub const DEFAULT_CORRECT_REWARD: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    pub correct_reward: u32,
    pub difficult_threshold: u32,
    pub match_threshold: f64,
    pub option_count: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            correct_reward: DEFAULT_CORRECT_REWARD,
            difficult_threshold: DEFAULT_DIFFICULT_THRESHOLD,
            match_threshold: crate::fuzzy::DEFAULT_MATCH_THRESHOLD,
            option_count: DEFAULT_OPTION_COUNT,
        }
    }
}

/// How a level is entered from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Resume at the saved index for that level
    Continue,
    /// Reset the saved index to 0
    StartOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Advanced {
        index: usize,
        score_delta: u32,
        completed: bool,
    },
    Retry {
        word_id: i64,
        error_count: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Cleared,
    StillDifficult { error_count: u32 },
}

pub struct Tracker<'a> {
    store: &'a Store,
    policy: Policy,
}

impl<'a> Tracker<'a> {
    pub fn new(store: &'a Store, policy: Policy) -> Self {
        Tracker { store, policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Fetch or create the user and open a session for them
    pub fn login(&self, username: &str) -> Result<Session> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::EmptyUsername);
        }
        let user = match self.store.get_user(username)? {
            Some(user) => user,
            None => self.store.create_user(username)?,
        };
        tracing::info!(username, user_id = user.id, "logged in");
        Ok(Session::new(&user))
    }

    /// Open a session for an existing user only
    pub fn resume(&self, username: &str) -> Result<Session> {
        let user = self
            .store
            .get_user(username)?
            .ok_or_else(|| Error::NotFound(username.to_string()))?;
        Ok(Session::new(&user))
    }

    /// Current stored state of the session's user
    pub fn user(&self, session: &Session) -> Result<User> {
        self.store
            .get_user(&session.username)?
            .ok_or_else(|| Error::NotFound(session.username.clone()))
    }

    /// Enter a level and return the index the learner starts at
    pub fn start_level(&self, session: &mut Session, level: Level, mode: StartMode) -> Result<usize> {
        let words = self.store.get_words_by_level(level)?;
        let index = match mode {
            StartMode::Continue => {
                let saved = self.store.get_level_progress(&session.username, level)? as usize;
                let index = saved.min(words.len());
                self.store
                    .advance_progress(&session.username, level, index as u32, 0)?;
                index
            }
            StartMode::StartOver => {
                self.store
                    .reset_user_progress_for_level(&session.username, level)?;
                0
            }
        };
        tracing::debug!(username = %session.username, %level, ?mode, index, "level started");

        session.active = Some(ActiveLevel {
            level,
            words,
            index,
            missed_current: false,
        });
        Ok(index)
    }

    /// Record an answer to the current word of the active level
    pub fn submit_answer(&self, session: &mut Session, correct: bool) -> Result<AnswerOutcome> {
        let active = session.active.as_mut().ok_or(Error::NoActiveLevel)?;
        let word = active
            .words
            .get(active.index)
            .ok_or(Error::LevelComplete(active.level.get()))?;
        let word_id = word.id;

        if !correct {
            let error_count = self.store.increment_word_error(&session.username, word_id)?;
            active.missed_current = true;
            return Ok(AnswerOutcome::Retry { word_id, error_count });
        }

        let index = active.index + 1;
        let score_delta = if active.missed_current {
            0
        } else {
            self.policy.correct_reward
        };
        self.store
            .advance_progress(&session.username, active.level, index as u32, score_delta)?;
        active.index = index;
        active.missed_current = false;

        let completed = index >= active.words.len();
        if completed {
            tracing::info!(username = %session.username, level = %active.level, "level completed");
        }
        Ok(AnswerOutcome::Advanced {
            index,
            score_delta,
            completed,
        })
    }

    /// Grade a typed answer for the current word and record it
    pub fn submit_typed(&self, session: &mut Session, typed: &str) -> Result<(MatchResult, AnswerOutcome)> {
        let expected = current_word(session)?.target_text.clone();
        let result = check_answer(typed, &expected, self.policy.match_threshold);
        let outcome = self.submit_answer(session, result.is_correct)?;
        Ok((result, outcome))
    }

    /// Multiple-choice options for the current word, drawn from the same level
    pub fn choices<R: Rng>(&self, session: &Session, rng: &mut R) -> Result<Choices> {
        let word = current_word(session)?;
        build_choices(word, session.level_words(), self.policy.option_count, rng)
    }

    pub fn difficult_words(&self, session: &Session) -> Result<Vec<DifficultWord>> {
        Ok(self
            .store
            .get_difficult_words(&session.username, self.policy.difficult_threshold)?)
    }

    /// Record a review answer. Level position is never touched here.
    pub fn submit_review(&self, session: &Session, word_id: i64, correct: bool) -> Result<ReviewOutcome> {
        if correct {
            self.store.remove_from_difficult(&session.username, word_id)?;
            tracing::debug!(username = %session.username, word_id, "cleared difficult word");
            Ok(ReviewOutcome::Cleared)
        } else {
            let error_count = self.store.increment_word_error(&session.username, word_id)?;
            Ok(ReviewOutcome::StillDifficult { error_count })
        }
    }
}

fn current_word(session: &Session) -> Result<&Word> {
    session.current_word().ok_or_else(|| match session.active_level() {
        Some(level) => Error::LevelComplete(level.get()),
        None => Error::NoActiveLevel,
    })
}
