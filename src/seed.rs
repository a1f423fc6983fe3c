//! Baseline vocabulary shipped with the app, ten words per level

use crate::db::Store;
use crate::error::StorageResult;
use crate::models::{Level, NewWord};

const BASELINE: [[(&str, &str); 10]; 6] = [
    [
        ("time", "وقت"), ("year", "سنة"), ("people", "ناس"), ("way", "طريق"), ("day", "يوم"),
        ("man", "رجل"), ("thing", "شيء"), ("woman", "امرأة"), ("life", "حياة"), ("child", "طفل"),
    ],
    [
        ("ask", "يسأل"), ("work", "عمل"), ("seem", "يبدو"), ("feel", "يشعر"), ("try", "يحاول"),
        ("leave", "يغادر"), ("call", "ينادي"), ("family", "عائلة"), ("school", "مدرسة"), ("plant", "نبات"),
    ],
    [
        ("begin", "يبدأ"), ("help", "يساعد"), ("talk", "يتحدث"), ("turn", "يدور"), ("start", "يبدأ"),
        ("might", "قد"), ("show", "يعرض"), ("hear", "يسمع"), ("play", "يلعب"), ("run", "يجري"),
    ],
    [
        ("move", "يتحرك"), ("like", "يحب"), ("live", "يعيش"), ("believe", "يصدق"), ("hold", "يمسك"),
        ("bring", "يحضر"), ("happen", "يحدث"), ("write", "يكتب"), ("provide", "يزود"), ("sit", "يجلس"),
    ],
    [
        ("stand", "يقف"), ("lose", "يخسر"), ("pay", "يدفع"), ("meet", "يقابل"), ("include", "يشمل"),
        ("continue", "يستمر"), ("set", "يضع"), ("learn", "يتعلم"), ("change", "يغير"), ("leader", "قائد"),
    ],
    [
        ("watch", "يشاهد"), ("follow", "يتبع"), ("stop", "يتوقف"), ("create", "ينشئ"), ("speak", "يتحدث"),
        ("read", "يقرأ"), ("allow", "يسمح"), ("add", "يضيف"), ("spend", "ينفق"), ("grow", "ينمو"),
    ],
];

pub fn baseline_words() -> Vec<NewWord> {
    Level::all()
        .zip(BASELINE.iter())
        .flat_map(|(level, words)| {
            words
                .iter()
                .map(move |(source, target)| NewWord::new(level, *source, *target))
        })
        .collect()
}

/// Insert the baseline words when the store has none. Returns how many were added.
pub fn seed_if_empty(store: &Store) -> StorageResult<usize> {
    if store.count_words()? > 0 {
        tracing::debug!("word table already populated, skipping seed");
        return Ok(0);
    }
    let inserted = store.insert_words(&baseline_words())?;
    tracing::info!(inserted, "seeded baseline words");
    Ok(inserted)
}
