//! Fuzzy matching of typed answers against the expected translation

use strsim::{jaro_winkler, levenshtein, normalized_levenshtein};

/// Similarity at which a typed answer counts as correct
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.85;

/// Result of grading a typed answer
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub is_correct: bool,
    pub similarity: f64,
    pub feedback: String,
}

/// Compare a typed answer with the expected text, tolerating small typos
pub fn check_answer(user_input: &str, expected: &str, threshold: f64) -> MatchResult {
    let input_normalized = normalize(user_input);
    let expected_normalized = normalize(expected);

    if input_normalized.is_empty() {
        return MatchResult {
            is_correct: false,
            similarity: 0.0,
            feedback: format!("No answer. Expected: '{}'", expected.trim()),
        };
    }

    if input_normalized == expected_normalized {
        return MatchResult {
            is_correct: true,
            similarity: 1.0,
            feedback: "Correct!".to_string(),
        };
    }

    // Jaro-Winkler weighs shared prefixes, which suits typos
    let levenshtein_sim = normalized_levenshtein(&input_normalized, &expected_normalized);
    let jaro_sim = jaro_winkler(&input_normalized, &expected_normalized);
    let similarity = levenshtein_sim * 0.4 + jaro_sim * 0.6;

    let (is_correct, feedback) = if similarity >= threshold {
        (true, format!("Close enough! ({}% match)", (similarity * 100.0) as i32))
    } else if similarity >= 0.5 {
        let distance = levenshtein(&input_normalized, &expected_normalized);
        (false, format!("Almost! {} characters off. Expected: '{}'", distance, expected.trim()))
    } else {
        (false, format!("Incorrect. Expected: '{}'", expected.trim()))
    };

    MatchResult {
        is_correct,
        similarity,
        feedback,
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_ignores_case_and_spacing() {
        let result = check_answer("  Time ", "time", DEFAULT_MATCH_THRESHOLD);
        assert!(result.is_correct);
        assert_eq!(result.similarity, 1.0);

        let result = check_answer("حمار  وحشي", "حمار وحشي", DEFAULT_MATCH_THRESHOLD);
        assert!(result.is_correct);
    }

    #[test]
    fn small_typo_is_accepted() {
        let result = check_answer("beleive", "believe", DEFAULT_MATCH_THRESHOLD);
        assert!(result.is_correct, "similarity was {}", result.similarity);
    }

    #[test]
    fn unrelated_answer_is_rejected() {
        let result = check_answer("table", "believe", DEFAULT_MATCH_THRESHOLD);
        assert!(!result.is_correct);
        assert!(result.feedback.contains("believe"));
    }

    #[test]
    fn empty_answer_is_wrong() {
        let result = check_answer("   ", "day", DEFAULT_MATCH_THRESHOLD);
        assert!(!result.is_correct);
        assert_eq!(result.similarity, 0.0);
    }
}
