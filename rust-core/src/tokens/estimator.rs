/// Token estimation from free text
///
/// This is a length/category heuristic, not a tokenizer. Words contribute by
/// length class; whitespace, digit runs, punctuation and other characters add
/// fixed weights on top.

use crate::error::{CostError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const SHORT_WORD_WEIGHT: f64 = 0.5;
const MEDIUM_WORD_WEIGHT: f64 = 1.0;
const LONG_WORD_CHARS_PER_TOKEN: f64 = 4.0;
const WHITESPACE_WEIGHT: f64 = 0.1;
const DIGIT_RUN_WEIGHT: f64 = 0.5;
const PUNCTUATION_WEIGHT: f64 = 0.3;
const SPECIAL_WEIGHT: f64 = 1.0;

static WORD_RE: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
static DIGITS_RE: OnceLock<Regex> = OnceLock::new();
static PUNCTUATION_RE: OnceLock<Regex> = OnceLock::new();
static SPECIAL_RE: OnceLock<Regex> = OnceLock::new();

/// Separator controls U+001C..U+001F count as whitespace alongside `\s`.
fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("token pattern must compile"))
}

/// Per-category counts behind a token estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenBreakdown {
    /// Words of 1-2 characters
    pub short_words: usize,
    /// Words of 3-4 characters
    pub medium_words: usize,
    /// Words longer than 4 characters
    pub long_words: usize,
    pub whitespace_runs: usize,
    pub digit_runs: usize,
    pub punctuation: usize,
    pub special_chars: usize,
    /// Word contributions summed in text order
    pub word_score: f64,
}

impl TokenBreakdown {
    /// Unrounded heuristic score.
    pub fn score(&self) -> f64 {
        let mut score = self.word_score;
        score += self.whitespace_runs as f64 * WHITESPACE_WEIGHT;
        score += self.digit_runs as f64 * DIGIT_RUN_WEIGHT;
        score += self.punctuation as f64 * PUNCTUATION_WEIGHT;
        score += self.special_chars as f64 * SPECIAL_WEIGHT;
        score
    }

    pub fn word_count(&self) -> usize {
        self.short_words + self.medium_words + self.long_words
    }

    /// True when nothing but whitespace was analyzed.
    pub fn is_empty(&self) -> bool {
        self.word_count() == 0 && self.punctuation == 0 && self.special_chars == 0
    }

    /// Score rounded half-to-even. Non-empty text is clamped to at least one
    /// token; an empty breakdown is zero.
    pub fn rounded(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let rounded = self.score().round_ties_even();
        if rounded < 1.0 {
            1
        } else {
            rounded as usize
        }
    }
}

/// Break trimmed text into the categories the estimator weighs.
pub fn analyze(text: &str) -> TokenBreakdown {
    let text = text.trim_matches(is_space);
    let mut breakdown = TokenBreakdown::default();
    if text.is_empty() {
        return breakdown;
    }

    for word in pattern(&WORD_RE, r"\b\w+\b").find_iter(text) {
        let len = word.as_str().chars().count();
        if len <= 2 {
            breakdown.short_words += 1;
            breakdown.word_score += SHORT_WORD_WEIGHT;
        } else if len <= 4 {
            breakdown.medium_words += 1;
            breakdown.word_score += MEDIUM_WORD_WEIGHT;
        } else {
            breakdown.long_words += 1;
            breakdown.word_score += len as f64 / LONG_WORD_CHARS_PER_TOKEN;
        }
    }

    breakdown.whitespace_runs = pattern(&WHITESPACE_RE, r"[\s\x1C-\x1F]+").find_iter(text).count();
    breakdown.digit_runs = pattern(&DIGITS_RE, r"\d+").find_iter(text).count();
    breakdown.punctuation = pattern(&PUNCTUATION_RE, r#"[.,!?;:"]"#).find_iter(text).count();
    breakdown.special_chars = pattern(&SPECIAL_RE, r#"[^a-zA-Z0-9\s\x1C-\x1F.,!?;:"]"#)
        .find_iter(text)
        .count();

    breakdown
}

/// Estimate the token count of `text`.
///
/// Empty or whitespace-only text is 0 tokens; anything else is at least 1.
pub fn estimate_tokens(text: &str) -> usize {
    analyze(text).rounded()
}

/// Default expected output for a single message: GPT-4 family models answer
/// at twice the input length, everything else at one and a half times.
pub fn suggest_output_tokens(model: &str, input_tokens: u64) -> Result<u64> {
    let suggested = if model.to_lowercase().contains("gpt-4") {
        input_tokens.checked_mul(2)
    } else {
        input_tokens.checked_add(input_tokens / 2)
    };
    suggested.ok_or_else(|| {
        CostError::InvalidUsagePattern(format!(
            "suggested output for {} input tokens overflows",
            input_tokens
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("   \n\t "), 0);
        assert!(analyze("").is_empty());
        assert_eq!(analyze("").rounded(), 0);
        assert_eq!(analyze(" \n ").rounded(), 0);
    }

    #[test]
    fn test_separator_controls_are_whitespace() {
        let b = analyze("a\u{1c}b");
        assert_eq!(b.whitespace_runs, 1);
        assert_eq!(b.special_chars, 0);
        // 0.5 + 0.5 + 0.1
        assert_eq!(estimate_tokens("a\u{1c}b"), 1);
        assert_eq!(estimate_tokens("\u{1f}\u{1d}"), 0);
    }

    #[test]
    fn test_minimum_one_token() {
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens("."), 1);
    }

    #[test]
    fn test_word_length_classes() {
        let b = analyze("to the quickly");
        assert_eq!(b.short_words, 1);
        assert_eq!(b.medium_words, 1);
        assert_eq!(b.long_words, 1);
        assert_eq!(b.whitespace_runs, 2);
        // 0.5 + 1 + 7/4 + 2 * 0.1
        assert!((b.score() - 3.45).abs() < 1e-9);
        assert_eq!(estimate_tokens("to the quickly"), 3);
    }

    #[test]
    fn test_sentence_with_punctuation() {
        // 1.25 + 1.25 + 0.1 + 2 * 0.3
        assert_eq!(estimate_tokens("Hello, world!"), 3);
        assert_eq!(analyze("Hello, world!").punctuation, 2);
    }

    #[test]
    fn test_ties_round_to_even() {
        // 10 / 4 = 2.5
        assert_eq!(estimate_tokens("abcdefghij"), 2);
        // 6 / 4 = 1.5
        assert_eq!(estimate_tokens("abcdef"), 2);
        // 14 / 4 = 3.5
        assert_eq!(estimate_tokens("abcdefghijklmn"), 4);
    }

    #[test]
    fn test_digits_and_special_characters() {
        let b = analyze("2024");
        assert_eq!(b.digit_runs, 1);
        assert_eq!(b.medium_words, 1);
        assert_eq!(estimate_tokens("2024"), 2);

        let b = analyze("@#");
        assert_eq!(b.special_chars, 2);
        assert_eq!(b.word_count(), 0);
        assert_eq!(estimate_tokens("@#"), 2);
    }

    #[test]
    fn test_non_ascii_letters_count_as_special() {
        let b = analyze("café");
        assert_eq!(b.medium_words, 1);
        assert_eq!(b.special_chars, 1);
        assert_eq!(estimate_tokens("café"), 2);
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(analyze("  hello  "), analyze("hello"));
    }

    #[test]
    fn test_deterministic() {
        let text = "Summarize the Q3 report: revenue grew 12% (year over year).";
        assert_eq!(estimate_tokens(text), estimate_tokens(text));
    }

    #[test]
    fn test_suggest_output_tokens() {
        assert_eq!(suggest_output_tokens("GPT-4o", 11).unwrap(), 22);
        assert_eq!(suggest_output_tokens("claude-3-haiku", 11).unwrap(), 16);
        assert_eq!(suggest_output_tokens("gpt-3.5-turbo", 10).unwrap(), 15);
    }

    #[test]
    fn test_suggest_output_tokens_overflow() {
        assert!(matches!(
            suggest_output_tokens("gpt-4", u64::MAX),
            Err(CostError::InvalidUsagePattern(_))
        ));
        assert!(suggest_output_tokens("claude-3-haiku", u64::MAX).is_err());
        assert_eq!(
            suggest_output_tokens("claude-3-haiku", u64::MAX / 2).unwrap(),
            u64::MAX / 2 + u64::MAX / 4
        );
    }
}
