// file: src/documents/matcher.rs
// description: case number containment test with optional text normalization
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("WHITESPACE_RUN regex is valid");
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-sensitive exact substring.
    #[default]
    Exact,
    /// Lower-cased, whitespace runs collapsed to a single space.
    Normalized,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextMatcher {
    mode: MatchMode,
}

impl TextMatcher {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    /// Brings extracted text into the form `contains` expects.
    pub fn prepare(&self, text: String) -> String {
        match self.mode {
            MatchMode::Exact => text,
            MatchMode::Normalized => normalize(&text),
        }
    }

    /// `haystack` must have gone through `prepare`. Blank needles never match.
    pub fn contains(&self, haystack: &str, needle: &str) -> bool {
        if needle.trim().is_empty() {
            return false;
        }

        match self.mode {
            MatchMode::Exact => haystack.contains(needle),
            MatchMode::Normalized => haystack.contains(normalize(needle).as_str()),
        }
    }
}

pub fn normalize(text: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&text.to_lowercase(), " ")
        .trim()
        .to_string()
}
