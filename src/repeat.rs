//! Repeat cadence vocabulary and spoken-phrase normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fuzzy;

/// Minimum similarity for accepting a fuzzy cadence match.
const MATCH_THRESHOLD: f64 = 0.6;

/// Cadence vocabulary in match-priority order.
const VOCABULARY: [&str; 5] = ["daily", "weekly", "monthly", "yearly", "once"];

/// How often a reminder repeats. The system stores the tag but never
/// expands or fires recurring reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    #[default]
    Once,
}

impl Repeat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Once => "once",
        }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            "once" => Some(Self::Once),
            _ => None,
        }
    }

    /// Normalize a spoken cadence phrase.
    ///
    /// `"one time"` and `"just once"` map literally to `Once`; anything
    /// else is fuzzy-matched against the vocabulary. Returns `None` when
    /// no entry clears the similarity threshold.
    pub fn normalize(phrase: &str) -> Option<Self> {
        let phrase = phrase.trim().to_lowercase();
        if phrase == "one time" || phrase == "just once" {
            return Some(Self::Once);
        }
        fuzzy::best_match(&phrase, &VOCABULARY, MATCH_THRESHOLD).and_then(Self::from_keyword)
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
