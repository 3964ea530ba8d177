//! Derived statistics returned to callers. Never persisted.

use crate::types::Word;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: Word,
    pub count: u64,
}

impl WordCount {
    /// The "no data" placeholder used as `top` when nothing is active.
    pub fn silence() -> Self {
        Self {
            word: Word::silence(),
            count: 0,
        }
    }
}

/// Rank and percentile of the caller's focus word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YourWord {
    pub word: Word,
    pub count: u64,
    pub rank: u64,
    pub percentile: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub total: u64,
    pub top: WordCount,
    pub top5: Vec<WordCount>,
    pub top10: Vec<WordCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_word: Option<YourWord>,
    pub color: String,
}
