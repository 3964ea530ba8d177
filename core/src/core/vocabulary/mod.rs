//! Closed set of canonical emotion keys.
//!
//! A submitted word is accepted only if it normalizes to a canonical key,
//! either directly or through an alias ("anger" → "angry").

use crate::core::error::ValidationError;
use crate::types::{Word, WordError};
use std::collections::BTreeSet;

pub mod palette;
pub mod profanity;

pub use profanity::{BlockList, ProfanityFilter};

/// Alias → canonical key. Sorted by alias.
pub(crate) static ALIASES: &[(&str, &str)] = &[
    ("amazement", "amazed"),
    ("anger", "angry"),
    ("anxiety", "anxious"),
    ("awed", "awe"),
    ("bliss", "blissful"),
    ("blue", "sad"),
    ("boredom", "bored"),
    ("calmness", "calm"),
    ("chill", "relaxed"),
    ("confusion", "confused"),
    ("contentment", "content"),
    ("curiosity", "curious"),
    ("depression", "depressed"),
    ("down", "sad"),
    ("ecstasy", "ecstatic"),
    ("envy", "envious"),
    ("excitement", "excited"),
    ("fear", "fearful"),
    ("frustration", "frustrated"),
    ("fury", "furious"),
    ("good", "happy"),
    ("gratitude", "grateful"),
    ("grief", "grieving"),
    ("guilt", "guilty"),
    ("happiness", "happy"),
    ("hope", "hopeful"),
    ("hopelessness", "hopeless"),
    ("jealousy", "jealous"),
    ("joyous", "joyful"),
    ("loneliness", "lonely"),
    ("love", "loved"),
    ("mad", "angry"),
    ("ok", "fine"),
    ("okay", "fine"),
    ("panic", "panicked"),
    ("peace", "peaceful"),
    ("pride", "proud"),
    ("rage", "furious"),
    ("relief", "relieved"),
    ("sadness", "sad"),
    ("serenity", "serene"),
    ("shame", "ashamed"),
    ("shock", "shocked"),
    ("sorrow", "sorrowful"),
    ("stress", "stressed"),
    ("surprise", "surprised"),
    ("terror", "terrified"),
    ("trust", "trusting"),
    ("worry", "worried"),
];

fn canonical_alias(word: &str) -> Option<&'static str> {
    ALIASES
        .binary_search_by(|(alias, _)| (*alias).cmp(word))
        .ok()
        .map(|index| ALIASES[index].1)
}

fn is_builtin(word: &str) -> bool {
    palette::PALETTE
        .binary_search_by(|(key, _)| (*key).cmp(word))
        .is_ok()
}

/// The canonical vocabulary: every palette key plus deployment extras.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    extra: BTreeSet<Word>,
}

impl Vocabulary {
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Adds deployment-specific canonical keys. They have no palette color.
    pub fn with_extra_words<I, S>(mut self, words: I) -> Result<Self, WordError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for word in words {
            self.extra.insert(Word::try_new(word.into())?);
        }
        Ok(self)
    }

    pub fn contains(&self, word: &Word) -> bool {
        is_builtin(word.as_str()) || self.extra.contains(word)
    }

    /// Normalizes `raw` and maps it to a canonical key.
    pub fn resolve(&self, raw: &str) -> Result<Word, ValidationError> {
        let word = Word::try_new(raw)?;
        if self.contains(&word) {
            return Ok(word);
        }

        match canonical_alias(word.as_str()) {
            // SAFETY: alias targets are palette keys, which are valid words.
            Some(canonical) => Ok(unsafe { Word::new_unchecked(canonical.to_string()) }),
            None => Err(ValidationError::NotInVocabulary(word.into_inner())),
        }
    }

    /// Normalizes a lookup word. Unlike [`Self::resolve`], a well-formed word
    /// outside the vocabulary is returned as is.
    pub fn normalize(&self, raw: &str) -> Result<Word, ValidationError> {
        match self.resolve(raw) {
            Err(ValidationError::NotInVocabulary(word)) => Ok(Word::try_new(word)?),
            other => other,
        }
    }
}
