use crate::types::Word;

/// Decides whether a word may be shown to other visitors.
pub trait ProfanityFilter: Send + Sync {
    fn is_profane(&self, word: &Word) -> bool;
}

const DEFAULT_STEMS: &[&str] = &[
    "asshole", "bastard", "bitch", "bollock", "bullshit", "cunt", "dick", "fuck", "motherf",
    "piss", "shit", "slut", "twat", "wank", "whore",
];

/// Rejects any word containing one of its stems.
#[derive(Debug, Clone)]
pub struct BlockList {
    stems: Vec<String>,
}

impl BlockList {
    pub fn new<I, S>(stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stems: stems
                .into_iter()
                .map(|s| s.into().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

impl Default for BlockList {
    fn default() -> Self {
        Self::new(DEFAULT_STEMS.iter().copied())
    }
}

impl ProfanityFilter for BlockList {
    fn is_profane(&self, word: &Word) -> bool {
        self.stems.iter().any(|stem| word.as_str().contains(stem.as_str()))
    }
}
