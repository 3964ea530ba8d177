use nutype::nutype;

pub const MAX_WORD_LENGTH: usize = 20;

/// Placeholder top word reported when there are no active records.
pub const SILENCE: &str = "silence";

/// A single lowercase, letters-only emotion word.
#[nutype(
    new_unchecked,
    sanitize(trim, lowercase),
    validate(
        not_empty,
        len_char_max = MAX_WORD_LENGTH,
        predicate = |word| word.chars().all(|c| c.is_ascii_lowercase())
    ),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Hash,
        Borrow,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct Word(String);

impl Word {
    pub fn silence() -> Self {
        // SAFETY: SILENCE is non-empty, short and lowercase ASCII.
        unsafe { Self::new_unchecked(SILENCE.to_string()) }
    }

    pub fn is_silence(&self) -> bool {
        self.as_str() == SILENCE
    }
}
