//! Emotion → display color lookup.
//!
//! Every palette entry is a canonical vocabulary key. `PALETTE` is sorted by
//! word so lookups can binary search.

use crate::types::Word;

/// Color for the sentinel and for words without a palette entry.
pub const DEFAULT_COLOR: &str = "#9ca3af";

pub(crate) static PALETTE: &[(&str, &str)] = &[
    ("acceptance", "#a3d9a5"),
    ("admiration", "#f4c2c2"),
    ("adoration", "#ff8fab"),
    ("afraid", "#5b5f97"),
    ("aggravated", "#c0392b"),
    ("agitated", "#e67e22"),
    ("alarmed", "#e74c3c"),
    ("alert", "#f1c40f"),
    ("alive", "#2ecc71"),
    ("amazed", "#f39c12"),
    ("amused", "#ffd166"),
    ("angry", "#d62828"),
    ("annoyed", "#e76f51"),
    ("anxious", "#9b5de5"),
    ("apathetic", "#95a5a6"),
    ("appreciative", "#90be6d"),
    ("apprehensive", "#7d5ba6"),
    ("ashamed", "#8d6e63"),
    ("awe", "#48cae4"),
    ("awkward", "#b08968"),
    ("bitter", "#6a994e"),
    ("blessed", "#ffe66d"),
    ("blissful", "#ffafcc"),
    ("bored", "#a0a0a0"),
    ("brave", "#e63946"),
    ("calm", "#8ecae6"),
    ("carefree", "#caffbf"),
    ("cheerful", "#ffca3a"),
    ("comfortable", "#d4a373"),
    ("compassionate", "#f4a261"),
    ("confident", "#fb8500"),
    ("confused", "#b5838d"),
    ("content", "#a8dadc"),
    ("courageous", "#d00000"),
    ("cozy", "#ddb892"),
    ("curious", "#00b4d8"),
    ("defeated", "#6c757d"),
    ("delighted", "#ffbe0b"),
    ("depressed", "#3d405b"),
    ("desperate", "#6d597a"),
    ("determined", "#bc4749"),
    ("devastated", "#22223b"),
    ("disappointed", "#7f8c8d"),
    ("discouraged", "#8e9aaf"),
    ("disgusted", "#6b8f71"),
    ("disheartened", "#7a8ca3"),
    ("dismayed", "#8d99ae"),
    ("distracted", "#c9ada7"),
    ("drained", "#9a8c98"),
    ("eager", "#ff9f1c"),
    ("ecstatic", "#ff006e"),
    ("elated", "#ffb703"),
    ("embarrassed", "#ff8fa3"),
    ("empathetic", "#e9c46a"),
    ("empowered", "#f72585"),
    ("empty", "#adb5bd"),
    ("energetic", "#ff7b00"),
    ("enthusiastic", "#ffa200"),
    ("envious", "#2d6a4f"),
    ("euphoric", "#ff5d8f"),
    ("exasperated", "#e5383b"),
    ("excited", "#ff6b35"),
    ("exhausted", "#6c6f7f"),
    ("fearful", "#4a4e69"),
    ("fine", "#b7e4c7"),
    ("free", "#80ffdb"),
    ("frightened", "#3c096c"),
    ("frustrated", "#dc2f02"),
    ("fulfilled", "#52b788"),
    ("furious", "#9d0208"),
    ("glad", "#fcbf49"),
    ("gloomy", "#495057"),
    ("grateful", "#06d6a0"),
    ("grieving", "#343a40"),
    ("grumpy", "#9c6644"),
    ("guilty", "#7f5539"),
    ("happy", "#ffd60a"),
    ("heartbroken", "#780000"),
    ("helpless", "#5c677d"),
    ("hopeful", "#4cc9f0"),
    ("hopeless", "#33415c"),
    ("hostile", "#a4161a"),
    ("humbled", "#cdb4db"),
    ("hurt", "#b56576"),
    ("impatient", "#f77f00"),
    ("indifferent", "#ced4da"),
    ("insecure", "#9d8189"),
    ("inspired", "#7209b7"),
    ("interested", "#0096c7"),
    ("irritated", "#f4845f"),
    ("jealous", "#40916c"),
    ("joy", "#ffd700"),
    ("joyful", "#ffc300"),
    ("lonely", "#5e548e"),
    ("lost", "#6b705c"),
    ("loved", "#ff4d6d"),
    ("loving", "#ff758f"),
    ("melancholy", "#4f5d75"),
    ("mellow", "#b8c0ff"),
    ("miserable", "#2b2d42"),
    ("motivated", "#ee6c4d"),
    ("moved", "#e0aaff"),
    ("nervous", "#c77dff"),
    ("nostalgic", "#d5bdaf"),
    ("numb", "#dee2e6"),
    ("optimistic", "#ffdd00"),
    ("overwhelmed", "#7b2cbf"),
    ("panicked", "#ef233c"),
    ("passionate", "#c9184a"),
    ("peaceful", "#a9def9"),
    ("pensive", "#9a8f97"),
    ("playful", "#ff99c8"),
    ("pleased", "#f9c74f"),
    ("proud", "#f8961e"),
    ("puzzled", "#bc8a5f"),
    ("reflective", "#adc178"),
    ("regretful", "#6f1d1b"),
    ("rejected", "#5f0f40"),
    ("relaxed", "#99d98c"),
    ("relieved", "#76c893"),
    ("resentful", "#8a1c1c"),
    ("restless", "#f3722c"),
    ("sad", "#4361ee"),
    ("safe", "#95d5b2"),
    ("satisfied", "#43aa8b"),
    ("scared", "#560bad"),
    ("secure", "#74c69d"),
    ("sensitive", "#ffc8dd"),
    ("serene", "#bde0fe"),
    ("shocked", "#fee440"),
    ("shy", "#ffcad4"),
    ("sleepy", "#c8b6ff"),
    ("sorrowful", "#3a0ca3"),
    ("stressed", "#d90429"),
    ("strong", "#e85d04"),
    ("stuck", "#7f7f7f"),
    ("surprised", "#ffe74c"),
    ("suspicious", "#52796f"),
    ("sympathetic", "#e6beae"),
    ("tender", "#ffb4a2"),
    ("tense", "#bb3e03"),
    ("terrified", "#240046"),
    ("thankful", "#2a9d8f"),
    ("thoughtful", "#84a59d"),
    ("thrilled", "#ff0a54"),
    ("tired", "#8d8d92"),
    ("tranquil", "#a2d2ff"),
    ("trusting", "#57cc99"),
    ("uncertain", "#a5a58d"),
    ("uncomfortable", "#b07d62"),
    ("uneasy", "#997b66"),
    ("unhappy", "#3f37c9"),
    ("upset", "#d1495b"),
    ("vulnerable", "#e5989b"),
    ("weary", "#7d8597"),
    ("worried", "#7678ed"),
    ("worthless", "#463f3a"),
    ("zen", "#caf0f8"),
];

/// Returns the palette color for `word`, or `None` if it has no entry.
pub fn color_for(word: &Word) -> Option<&'static str> {
    PALETTE
        .binary_search_by(|(key, _)| (*key).cmp(word.as_str()))
        .ok()
        .map(|index| PALETTE[index].1)
}
