use serde::{Deserialize, Serialize};

/// Which characters count as part of the word being completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordInclude {
    /// Letters, digits and `_`.
    #[default]
    AlphanumUnderscore,
    /// Everything except whitespace and `( ) : ,`.
    ManyPunctuations,
    /// Like `ManyPunctuations`, also stopping at `.`.
    MostPunctuations,
    /// Everything except whitespace.
    AllPunctuations,
}

impl WordInclude {
    fn is_word_char(self, c: char) -> bool {
        match self {
            Self::AlphanumUnderscore => c.is_alphanumeric() || c == '_',
            Self::ManyPunctuations => !c.is_whitespace() && !matches!(c, '(' | ')' | ':' | ','),
            Self::MostPunctuations => {
                !c.is_whitespace() && !matches!(c, '.' | '(' | ')' | ':' | ',')
            }
            Self::AllPunctuations => !c.is_whitespace(),
        }
    }
}

/// The partial word at the end of `text`; empty when `text` ends in
/// whitespace or in a character outside `include`.
pub fn last_word(text: &str, include: WordInclude) -> &str {
    if text.ends_with(char::is_whitespace) {
        return "";
    }

    let start = text
        .char_indices()
        .rev()
        .find(|&(_, c)| !include.is_word_char(c))
        .map_or(0, |(i, c)| i + c.len_utf8());
    &text[start..]
}
