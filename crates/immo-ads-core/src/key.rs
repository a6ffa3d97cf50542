//! History key derivation.
//!
//! A search is identified by a free-form name. Its history lives under a key
//! built from that name by keeping letters, digits and spaces, dropping
//! trailing spaces, and turning the remaining spaces into underscores.
//!
//! "Letter" means the Unicode letter categories (`Lu`, `Ll`, `Lt`, `Lm`,
//! `Lo`); combining marks and letter-numbers such as `Ⅻ` are dropped.
//! "Digit" means decimal digits (`Nd`) plus the characters whose numeric
//! type is Digit (superscripts, circled digits, ...); fractions such as `½`
//! are dropped.
//!
//! The mapping is not injective: `"Flat, Springfield"` and
//! `"Flat Springfield"` share one key and therefore one history.

use std::fmt;

use unicode_general_category::{get_general_category, GeneralCategory};

/// Code points of general category `No` whose numeric type is Digit.
const DIGIT_RANGES: &[(char, char)] = &[
    ('\u{00B2}', '\u{00B3}'),
    ('\u{00B9}', '\u{00B9}'),
    ('\u{1369}', '\u{1371}'),
    ('\u{19DA}', '\u{19DA}'),
    ('\u{2070}', '\u{2070}'),
    ('\u{2074}', '\u{2079}'),
    ('\u{2080}', '\u{2089}'),
    ('\u{2460}', '\u{2468}'),
    ('\u{2474}', '\u{247C}'),
    ('\u{2488}', '\u{2490}'),
    ('\u{24EA}', '\u{24EA}'),
    ('\u{24F5}', '\u{24FD}'),
    ('\u{24FF}', '\u{24FF}'),
    ('\u{2776}', '\u{277E}'),
    ('\u{2780}', '\u{2788}'),
    ('\u{278A}', '\u{2792}'),
    ('\u{10A40}', '\u{10A43}'),
    ('\u{10E60}', '\u{10E68}'),
    ('\u{11052}', '\u{1105A}'),
    ('\u{1E8C7}', '\u{1E8CF}'),
    ('\u{1F100}', '\u{1F10A}'),
];

/// Filesystem-safe identifier of one search's history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryKey(String);

impl HistoryKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HistoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the history key for `search_name`.
pub fn derive_key(search_name: &str) -> HistoryKey {
    let kept: String = search_name
        .chars()
        .filter(|c| *c == ' ' || is_letter(*c) || is_digit(*c))
        .collect();
    HistoryKey(kept.trim_end().replace(' ', "_"))
}

fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

fn is_digit(c: char) -> bool {
    match get_general_category(c) {
        GeneralCategory::DecimalNumber => true,
        GeneralCategory::OtherNumber => DIGIT_RANGES
            .iter()
            .any(|&(lo, hi)| (lo..=hi).contains(&c)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_become_underscores() {
        assert_eq!(
            derive_key("Flat in Springfield").as_str(),
            "Flat_in_Springfield"
        );
    }

    #[test]
    fn test_punctuation_is_dropped() {
        assert_eq!(derive_key("2-room flat, <1000€!").as_str(), "2room_flat_1000");
    }

    #[test]
    fn test_trailing_spaces_are_stripped() {
        assert_eq!(derive_key("House  ").as_str(), "House");
        assert_eq!(derive_key("House !").as_str(), "House");
    }

    #[test]
    fn test_leading_and_inner_spaces_are_kept() {
        assert_eq!(derive_key(" a  b").as_str(), "_a__b");
    }

    #[test]
    fn test_non_ascii_letters_are_kept() {
        assert_eq!(derive_key("Wohnung München").as_str(), "Wohnung_München");
    }

    #[test]
    fn test_fractions_are_dropped() {
        assert_eq!(derive_key("Flat ½").as_str(), "Flat");
    }

    #[test]
    fn test_superscript_digits_are_kept() {
        assert_eq!(derive_key("Flat ²").as_str(), "Flat_²");
        assert_eq!(derive_key("① first").as_str(), "①_first");
    }

    #[test]
    fn test_letter_numbers_are_dropped() {
        assert_eq!(derive_key("Piso Ⅻ").as_str(), "Piso");
    }

    #[test]
    fn test_combining_marks_are_dropped() {
        assert_eq!(derive_key("हिन्दी").as_str(), "हनद");
    }

    #[test]
    fn test_non_latin_decimal_digits_are_kept() {
        assert_eq!(derive_key("شقة ٣").as_str(), "شقة_٣");
    }

    #[test]
    fn test_tabs_and_newlines_are_dropped() {
        assert_eq!(derive_key("a\tb\nc").as_str(), "abc");
    }

    #[test]
    fn test_distinct_names_can_collide() {
        assert_eq!(derive_key("Flat, Springfield"), derive_key("Flat Springfield"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(derive_key("Loft #3"), derive_key("Loft #3"));
    }
}
