//! ASCII folding of place names before they are sent upstream.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Decomposes to NFD and drops the combining marks.
///
/// Letters with no canonical decomposition (`Đ`, `Ł`, `Ø`) and non-Latin
/// scripts pass through unchanged, so every name still reaches the provider.
pub fn fold_accents(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics() {
        assert_eq!(fold_accents("São Paulo"), "Sao Paulo");
        assert_eq!(fold_accents("Zürich"), "Zurich");
        assert_eq!(fold_accents("Kraków"), "Krakow");
        assert_eq!(fold_accents("Plzeň"), "Plzen");
    }

    #[test]
    fn strips_stacked_vietnamese_marks() {
        assert_eq!(fold_accents("Hội An"), "Hoi An");
        assert_eq!(fold_accents("Huế"), "Hue");
        assert_eq!(fold_accents("Đà Nẵng"), "Đa Nang");
    }

    #[test]
    fn folds_extended_latin_outside_latin_1() {
        assert_eq!(fold_accents("Şanlıurfa"), "Sanlıurfa");
        assert_eq!(fold_accents("Ærøskøbing"), "Ærøskøbing");
        assert_eq!(fold_accents("Łódź"), "Łodz");
        assert_eq!(fold_accents("Ḩawallī"), "Hawalli");
    }

    #[test]
    fn precomposed_and_decomposed_input_fold_alike() {
        assert_eq!(fold_accents("Mu\u{0308}nchen"), fold_accents("München"));
    }

    #[test]
    fn leaves_plain_and_non_latin_text_alone() {
        assert_eq!(fold_accents("Prague"), "Prague");
        assert_eq!(fold_accents("東京"), "東京");
    }
}
