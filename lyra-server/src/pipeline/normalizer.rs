//! Track title normalization
//!
//! Player titles carry remix/feature annotations and reissue suffixes
//! ("Song (feat. X) [Remix] - Remastered 2011") that hurt search recall.

use once_cell::sync::Lazy;
use regex::Regex;

/// Every non-greedy `(...)` or `[...]` span
static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.*?\)|\[.*?\]").expect("annotation pattern is valid"));

/// `" - "` and everything after it
static DASH_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" - .*$").expect("dash suffix pattern is valid"));

/// Reduce a raw track title to its canonical search form
///
/// Pure and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(raw_title: &str) -> String {
    let without_annotations = ANNOTATION.replace_all(raw_title, "");
    let without_suffix = DASH_SUFFIX.replace(&without_annotations, "");
    without_suffix.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_annotations_and_suffix() {
        assert_eq!(normalize("Song (Live) [Remix] - Remastered 2011"), "Song");
    }

    #[test]
    fn test_official_video_annotation() {
        assert_eq!(normalize("Blinding Lights (Official Video)"), "Blinding Lights");
    }

    #[test]
    fn test_all_occurrences_removed() {
        assert_eq!(
            normalize("Stay (feat. Justin Bieber) (Clean) [Radio Edit]"),
            "Stay"
        );
        assert_eq!(normalize("Mid (a) Title [b] End"), "Mid  Title  End");
    }

    #[test]
    fn test_suffix_cut_at_first_dash_clause() {
        assert_eq!(normalize("Under Pressure - Remastered 2011"), "Under Pressure");
        assert_eq!(normalize("A - B - C"), "A");
    }

    #[test]
    fn test_hyphen_without_spaces_is_kept() {
        assert_eq!(normalize("Anti-Hero"), "Anti-Hero");
        assert_eq!(normalize("Re-Rewind (The Crowd Say Bo Selecta)"), "Re-Rewind");
    }

    #[test]
    fn test_unbalanced_brackets_are_kept() {
        assert_eq!(normalize("Smile :)"), "Smile :)");
        assert_eq!(normalize("Open ( ended"), "Open ( ended");
    }

    #[test]
    fn test_plain_title_only_trimmed() {
        assert_eq!(normalize("  Yesterday  "), "Yesterday");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Song (Live) [Remix] - Remastered 2011",
            "Blinding Lights (Official Video)",
            "A - B - C",
            "[(])x)",
            "(a[)]b)",
            " - Intro",
            "x (y) - z (w)",
            "Smile :)",
            "Anti-Hero",
            "Hello [World",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
