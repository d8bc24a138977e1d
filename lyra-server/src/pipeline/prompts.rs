//! Prompt templates for the two analysis call sites

/// Per-line annotation of a highlighted excerpt
pub fn line_analysis(title: &str, artists: &str, lyrics: &str) -> String {
    format!(
        "I am going to send you lines of lyrics from {} by {}, please analyze each line in one to two sentences. Place the line before the analysis, Lyrics start now: \n{}",
        title, artists, lyrics
    )
}

/// Whole-song summary
pub fn song_summary(title: &str, artists: &str, lyrics: &str) -> String {
    format!(
        "Write a summary about the song {}, by {}. Here is a copy of the lyrics, {}.",
        title, artists, lyrics
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_analysis_appends_lyrics_after_header() {
        let prompt = line_analysis("Hello", "Adele", "Hello, it's me");
        assert!(prompt.starts_with("I am going to send you lines of lyrics from Hello by Adele,"));
        assert!(prompt.ends_with("Lyrics start now: \nHello, it's me"));
    }

    #[test]
    fn test_song_summary() {
        assert_eq!(
            song_summary("Hello", "Adele", "Hello, it's me"),
            "Write a summary about the song Hello, by Adele. Here is a copy of the lyrics, Hello, it's me."
        );
    }
}
