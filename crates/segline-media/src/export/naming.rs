//! Deliverable file naming: `{ABBREV}-S{ep:02}-SC{scene:03}-SEG{n:03}.mp4`.

use segline_core::Segment;

const MAX_INITIALS: usize = 6;
const SINGLE_WORD_CHARS: usize = 4;
const FALLBACK_ABBREVIATION: &str = "EP";

/// Short uppercase tag for a title.
///
/// Multi-word titles use the first letter of each word (at most six); a single
/// word uses its first four alphanumeric characters.
pub fn title_abbreviation(title: &str) -> String {
    let words: Vec<&str> = title
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .collect();

    let abbreviation: String = match words.as_slice() {
        [] => String::new(),
        [word] => word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .take(SINGLE_WORD_CHARS)
            .collect(),
        _ => words
            .iter()
            .filter_map(|w| w.chars().find(|c| c.is_alphanumeric()))
            .take(MAX_INITIALS)
            .collect(),
    };

    if abbreviation.is_empty() {
        FALLBACK_ABBREVIATION.to_string()
    } else {
        abbreviation.to_uppercase()
    }
}

/// File name for one segment. The segment number is 1-based.
pub fn segment_filename(abbreviation: &str, episode_number: u32, segment: &Segment) -> String {
    format!(
        "{}-S{:02}-SC{:03}-SEG{:03}.mp4",
        abbreviation,
        episode_number,
        segment.scene_number,
        segment.index + 1
    )
}
