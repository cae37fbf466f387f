use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TranscriptError;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]{11})")
        .expect("Invalid video URL pattern")
});

static BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9_-]{11})$").expect("Invalid video id pattern"));

/// Extract the video id from a watch, short or embed URL, or accept a bare id
pub fn extract_video_id(input: &str) -> Result<String, TranscriptError> {
    let input = input.trim();
    URL_PATTERN
        .captures(input)
        .or_else(|| BARE_ID.captures(input))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| TranscriptError::InvalidVideoId(input.to_string()))
}

/// Whether `input` looks like a bare video id
pub fn is_video_id(input: &str) -> bool {
    BARE_ID.is_match(input)
}
