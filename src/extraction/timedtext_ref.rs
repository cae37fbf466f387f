use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{ExtractionStrategy, PageContext};
use crate::catalog::{CaptionTrack, CaptionTrackCatalog};
use crate::language_utils;

const PLATFORM_ORIGIN: &str = "https://www.youtube.com";
const FALLBACK_LANGUAGE: &str = "en";

static TIMEDTEXT_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)["']([^"'\s]*/timedtext[^"'\s]*)["']"#).expect("Invalid timedtext pattern")
});

/// First quoted timed-text URL in the page, with JSON escapes undone
pub fn find_timedtext_url(html: &str) -> Option<String> {
    let raw = TIMEDTEXT_REF.captures(html)?.get(1)?.as_str();
    let url = raw.replace("\\/", "/").replace("\\u0026", "&");

    if url.starts_with("//") {
        Some(format!("https:{}", url))
    } else if url.starts_with('/') {
        Some(format!("{}{}", PLATFORM_ORIGIN, url))
    } else {
        Some(url)
    }
}

/// Last resort: synthesize one generated English track from a bare timed-text URL.
///
/// The language is a guess and the track is never translatable.
#[derive(Debug, Default)]
pub struct TimedTextReferenceStrategy;

impl TimedTextReferenceStrategy {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_from_html(&self, html: &str) -> Option<CaptionTrackCatalog> {
        let url = find_timedtext_url(html)?;
        debug!("Using raw timed-text reference {}", url);

        let track = CaptionTrack::new(
            FALLBACK_LANGUAGE,
            language_utils::display_name(FALLBACK_LANGUAGE),
            url,
            true,
        );
        Some(CaptionTrackCatalog::from_tracks([track]))
    }
}

#[async_trait]
impl ExtractionStrategy for TimedTextReferenceStrategy {
    fn name(&self) -> &'static str {
        "timedtext_ref"
    }

    async fn extract(&self, page: &PageContext<'_>) -> Option<CaptionTrackCatalog> {
        self.extract_from_html(page.html)
    }
}
