use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::normalize::{find_caption_descriptor, normalize_descriptor};
use super::{ExtractionStrategy, PageContext};
use crate::catalog::CaptionTrackCatalog;

// Each pattern ends on the opening bracket of a candidate JSON value.
// Ordered from most to least specific page template.
static CANDIDATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#""captions"\s*:\s*\{\s*"playerCaptionsTracklistRenderer"\s*:\s*\{"#,
        r#""playerCaptionsTracklistRenderer"\s*:\s*\{"#,
        r#"var\s+ytInitialPlayerResponse\s*=\s*\{"#,
        r#"ytInitialPlayerResponse\s*:\s*\{"#,
        r#""captionTracks"\s*:\s*\["#,
        r#""playerCaptionsRenderer"\s*:\s*\{"#,
        r#""captions"\s*:\s*\{"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid embedded JSON pattern"))
    .collect()
});

/// Parse the first JSON value starting at `offset`, ignoring whatever follows it
pub fn parse_value_at(html: &str, offset: usize) -> Option<Value> {
    let tail = html.get(offset..)?;
    serde_json::Deserializer::from_str(tail)
        .into_iter::<Value>()
        .next()?
        .ok()
}

/// Every decodable JSON value the candidate patterns point at, in pattern order
pub fn candidate_values(html: &str) -> impl Iterator<Item = Value> + '_ {
    CANDIDATE_PATTERNS.iter().flat_map(move |re| {
        re.find_iter(html)
            // the match ends just past the opening bracket
            .filter_map(move |m| parse_value_at(html, m.end() - 1))
    })
}

/// Finds caption descriptors in JSON embedded in page scripts
#[derive(Debug, Default)]
pub struct EmbeddedJsonStrategy;

impl EmbeddedJsonStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core, usable without a session
    pub fn extract_from_html(&self, html: &str) -> Option<CaptionTrackCatalog> {
        candidate_values(html)
            .map(|value| match value {
                Value::Array(tracks) => json!({ "captionTracks": tracks }),
                other => other,
            })
            .find_map(|value| {
                let catalog = normalize_descriptor(find_caption_descriptor(&value)?);
                (!catalog.is_empty()).then_some(catalog)
            })
    }
}

#[async_trait]
impl ExtractionStrategy for EmbeddedJsonStrategy {
    fn name(&self) -> &'static str {
        "embedded_json"
    }

    async fn extract(&self, page: &PageContext<'_>) -> Option<CaptionTrackCatalog> {
        self.extract_from_html(page.html)
    }
}
