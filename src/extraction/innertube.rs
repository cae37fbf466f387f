use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::normalize::normalize_descriptor;
use super::{ExtractionStrategy, PageContext};
use crate::app_config::InnertubeConfig;
use crate::catalog::CaptionTrackCatalog;

// Known spellings of the player API key inside the watch page
static API_KEY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#""INNERTUBE_API_KEY"\s*:\s*"([A-Za-z0-9_-]+)""#,
        r#""?innertubeApiKey"?\s*[=:]\s*"([A-Za-z0-9_-]+)""#,
        r#""apiKey"\s*:\s*"([A-Za-z0-9_-]+)""#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid API key pattern"))
    .collect()
});

/// Scrape the player API key from a watch page
pub fn extract_api_key(html: &str) -> Option<String> {
    API_KEY_PATTERNS
        .iter()
        .find_map(|re| re.captures(html))
        .map(|caps| caps[1].to_string())
}

/// Asks the internal player endpoint for the caption descriptor
pub struct InnertubeStrategy {
    config: InnertubeConfig,
}

impl InnertubeStrategy {
    pub fn new(config: InnertubeConfig) -> Self {
        Self { config }
    }

    /// Minimal client-identity payload
    pub fn request_body(&self, video_id: &str) -> Value {
        json!({
            "context": {
                "client": {
                    "clientName": self.config.client_name,
                    "clientVersion": self.config.client_version,
                }
            },
            "videoId": video_id,
        })
    }

    fn endpoint_with_key(&self, api_key: &str) -> Option<String> {
        url::Url::parse_with_params(&self.config.endpoint, &[("key", api_key)])
            .map(|u| u.to_string())
            .ok()
    }
}

#[async_trait]
impl ExtractionStrategy for InnertubeStrategy {
    fn name(&self) -> &'static str {
        "innertube"
    }

    async fn extract(&self, page: &PageContext<'_>) -> Option<CaptionTrackCatalog> {
        let api_key = extract_api_key(page.html)?;
        let endpoint = self.endpoint_with_key(&api_key)?;

        let response = match page
            .session
            .post_json(&endpoint, &self.request_body(page.video_id))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("Player API request for {} failed: {}", page.video_id, e);
                return None;
            }
        };

        if !response.is_success() {
            debug!(
                "Player API answered HTTP {} for {}",
                response.status, page.video_id
            );
            return None;
        }

        let document: Value = serde_json::from_str(&response.body).ok()?;
        let descriptor = document
            .get("captions")?
            .get("playerCaptionsTracklistRenderer")?;

        Some(normalize_descriptor(descriptor))
    }
}
