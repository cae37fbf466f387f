/*!
 * Caption track extraction.
 *
 * The watch page has no stable contract, so extraction is an ordered list
 * of strategies tried until one yields tracks:
 * - `innertube`: ask the internal player API with a key scraped from the page
 * - `embedded_json`: parse JSON blobs embedded in page scripts
 * - `timedtext_ref`: last-resort regex for a bare timed-text URL
 *
 * Strategies never fail loudly. An empty result lets the resolver retry
 * or report that no captions were found.
 */

use async_trait::async_trait;
use log::debug;

use crate::app_config::InnertubeConfig;
use crate::catalog::CaptionTrackCatalog;
use crate::transport::Transport;

/// Everything a strategy may look at
pub struct PageContext<'a> {
    /// Video the page belongs to
    pub video_id: &'a str,
    /// Raw watch page HTML
    pub html: &'a str,
    /// Session the page was fetched with
    pub session: &'a dyn Transport,
}

/// One way of turning a watch page into a catalog
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Attempt extraction; `None` or an empty catalog means "not found"
    async fn extract(&self, page: &PageContext<'_>) -> Option<CaptionTrackCatalog>;
}

/// Prioritized list of strategies, first non-empty result wins
pub struct ExtractionChain {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ExtractionChain {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Internal API, then embedded JSON, then raw timed-text reference
    pub fn standard(innertube: InnertubeConfig) -> Self {
        Self::new(vec![
            Box::new(InnertubeStrategy::new(innertube)),
            Box::new(EmbeddedJsonStrategy::new()),
            Box::new(TimedTextReferenceStrategy::new()),
        ])
    }

    /// Page-only strategies, no extra requests
    pub fn offline() -> Self {
        Self::new(vec![
            Box::new(EmbeddedJsonStrategy::new()),
            Box::new(TimedTextReferenceStrategy::new()),
        ])
    }

    /// Strategy names in priority order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the strategies in order; returns an empty catalog when all of them miss
    pub async fn extract(&self, page: &PageContext<'_>) -> CaptionTrackCatalog {
        for strategy in &self.strategies {
            match strategy.extract(page).await {
                Some(catalog) if !catalog.is_empty() => {
                    debug!(
                        "Strategy '{}' found {} caption track(s) for {}",
                        strategy.name(),
                        catalog.len(),
                        page.video_id
                    );
                    return catalog;
                }
                _ => debug!("Strategy '{}' found nothing for {}", strategy.name(), page.video_id),
            }
        }

        CaptionTrackCatalog::new()
    }
}

pub mod embedded_json;
pub mod innertube;
pub mod normalize;
pub mod timedtext_ref;

pub use self::embedded_json::EmbeddedJsonStrategy;
pub use self::innertube::InnertubeStrategy;
pub use self::normalize::{find_caption_descriptor, normalize_descriptor};
pub use self::timedtext_ref::TimedTextReferenceStrategy;
