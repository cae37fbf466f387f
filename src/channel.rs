/*!
 * Channel video listing.
 *
 * Collects the latest video ids of a channel by scraping its public
 * pages. Several URL variants are tried on one session because channels
 * are reachable under handle, legacy and id paths.
 */

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::ChannelError;
use crate::transport::{Connector, SessionOptions};

const CHANNEL_ORIGIN: &str = "https://www.youtube.com";
const LATEST_VIDEOS: &str = "/videos?sort=dd";

static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#""videoId":"([A-Za-z0-9_-]{11})""#,
        r#"/watch\?v=([A-Za-z0-9_-]{11})"#,
        r#""watchEndpoint":\{"videoId":"([A-Za-z0-9_-]{11})""#,
        r#"watch\?v=([A-Za-z0-9_-]{11})"#,
        r#""url":"/watch\?v=([A-Za-z0-9_-]{11})""#,
        r#"href="/watch\?v=([A-Za-z0-9_-]{11})""#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid video id pattern"))
    .collect()
});

/// Channel page URL listing the latest uploads first
pub fn build_channel_url(username: &str) -> String {
    let username = username.trim();

    if username.starts_with("http") {
        return username.to_string();
    }

    if username.starts_with("UC") && username.len() == 24 {
        return format!("{}/channel/{}{}", CHANNEL_ORIGIN, username, LATEST_VIDEOS);
    }

    let handle = username.strip_prefix('@').unwrap_or(username);
    format!("{}/@{}{}", CHANNEL_ORIGIN, handle, LATEST_VIDEOS)
}

/// The channel URL and the alternative layouts worth trying
pub fn channel_url_variants(channel_url: &str) -> Vec<String> {
    let mut variants = vec![
        channel_url.to_string(),
        channel_url.replace(LATEST_VIDEOS, "/uploads?sort=dd"),
        channel_url.replace(LATEST_VIDEOS, "?sort=dd"),
        channel_url.replace('@', "c/"),
        channel_url.replace('@', "channel/"),
    ];

    let mut seen = HashSet::new();
    variants.retain(|url| seen.insert(url.clone()));
    variants
}

/// Video ids found in a page, pattern by pattern, duplicates included
pub fn scan_video_ids(html: &str) -> Vec<String> {
    VIDEO_ID_PATTERNS
        .iter()
        .flat_map(|re| re.captures_iter(html).map(|caps| caps[1].to_string()))
        .collect()
}

/// Directory name for a channel's downloaded transcripts
pub fn output_dir_name(username: &str) -> String {
    username.replace('@', "").replace(['/', '\\'], "_")
}

/// Scrapes channel pages for video ids
pub struct ChannelScraper {
    connector: Arc<dyn Connector>,
    session_options: SessionOptions,
}

impl ChannelScraper {
    pub fn new(connector: Arc<dyn Connector>, session_options: SessionOptions) -> Self {
        Self {
            connector,
            session_options,
        }
    }

    /// Latest video ids of a channel, newest first, at most `max_count`
    pub async fn latest_video_ids(&self, username: &str, max_count: usize) -> Result<Vec<String>, ChannelError> {
        let channel_url = build_channel_url(username);
        let session = self.connector.connect(&self.session_options)?;

        let mut seen = HashSet::new();
        let mut video_ids = Vec::new();

        for url in channel_url_variants(&channel_url) {
            let response = match session.get(&url).await {
                Ok(response) if response.is_success() => response,
                Ok(response) => {
                    debug!("Channel page {} returned HTTP {}", url, response.status);
                    continue;
                }
                Err(e) => {
                    debug!("Channel page {} failed: {}", url, e);
                    continue;
                }
            };

            for id in scan_video_ids(&response.body) {
                if seen.insert(id.clone()) {
                    video_ids.push(id);
                }
            }
        }

        video_ids.truncate(max_count);

        if video_ids.is_empty() {
            return Err(ChannelError::NoVideos(username.to_string()));
        }

        info!("Found {} videos for {}", video_ids.len(), username);
        Ok(video_ids)
    }
}
