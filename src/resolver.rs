/*!
 * Transcript catalog resolution.
 *
 * Fetches the watch page for a video, runs the extraction chain over it
 * and retries on failure. Backoff is exponential only for HTTP 429; every
 * other retryable outcome waits the flat base delay. A 404 is final.
 */

use log::debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, HttpConfig};
use crate::cancel::CancellationToken;
use crate::catalog::{CaptionTrack, CaptionTrackCatalog};
use crate::errors::{TranscriptError, TransportError};
use crate::extraction::{ExtractionChain, PageContext};
use crate::transcript::Transcript;
use crate::transport::{Connector, Transport};

/// Why an attempt is being retried
#[derive(Debug, Clone, PartialEq)]
pub enum RetryReason {
    /// HTTP 429
    RateLimited,
    /// Any status other than 200, 404 and 429
    Status(u16),
    /// Timeout or connection failure
    Transport(TransportError),
    /// Page fetched but no caption tracks extracted
    EmptyCatalog,
}

/// How many times and how long to wait between attempts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base delay between attempts
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// Total number of attempts
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay after the failed attempt `attempt` (zero-based)
    pub fn delay_for(&self, reason: &RetryReason, attempt: u32) -> Duration {
        match reason {
            RetryReason::RateLimited => self
                .retry_delay
                .saturating_mul(2u32.saturating_pow(attempt)),
            _ => self.retry_delay,
        }
    }
}

/// Per-call proxy, cookies and retry settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub proxy: Option<String>,
    pub cookies: Option<String>,
    pub retry: RetryPolicy,
}

impl RequestOptions {
    /// Options taken from the configuration file
    pub fn from_config(config: &Config) -> Self {
        Self {
            proxy: config.http.proxy.clone().filter(|p| !p.is_empty()),
            cookies: config.http.cookies.clone().filter(|c| !c.is_empty()),
            retry: config.retry.policy(),
        }
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_cookies(mut self, cookies: impl Into<String>) -> Self {
        self.cookies = Some(cookies.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Resolves a video id into a navigable transcript list
pub struct CatalogResolver {
    connector: Arc<dyn Connector>,
    http: HttpConfig,
    chain: ExtractionChain,
    cancel: Option<CancellationToken>,
}

impl CatalogResolver {
    pub fn new(connector: Arc<dyn Connector>, http: HttpConfig, chain: ExtractionChain) -> Self {
        Self {
            connector,
            http,
            chain,
            cancel: None,
        }
    }

    /// Abort waits and requests once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    async fn guarded<F: Future>(&self, video_id: &str, future: F) -> Result<F::Output, TranscriptError> {
        match &self.cancel {
            Some(token) => token.run(future).await.ok_or_else(|| {
                debug!("Resolution of {} cancelled", video_id);
                TranscriptError::Cancelled {
                    video_id: video_id.to_string(),
                }
            }),
            None => Ok(future.await),
        }
    }

    /// Fetch the watch page and extract its caption catalog, retrying per `options.retry`
    pub async fn resolve(
        &self,
        video_id: &str,
        options: &RequestOptions,
    ) -> Result<TranscriptList, TranscriptError> {
        let session_options = self
            .http
            .session_options(options.proxy.clone(), options.cookies.clone());
        let session = self
            .connector
            .connect(&session_options)
            .map_err(|e| TranscriptError::RetrievalFailure {
                video_id: video_id.to_string(),
                reason: e.to_string(),
            })?;

        let url = self.http.watch_url_for(video_id);
        let policy = options.retry;
        let attempts = policy.attempts();
        let mut last_reason = RetryReason::EmptyCatalog;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = policy.delay_for(&last_reason, attempt - 1);
                debug!(
                    "Retrying {} in {:?} (attempt {}/{}, {:?})",
                    video_id,
                    delay,
                    attempt + 1,
                    attempts,
                    last_reason
                );
                self.guarded(video_id, tokio::time::sleep(delay)).await?;
            }

            let response = match self.guarded(video_id, session.get(&url)).await? {
                Ok(response) => response,
                Err(e) => {
                    debug!("Watch page request for {} failed: {}", video_id, e);
                    last_reason = RetryReason::Transport(e);
                    continue;
                }
            };

            match response.status {
                200 => {}
                404 => {
                    return Err(TranscriptError::VideoUnavailable {
                        video_id: video_id.to_string(),
                        status: Some(404),
                    });
                }
                429 => {
                    debug!("Rate limited while fetching {}", video_id);
                    last_reason = RetryReason::RateLimited;
                    continue;
                }
                status => {
                    debug!("Watch page for {} returned HTTP {}", video_id, status);
                    last_reason = RetryReason::Status(status);
                    continue;
                }
            }

            let page = PageContext {
                video_id,
                html: &response.body,
                session: session.as_ref(),
            };
            let catalog = self.guarded(video_id, self.chain.extract(&page)).await?;

            if !catalog.is_empty() {
                debug!("Resolved {} caption track(s) for {}", catalog.len(), video_id);
                return Ok(TranscriptList::new(video_id, catalog, session));
            }

            debug!("No caption tracks extracted for {}", video_id);
            last_reason = RetryReason::EmptyCatalog;
        }

        let video_id = video_id.to_string();
        Err(match last_reason {
            RetryReason::RateLimited => TranscriptError::RateLimited { video_id },
            RetryReason::Status(status) => TranscriptError::VideoUnavailable {
                video_id,
                status: Some(status),
            },
            RetryReason::Transport(e) => TranscriptError::RetrievalFailure {
                video_id,
                reason: e.to_string(),
            },
            RetryReason::EmptyCatalog => TranscriptError::CatalogNotFound { video_id },
        })
    }
}

/// Caption catalog of one video, bound to the session it was resolved on
#[derive(Clone)]
pub struct TranscriptList {
    video_id: String,
    catalog: CaptionTrackCatalog,
    session: Arc<dyn Transport>,
}

impl std::fmt::Debug for TranscriptList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptList")
            .field("video_id", &self.video_id)
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl std::fmt::Display for TranscriptList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Transcripts for {}: {}", self.video_id, self.catalog)
    }
}

impl TranscriptList {
    pub fn new(video_id: impl Into<String>, catalog: CaptionTrackCatalog, session: Arc<dyn Transport>) -> Self {
        Self {
            video_id: video_id.into(),
            catalog,
            session,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn catalog(&self) -> &CaptionTrackCatalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> CaptionTrackCatalog {
        self.catalog
    }

    /// Handle for a track of this catalog
    pub fn transcript_for(&self, track: &CaptionTrack) -> Transcript {
        Transcript::new(self.video_id.clone(), track.clone(), self.session.clone())
    }

    /// Every track as a fetchable handle, in catalog order
    pub fn transcripts(&self) -> Vec<Transcript> {
        self.catalog.iter().map(|t| self.transcript_for(t)).collect()
    }

    fn found<S: AsRef<str>>(
        &self,
        track: Option<&CaptionTrack>,
        language_codes: &[S],
    ) -> Result<Transcript, TranscriptError> {
        track
            .map(|t| self.transcript_for(t))
            .ok_or_else(|| TranscriptError::NoTranscriptFound {
                video_id: self.video_id.clone(),
                requested_languages: language_codes.iter().map(|c| c.as_ref().to_string()).collect(),
                catalog: self.catalog.clone(),
            })
    }

    /// First track of any kind, trying codes in order
    pub fn find_transcript<S: AsRef<str>>(&self, language_codes: &[S]) -> Result<Transcript, TranscriptError> {
        self.found(self.catalog.find_any(language_codes), language_codes)
    }

    /// First generated track, trying codes in order
    pub fn find_generated_transcript<S: AsRef<str>>(
        &self,
        language_codes: &[S],
    ) -> Result<Transcript, TranscriptError> {
        self.found(self.catalog.find_generated(language_codes), language_codes)
    }

    /// First manually created track, trying codes in order
    pub fn find_manually_created_transcript<S: AsRef<str>>(
        &self,
        language_codes: &[S],
    ) -> Result<Transcript, TranscriptError> {
        self.found(self.catalog.find_manual(language_codes), language_codes)
    }

    /// Language codes with at least one track
    pub fn languages(&self) -> Vec<String> {
        self.catalog.language_codes().into_iter().map(str::to_string).collect()
    }

    /// Language codes with a generated track
    pub fn generated_languages(&self) -> Vec<String> {
        self.languages_where(|t| t.is_generated)
    }

    /// Language codes with a manually created track
    pub fn manually_created_languages(&self) -> Vec<String> {
        self.languages_where(|t| !t.is_generated)
    }

    fn languages_where(&self, predicate: impl Fn(&CaptionTrack) -> bool) -> Vec<String> {
        self.catalog
            .groups()
            .iter()
            .filter(|g| g.tracks.iter().any(&predicate))
            .map(|g| g.language_code.clone())
            .collect()
    }
}
