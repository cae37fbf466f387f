/*!
 * Caller-facing transcript API.
 *
 * `TranscriptApi` wires the resolver, language selection and transcript
 * fetching together. Each call opens its own session and keeps nothing
 * once it returns.
 */

use log::{debug, warn};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use crate::app_config::Config;
use crate::cancel::CancellationToken;
use crate::catalog::CaptionTrack;
use crate::errors::TranscriptError;
use crate::extraction::ExtractionChain;
use crate::resolver::{CatalogResolver, RequestOptions, TranscriptList};
use crate::selection::{self, SelectionPlan};
use crate::transcript::CaptionEntry;
use crate::transport::{Connector, HttpConnector};

/// A best-effort translation attempt that failed and was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackEvent {
    pub video_id: String,
    pub source_language: String,
    pub target_language: String,
    pub reason: String,
}

/// Observer for swallowed translation failures
pub type FallbackHook = Arc<dyn Fn(&FallbackEvent) + Send + Sync>;

/// Outcome of one video in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoTranscript {
    pub video_id: String,
    /// Caption entries when the video succeeded
    pub entries: Option<Vec<CaptionEntry>>,
    /// Error description when it failed
    pub error: Option<String>,
}

impl VideoTranscript {
    pub fn is_success(&self) -> bool {
        self.entries.is_some()
    }
}

/// Entry point for listing and fetching transcripts
pub struct TranscriptApi {
    resolver: CatalogResolver,
    fallback_hook: Option<FallbackHook>,
    cancel: Option<CancellationToken>,
}

impl TranscriptApi {
    /// Create an API talking to the platform over HTTP
    pub fn new(config: &Config) -> Self {
        Self::with_connector(config, Arc::new(HttpConnector))
    }

    /// Create an API over a custom connector
    pub fn with_connector(config: &Config, connector: Arc<dyn Connector>) -> Self {
        let chain = ExtractionChain::standard(config.innertube.clone());
        Self {
            resolver: CatalogResolver::new(connector, config.http.clone(), chain),
            fallback_hook: None,
            cancel: None,
        }
    }

    /// Observe translation fallbacks that would otherwise only be logged
    pub fn with_fallback_hook(mut self, hook: FallbackHook) -> Self {
        self.fallback_hook = Some(hook);
        self
    }

    /// Abort in-flight calls once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.resolver = self.resolver.with_cancellation(token.clone());
        self.cancel = Some(token);
        self
    }

    async fn guarded<F: Future>(&self, video_id: &str, future: F) -> Result<F::Output, TranscriptError> {
        match &self.cancel {
            Some(token) => token.run(future).await.ok_or_else(|| TranscriptError::Cancelled {
                video_id: video_id.to_string(),
            }),
            None => Ok(future.await),
        }
    }

    /// Resolve the caption catalog of a video
    pub async fn list_transcripts(
        &self,
        video_id: &str,
        options: &RequestOptions,
    ) -> Result<TranscriptList, TranscriptError> {
        self.resolver.resolve(video_id, options).await
    }

    /// Fetch the transcript that best fits `languages`
    pub async fn get_transcript(
        &self,
        video_id: &str,
        languages: Option<&[String]>,
        preserve_formatting: bool,
        options: &RequestOptions,
    ) -> Result<Vec<CaptionEntry>, TranscriptError> {
        let list = self.list_transcripts(video_id, options).await?;

        match selection::plan(list.catalog(), languages) {
            SelectionPlan::Direct(track) => {
                debug!(
                    "Selected {} track '{}' for {}",
                    track.kind_label(),
                    track.language_code,
                    video_id
                );
                let transcript = list.transcript_for(track);
                self.guarded(video_id, transcript.fetch(preserve_formatting)).await?
            }
            SelectionPlan::Translate {
                source,
                target_language,
            } => match self
                .fetch_translated(&list, source, &target_language, preserve_formatting)
                .await?
            {
                Some(entries) => Ok(entries),
                None => Err(no_transcript_found(&list, languages)),
            },
            SelectionPlan::NoMatch => Err(no_transcript_found(&list, languages)),
            SelectionPlan::EmptyCatalog => Err(TranscriptError::CatalogNotFound {
                video_id: video_id.to_string(),
            }),
        }
    }

    /// Fetch `source` translated into `target_language`, best effort.
    ///
    /// A failed translation is logged, handed to the fallback hook and
    /// comes back as `None`. Only cancellation is returned as an error.
    pub async fn fetch_translated(
        &self,
        list: &TranscriptList,
        source: &CaptionTrack,
        target_language: &str,
        preserve_formatting: bool,
    ) -> Result<Option<Vec<CaptionEntry>>, TranscriptError> {
        let outcome = match list.transcript_for(source).translate(target_language) {
            Ok(transcript) => {
                self.guarded(list.video_id(), transcript.fetch(preserve_formatting))
                    .await?
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(entries) => Ok(Some(entries)),
            Err(e) => {
                self.report_fallback(FallbackEvent {
                    video_id: list.video_id().to_string(),
                    source_language: source.language_code.clone(),
                    target_language: target_language.to_string(),
                    reason: e.to_string(),
                });
                Ok(None)
            }
        }
    }

    fn report_fallback(&self, event: FallbackEvent) {
        warn!(
            "Translating {} from '{}' into '{}' failed, skipping: {}",
            event.video_id, event.source_language, event.target_language, event.reason
        );
        if let Some(hook) = &self.fallback_hook {
            hook(&event);
        }
    }

    /// Fetch transcripts for several videos in input order.
    ///
    /// With `continue_on_failure` every failure is recorded in its
    /// `VideoTranscript`; otherwise the first failure is returned.
    pub async fn get_transcripts(
        &self,
        video_ids: &[String],
        languages: Option<&[String]>,
        preserve_formatting: bool,
        options: &RequestOptions,
        continue_on_failure: bool,
    ) -> Result<Vec<VideoTranscript>, TranscriptError> {
        let mut results = Vec::with_capacity(video_ids.len());

        for video_id in video_ids {
            match self
                .get_transcript(video_id, languages, preserve_formatting, options)
                .await
            {
                Ok(entries) => results.push(VideoTranscript {
                    video_id: video_id.clone(),
                    entries: Some(entries),
                    error: None,
                }),
                Err(e) if continue_on_failure && !matches!(e, TranscriptError::Cancelled { .. }) => {
                    warn!("Failed to get transcript for {}: {}", video_id, e);
                    results.push(VideoTranscript {
                        video_id: video_id.clone(),
                        entries: None,
                        error: Some(e.to_string()),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(results)
    }
}

fn no_transcript_found(list: &TranscriptList, languages: Option<&[String]>) -> TranscriptError {
    TranscriptError::NoTranscriptFound {
        video_id: list.video_id().to_string(),
        requested_languages: languages.map(<[String]>::to_vec).unwrap_or_default(),
        catalog: list.catalog().clone(),
    }
}
