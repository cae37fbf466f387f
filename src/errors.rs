/*!
 * Error types for the transkript library.
 *
 * Every terminal failure a caller can see is a `TranscriptError` variant
 * carrying enough context (video id, requested languages, catalog
 * snapshot) to be handled programmatically. Transport problems are kept
 * apart in `TransportError` so the resolver can decide when to retry.
 */

use thiserror::Error;

use crate::catalog::CaptionTrackCatalog;

/// Failures raised by the HTTP layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The request did not complete within the per-request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The connection could not be established or was reset
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other request or body-read failure
    #[error("Request failed: {0}")]
    Request(String),

    /// The HTTP session could not be built (bad proxy, bad header value)
    #[error("Failed to build HTTP session: {0}")]
    Build(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::Connection(error.to_string())
        } else if error.is_builder() {
            Self::Build(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

/// Coarse classification of a `TranscriptError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RateLimited,
    VideoUnavailable,
    CatalogNotFound,
    NoTranscriptFound,
    RetrievalFailure,
    TranslationUnavailable,
    Cancelled,
    InvalidInput,
}

/// Errors surfaced by catalog resolution, language selection and fetching
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// Upstream kept answering HTTP 429 past every retry
    #[error("Too many requests while fetching video {video_id}; retry later")]
    RateLimited { video_id: String },

    /// The video is missing (404) or the page never came back with 200
    #[error("Video {video_id} is unavailable{}", status_suffix(.status))]
    VideoUnavailable { video_id: String, status: Option<u16> },

    /// The page was fetched but no caption descriptors could be extracted
    #[error("No caption tracks could be found for video {video_id}")]
    CatalogNotFound { video_id: String },

    /// The catalog exists but no track satisfies the requested languages
    #[error("No transcript found for video {video_id} in languages {requested_languages:?}; available: {catalog}")]
    NoTranscriptFound {
        video_id: String,
        requested_languages: Vec<String>,
        catalog: CaptionTrackCatalog,
    },

    /// A transport-level failure persisted through all retries
    #[error("Failed to retrieve transcript data for video {video_id}: {reason}")]
    RetrievalFailure { video_id: String, reason: String },

    /// The track cannot be translated into the requested language
    #[error("Translation of video {video_id} into '{language_code}' is unavailable: {reason}")]
    TranslationUnavailable {
        video_id: String,
        language_code: String,
        reason: String,
    },

    /// The caller cancelled the in-flight call
    #[error("Request for video {video_id} was cancelled")]
    Cancelled { video_id: String },

    /// The input could not be turned into a video id
    #[error("Could not extract video ID from: {0}")]
    InvalidVideoId(String),
}

impl TranscriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::VideoUnavailable { .. } => ErrorKind::VideoUnavailable,
            Self::CatalogNotFound { .. } => ErrorKind::CatalogNotFound,
            Self::NoTranscriptFound { .. } => ErrorKind::NoTranscriptFound,
            Self::RetrievalFailure { .. } => ErrorKind::RetrievalFailure,
            Self::TranslationUnavailable { .. } => ErrorKind::TranslationUnavailable,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::InvalidVideoId(_) => ErrorKind::InvalidInput,
        }
    }

    /// Video the error refers to, when there is one
    pub fn video_id(&self) -> Option<&str> {
        match self {
            Self::RateLimited { video_id }
            | Self::VideoUnavailable { video_id, .. }
            | Self::CatalogNotFound { video_id }
            | Self::NoTranscriptFound { video_id, .. }
            | Self::RetrievalFailure { video_id, .. }
            | Self::TranslationUnavailable { video_id, .. }
            | Self::Cancelled { video_id } => Some(video_id),
            Self::InvalidVideoId(_) => None,
        }
    }

    /// True when trying the same call again later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RateLimited | ErrorKind::RetrievalFailure | ErrorKind::Cancelled
        )
    }
}

/// Errors raised while collecting video ids from a channel
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("No videos found for channel: {0}")]
    NoVideos(String),

    #[error("Channel request failed: {0}")]
    Transport(#[from] TransportError),
}

/// Top-level error used by the command line front-end
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("File error: {0}")]
    File(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
