/*!
 * # Transkript - caption discovery and retrieval for online videos
 *
 * A Rust library for finding the caption tracks of a video and turning
 * them into typed, timed caption entries.
 *
 * ## Features
 *
 * - Caption track discovery through ordered extraction strategies:
 *   - internal player API
 *   - JSON embedded in page scripts
 *   - raw timed-text references
 * - Retry with exponential backoff on rate limiting
 * - Language preference resolution with platform-side translation fallback
 * - Batch retrieval with fail-fast or continue-on-failure semantics
 * - Per-call cancellation
 * - Pretty, JSON, text, SRT and WebVTT output
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `catalog`: Normalized caption track catalog
 * - `extraction`: Strategy chain turning a watch page into a catalog:
 *   - `extraction::innertube`: Internal player API strategy
 *   - `extraction::embedded_json`: Embedded script JSON strategy
 *   - `extraction::timedtext_ref`: Raw timed-text reference strategy
 *   - `extraction::normalize`: Descriptor search and normalization
 * - `resolver`: Watch page fetching, retry policy and transcript lists
 * - `selection`: Language preference resolution
 * - `transcript`: Transcript fetching, timed-text parsing and translation
 * - `api`: Caller-facing facade
 * - `transport`: HTTP seam with reqwest and scripted implementations
 * - `cancel`: Per-call cancellation token
 * - `formatters`: Output rendering
 * - `video_id`, `channel`: Video id extraction and channel scraping
 * - `language_utils`: ISO language code utilities
 * - `app_config`: Configuration management
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod api;
pub mod app_config;
pub mod cancel;
pub mod catalog;
pub mod channel;
pub mod errors;
pub mod extraction;
pub mod formatters;
pub mod language_utils;
pub mod resolver;
pub mod selection;
pub mod transcript;
pub mod transport;
pub mod video_id;

// Re-export main types for easier usage
pub use api::{FallbackEvent, FallbackHook, TranscriptApi, VideoTranscript};
pub use app_config::Config;
pub use cancel::CancellationToken;
pub use catalog::{CaptionTrack, CaptionTrackCatalog, TranslationLanguage};
pub use errors::{AppError, ChannelError, ErrorKind, TranscriptError, TransportError};
pub use resolver::{RequestOptions, RetryPolicy, TranscriptList};
pub use transcript::{CaptionEntry, Transcript};
pub use video_id::extract_video_id;
