/*!
 * Transcript handles and timed-text parsing.
 *
 * A `Transcript` pairs one caption track with the session its catalog was
 * resolved on, so fetching and translating reuse the caller's proxy and
 * cookies.
 */

use log::debug;
use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::catalog::CaptionTrack;
use crate::errors::TranscriptError;
use crate::transport::Transport;

/// Inline tags kept when formatting is preserved
pub const FORMATTING_TAGS: &[&str] = &[
    "strong", "em", "b", "i", "mark", "small", "del", "ins", "sub", "sup",
];

static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?\s*([a-z][a-z0-9]*)\b[^>]*>").expect("Invalid tag pattern"));

/// One timed caption cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionEntry {
    /// Cue text
    pub text: String,
    /// Start offset in seconds
    pub start: f64,
    /// Duration in seconds
    pub duration: f64,
}

impl CaptionEntry {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start: start.max(0.0),
            duration: duration.max(0.0),
        }
    }

    /// End offset in seconds
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Remove markup from cue text.
///
/// With `preserve_formatting` the basic inline formatting tags survive and
/// everything else is dropped.
pub fn strip_markup(text: &str, preserve_formatting: bool) -> String {
    TAG_REGEX
        .replace_all(text, |caps: &Captures| {
            let name = caps[1].to_lowercase();
            if preserve_formatting && FORMATTING_TAGS.contains(&name.as_str()) {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

fn parse_seconds(raw: &[u8]) -> f64 {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
        .max(0.0)
}

/// Decode a timed-text payload into caption entries in document order.
///
/// Times missing or unparsable default to zero. Elements that end up
/// without text are skipped. Fails only on malformed XML.
pub fn parse_timed_text(
    xml: &str,
    preserve_formatting: bool,
) -> Result<Vec<CaptionEntry>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    // (start, duration, text) of the <text> element being read
    let mut current: Option<(f64, f64, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == b"text" => {
                let mut start = 0.0;
                let mut duration = 0.0;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => start = parse_seconds(&attr.value),
                        b"dur" => duration = parse_seconds(&attr.value),
                        _ => {}
                    }
                }
                current = Some((start, duration, String::new()));
            }
            Event::Text(ref e) => {
                if let Some((_, _, text)) = current.as_mut() {
                    // unknown entities are left for the HTML decoder
                    match e.unescape() {
                        Ok(unescaped) => text.push_str(&unescaped),
                        Err(_) => text.push_str(&String::from_utf8_lossy(e)),
                    }
                }
            }
            Event::CData(ref e) => {
                if let Some((_, _, text)) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"text" => {
                if let Some((start, duration, raw)) = current.take() {
                    let decoded = html_escape::decode_html_entities(&raw);
                    let text = strip_markup(&decoded, preserve_formatting);
                    let text = text.trim();
                    if !text.is_empty() {
                        entries.push(CaptionEntry::new(text, start, duration));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

/// A fetchable caption track bound to its resolution session
#[derive(Clone)]
pub struct Transcript {
    video_id: String,
    track: CaptionTrack,
    session: Arc<dyn Transport>,
}

impl fmt::Debug for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("video_id", &self.video_id)
            .field("track", &self.track)
            .finish()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}){}",
            self.track.language_code,
            self.track.language_name,
            if self.track.is_generated { " [generated]" } else { "" }
        )
    }
}

impl Transcript {
    pub fn new(video_id: impl Into<String>, track: CaptionTrack, session: Arc<dyn Transport>) -> Self {
        Self {
            video_id: video_id.into(),
            track,
            session,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn track(&self) -> &CaptionTrack {
        &self.track
    }

    pub fn language_code(&self) -> &str {
        &self.track.language_code
    }

    pub fn is_generated(&self) -> bool {
        self.track.is_generated
    }

    pub fn is_translatable(&self) -> bool {
        self.track.is_translatable
    }

    /// Download and decode the caption payload
    pub async fn fetch(&self, preserve_formatting: bool) -> Result<Vec<CaptionEntry>, TranscriptError> {
        debug!(
            "Fetching {} transcript '{}' for {}",
            self.track.kind_label(),
            self.track.language_code,
            self.video_id
        );

        let response = self
            .session
            .get(&self.track.source_url)
            .await
            .map_err(|e| TranscriptError::RetrievalFailure {
                video_id: self.video_id.clone(),
                reason: e.to_string(),
            })?;

        match response.status {
            200 => {}
            429 => {
                return Err(TranscriptError::RateLimited {
                    video_id: self.video_id.clone(),
                });
            }
            status => {
                return Err(TranscriptError::RetrievalFailure {
                    video_id: self.video_id.clone(),
                    reason: format!("caption payload request returned HTTP {}", status),
                });
            }
        }

        parse_timed_text(&response.body, preserve_formatting).map_err(|e| {
            TranscriptError::RetrievalFailure {
                video_id: self.video_id.clone(),
                reason: format!("malformed caption payload: {}", e),
            }
        })
    }

    /// Handle for the platform-side translation of this track
    pub fn translate(&self, language_code: &str) -> Result<Transcript, TranscriptError> {
        let unavailable = |reason: &str| TranscriptError::TranslationUnavailable {
            video_id: self.video_id.clone(),
            language_code: language_code.to_string(),
            reason: reason.to_string(),
        };

        if !self.track.is_translatable {
            return Err(unavailable("track is not translatable"));
        }

        let target = self
            .track
            .translation_targets
            .iter()
            .find(|t| t.language_code == language_code)
            .ok_or_else(|| unavailable("language is not a translation target of this track"))?;

        let separator = if self.track.source_url.contains('?') { '&' } else { '?' };
        let mut track = self.track.clone();
        track.source_url = format!("{}{}tlang={}", self.track.source_url, separator, language_code);
        track.language_code = target.language_code.clone();
        track.language_name = target.language_name.clone();
        track.is_translatable = false;
        track.translation_targets.clear();

        Ok(Transcript::new(self.video_id.clone(), track, self.session.clone()))
    }
}
