/*!
 * Caption track catalog.
 *
 * Normalized view of the caption tracks discovered for one video. The
 * catalog keeps language groups in the order their codes were first seen
 * in the upstream document, and tracks inside a group in descriptor order.
 * Nothing in here talks to the network.
 */

use serde::Serialize;
use std::fmt;

/// A language a track can be machine-translated into
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationLanguage {
    /// Target language code (e.g. "de")
    pub language_code: String,
    /// Display name of the target language
    pub language_name: String,
}

impl TranslationLanguage {
    pub fn new(language_code: impl Into<String>, language_name: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            language_name: language_name.into(),
        }
    }
}

/// One discoverable caption stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionTrack {
    /// Short locale identifier, not unique across track kinds
    pub language_code: String,
    /// Human readable language name
    pub language_name: String,
    /// Opaque locator of the timed-text payload
    pub source_url: String,
    /// True for automatic speech recognition tracks
    pub is_generated: bool,
    /// True when the platform can translate this track
    pub is_translatable: bool,
    /// Languages this track can be translated into
    pub translation_targets: Vec<TranslationLanguage>,
}

impl CaptionTrack {
    /// Create a track without translation targets
    pub fn new(
        language_code: impl Into<String>,
        language_name: impl Into<String>,
        source_url: impl Into<String>,
        is_generated: bool,
    ) -> Self {
        Self {
            language_code: language_code.into(),
            language_name: language_name.into(),
            source_url: source_url.into(),
            is_generated,
            is_translatable: false,
            translation_targets: Vec::new(),
        }
    }

    /// Attach translation targets; the track becomes translatable when the list is non-empty
    pub fn with_translation_targets(mut self, targets: Vec<TranslationLanguage>) -> Self {
        self.is_translatable = !targets.is_empty();
        self.translation_targets = targets;
        self
    }

    /// Whether `language_code` is one of the advertised translation targets
    pub fn can_translate_to(&self, language_code: &str) -> bool {
        self.is_translatable
            && self
                .translation_targets
                .iter()
                .any(|t| t.language_code == language_code)
    }

    /// Short label used in listings and diagnostics
    pub fn kind_label(&self) -> &'static str {
        if self.is_generated { "generated" } else { "manual" }
    }
}

/// Tracks sharing one language code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageGroup {
    pub language_code: String,
    pub tracks: Vec<CaptionTrack>,
}

/// Full set of caption tracks for one video
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaptionTrackCatalog {
    groups: Vec<LanguageGroup>,
}

impl CaptionTrackCatalog {
    /// An empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from tracks in discovery order.
    ///
    /// Tracks without a source URL are dropped.
    pub fn from_tracks<I>(tracks: I) -> Self
    where
        I: IntoIterator<Item = CaptionTrack>,
    {
        let mut catalog = Self::new();
        for track in tracks {
            catalog.push(track);
        }
        catalog
    }

    fn push(&mut self, track: CaptionTrack) {
        if track.source_url.trim().is_empty() {
            return;
        }

        match self
            .groups
            .iter_mut()
            .find(|g| g.language_code == track.language_code)
        {
            Some(group) => group.tracks.push(track),
            None => self.groups.push(LanguageGroup {
                language_code: track.language_code.clone(),
                tracks: vec![track],
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of tracks across all languages
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.tracks.len()).sum()
    }

    /// Language codes in first-seen order, each exactly once
    pub fn language_codes(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.language_code.as_str()).collect()
    }

    /// Language groups in first-seen order
    pub fn groups(&self) -> &[LanguageGroup] {
        &self.groups
    }

    /// Tracks registered under `language_code`
    pub fn tracks_for(&self, language_code: &str) -> &[CaptionTrack] {
        self.groups
            .iter()
            .find(|g| g.language_code == language_code)
            .map(|g| g.tracks.as_slice())
            .unwrap_or(&[])
    }

    /// All tracks, group by group
    pub fn iter(&self) -> impl Iterator<Item = &CaptionTrack> {
        self.groups.iter().flat_map(|g| g.tracks.iter())
    }

    /// First track of the first language group.
    ///
    /// Group order mirrors upstream document order, so this is only as
    /// stable as the page layout it was extracted from.
    pub fn first_track(&self) -> Option<&CaptionTrack> {
        self.iter().next()
    }

    /// First track of any kind for the first code that has one
    pub fn find_any<S: AsRef<str>>(&self, language_codes: &[S]) -> Option<&CaptionTrack> {
        self.find_matching(language_codes, |_| true)
    }

    /// First generated track for the first code that has one
    pub fn find_generated<S: AsRef<str>>(&self, language_codes: &[S]) -> Option<&CaptionTrack> {
        self.find_matching(language_codes, |t| t.is_generated)
    }

    /// First manually created track for the first code that has one
    pub fn find_manual<S: AsRef<str>>(&self, language_codes: &[S]) -> Option<&CaptionTrack> {
        self.find_matching(language_codes, |t| !t.is_generated)
    }

    fn find_matching<S, F>(&self, language_codes: &[S], predicate: F) -> Option<&CaptionTrack>
    where
        S: AsRef<str>,
        F: Fn(&CaptionTrack) -> bool,
    {
        language_codes.iter().find_map(|code| {
            self.tracks_for(code.as_ref())
                .iter()
                .find(|track| predicate(track))
        })
    }
}

impl<'a> IntoIterator for &'a CaptionTrackCatalog {
    type Item = &'a CaptionTrack;
    type IntoIter = Box<dyn Iterator<Item = &'a CaptionTrack> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl fmt::Display for CaptionTrackCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(no tracks)");
        }

        let rendered: Vec<String> = self
            .iter()
            .map(|t| format!("{} ({}, {})", t.language_code, t.language_name, t.kind_label()))
            .collect();
        write!(f, "{}", rendered.join(", "))
    }
}
