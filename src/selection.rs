/*!
 * Language resolution.
 *
 * Decides which caption track answers a language preference without
 * touching the network. The caller executes the resulting plan.
 *
 * With preferred languages:
 * 1. the first code with any track wins
 * 2. otherwise the first manual track in the preferred languages is
 *    translated into the first preferred code, if it is translatable
 * 3. otherwise nothing matches
 *
 * Without preferences: English generated, English manual, then whatever
 * track comes first in the catalog.
 */

use crate::catalog::{CaptionTrack, CaptionTrackCatalog};

const DEFAULT_LANGUAGE: &str = "en";

/// Outcome of language resolution against one catalog
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionPlan<'a> {
    /// Fetch this track as-is
    Direct(&'a CaptionTrack),
    /// Fetch this track translated into `target_language`
    Translate {
        source: &'a CaptionTrack,
        target_language: String,
    },
    /// The catalog has tracks but none fits the preference
    NoMatch,
    /// The catalog has no tracks at all
    EmptyCatalog,
}

/// Resolve a language preference against a catalog.
///
/// `None` and an empty slice both mean "no preference".
pub fn plan<'a>(catalog: &'a CaptionTrackCatalog, languages: Option<&[String]>) -> SelectionPlan<'a> {
    if catalog.is_empty() {
        return SelectionPlan::EmptyCatalog;
    }

    match languages.filter(|l| !l.is_empty()) {
        Some(languages) => plan_preferred(catalog, languages),
        None => plan_unlabeled(catalog),
    }
}

fn plan_preferred<'a>(catalog: &'a CaptionTrackCatalog, languages: &[String]) -> SelectionPlan<'a> {
    if let Some(track) = catalog.find_any(languages) {
        return SelectionPlan::Direct(track);
    }

    let target_language = &languages[0];
    match translation_source(catalog, languages) {
        Some(source) => SelectionPlan::Translate {
            source,
            target_language: target_language.clone(),
        },
        None => SelectionPlan::NoMatch,
    }
}

fn translation_source<'a>(
    catalog: &'a CaptionTrackCatalog,
    languages: &[String],
) -> Option<&'a CaptionTrack> {
    catalog
        .find_manual(languages)
        .filter(|track| track.is_translatable)
}

// The last step depends on upstream document order and is only as stable
// as the page layout the catalog was extracted from.
fn plan_unlabeled(catalog: &CaptionTrackCatalog) -> SelectionPlan<'_> {
    let default = [DEFAULT_LANGUAGE];
    catalog
        .find_generated(&default)
        .or_else(|| catalog.find_manual(&default))
        .or_else(|| catalog.first_track())
        .map(SelectionPlan::Direct)
        .unwrap_or(SelectionPlan::EmptyCatalog)
}
