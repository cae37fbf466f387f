/*!
 * Caption descriptor search and normalization.
 *
 * A caption descriptor is the JSON object the platform embeds under
 * `playerCaptionsTracklistRenderer`: a `captionTracks` array plus an
 * optional catalog-level `translationLanguages` array.
 */

use serde_json::Value;

use crate::catalog::{CaptionTrack, CaptionTrackCatalog, TranslationLanguage};

const RENDERER_KEY: &str = "playerCaptionsTracklistRenderer";
const TRACKS_KEY: &str = "captionTracks";
const TRANSLATIONS_KEY: &str = "translationLanguages";
const ASR_KIND: &str = "asr";

/// Depth-first search for the first caption descriptor in `value`.
///
/// Objects are checked for a renderer child, then for their own
/// `captionTracks` array, then descended value by value. Arrays are
/// descended item by item. Scalars end the branch.
pub fn find_caption_descriptor(value: &Value) -> Option<&Value> {
    match value {
        Value::Object(map) => {
            if let Some(renderer @ Value::Object(_)) = map.get(RENDERER_KEY) {
                return Some(renderer);
            }

            if let Some(Value::Array(_)) = map.get(TRACKS_KEY) {
                return Some(value);
            }

            map.values().find_map(find_caption_descriptor)
        }
        Value::Array(items) => items.iter().find_map(find_caption_descriptor),
        _ => None,
    }
}

/// Turn a caption descriptor into a catalog
pub fn normalize_descriptor(descriptor: &Value) -> CaptionTrackCatalog {
    let targets: Vec<TranslationLanguage> = descriptor
        .get(TRANSLATIONS_KEY)
        .and_then(Value::as_array)
        .map(|languages| languages.iter().filter_map(translation_language).collect())
        .unwrap_or_default();

    let tracks = descriptor
        .get(TRACKS_KEY)
        .and_then(Value::as_array)
        .map(|tracks| tracks.as_slice())
        .unwrap_or(&[])
        .iter()
        .filter_map(|raw| caption_track(raw, &targets));

    CaptionTrackCatalog::from_tracks(tracks)
}

fn caption_track(raw: &Value, targets: &[TranslationLanguage]) -> Option<CaptionTrack> {
    let source_url = raw.get("baseUrl").and_then(Value::as_str)?;
    if source_url.is_empty() {
        return None;
    }

    let language_code = raw
        .get("languageCode")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let language_name = text_of(raw.get("name")).unwrap_or_else(|| language_code.to_string());
    let is_generated = raw.get("kind").and_then(Value::as_str) == Some(ASR_KIND);

    Some(
        CaptionTrack::new(language_code, language_name, source_url, is_generated)
            .with_translation_targets(targets.to_vec()),
    )
}

fn translation_language(raw: &Value) -> Option<TranslationLanguage> {
    let code = raw.get("languageCode").and_then(Value::as_str)?;
    let name = text_of(raw.get("languageName")).unwrap_or_default();
    Some(TranslationLanguage::new(code, name))
}

// Text nodes come either as {"simpleText": ".."} or {"runs": [{"text": ".."}]}
fn text_of(node: Option<&Value>) -> Option<String> {
    let node = node?;
    if let Some(text) = node.get("simpleText").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    node.get("runs")
        .and_then(Value::as_array)
        .and_then(|runs| runs.first())
        .and_then(|run| run.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
