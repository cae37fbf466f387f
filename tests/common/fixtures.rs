/*!
 * Watch pages, caption descriptors and timed-text payloads for tests
 */

use serde_json::{Value, json};

/// Video id used across the suite
pub const VIDEO_ID: &str = "dQw4w9WgXcQ";

/// Second video id for batch tests
pub const OTHER_VIDEO_ID: &str = "9bZkp7q19f0";

/// URL fragment matching the watch page of `video_id`
pub fn watch_fragment(video_id: &str) -> String {
    format!("watch?v={}", video_id)
}

/// Caption payload URL of a track
pub fn caption_url(video_id: &str, tag: &str) -> String {
    format!("https://www.youtube.com/api/timedtext?v={}&name={}", video_id, tag)
}

/// Raw caption track descriptor
pub fn track(video_id: &str, code: &str, name: &str, tag: &str, generated: bool) -> Value {
    let mut track = json!({
        "baseUrl": caption_url(video_id, tag),
        "name": { "simpleText": name },
        "languageCode": code,
        "isTranslatable": true,
    });
    if generated {
        track["kind"] = json!("asr");
    }
    track
}

/// Catalog-level descriptor with optional translation targets
pub fn descriptor(tracks: Vec<Value>, targets: &[(&str, &str)]) -> Value {
    let targets: Vec<Value> = targets
        .iter()
        .map(|(code, name)| json!({ "languageCode": code, "languageName": { "simpleText": name } }))
        .collect();

    if targets.is_empty() {
        json!({ "captionTracks": tracks })
    } else {
        json!({ "captionTracks": tracks, "translationLanguages": targets })
    }
}

/// English generated, English manual and German manual tracks, translatable into French and Spanish
pub fn standard_descriptor(video_id: &str) -> Value {
    descriptor(
        vec![
            track(video_id, "en", "English (auto-generated)", "en-asr", true),
            track(video_id, "en", "English", "en-manual", false),
            track(video_id, "de", "Deutsch", "de-manual", false),
        ],
        &[("fr", "French"), ("es", "Spanish")],
    )
}

/// Watch page embedding `descriptor` inside the initial player response
pub fn watch_page(descriptor: &Value) -> String {
    format!(
        concat!(
            "<!DOCTYPE html><html><head><title>Video</title></head><body>",
            "<script>var ytcfg = {{\"EXPERIMENT_FLAGS\": {{}}}};</script>",
            "<script>var ytInitialPlayerResponse = {{\"responseContext\":{{}},",
            "\"captions\":{{\"playerCaptionsTracklistRenderer\":{}}},",
            "\"videoDetails\":{{\"videoId\":\"x\",\"title\":\"t\"}}}};</script>",
            "</body></html>"
        ),
        descriptor
    )
}

/// Watch page carrying a player API key but no embedded captions
pub fn watch_page_with_api_key(api_key: &str) -> String {
    format!(
        "<html><script>ytcfg.set({{\"INNERTUBE_API_KEY\":\"{}\",\"INNERTUBE_CONTEXT_CLIENT_NAME\":1}});</script></html>",
        api_key
    )
}

/// Player API response wrapping `descriptor`
pub fn player_response(descriptor: &Value) -> String {
    json!({
        "playabilityStatus": { "status": "OK" },
        "captions": { "playerCaptionsTracklistRenderer": descriptor },
    })
    .to_string()
}

/// Watch page without any caption data
pub fn captionless_page() -> String {
    "<html><head><title>No captions</title></head><body><script>var x = {\"a\": 1};</script></body></html>"
        .to_string()
}

/// Timed-text payload from (start, duration, text) cues
pub fn timed_text(cues: &[(f64, f64, &str)]) -> String {
    let body: String = cues
        .iter()
        .map(|(start, dur, text)| format!("<text start=\"{}\" dur=\"{}\">{}</text>", start, dur, text))
        .collect();
    format!("<?xml version=\"1.0\" encoding=\"utf-8\" ?><transcript>{}</transcript>", body)
}

/// Two-cue payload whose first text identifies the track
pub fn labelled_payload(label: &str) -> String {
    timed_text(&[(0.0, 1.5, label), (1.5, 2.0, "second line")])
}
