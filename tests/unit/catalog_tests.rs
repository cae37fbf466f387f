/*!
 * Tests for the caption track catalog
 */

use transkript::catalog::{CaptionTrack, CaptionTrackCatalog, TranslationLanguage};

fn track(code: &str, tag: &str, generated: bool) -> CaptionTrack {
    CaptionTrack::new(code, code.to_uppercase(), format!("https://t/{}", tag), generated)
}

#[test]
fn test_fromTracks_withInterleavedCodes_shouldGroupInFirstSeenOrder() {
    let catalog = CaptionTrackCatalog::from_tracks([
        track("en", "1", true),
        track("tr", "2", false),
        track("en", "3", false),
    ]);

    assert_eq!(catalog.language_codes(), vec!["en", "tr"]);
    assert_eq!(catalog.len(), 3);

    let en: Vec<&str> = catalog.tracks_for("en").iter().map(|t| t.source_url.as_str()).collect();
    assert_eq!(en, vec!["https://t/1", "https://t/3"]);
}

#[test]
fn test_fromTracks_withEmptySourceUrl_shouldDropTrack() {
    let catalog = CaptionTrackCatalog::from_tracks([
        CaptionTrack::new("en", "English", "", false),
        track("de", "de", false),
    ]);

    assert_eq!(catalog.language_codes(), vec!["de"]);
    assert!(catalog.tracks_for("en").is_empty());
}

#[test]
fn test_findGenerated_withCodeOrder_shouldTryCodesInOrder() {
    let catalog = CaptionTrackCatalog::from_tracks([
        track("en", "en-manual", false),
        track("de", "de-asr", true),
        track("en", "en-asr", true),
    ]);

    let found = catalog.find_generated(&["fr", "en", "de"]).unwrap();
    assert_eq!(found.source_url, "https://t/en-asr");

    let manual = catalog.find_manual(&["de", "en"]).unwrap();
    assert_eq!(manual.source_url, "https://t/en-manual");

    assert!(catalog.find_any(&["xx"]).is_none());
}

#[test]
fn test_findAny_withManualAndGenerated_shouldReturnFirstInDescriptorOrder() {
    let catalog = CaptionTrackCatalog::from_tracks([track("en", "a", true), track("en", "b", false)]);
    assert_eq!(catalog.find_any(&["en"]).unwrap().source_url, "https://t/a");
}

#[test]
fn test_withTranslationTargets_shouldSetTranslatable() {
    let plain = track("en", "x", false);
    assert!(!plain.is_translatable);
    assert!(!plain.can_translate_to("fr"));

    let translatable = plain.with_translation_targets(vec![TranslationLanguage::new("fr", "French")]);
    assert!(translatable.is_translatable);
    assert!(translatable.can_translate_to("fr"));
    assert!(!translatable.can_translate_to("de"));
}

#[test]
fn test_display_shouldListEveryTrack() {
    let catalog = CaptionTrackCatalog::from_tracks([track("en", "1", true), track("tr", "2", false)]);
    let display = catalog.to_string();
    assert!(display.contains("en"));
    assert!(display.contains("generated"));
    assert!(display.contains("tr"));
    assert!(display.contains("manual"));

    assert!(CaptionTrackCatalog::new().to_string().contains("no tracks"));
}

#[test]
fn test_firstTrack_shouldFollowGroupOrder() {
    let catalog = CaptionTrackCatalog::from_tracks([track("tr", "tr", false), track("en", "en", true)]);
    assert_eq!(catalog.first_track().unwrap().language_code, "tr");
    assert_eq!(catalog.iter().count(), 2);
}
