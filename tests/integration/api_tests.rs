/*!
 * End-to-end transcript retrieval: language selection, translation fallback and batches
 */

use parking_lot::Mutex;
use std::sync::Arc;

use transkript::errors::TranscriptError;
use transkript::transport::{ScriptedReply, ScriptedTransport};
use transkript::{FallbackEvent, FallbackHook};

use crate::common::fixtures::{
    OTHER_VIDEO_ID, VIDEO_ID, captionless_page, descriptor, labelled_payload, standard_descriptor, track,
    watch_fragment, watch_page,
};
use crate::common::{languages, no_wait_options, scripted_api};

/// Transport serving the standard catalog and a labelled payload per track
fn standard_transport() -> ScriptedTransport {
    ScriptedTransport::new()
        .on_get(
            watch_fragment(VIDEO_ID),
            ScriptedReply::ok(watch_page(&standard_descriptor(VIDEO_ID))),
        )
        .on_get("tlang=fr", ScriptedReply::ok(labelled_payload("bonjour")))
        .on_get("name=en-asr", ScriptedReply::ok(labelled_payload("generated english")))
        .on_get("name=en-manual", ScriptedReply::ok(labelled_payload("manual english")))
        .on_get("name=de-manual", ScriptedReply::ok(labelled_payload("hallo")))
}

fn recording_hook() -> (FallbackHook, Arc<Mutex<Vec<FallbackEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let hook: FallbackHook = Arc::new(move |event: &FallbackEvent| sink.lock().push(event.clone()));
    (hook, events)
}

#[tokio::test]
async fn test_getTranscript_withoutLanguages_shouldPreferGeneratedEnglish() {
    let transport = standard_transport();
    let api = scripted_api(&transport);

    let entries = api
        .get_transcript(VIDEO_ID, None, false, &no_wait_options(0))
        .await
        .unwrap();

    assert_eq!(entries[0].text, "generated english");
    assert_eq!(transport.request_count("name=en-asr"), 1);
    assert_eq!(transport.request_count("name=en-manual"), 0);
}

#[tokio::test]
async fn test_getTranscript_withPreferredLanguage_shouldFetchDirectly() {
    let transport = standard_transport();
    let api = scripted_api(&transport);
    let preferred = languages(&["ja", "de", "en"]);

    let entries = api
        .get_transcript(VIDEO_ID, Some(preferred.as_slice()), false, &no_wait_options(0))
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "hallo");
    assert_eq!(entries[1].start, 1.5);
}

#[tokio::test]
async fn test_getTranscript_withOnlyGeneratedTracks_shouldNotTranslate() {
    let generated_only = descriptor(
        vec![track(VIDEO_ID, "en", "English (auto-generated)", "en-asr", true)],
        &[("xx", "Unknown")],
    );
    let transport = ScriptedTransport::new()
        .on_get(watch_fragment(VIDEO_ID), ScriptedReply::ok(watch_page(&generated_only)));
    let api = scripted_api(&transport);
    let preferred = languages(&["xx"]);

    let err = api
        .get_transcript(VIDEO_ID, Some(preferred.as_slice()), false, &no_wait_options(0))
        .await
        .unwrap_err();

    match err {
        TranscriptError::NoTranscriptFound {
            requested_languages,
            catalog,
            ..
        } => {
            assert_eq!(requested_languages, vec!["xx"]);
            assert_eq!(catalog.language_codes(), vec!["en"]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(transport.request_count("timedtext"), 0);
}

#[tokio::test]
async fn test_getTranscript_withOnlyForeignManualTrack_shouldFallBackToFirstTrack() {
    let turkish_only = descriptor(vec![track(VIDEO_ID, "tr", "Türkçe", "tr-manual", false)], &[]);
    let transport = ScriptedTransport::new()
        .on_get(watch_fragment(VIDEO_ID), ScriptedReply::ok(watch_page(&turkish_only)))
        .on_get("name=tr-manual", ScriptedReply::ok(labelled_payload("merhaba")));
    let api = scripted_api(&transport);

    let entries = api
        .get_transcript(VIDEO_ID, None, false, &no_wait_options(0))
        .await
        .unwrap();

    assert_eq!(entries[0].text, "merhaba");
}

#[tokio::test]
async fn test_getTranscript_withTargetOnlyReachableByTranslation_shouldNotTranslate() {
    let transport = standard_transport();
    let (hook, events) = recording_hook();
    let api = scripted_api(&transport).with_fallback_hook(hook);
    let preferred = languages(&["fr"]);

    let err = api
        .get_transcript(VIDEO_ID, Some(preferred.as_slice()), false, &no_wait_options(0))
        .await
        .unwrap_err();

    match err {
        TranscriptError::NoTranscriptFound {
            requested_languages, ..
        } => assert_eq!(requested_languages, vec!["fr"]),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(transport.request_count("tlang="), 0);
    assert_eq!(transport.request_count("timedtext"), 0);
    assert!(events.lock().is_empty());
}

#[tokio::test]
async fn test_fetchTranslated_withTranslatableTarget_shouldRequestTranslatedPayload() {
    let transport = standard_transport();
    let api = scripted_api(&transport);
    let list = api.list_transcripts(VIDEO_ID, &no_wait_options(0)).await.unwrap();
    let source = list.catalog().find_manual(&["en"]).unwrap();

    let entries = api.fetch_translated(&list, source, "fr", false).await.unwrap().unwrap();

    assert_eq!(entries[0].text, "bonjour");
    let translated = transport
        .requests()
        .into_iter()
        .find(|r| r.url.contains("tlang=fr"))
        .unwrap();
    assert!(translated.url.contains("name=en-manual"));
}

#[tokio::test]
async fn test_fetchTranslated_withUnsupportedTarget_shouldReportFallback() {
    let transport = standard_transport();
    let (hook, events) = recording_hook();
    let api = scripted_api(&transport).with_fallback_hook(hook);
    let list = api.list_transcripts(VIDEO_ID, &no_wait_options(0)).await.unwrap();
    let source = list.catalog().find_manual(&["en"]).unwrap();

    let entries = api.fetch_translated(&list, source, "xx", false).await.unwrap();

    assert!(entries.is_none());
    let events = events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].video_id, VIDEO_ID);
    assert_eq!(events[0].source_language, "en");
    assert_eq!(events[0].target_language, "xx");
    assert_eq!(transport.request_count("tlang="), 0);
}

#[tokio::test]
async fn test_fetchTranslated_withFailingPayloadFetch_shouldReportFallback() {
    let transport = ScriptedTransport::new()
        .on_get(
            watch_fragment(VIDEO_ID),
            ScriptedReply::ok(watch_page(&standard_descriptor(VIDEO_ID))),
        )
        .on_get("tlang=es", ScriptedReply::status(500));
    let (hook, events) = recording_hook();
    let api = scripted_api(&transport).with_fallback_hook(hook);
    let list = api.list_transcripts(VIDEO_ID, &no_wait_options(0)).await.unwrap();
    let source = list.catalog().find_manual(&["de"]).unwrap();

    let entries = api.fetch_translated(&list, source, "es", false).await.unwrap();

    assert!(entries.is_none());
    assert_eq!(transport.request_count("tlang=es"), 1);
    assert_eq!(events.lock()[0].source_language, "de");
    assert!(events.lock()[0].reason.contains("500"));
}

#[tokio::test]
async fn test_listTranscripts_shouldExposeKindFilters() {
    let transport = standard_transport();
    let api = scripted_api(&transport);

    let list = api.list_transcripts(VIDEO_ID, &no_wait_options(0)).await.unwrap();

    assert_eq!(list.generated_languages(), vec!["en"]);
    assert_eq!(list.manually_created_languages(), vec!["en", "de"]);
    let manual = list.find_manually_created_transcript(&["en"]).unwrap();
    assert!(!manual.is_generated());
    assert!(list.find_generated_transcript(&["de"]).is_err());

    let entries = manual.fetch(false).await.unwrap();
    assert_eq!(entries[0].text, "manual english");
}

#[tokio::test]
async fn test_getTranscripts_withContinueOnFailure_shouldKeepInputOrder() {
    let transport = standard_transport()
        .on_get(watch_fragment(OTHER_VIDEO_ID), ScriptedReply::ok(captionless_page()));
    let api = scripted_api(&transport);
    let ids = vec![OTHER_VIDEO_ID.to_string(), VIDEO_ID.to_string()];

    let results = api
        .get_transcripts(&ids, None, false, &no_wait_options(0), true)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].video_id, OTHER_VIDEO_ID);
    assert!(!results[0].is_success());
    assert!(results[0].error.as_deref().unwrap().contains(OTHER_VIDEO_ID));
    assert_eq!(results[1].video_id, VIDEO_ID);
    assert!(results[1].is_success());
}

#[tokio::test]
async fn test_getTranscripts_withoutContinueOnFailure_shouldStopAtFirstError() {
    let transport = standard_transport()
        .on_get(watch_fragment(OTHER_VIDEO_ID), ScriptedReply::status(404));
    let api = scripted_api(&transport);
    let ids = vec![OTHER_VIDEO_ID.to_string(), VIDEO_ID.to_string()];

    let err = api
        .get_transcripts(&ids, None, false, &no_wait_options(0), false)
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptError::VideoUnavailable { .. }));
    assert_eq!(transport.request_count(&watch_fragment(VIDEO_ID)), 0);
}
