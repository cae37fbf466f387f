/*!
 * Tests for error types and conversions
 */

use transkript::catalog::{CaptionTrack, CaptionTrackCatalog};
use transkript::errors::{AppError, ChannelError, ErrorKind, TranscriptError, TransportError};

#[test]
fn test_rateLimited_shouldDisplayVideoAndBeTransient() {
    let error = TranscriptError::RateLimited {
        video_id: "abc".to_string(),
    };
    assert!(error.to_string().contains("abc"));
    assert!(error.to_string().contains("Too many requests"));
    assert!(error.is_transient());
    assert_eq!(error.video_id(), Some("abc"));
}

#[test]
fn test_videoUnavailable_withStatus_shouldDisplayStatus() {
    let error = TranscriptError::VideoUnavailable {
        video_id: "abc".to_string(),
        status: Some(404),
    };
    assert!(error.to_string().contains("HTTP 404"));
    assert!(!error.is_transient());

    let error = TranscriptError::VideoUnavailable {
        video_id: "abc".to_string(),
        status: None,
    };
    assert_eq!(error.to_string(), "Video abc is unavailable");
}

#[test]
fn test_noTranscriptFound_shouldCarryDiagnostics() {
    let catalog = CaptionTrackCatalog::from_tracks([CaptionTrack::new("tr", "Turkish", "https://t/tr", false)]);
    let error = TranscriptError::NoTranscriptFound {
        video_id: "abc".to_string(),
        requested_languages: vec!["xx".to_string()],
        catalog,
    };

    let display = error.to_string();
    assert!(display.contains("xx"));
    assert!(display.contains("tr (Turkish, manual)"));
    assert_eq!(error.kind(), ErrorKind::NoTranscriptFound);
}

#[test]
fn test_kind_shouldDistinguishEveryVariant() {
    let id = || "v".to_string();
    let kinds = [
        TranscriptError::RateLimited { video_id: id() }.kind(),
        TranscriptError::VideoUnavailable { video_id: id(), status: None }.kind(),
        TranscriptError::CatalogNotFound { video_id: id() }.kind(),
        TranscriptError::RetrievalFailure { video_id: id(), reason: "r".into() }.kind(),
        TranscriptError::TranslationUnavailable {
            video_id: id(),
            language_code: "fr".into(),
            reason: "r".into(),
        }
        .kind(),
        TranscriptError::Cancelled { video_id: id() }.kind(),
        TranscriptError::InvalidVideoId("x".into()).kind(),
    ];

    for (i, a) in kinds.iter().enumerate() {
        for b in kinds.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_transportError_shouldDisplayCause() {
    assert!(TransportError::Timeout("30s".into()).to_string().contains("timeout"));
    assert!(TransportError::Connection("refused".into()).to_string().contains("refused"));
}

#[test]
fn test_appError_fromLibraryErrors_shouldWrapCorrectly() {
    let app: AppError = TranscriptError::CatalogNotFound { video_id: "v".into() }.into();
    assert!(app.to_string().starts_with("Transcript error"));

    let app: AppError = ChannelError::from(TransportError::Request("boom".into())).into();
    assert!(app.to_string().contains("boom"));

    let app: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(app, AppError::File(_)));

    let app: AppError = anyhow::anyhow!("odd").into();
    assert!(matches!(app, AppError::Unknown(_)));
}
