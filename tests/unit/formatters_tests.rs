/*!
 * Tests for transcript output formatters
 */

use transkript::app_config::{OutputConfig, OutputFormat};
use transkript::formatters::{
    Formatter, JsonFormatter, PrettyFormatter, SrtFormatter, TextFormatter, VttFormatter, formatter_for,
};
use transkript::transcript::CaptionEntry;

fn entries() -> Vec<CaptionEntry> {
    vec![
        CaptionEntry::new("Hello there", 1.0, 2.5),
        CaptionEntry::new("General Kenobi", 3661.2, 1.0),
    ]
}

#[test]
fn test_srtFormatter_withEntries_shouldNumberCues() {
    let srt = SrtFormatter.format_transcript(&entries()).unwrap();
    let expected = "1\n00:00:01,000 --> 00:00:03,500\nHello there\n\n2\n01:01:01,200 --> 01:01:02,200\nGeneral Kenobi\n";
    assert_eq!(srt, expected);
}

#[test]
fn test_vttFormatter_withEntries_shouldStartWithHeader() {
    let vtt = VttFormatter.format_transcript(&entries()).unwrap();
    assert!(vtt.starts_with("WEBVTT\n"));
    assert!(vtt.contains("00:00:01.000 --> 00:00:03.500\nHello there"));
}

#[test]
fn test_textFormatter_withSeparator_shouldJoinTexts() {
    let formatter = TextFormatter {
        separator: " | ".to_string(),
    };
    assert_eq!(
        formatter.format_transcript(&entries()).unwrap(),
        "Hello there | General Kenobi"
    );
}

#[test]
fn test_jsonFormatter_shouldUseEntryFieldNames() {
    let json = JsonFormatter { pretty: false }.format_transcript(&entries()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["text"], "Hello there");
    assert_eq!(parsed[0]["start"], 1.0);
    assert_eq!(parsed[0]["duration"], 2.5);
    assert_eq!(parsed.as_array().unwrap().len(), 2);
}

#[test]
fn test_prettyFormatter_withLongText_shouldWrapAndIndent() {
    let formatter = PrettyFormatter {
        show_timestamps: true,
        max_chars_per_line: 20,
    };
    let entries = vec![CaptionEntry::new("one two three four five six", 65.0, 1.0)];
    let pretty = formatter.format_transcript(&entries).unwrap();
    let lines: Vec<&str> = pretty.lines().collect();

    assert_eq!(lines[0], "[01:05] one two");
    assert!(lines[1].starts_with("        "));
    assert!(lines.iter().all(|l| l.chars().count() <= 20));
}

#[test]
fn test_prettyFormatter_withoutTimestamps_shouldPrintTextOnly() {
    let formatter = PrettyFormatter {
        show_timestamps: false,
        max_chars_per_line: 80,
    };
    assert_eq!(
        formatter.format_transcript(&entries()).unwrap(),
        "Hello there\nGeneral Kenobi"
    );
}

#[test]
fn test_formatterFor_shouldFollowConfiguredFormat() {
    let config = OutputConfig {
        format: OutputFormat::Srt,
        ..OutputConfig::default()
    };
    let srt = formatter_for(&config).format_transcript(&entries()).unwrap();
    assert!(srt.starts_with("1\n00:00:01,000"));

    let config = OutputConfig {
        format: OutputFormat::Text,
        ..OutputConfig::default()
    };
    assert_eq!(
        formatter_for(&config).format_transcript(&entries()).unwrap(),
        "Hello there General Kenobi"
    );
}
