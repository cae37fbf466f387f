/*!
 * Caption entry rendering.
 *
 * Turns fetched caption entries into the output formats the command line
 * writes: pretty text, JSON, plain text, SRT and WebVTT.
 */

use anyhow::{Context, Result};

use crate::app_config::{OutputConfig, OutputFormat};
use crate::transcript::CaptionEntry;

/// Renders a list of caption entries
pub trait Formatter: Send + Sync {
    fn format_transcript(&self, entries: &[CaptionEntry]) -> Result<String>;
}

/// Formatter for the configured output format
pub fn formatter_for(config: &OutputConfig) -> Box<dyn Formatter> {
    match config.format {
        OutputFormat::Pretty => Box::new(PrettyFormatter {
            show_timestamps: config.show_timestamps,
            max_chars_per_line: config.max_chars_per_line,
        }),
        OutputFormat::Json => Box::new(JsonFormatter { pretty: true }),
        OutputFormat::Text => Box::new(TextFormatter {
            separator: config.text_separator.clone(),
        }),
        OutputFormat::Srt => Box::new(SrtFormatter),
        OutputFormat::Vtt => Box::new(VttFormatter),
    }
}

fn to_millis(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}

/// Format a timestamp as `HH:MM:SS<sep>mmm`
pub fn format_timestamp(ms: u64, millis_separator: char) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours, minutes, seconds, millis_separator, millis
    )
}

/// Short `MM:SS`, or `H:MM:SS` past the first hour
pub fn format_short_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Human readable output with optional timestamps and word wrapping
#[derive(Debug, Clone)]
pub struct PrettyFormatter {
    pub show_timestamps: bool,
    pub max_chars_per_line: usize,
}

impl PrettyFormatter {
    fn wrap(&self, text: &str, width: usize) -> Vec<String> {
        let width = width.max(1);
        let mut lines = Vec::new();
        let mut line = String::new();

        for word in text.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }

        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }
}

impl Formatter for PrettyFormatter {
    fn format_transcript(&self, entries: &[CaptionEntry]) -> Result<String> {
        let mut out = Vec::with_capacity(entries.len());

        for entry in entries {
            let prefix = if self.show_timestamps {
                format!("[{}] ", format_short_timestamp(entry.start))
            } else {
                String::new()
            };
            let indent = " ".repeat(prefix.chars().count());
            let width = self.max_chars_per_line.saturating_sub(prefix.chars().count());

            for (i, line) in self.wrap(&entry.text, width).into_iter().enumerate() {
                let lead = if i == 0 { &prefix } else { &indent };
                out.push(format!("{}{}", lead, line));
            }
        }

        Ok(out.join("\n"))
    }
}

/// JSON array of entries
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl Formatter for JsonFormatter {
    fn format_transcript(&self, entries: &[CaptionEntry]) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(entries)
        } else {
            serde_json::to_string(entries)
        };
        json.context("Failed to serialize transcript to JSON")
    }
}

/// Entry texts only
#[derive(Debug, Clone)]
pub struct TextFormatter {
    pub separator: String,
}

impl Formatter for TextFormatter {
    fn format_transcript(&self, entries: &[CaptionEntry]) -> Result<String> {
        Ok(entries
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator))
    }
}

/// SubRip cues
#[derive(Debug, Clone, Copy)]
pub struct SrtFormatter;

impl Formatter for SrtFormatter {
    fn format_transcript(&self, entries: &[CaptionEntry]) -> Result<String> {
        let cues: Vec<String> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                format!(
                    "{}\n{} --> {}\n{}\n",
                    i + 1,
                    format_timestamp(to_millis(e.start), ','),
                    format_timestamp(to_millis(e.end()), ','),
                    e.text
                )
            })
            .collect();
        Ok(cues.join("\n"))
    }
}

/// WebVTT document
#[derive(Debug, Clone, Copy)]
pub struct VttFormatter;

impl Formatter for VttFormatter {
    fn format_transcript(&self, entries: &[CaptionEntry]) -> Result<String> {
        let mut out = String::from("WEBVTT\n");
        for e in entries {
            out.push_str(&format!(
                "\n{} --> {}\n{}\n",
                format_timestamp(to_millis(e.start), '.'),
                format_timestamp(to_millis(e.end()), '.'),
                e.text
            ));
        }
        Ok(out)
    }
}
