use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use std::time::Duration;

use crate::resolver::RetryPolicy;
use crate::transport::SessionOptions;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// HTTP session settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry settings for the watch page
    #[serde(default)]
    pub retry: RetryConfig,

    /// Internal player API client identity
    #[serde(default)]
    pub innertube: InnertubeConfig,

    /// Preferred language codes, most preferred first
    #[serde(default)]
    pub languages: Vec<String>,

    /// Output rendering
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// HTTP session configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpConfig {
    // @field: Browser-like user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // @field: Accept-Language header
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    // @field: Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Watch page URL template, `{video_id}` is substituted
    #[serde(default = "default_watch_url")]
    pub watch_url: String,

    // @field: Proxy URL
    #[serde(default)]
    pub proxy: Option<String>,

    // @field: Raw cookie string
    #[serde(default)]
    pub cookies: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_secs: default_timeout_secs(),
            watch_url: default_watch_url(),
            proxy: None,
            cookies: None,
        }
    }
}

impl HttpConfig {
    /// Watch page URL for a video
    pub fn watch_url_for(&self, video_id: &str) -> String {
        self.watch_url.replace("{video_id}", video_id)
    }

    /// Session options with the given proxy and cookies
    pub fn session_options(&self, proxy: Option<String>, cookies: Option<String>) -> SessionOptions {
        SessionOptions {
            user_agent: self.user_agent.clone(),
            accept_language: self.accept_language.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            proxy,
            cookies,
        }
    }
}

/// Retry configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between attempts in milliseconds, doubled on HTTP 429
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }
}

/// Internal player API configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InnertubeConfig {
    /// Player endpoint, the API key is added as `key` query parameter
    #[serde(default = "default_innertube_endpoint")]
    pub endpoint: String,

    /// Client name sent in the request context
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Client version sent in the request context
    #[serde(default = "default_client_version")]
    pub client_version: String,
}

impl Default for InnertubeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_innertube_endpoint(),
            client_name: default_client_name(),
            client_version: default_client_version(),
        }
    }
}

/// Output format of a rendered transcript
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Text,
    Srt,
    Vtt,
}

impl OutputFormat {
    /// File extension used when writing this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pretty | Self::Text => "txt",
            Self::Json => "json",
            Self::Srt => "srt",
            Self::Vtt => "vtt",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Text => "text",
            Self::Srt => "srt",
            Self::Vtt => "vtt",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Output rendering configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Prefix pretty output lines with their timestamp
    #[serde(default = "default_true")]
    pub show_timestamps: bool,

    /// Wrap width of pretty output
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    /// Separator between entries in text output
    #[serde(default = "default_text_separator")]
    pub text_separator: String,

    /// Keep basic inline formatting tags in caption text
    #[serde(default)]
    pub preserve_formatting: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            show_timestamps: true,
            max_chars_per_line: default_max_chars_per_line(),
            text_separator: default_text_separator(),
            preserve_formatting: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

pub fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

pub fn default_accept_language() -> String {
    "en-US,en;q=0.5".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_watch_url() -> String {
    "https://www.youtube.com/watch?v={video_id}".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000 // doubled on each rate-limited retry
}

fn default_innertube_endpoint() -> String {
    "https://www.youtube.com/youtubei/v1/player".to_string()
}

fn default_client_name() -> String {
    "WEB".to_string()
}

fn default_client_version() -> String {
    "2.20231201.01.00".to_string()
}

fn default_max_chars_per_line() -> usize {
    80
}

fn default_text_separator() -> String {
    " ".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(anyhow!("HTTP timeout must be at least one second"));
        }

        if !self.http.watch_url.contains("{video_id}") {
            return Err(anyhow!(
                "Watch URL template must contain {{video_id}}: {}",
                self.http.watch_url
            ));
        }

        if let Some(proxy) = self.http.proxy.as_deref().filter(|p| !p.is_empty()) {
            url::Url::parse(proxy).with_context(|| format!("Invalid proxy URL: {}", proxy))?;
        }

        url::Url::parse(&self.innertube.endpoint)
            .with_context(|| format!("Invalid player endpoint: {}", self.innertube.endpoint))?;

        if let Some(blank) = self.languages.iter().position(|l| l.trim().is_empty()) {
            return Err(anyhow!("Language code at position {} is empty", blank));
        }

        if self.output.max_chars_per_line == 0 {
            return Err(anyhow!("max_chars_per_line must be greater than zero"));
        }

        Ok(())
    }
}
