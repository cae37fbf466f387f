/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;
use tempfile::TempDir;

use transkript::app_config::{Config, LogLevel, OutputFormat};
use transkript::RequestOptions;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.http.timeout_secs, 30);
    assert_eq!(config.http.watch_url_for("abc"), "https://www.youtube.com/watch?v=abc");
    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.retry.retry_delay_ms, 1000);
    assert_eq!(config.innertube.client_name, "WEB");
    assert_eq!(config.innertube.client_version, "2.20231201.01.00");
    assert!(config.languages.is_empty());
    assert_eq!(config.output.format, OutputFormat::Pretty);
    assert_eq!(config.output.max_chars_per_line, 80);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.http.timeout_secs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.http.watch_url = "https://www.youtube.com/watch".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.http.proxy = Some("not a url".to_string());
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.languages = vec!["en".to_string(), " ".to_string()];
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.output.max_chars_per_line = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.http.proxy = Some("http://proxy.local:8080".to_string());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_withPartialJson_shouldFillDefaults() {
    let config: Config = serde_json::from_str(
        r#"{"languages": ["de", "en"], "retry": {"max_retries": 5}, "output": {"format": "srt"}}"#,
    )
    .unwrap();

    assert_eq!(config.languages, vec!["de", "en"]);
    assert_eq!(config.retry.max_retries, 5);
    assert_eq!(config.retry.retry_delay_ms, 1000);
    assert_eq!(config.output.format, OutputFormat::Srt);
    assert!(config.output.show_timestamps);
}

#[test]
fn test_config_saveAndLoad_shouldPreserveValues() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.languages = vec!["tr".to_string()];
    config.http.cookies = Some("CONSENT=YES+1".to_string());
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.languages, vec!["tr"]);
    assert_eq!(loaded.http.cookies.as_deref(), Some("CONSENT=YES+1"));
}

#[test]
fn test_config_fromMissingFile_shouldFail() {
    let dir = TempDir::new().unwrap();
    assert!(Config::from_file(dir.path().join("missing.json")).is_err());
}

#[test]
fn test_requestOptions_fromConfig_shouldCarryRetryAndSession() {
    let mut config = Config::default();
    config.retry.max_retries = 1;
    config.retry.retry_delay_ms = 250;
    config.http.proxy = Some("socks5://127.0.0.1:9050".to_string());
    config.http.cookies = Some(String::new());

    let options = RequestOptions::from_config(&config);
    assert_eq!(options.retry.max_retries, 1);
    assert_eq!(options.retry.retry_delay, Duration::from_millis(250));
    assert_eq!(options.proxy.as_deref(), Some("socks5://127.0.0.1:9050"));
    assert!(options.cookies.is_none());
}

#[test]
fn test_outputFormat_fromStr_shouldAcceptAliases() {
    assert_eq!("TXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
    assert_eq!("vtt".parse::<OutputFormat>().unwrap().extension(), "vtt");
    assert_eq!(OutputFormat::Pretty.extension(), "txt");
    assert!("docx".parse::<OutputFormat>().is_err());
}
