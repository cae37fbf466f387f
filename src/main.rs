// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use transkript::app_config::{self, Config, OutputFormat};
use transkript::channel::{self, ChannelScraper};
use transkript::formatters::formatter_for;
use transkript::language_utils;
use transkript::transport::HttpConnector;
use transkript::{
    CancellationToken, RequestOptions, TranscriptApi, TranscriptList, extract_video_id,
};

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Pretty,
    Json,
    Text,
    Srt,
    Vtt,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Pretty => OutputFormat::Pretty,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Srt => OutputFormat::Srt,
            CliOutputFormat::Vtt => OutputFormat::Vtt,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for transkript
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Transkript - extract transcripts from online videos
#[derive(Parser, Debug)]
#[command(name = "transkript")]
#[command(version)]
#[command(about = "Extract transcripts from YouTube videos")]
#[command(long_about = "Transkript finds the caption tracks of a video and prints or saves its transcript.

EXAMPLES:
    transkript dQw4w9WgXcQ
    transkript \"https://www.youtube.com/watch?v=dQw4w9WgXcQ\"
    transkript dQw4w9WgXcQ --languages en es fr
    transkript dQw4w9WgXcQ --format srt --output transcript.srt
    transkript dQw4w9WgXcQ --list-transcripts
    transkript --username @somechannel --count 50
    transkript completions bash > transkript.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// YouTube video URL or video ID
    #[arg(value_name = "VIDEO", conflicts_with = "username")]
    video: Option<String>,

    /// Channel username (with or without @) to download transcripts from its latest videos
    #[arg(short, long)]
    username: Option<String>,

    /// Number of latest videos to download transcripts from
    #[arg(short = 'n', long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=100))]
    count: u32,

    /// Language codes in order of preference (e.g. en es fr)
    #[arg(short, long, num_args = 1..)]
    languages: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List available transcripts for the video
    #[arg(long, conflicts_with = "username")]
    list_transcripts: bool,

    /// Only use auto-generated transcripts
    #[arg(long, conflicts_with = "manual_only")]
    generated_only: bool,

    /// Only use manually created transcripts
    #[arg(long)]
    manual_only: bool,

    /// Exclude auto-generated transcripts
    #[arg(long, conflicts_with = "exclude_manual")]
    exclude_generated: bool,

    /// Exclude manually created transcripts
    #[arg(long)]
    exclude_manual: bool,

    /// Keep basic HTML formatting in transcript text
    #[arg(long)]
    preserve_formatting: bool,

    /// Proxy URL (e.g. http://proxy:8080)
    #[arg(long, env = "TRANSKRIPT_PROXY")]
    proxy: Option<String>,

    /// Cookie string forwarded with every request
    #[arg(long)]
    cookies: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and emoji for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let (colour, emoji) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "transkript", &mut std::io::stdout());
        return;
    }

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

// Load the config file, creating a default one when missing, then apply CLI overrides
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = Path::new(&options.config);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(format) = options.format {
        config.output.format = format.into();
    }
    if !options.languages.is_empty() {
        config.languages = options.languages.clone();
    }
    if options.preserve_formatting {
        config.output.preserve_formatting = true;
    }
    if options.proxy.is_some() {
        config.http.proxy = options.proxy.clone();
    }
    if options.cookies.is_some() {
        config.http.cookies = options.cookies.clone();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run(options: CommandLineOptions) -> Result<()> {
    if options.video.is_none() && options.username.is_none() {
        return Err(anyhow!("Must specify either a video or --username"));
    }

    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted by user");
            interrupt.cancel();
        }
    });

    let api = TranscriptApi::new(&config).with_cancellation(token);
    let request = RequestOptions::from_config(&config);

    match (&options.username, &options.video) {
        (Some(username), _) => download_channel_transcripts(&api, &config, &request, username, options.count).await,
        (None, Some(video)) => {
            let video_id = extract_video_id(video)?;
            if options.list_transcripts {
                let list = api.list_transcripts(&video_id, &request).await?;
                print_transcript_list(&list);
                Ok(())
            } else {
                single_video(&api, &config, &request, &options, &video_id).await
            }
        }
        (None, None) => Err(anyhow!("Must specify either a video or --username")),
    }
}

fn print_transcript_list(list: &TranscriptList) {
    println!("Available transcripts for video {}:", list.video_id());
    println!("{}", "-".repeat(50));

    for track in list.catalog().iter() {
        let mut flags = vec![if track.is_generated { "AUTO-GENERATED" } else { "MANUAL" }];
        if track.is_translatable {
            flags.push("TRANSLATABLE");
        }
        println!(
            "  {}: {} [{}]",
            track.language_code,
            track.language_name,
            flags.join(", ")
        );
        if track.is_translatable {
            println!(
                "    Translation languages: {} available",
                track.translation_targets.len()
            );
        }
    }
}

fn has_kind_filter(options: &CommandLineOptions) -> bool {
    options.generated_only || options.manual_only || options.exclude_generated || options.exclude_manual
}

async fn single_video(
    api: &TranscriptApi,
    config: &Config,
    request: &RequestOptions,
    options: &CommandLineOptions,
    video_id: &str,
) -> Result<()> {
    let preserve = config.output.preserve_formatting;
    let languages = (!config.languages.is_empty()).then_some(config.languages.as_slice());

    let entries = if has_kind_filter(options) {
        let list = api.list_transcripts(video_id, request).await?;
        let fallback = vec!["en".to_string()];
        let codes = languages.unwrap_or(fallback.as_slice());

        let transcript = if options.generated_only {
            list.find_generated_transcript(codes)?
        } else if options.manual_only {
            list.find_manually_created_transcript(codes)?
        } else {
            list.transcripts()
                .into_iter()
                .find(|t| !(options.exclude_generated && t.is_generated()) && !(options.exclude_manual && !t.is_generated()))
                .ok_or_else(|| anyhow!("No transcripts available after applying filters"))?
        };

        info!(
            "Using transcript {} ({})",
            transcript,
            language_utils::display_name(transcript.language_code())
        );
        transcript.fetch(preserve).await?
    } else {
        api.get_transcript(video_id, languages, preserve, request).await?
    };

    let formatted = formatter_for(&config.output).format_transcript(&entries)?;

    match &options.output {
        Some(path) => {
            std::fs::write(path, formatted)
                .with_context(|| format!("Failed to write transcript to {}", path.display()))?;
            info!("Transcript saved to {}", path.display());
        }
        None => println!("{}", formatted),
    }

    Ok(())
}

async fn download_channel_transcripts(
    api: &TranscriptApi,
    config: &Config,
    request: &RequestOptions,
    username: &str,
    count: u32,
) -> Result<()> {
    info!("Bulk downloading transcripts for {} (latest {} videos)", username, count);

    let session = config
        .http
        .session_options(request.proxy.clone(), request.cookies.clone());
    let scraper = ChannelScraper::new(Arc::new(HttpConnector), session);
    let video_ids = scraper
        .latest_video_ids(username, count as usize)
        .await
        .context("Failed to get video list")?;

    let output_dir = PathBuf::from(channel::output_dir_name(username));
    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create directory {}", output_dir.display()))?;
        info!("Created directory: {}", output_dir.display());
    }

    let languages = (!config.languages.is_empty()).then_some(config.languages.as_slice());
    info!("Fetching transcripts for {} videos", video_ids.len());
    let results = api
        .get_transcripts(&video_ids, languages, config.output.preserve_formatting, request, true)
        .await?;

    let progress_bar = ProgressBar::new(results.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} videos ({percent}%) {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}/{len} {msg}"))
        .context("Invalid progress bar template")?
        .progress_chars("█▓▒░");
    progress_bar.set_style(style);

    let formatter = formatter_for(&config.output);
    let extension = config.output.format.extension();
    let mut successful = 0usize;
    let mut failed: Vec<(String, String)> = Vec::new();

    for (i, result) in results.iter().enumerate() {
        progress_bar.set_message(result.video_id.clone());

        match (&result.entries, &result.error) {
            (Some(entries), _) => {
                let path = output_dir.join(format!("{}.{}", i + 1, extension));
                let written = formatter.format_transcript(entries).and_then(|text| {
                    std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))
                });
                match written {
                    Ok(()) => {
                        debug!("Saved {}", path.display());
                        successful += 1;
                    }
                    Err(e) => failed.push((result.video_id.clone(), format!("{:#}", e))),
                }
            }
            (None, error) => failed.push((
                result.video_id.clone(),
                error.clone().unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
        progress_bar.inc(1);
    }

    progress_bar.finish_with_message("done");

    info!("Download completed!");
    info!("Successfully downloaded: {}", successful);
    info!("Failed downloads: {}", failed.len());
    for (video_id, reason) in &failed {
        warn!("  {}: {}", video_id, reason);
    }
    info!("Transcripts saved in directory: {}", output_dir.display());

    Ok(())
}
