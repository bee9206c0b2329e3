// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{anyhow, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;

use readaloud::app_config::{self, Config};
use readaloud::app_controller::Controller;

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
    /// Read a document aloud (default command)
    Read(ReadArgs),

    /// List the voices offered by the speech service
    Voices {
        /// Locale prefix in BCP-47 format (e.g. 'en' or 'en-US'); all locales when omitted
        #[arg(value_name = "LOCALE")]
        locale: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate shell completions for readaloud
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that loads the configuration
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "readaloud.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Speech service subscription key
    #[arg(long, env = "SPEECH_KEY", hide_env_values = true)]
    speech_key: Option<String>,

    /// Speech service region (e.g. 'westeurope')
    #[arg(long, env = "SPEECH_REGION")]
    speech_region: Option<String>,
}

#[derive(Args, Debug)]
struct ReadArgs {
    /// EPUB file, HTML file or http(s) URL to read
    #[arg(value_name = "SOURCE")]
    source: String,

    /// Number of content nodes per spoken segment
    #[arg(short, long)]
    num_tokens: Option<usize>,

    /// Index of the EPUB page to read
    #[arg(short, long)]
    item_page: Option<usize>,

    /// Index of the first segment to speak
    #[arg(short, long)]
    start_index: Option<usize>,

    /// Index of the first content node to segment
    #[arg(long)]
    start_sub_offset: Option<usize>,

    /// Voice name (e.g. 'en-US-AriaNeural')
    #[arg(long)]
    voice: Option<String>,

    /// Prosody rate (e.g. '+20.00%')
    #[arg(long, allow_hyphen_values = true)]
    rate: Option<String>,

    /// Print the segment table and exit without speaking
    #[arg(long)]
    list_segments: bool,

    #[command(flatten)]
    common: CommonArgs,
}

/// readaloud - listen to books and articles
///
/// Reads EPUB pages, HTML files and web articles aloud through Azure Speech,
/// with keyboard control while audio plays.
#[derive(Parser, Debug)]
#[command(name = "readaloud")]
#[command(version)]
#[command(about = "Read EPUB and HTML documents aloud")]
#[command(long_about = "readaloud splits a document into speech segments and reads them aloud.

EXAMPLES:
    readaloud book.epub --item-page 3            # Read the fourth page of a book
    readaloud article.html -n 4                  # Four paragraphs per segment
    readaloud https://example.com/post           # Read the article of a web page
    readaloud book.epub --start-sub-offset 120   # Resume at content node 120
    readaloud book.epub --list-segments          # Show segments without speaking
    readaloud voices en-US                       # List English (US) voices
    readaloud completions bash > readaloud.bash  # Generate bash completions

KEYS WHILE PLAYING:
    space  skip to the next segment
    b      go back one segment
    r      restart the current segment
    p      pause / resume
    q      quit

CONFIGURATION:
    Configuration is stored in readaloud.json by default. If the file doesn't
    exist, a default one is created. SPEECH_KEY and SPEECH_REGION override the
    speech credentials.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// EPUB file, HTML file or http(s) URL to read
    #[arg(value_name = "SOURCE")]
    source: Option<String>,

    /// Number of content nodes per spoken segment
    #[arg(short, long)]
    num_tokens: Option<usize>,

    /// Index of the EPUB page to read
    #[arg(short, long)]
    item_page: Option<usize>,

    /// Index of the first segment to speak
    #[arg(short, long)]
    start_index: Option<usize>,

    /// Index of the first content node to segment
    #[arg(long)]
    start_sub_offset: Option<usize>,

    /// Voice name (e.g. 'en-US-AriaNeural')
    #[arg(long)]
    voice: Option<String>,

    /// Prosody rate (e.g. '+20.00%')
    #[arg(long, allow_hyphen_values = true)]
    rate: Option<String>,

    /// Print the segment table and exit without speaking
    #[arg(long)]
    list_segments: bool,

    #[command(flatten)]
    common: CommonArgs,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration_for_level(record.level());

            // Raw mode disables output post-processing, so bare newlines
            // would not return the carriage
            let raw_mode = crossterm::terminal::is_raw_mode_enabled().unwrap_or(false);
            let message = record.args().to_string();
            let message = if raw_mode { message.replace('\n', "\r\n") } else { message };
            let line_end = if raw_mode { "\r\n" } else { "\n" };

            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\x1B[{}m{} {} {}\x1B[0m{}", color, now, emoji, message, line_end);
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "readaloud", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Voices { locale, common }) => run_voices(locale, common).await,
        Some(Commands::Read(args)) => run_read(args).await,
        None => {
            // Default behavior - top-level args read a document
            let source = cli.source.ok_or_else(|| {
                anyhow!("SOURCE is required when no subcommand is specified")
            })?;

            let read_args = ReadArgs {
                source,
                num_tokens: cli.num_tokens,
                item_page: cli.item_page,
                start_index: cli.start_index,
                start_sub_offset: cli.start_sub_offset,
                voice: cli.voice,
                rate: cli.rate,
                list_segments: cli.list_segments,
                common: cli.common,
            };
            run_read(read_args).await
        }
    }
}

/// Load the configuration and apply the options every command shares
fn load_config(common: &CommonArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &common.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&common.config_path)?;

    if let Some(key) = &common.speech_key {
        config.speech.subscription_key = key.clone();
    }

    if let Some(region) = &common.speech_region {
        config.speech.region = region.clone();
    }

    // Update log level in config if specified via command line
    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

async fn run_read(options: ReadArgs) -> Result<()> {
    let mut config = load_config(&options.common)?;

    // Override config with CLI options if provided
    if let Some(num_tokens) = options.num_tokens {
        config.reading.token_budget = num_tokens;
    }
    if let Some(item_page) = options.item_page {
        config.reading.item_page = item_page;
    }
    if let Some(start_index) = options.start_index {
        config.reading.start_index = start_index;
    }
    if let Some(start_sub_offset) = options.start_sub_offset {
        config.reading.start_sub_offset = start_sub_offset;
    }
    if let Some(voice) = &options.voice {
        config.speech.voice_name = voice.clone();
    }
    if let Some(rate) = &options.rate {
        config.reading.prosody_rate = rate.clone();
    }

    let controller = Controller::with_config(config)?;

    if options.list_segments {
        let segments = controller.list_segments(&options.source).await?;
        for (index, segment) in segments.iter().enumerate() {
            println!(
                "{}\t{}\t{}..{}\t{}",
                index,
                segment.token_count,
                segment.start_offset,
                segment.end_offset,
                segment.text.lines().next().unwrap_or_default()
            );
        }
        return Ok(());
    }

    let summary = controller.run(&options.source).await?;
    info!(
        "Finished: {} segment(s) spoken, {} failed",
        summary.segments_spoken, summary.failed_segments
    );

    Ok(())
}

async fn run_voices(locale: Option<String>, common: CommonArgs) -> Result<()> {
    let config = load_config(&common)?;
    let controller = Controller::with_config(config)?;

    let voices = controller.list_voices(locale.as_deref()).await?;
    info!("Voices successfully retrieved, they are:");
    for voice in voices {
        if voice.style_list.is_empty() {
            println!("{}\t{}\t{}", voice.short_name, voice.locale, voice.gender);
        } else {
            println!(
                "{}\t{}\t{}\t{}",
                voice.short_name,
                voice.locale,
                voice.gender,
                voice.style_list.join(",")
            );
        }
    }

    Ok(())
}
