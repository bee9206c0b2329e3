use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use log::warn;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Speech engine settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Segmentation and playback settings
    #[serde(default)]
    pub reading: ReadingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Azure speech service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    // @field: Service region, e.g. "westeurope"
    #[serde(default = "String::new")]
    pub region: String,

    // @field: Subscription key
    #[serde(default = "String::new")]
    pub subscription_key: String,

    // @field: Service URL override, empty means derived from region
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Voice used in every segment's `<voice>` element
    #[serde(default = "default_voice_name")]
    pub voice_name: String,

    /// Value of the document's `xml:lang` attribute
    #[serde(default = "default_language")]
    pub language: String,

    /// Style passed to `mstts:express-as`
    #[serde(default = "default_speaking_style")]
    pub speaking_style: String,

    /// Audio format requested from the service. Must be decodable by the
    /// local audio output (RIFF/WAV or MP3).
    #[serde(default = "default_output_format")]
    pub output_format: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            subscription_key: String::new(),
            endpoint: String::new(),
            voice_name: default_voice_name(),
            language: default_language(),
            speaking_style: default_speaking_style(),
            output_format: default_output_format(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SpeechConfig {
    /// Base URL of the speech service
    pub fn get_endpoint(&self) -> String {
        if !self.endpoint.is_empty() {
            return self.endpoint.trim_end_matches('/').to_string();
        }
        format!("https://{}.tts.speech.microsoft.com", self.region)
    }
}

/// Segmentation and playback settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReadingConfig {
    /// Maximum number of content nodes per segment
    #[serde(default = "default_token_budget")]
    pub token_budget: usize,

    /// Prosody rate applied to every node, e.g. "+20.00%"
    #[serde(default = "default_prosody_rate")]
    pub prosody_rate: String,

    /// Index of the first segment to speak
    #[serde(default)]
    pub start_index: usize,

    /// Index of the first content node to segment
    #[serde(default)]
    pub start_sub_offset: usize,

    /// Spine page of an EPUB to read
    #[serde(default)]
    pub item_page: usize,

    /// Keyboard and audio poll interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            token_budget: default_token_budget(),
            prosody_rate: default_prosody_rate(),
            start_index: 0,
            start_sub_offset: 0,
            item_page: 0,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ReadingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
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
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_voice_name() -> String {
    "en-US-AriaNeural".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_speaking_style() -> String {
    "narration-professional".to_string()
}

fn default_output_format() -> String {
    "riff-24khz-16bit-mono-pcm".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_token_budget() -> usize {
    1
}

fn default_prosody_rate() -> String {
    "+20.00%".to_string()
}

fn default_poll_interval_ms() -> u64 {
    50
}

/// Checks an SSML relative rate such as "+20.00%" or "-5%"
fn is_valid_prosody_rate(rate: &str) -> bool {
    let Some(number) = rate.strip_suffix('%') else {
        return false;
    };
    let number = number.strip_prefix(['+', '-']).unwrap_or(number);
    !number.is_empty() && number.parse::<f32>().is_ok_and(|value| value.is_finite())
}

impl Config {
    /// Load the configuration from `path`, writing a default one if the file
    /// does not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", path))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.reading.token_budget == 0 {
            return Err(anyhow!("token_budget must be at least 1"));
        }

        if self.reading.poll_interval_ms == 0 {
            return Err(anyhow!("poll_interval_ms must be at least 1"));
        }

        if !is_valid_prosody_rate(&self.reading.prosody_rate) {
            return Err(anyhow!(
                "Invalid prosody rate '{}', expected a percentage such as +20.00%",
                self.reading.prosody_rate
            ));
        }

        if self.speech.voice_name.trim().is_empty() {
            return Err(anyhow!("voice_name must not be empty"));
        }

        Ok(())
    }

    /// Validate the settings needed to reach the speech service
    pub fn validate_speech(&self) -> Result<()> {
        if self.speech.subscription_key.is_empty() {
            return Err(anyhow!("Speech subscription key is required (set SPEECH_KEY)"));
        }

        if self.speech.region.is_empty() && self.speech.endpoint.is_empty() {
            return Err(anyhow!("Speech region is required (set SPEECH_REGION)"));
        }

        Ok(())
    }
}
