use std::fmt;
use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error};
use reqwest::Client;
use rodio::{Decoder, OutputStream, Sink};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::app_config::SpeechConfig;
use crate::errors::SynthesisError;

use super::{SynthesisOutcome, Synthesizer};

/// Azure Speech client that plays synthesized audio on the default output device
pub struct AzureSynthesizer {
    /// HTTP client for API requests
    client: Client,
    /// Service base URL
    endpoint: String,
    /// Subscription key for authentication
    subscription_key: String,
    /// Value of the X-Microsoft-OutputFormat header
    output_format: String,
    /// How often the audio worker checks for cancellation
    poll_interval: Duration,
}

/// Voice entry returned by the voices list endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceInfo {
    /// Name to use in SSML, e.g. "en-US-AriaNeural"
    pub short_name: String,
    #[serde(default)]
    pub local_name: String,
    #[serde(default)]
    pub gender: String,
    pub locale: String,
    #[serde(default)]
    pub style_list: Vec<String>,
}

impl fmt::Debug for AzureSynthesizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureSynthesizer")
            .field("endpoint", &self.endpoint)
            .field("output_format", &self.output_format)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl AzureSynthesizer {
    /// Create a new Azure client
    pub fn new(speech: &SpeechConfig, poll_interval: Duration) -> Result<Self, SynthesisError> {
        if speech.subscription_key.is_empty() {
            return Err(SynthesisError::Configuration("subscription key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(speech.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: speech.get_endpoint(),
            subscription_key: speech.subscription_key.clone(),
            output_format: speech.output_format.clone(),
            poll_interval,
        })
    }

    /// Request the audio for an SSML document
    pub async fn fetch_audio(&self, markup: &str) -> Result<Bytes, SynthesisError> {
        let api_url = format!("{}/cognitiveservices/v1", self.endpoint);

        let response = self.client.post(&api_url)
            .header("Content-Type", "application/ssml+xml")
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header("X-Microsoft-OutputFormat", &self.output_format)
            .header("User-Agent", "readaloud")
            .body(markup.to_string())
            .send()
            .await
            .map_err(|e| SynthesisError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Azure Speech API error ({}): {}", status, error_text);
            return Err(SynthesisError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let audio = response.bytes().await
            .map_err(|e| SynthesisError::RequestFailed(e.to_string()))?;
        debug!("Received {} bytes of audio", audio.len());

        Ok(audio)
    }

    /// List the voices offered by the service, optionally restricted to
    /// locales starting with `locale` (e.g. "en" or "en-US")
    pub async fn list_voices(&self, locale: Option<&str>) -> Result<Vec<VoiceInfo>, SynthesisError> {
        let api_url = format!("{}/cognitiveservices/voices/list", self.endpoint);

        let response = self.client.get(&api_url)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .send()
            .await
            .map_err(|e| SynthesisError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(SynthesisError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let voices = response.json::<Vec<VoiceInfo>>().await
            .map_err(|e| SynthesisError::RequestFailed(format!("Failed to parse voice list: {}", e)))?;

        Ok(filter_voices(voices, locale))
    }
}

fn filter_voices(voices: Vec<VoiceInfo>, locale: Option<&str>) -> Vec<VoiceInfo> {
    match locale.map(str::trim).filter(|l| !l.is_empty()) {
        Some(locale) => {
            let locale = locale.to_lowercase();
            voices
                .into_iter()
                .filter(|voice| voice.locale.to_lowercase().starts_with(&locale))
                .collect()
        }
        None => voices,
    }
}

/// Play `audio` to completion on the calling thread. Returns `false` when
/// playback was stopped by `cancel`.
fn play_audio(audio: Bytes, cancel: &CancellationToken, poll_interval: Duration) -> Result<bool, SynthesisError> {
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| SynthesisError::AudioOutput(format!("Failed to open default device: {}", e)))?;
    let sink = Sink::try_new(&stream_handle)
        .map_err(|e| SynthesisError::AudioOutput(format!("Failed to create sink: {}", e)))?;
    let source = Decoder::new(Cursor::new(audio))
        .map_err(|e| SynthesisError::AudioOutput(format!("Failed to decode audio: {}", e)))?;

    sink.append(source);
    while !sink.empty() {
        if cancel.is_cancelled() {
            sink.stop();
            return Ok(false);
        }
        std::thread::sleep(poll_interval);
    }

    Ok(true)
}

#[async_trait]
impl Synthesizer for AzureSynthesizer {
    async fn synthesize(&self, markup: &str, cancel: CancellationToken) -> SynthesisOutcome {
        let audio = tokio::select! {
            biased;
            _ = cancel.cancelled() => return SynthesisOutcome::Canceled,
            result = self.fetch_audio(markup) => match result {
                Ok(audio) => audio,
                Err(e) => return SynthesisOutcome::Error(e.to_string()),
            },
        };

        let poll_interval = self.poll_interval;
        let worker_token = cancel.clone();
        let played = tokio::task::spawn_blocking(move || play_audio(audio, &worker_token, poll_interval)).await;

        match played {
            Ok(Ok(true)) => SynthesisOutcome::Completed,
            Ok(Ok(false)) => SynthesisOutcome::Canceled,
            Ok(Err(e)) => SynthesisOutcome::Error(e.to_string()),
            Err(e) => SynthesisOutcome::Error(format!("Audio worker failed: {}", e)),
        }
    }
}
