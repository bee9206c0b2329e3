use anyhow::{Context, Result};
use log::{info, warn};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::app_config::Config;
use crate::content::{ContentNode, DocumentSource};
use crate::playback::{KeyboardListener, PlaybackController, PlaybackOptions, PlaybackSummary};
use crate::segmenter::{skip_retained, Segment, Segmenter, SegmenterConfig};
use crate::synthesis::{AzureSynthesizer, Synthesizer, VoiceInfo};

// @module: Application controller for reading documents aloud

/// Main application controller: loads a document, segments it and plays it
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.config.speech.timeout_secs)
    }

    /// Load `location` and split it into segments, starting at the
    /// configured sub-offset
    pub async fn load_segments(&self, location: &str) -> Result<Vec<Segment>> {
        let source = DocumentSource::classify(location)?;
        let nodes = source
            .load_nodes(self.config.reading.item_page, self.fetch_timeout())
            .await?;
        info!("Loaded {} content nodes from {}", nodes.len(), location);

        Ok(self.segment_nodes(&nodes))
    }

    /// Segment `nodes` from the configured sub-offset onwards
    pub fn segment_nodes(&self, nodes: &[ContentNode]) -> Vec<Segment> {
        let offset = self.config.reading.start_sub_offset;
        let remaining = skip_retained(nodes, offset).unwrap_or_else(|| {
            if offset > 0 {
                warn!("Start sub-offset {} is past the last speakable node", offset);
            }
            &[]
        });

        let segmenter = Segmenter::new(SegmenterConfig::from(&self.config));
        let segments = segmenter.segment(remaining, offset);
        Self::log_segments(&segments);
        segments
    }

    fn log_segments(segments: &[Segment]) {
        for (index, segment) in segments.iter().enumerate() {
            info!(
                "Index: {} total_tokens: {}, start_token: {}, end_token: {}",
                index, segment.token_count, segment.start_offset, segment.end_offset
            );
        }
    }

    /// Print the segment table of `location` without speaking it
    pub async fn list_segments(&self, location: &str) -> Result<Vec<Segment>> {
        let segments = self.load_segments(location).await?;
        if segments.is_empty() {
            warn!("No speakable content found in {}", location);
        }
        Ok(segments)
    }

    /// Read `location` aloud with the Azure synthesizer and keyboard control
    pub async fn run(&self, location: &str) -> Result<PlaybackSummary> {
        self.config.validate_speech()?;

        let segments = self.load_segments(location).await?;
        if segments.is_empty() {
            warn!("No speakable content found in {}", location);
            return Ok(PlaybackSummary::default());
        }

        let synthesizer = self.azure_synthesizer()?;
        let (keyboard, mut input) = KeyboardListener::start(self.config.reading.poll_interval())
            .context("Failed to put the terminal in raw mode")?;

        let result = self.play_segments(synthesizer, segments, &mut input).await;
        // The reader thread may be blocked on a full channel until the
        // receiver goes away
        drop(input);
        drop(keyboard);
        result
    }

    /// Play already segmented content with any synthesizer and command input
    pub async fn play_segments<S: Synthesizer>(
        &self,
        synthesizer: S,
        segments: Vec<Segment>,
        input: &mut mpsc::Receiver<u8>,
    ) -> Result<PlaybackSummary> {
        let mut controller = PlaybackController::new(synthesizer, segments, PlaybackOptions::from(&self.config));
        let result = controller.run(input).await;

        let summary = controller.summary();
        if let Some(hint) = self.resume_hint(&summary) {
            info!("Stopped at index {}. Resume with {}", summary.cursor, hint);
        }
        if summary.failed_segments > 0 {
            warn!("{} segment(s) could not be synthesized", summary.failed_segments);
        }

        result?;
        Ok(summary)
    }

    /// Command line arguments that continue a halted run at the segment it
    /// stopped on
    pub fn resume_hint(&self, summary: &PlaybackSummary) -> Option<String> {
        summary.resume_offset.map(|offset| {
            format!(
                "--item-page {} --start-sub-offset {} --num-tokens {}",
                self.config.reading.item_page, offset, self.config.reading.token_budget
            )
        })
    }

    /// List the voices available to the configured subscription
    pub async fn list_voices(&self, locale: Option<&str>) -> Result<Vec<VoiceInfo>> {
        self.config.validate_speech()?;
        let voices = self.azure_synthesizer()?.list_voices(locale).await?;
        Ok(voices)
    }

    fn azure_synthesizer(&self) -> Result<AzureSynthesizer> {
        AzureSynthesizer::new(&self.config.speech, self.config.reading.poll_interval())
            .context("Failed to create speech synthesizer")
    }
}
