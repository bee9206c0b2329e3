/*!
 * Interactive playback of a segment sequence.
 *
 * For every segment the controller races the synthesis call against the
 * command listener. Whichever resolves first decides the next cursor; a
 * winning command cancels the synthesis and waits for its acknowledgment
 * before the cursor moves, so an abandoned segment is never heard alongside
 * the next one.
 */

use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::app_config::Config;
use crate::errors::PlaybackError;
use crate::segmenter::Segment;
use crate::synthesis::{SynthesisOutcome, Synthesizer};

use super::command::{Command, KEY_HELP};

/// Options fixed for a whole run
#[derive(Debug, Clone, Default)]
pub struct PlaybackOptions {
    /// Segments below this index are skipped without synthesis
    pub start_index: usize,
}

impl From<&Config> for PlaybackOptions {
    fn from(config: &Config) -> Self {
        Self {
            start_index: config.reading.start_index,
        }
    }
}

/// Position and mode of a run, mutated only by the controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub cursor: usize,
    pub halted: bool,
    pub paused: bool,
}

impl PlaybackState {
    /// Move the cursor according to `transition`
    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Advance => self.cursor += 1,
            Transition::Stay => {}
            Transition::Back => self.cursor = self.cursor.saturating_sub(1),
            Transition::Halt => self.halted = true,
        }
    }
}

/// Decision taken after a segment resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Go to the next segment
    Advance,
    /// Speak the same segment again
    Stay,
    /// Go to the previous segment, floored at the first one
    Back,
    /// End the run
    Halt,
}

impl Transition {
    /// Transition for a command received while speaking. Pausing has no
    /// direct transition; it depends on the command that ends the pause.
    pub fn for_command(command: Command) -> Option<Self> {
        match command {
            Command::Stop => Some(Self::Advance),
            Command::Quit => Some(Self::Halt),
            Command::Back => Some(Self::Back),
            Command::Restart => Some(Self::Stay),
            Command::PauseToggle => None,
        }
    }
}

/// Which side of the race resolved a segment
#[derive(Debug, Clone, PartialEq, Eq)]
enum SegmentResolution {
    SynthesisWon(SynthesisOutcome),
    CommandWon {
        command: Command,
        acknowledged: SynthesisOutcome,
    },
}

/// Result of a run, enough for the caller to offer a resume point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub cursor: usize,
    pub halted: bool,
    /// Synthesis calls issued, including ones cut short by commands
    pub segments_spoken: usize,
    /// Synthesis calls that ended in an engine error
    pub failed_segments: usize,
    /// Absolute node offset of the segment under the cursor, if any
    pub resume_offset: Option<usize>,
}

/// Drives sequential playback of segments against a synthesizer
#[derive(Debug)]
pub struct PlaybackController<S: Synthesizer> {
    synthesizer: S,
    segments: Vec<Segment>,
    options: PlaybackOptions,
    state: PlaybackState,
    segments_spoken: usize,
    failed_segments: usize,
}

impl<S: Synthesizer> PlaybackController<S> {
    pub fn new(synthesizer: S, segments: Vec<Segment>, options: PlaybackOptions) -> Self {
        Self {
            synthesizer,
            segments,
            options,
            state: PlaybackState::default(),
            segments_spoken: 0,
            failed_segments: 0,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    /// Whether the run has halted or moved past the last segment
    pub fn is_finished(&self) -> bool {
        self.state.halted || self.state.cursor >= self.segments.len()
    }

    pub fn summary(&self) -> PlaybackSummary {
        PlaybackSummary {
            cursor: self.state.cursor,
            halted: self.state.halted,
            segments_spoken: self.segments_spoken,
            failed_segments: self.failed_segments,
            resume_offset: self.segments.get(self.state.cursor).map(|s| s.start_offset),
        }
    }

    /// Play until halted or past the last segment, reading command bytes
    /// from `input`
    pub async fn run(&mut self, input: &mut mpsc::Receiver<u8>) -> Result<PlaybackSummary, PlaybackError> {
        info!("{}", KEY_HELP);

        while !self.is_finished() {
            self.step(input).await?;
        }

        Ok(self.summary())
    }

    /// Speak the segment under the cursor and apply the resulting transition.
    /// A cursor below the start index first moves up to it without speaking.
    /// Does nothing and returns `Stay` when the run is already finished.
    pub async fn step(&mut self, input: &mut mpsc::Receiver<u8>) -> Result<Transition, PlaybackError> {
        if !self.is_finished() {
            self.skip_to_start();
        }
        if self.is_finished() {
            return Ok(Transition::Stay);
        }

        let index = self.state.cursor;
        self.announce(index);

        let resolution = self.speak(index, input).await;
        self.segments_spoken += 1;

        let transition = match resolution {
            SegmentResolution::SynthesisWon(outcome) => {
                self.record_outcome(index, &outcome);
                Transition::Advance
            }
            SegmentResolution::CommandWon { command, acknowledged } => {
                debug!("Index {} stopped by {} ({})", index, command, acknowledged);
                if let SynthesisOutcome::Error(_) = acknowledged {
                    self.record_outcome(index, &acknowledged);
                }
                match Transition::for_command(command) {
                    Some(transition) => transition,
                    None => self.wait_while_paused(input).await?,
                }
            }
        };

        self.state.apply(transition);
        if transition == Transition::Halt {
            info!("Playback halted at index {}", self.state.cursor);
        }
        Ok(transition)
    }

    fn skip_to_start(&mut self) {
        while self.state.cursor < self.options.start_index && self.state.cursor < self.segments.len() {
            info!("Skipping index: {}", self.state.cursor);
            self.state.cursor += 1;
        }
    }

    fn announce(&self, index: usize) {
        let segment = &self.segments[index];
        info!("Current Index: {}", index);
        info!(
            "Reading from start_token: {}, end_token: {}",
            segment.start_offset, segment.end_offset
        );
        debug!("ssml_string:\n{}\nTotal tokens in ssml_string: {}", segment.markup, segment.token_count);
        info!("{}", segment.text);
    }

    /// Race synthesis of segment `index` against the next command
    async fn speak(&self, index: usize, input: &mut mpsc::Receiver<u8>) -> SegmentResolution {
        let cancel = CancellationToken::new();
        let synthesis = self
            .synthesizer
            .synthesize(&self.segments[index].markup, cancel.clone());
        tokio::pin!(synthesis);

        tokio::select! {
            biased;
            command = next_command(input) => {
                cancel.cancel();
                let acknowledged = synthesis.await;
                SegmentResolution::CommandWon { command, acknowledged }
            }
            outcome = &mut synthesis => SegmentResolution::SynthesisWon(outcome),
        }
    }

    fn record_outcome(&mut self, index: usize, outcome: &SynthesisOutcome) {
        match outcome {
            SynthesisOutcome::Completed => info!("Index {} completed", index),
            SynthesisOutcome::Canceled => debug!("Index {} canceled by the engine", index),
            SynthesisOutcome::Error(detail) => {
                self.failed_segments += 1;
                error!("Speech synthesis failed for index {}: {}", index, detail);
            }
        }
    }

    /// Block on the listener alone until the pause ends
    async fn wait_while_paused(&mut self, input: &mut mpsc::Receiver<u8>) -> Result<Transition, PlaybackError> {
        self.state.paused = true;
        info!("Paused, press p to resume or q to quit");

        loop {
            let Some(byte) = input.recv().await else {
                warn!("Command input closed while paused");
                self.state.paused = false;
                return Ok(Transition::Halt);
            };

            match Command::from_byte(byte) {
                Some(Command::PauseToggle) => {
                    self.state.paused = false;
                    info!("Resuming");
                    return Ok(Transition::Stay);
                }
                Some(Command::Quit) => {
                    self.state.paused = false;
                    return Ok(Transition::Halt);
                }
                Some(command) => {
                    self.state.paused = false;
                    self.state.halted = true;
                    error!("Received {} while paused, stopping playback", command);
                    return Err(PlaybackError::IllegalCommandWhilePaused(command));
                }
                None => debug!("Ignoring key {:?} while paused", byte as char),
            }
        }
    }
}

/// Wait for the next byte that maps to a command. A closed input never
/// resolves, leaving the synthesis side to finish the segment.
async fn next_command(input: &mut mpsc::Receiver<u8>) -> Command {
    loop {
        match input.recv().await {
            Some(byte) => match Command::from_byte(byte) {
                Some(command) => {
                    info!("User Entered `{}`", byte as char);
                    return command;
                }
                None => debug!("Ignoring key {:?}", byte as char),
            },
            None => std::future::pending::<()>().await,
        }
    }
}
