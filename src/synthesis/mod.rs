/*!
 * Speech synthesizer implementations.
 *
 * - Azure: Azure Speech REST API with local audio output
 * - Mock: scripted synthesizer for tests
 */

use async_trait::async_trait;
use std::fmt::{self, Debug};
use tokio_util::sync::CancellationToken;

/// Final result of one synthesis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    /// The audio played to the end
    Completed,
    /// The call stopped early because its token was cancelled
    Canceled,
    /// The engine failed; the detail is meant for logs
    Error(String),
}

impl fmt::Display for SynthesisOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Canceled => f.write_str("canceled"),
            Self::Error(detail) => write!(f, "error: {}", detail),
        }
    }
}

/// Common trait for all speech engines
///
/// The playback controller owns its synthesizer exclusively and never has two
/// calls outstanding.
#[async_trait]
pub trait Synthesizer: Send + Sync + Debug {
    /// Speak `markup` and resolve once the audio has finished or stopped.
    ///
    /// Cancelling `cancel` requests early termination. Implementations must
    /// resolve with `Canceled` promptly after it fires, including when it was
    /// cancelled before the call was first polled, and must not leave audio
    /// playing once they resolve.
    async fn synthesize(&self, markup: &str, cancel: CancellationToken) -> SynthesisOutcome;
}

pub mod azure;
pub mod mock;

pub use azure::{AzureSynthesizer, VoiceInfo};
pub use mock::{MockBehavior, MockSynthesizer};
