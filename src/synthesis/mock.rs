/*!
 * Mock synthesizer for testing.
 *
 * Each call consumes the next scripted behavior, falling back to a default:
 * - `MockBehavior::Complete` - resolves `Completed` after an optional delay
 * - `MockBehavior::UntilCanceled` - speaks forever, resolves only on cancellation
 * - `MockBehavior::Fail` - resolves with an engine error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{SynthesisOutcome, Synthesizer};

/// Behavior of one mock synthesis call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Completes after `delay_ms` unless cancelled first
    Complete { delay_ms: u64 },
    /// Never completes on its own
    UntilCanceled,
    /// Fails immediately
    Fail,
}

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub markup: String,
    pub outcome: SynthesisOutcome,
}

/// Scripted synthesizer that records every call
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    script: Arc<Mutex<VecDeque<MockBehavior>>>,
    default_behavior: MockBehavior,
    calls: Arc<Mutex<Vec<MockCall>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockSynthesizer {
    /// Create a mock whose calls all behave like `default_behavior`
    pub fn new(default_behavior: MockBehavior) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            default_behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock whose calls complete immediately
    pub fn completing() -> Self {
        Self::new(MockBehavior::Complete { delay_ms: 0 })
    }

    /// Create a mock whose calls only end when cancelled
    pub fn until_canceled() -> Self {
        Self::new(MockBehavior::UntilCanceled)
    }

    /// Create a mock whose calls always fail
    pub fn failing() -> Self {
        Self::new(MockBehavior::Fail)
    }

    /// Queue behaviors for the next calls, in order
    pub fn with_script(self, behaviors: impl IntoIterator<Item = MockBehavior>) -> Self {
        self.script.lock().extend(behaviors);
        self
    }

    /// Calls recorded so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Highest number of calls that were ever in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_behavior(&self) -> MockBehavior {
        self.script.lock().pop_front().unwrap_or(self.default_behavior)
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, markup: &str, cancel: CancellationToken) -> SynthesisOutcome {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let outcome = match self.next_behavior() {
            MockBehavior::Complete { delay_ms } => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => SynthesisOutcome::Canceled,
                    _ = tokio::time::sleep(Duration::from_millis(delay_ms)) => SynthesisOutcome::Completed,
                }
            }
            MockBehavior::UntilCanceled => {
                cancel.cancelled().await;
                SynthesisOutcome::Canceled
            }
            MockBehavior::Fail => SynthesisOutcome::Error("mock engine failure".to_string()),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.lock().push(MockCall {
            markup: markup.to_string(),
            outcome: outcome.clone(),
        });
        outcome
    }
}
