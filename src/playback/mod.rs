/*!
 * Interactive playback.
 *
 * - `command`: keystroke to command mapping
 * - `controller`: per-segment synthesis/command race and cursor transitions
 * - `keyboard`: raw-mode terminal reader feeding the controller
 */

pub mod command;
pub mod controller;
pub mod keyboard;

// Re-export main types
pub use command::{Command, KEY_HELP};
pub use controller::{PlaybackController, PlaybackOptions, PlaybackState, PlaybackSummary, Transition};
pub use keyboard::KeyboardListener;
