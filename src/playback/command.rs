use std::fmt;

/// Key help shown when playback starts
pub const KEY_HELP: &str =
    "Press space to skip the current audio, q to quit, b to play the previous segment, r to restart the segment, p to pause/resume";

/// A playback directive derived from one keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Skip to the next segment
    Stop,
    /// End playback
    Quit,
    /// Go to the previous segment
    Back,
    /// Speak the current segment again
    Restart,
    /// Pause, or resume when paused
    PauseToggle,
}

impl Command {
    /// Map one input byte to a command. Other bytes are not commands.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b' ' => Some(Self::Stop),
            b'q' => Some(Self::Quit),
            b'b' => Some(Self::Back),
            b'r' => Some(Self::Restart),
            b'p' => Some(Self::PauseToggle),
            _ => None,
        }
    }

    /// Byte that produces this command
    pub fn key(&self) -> u8 {
        match self {
            Self::Stop => b' ',
            Self::Quit => b'q',
            Self::Back => b'b',
            Self::Restart => b'r',
            Self::PauseToggle => b'p',
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stop => "stop",
            Self::Quit => "quit",
            Self::Back => "back",
            Self::Restart => "restart",
            Self::PauseToggle => "pause",
        };
        f.write_str(name)
    }
}
