/*!
 * Raw-mode keyboard input.
 *
 * The terminal is switched to raw mode (no echo, no line buffering) and a
 * dedicated thread forwards key presses as bytes over a channel. The thread
 * polls with a short timeout so it notices when the listener is dropped.
 */

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::{debug, error};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

const INPUT_BUFFER: usize = 32;

/// Restores the terminal mode when dropped
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Keyboard reader running for as long as this value is alive
pub struct KeyboardListener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    _raw_mode: RawModeGuard,
}

impl KeyboardListener {
    /// Enter raw mode and start forwarding key bytes
    pub fn start(poll_interval: Duration) -> io::Result<(Self, mpsc::Receiver<u8>)> {
        let raw_mode = RawModeGuard::enable()?;
        let (tx, rx) = mpsc::channel(INPUT_BUFFER);
        let stop = Arc::new(AtomicBool::new(false));

        let thread_stop = stop.clone();
        let handle = thread::Builder::new()
            .name("keyboard".to_string())
            .spawn(move || read_keys(tx, thread_stop, poll_interval))?;

        Ok((
            Self {
                stop,
                handle: Some(handle),
                _raw_mode: raw_mode,
            },
            rx,
        ))
    }
}

impl Drop for KeyboardListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn read_keys(tx: mpsc::Sender<u8>, stop: Arc<AtomicBool>, poll_interval: Duration) {
    while !stop.load(Ordering::SeqCst) {
        match event::poll(poll_interval) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(byte) = key_to_byte(&key) {
                        if !forward_key(&tx, byte) {
                            break;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Failed to read keyboard input: {}", e);
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                error!("Failed to poll keyboard input: {}", e);
                break;
            }
        }
    }
    debug!("Keyboard reader stopped");
}

/// Queue `byte` without blocking. Keys typed while the buffer is full are
/// dropped. Returns `false` once the receiver is gone.
fn forward_key(tx: &mpsc::Sender<u8>, byte: u8) -> bool {
    match tx.try_send(byte) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            debug!("Dropping key {:?}, command buffer is full", byte as char);
            true
        }
        Err(TrySendError::Closed(_)) => false,
    }
}

/// Byte for a key press. Ctrl-C maps to `q` since raw mode swallows SIGINT.
pub fn key_to_byte(key: &KeyEvent) -> Option<u8> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(b'q'),
        KeyCode::Char(c) if c.is_ascii() => Some(c as u8),
        _ => None,
    }
}
