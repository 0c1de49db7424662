//! Event Source: Dedicated thread turning terminal key presses into
//! [`Action`]s.
//!
//! The thread polls with a timeout so it can notice shutdown, classifies
//! each key press, and sends the result down a single ordered channel. A
//! fault raised by the terminal driver while polling is logged and polling
//! carries on; one bad event never ends the session.

use super::engine::KeyBindings;
use super::messages::Action;
use crate::state::Mode;
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Name of the polling thread.
pub const INPUT_THREAD_NAME: &str = "jq-live-input";

/// Source of raw terminal events.
pub trait EventReader: Send + 'static {
    /// Wait up to `timeout` for an event to become available.
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Read the next event; only called after `poll` returned `true`.
    fn read(&mut self) -> io::Result<Event>;
}

/// The real terminal, through crossterm.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalEvents;

impl EventReader for TerminalEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

/// Maps key events to actions.
///
/// Keeps its own copy of the editing mode: once it has emitted
/// [`Action::EnterSavePrompt`] it classifies the following keys as save-path
/// edits, matching what the dispatch loop will do with that action.
#[derive(Debug, Clone)]
pub struct Classifier {
    bindings: KeyBindings,
    mode: Mode,
}

impl Classifier {
    /// Start in program mode.
    pub const fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            mode: Mode::Program,
        }
    }

    /// The mode the next key will be classified in.
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Classify one terminal event. Anything but a key press yields `None`.
    pub fn classify(&mut self, event: &Event) -> Option<Action> {
        let Event::Key(key) = event else {
            return None;
        };
        let action = self.classify_key(key)?;
        if action == Action::EnterSavePrompt {
            self.mode = Mode::SavePath;
        }
        Some(action)
    }

    fn classify_key(&self, key: &KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match key.code {
            KeyCode::Esc => Some(Action::Exit),
            KeyCode::Enter => Some(self.by_mode(Action::Submit, Action::SaveSubmit)),
            KeyCode::Backspace => Some(self.by_mode(Action::Backspace, Action::SaveBackspace)),
            KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.control_key(c.to_ascii_lowercase())
            }
            KeyCode::Char(c) if key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SUPER) => {
                log::trace!("ignoring modified key {c:?} ({:?})", key.modifiers);
                None
            }
            KeyCode::Char(c) if !c.is_control() => {
                Some(self.by_mode(Action::Commit(c), Action::SaveCommit(c)))
            }
            _ => None,
        }
    }

    fn control_key(&self, c: char) -> Option<Action> {
        let bindings = &self.bindings;
        match c {
            'c' | 'd' => Some(Action::Exit),
            'h' => Some(self.by_mode(Action::Backspace, Action::SaveBackspace)),
            c if c == bindings.toggle_compact => Some(Action::ToggleCompact),
            c if c == bindings.toggle_raw => Some(Action::ToggleRaw),
            c if c == bindings.print => Some(Action::Print),
            c if c == bindings.save => Some(Action::EnterSavePrompt),
            _ => None,
        }
    }

    const fn by_mode(&self, program: Action, save_path: Action) -> Action {
        match self.mode {
            Mode::Program => program,
            Mode::SavePath => save_path,
        }
    }
}

/// Handle to the event polling thread.
pub struct EventSource {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl EventSource {
    /// Spawn the polling thread.
    ///
    /// # Arguments
    ///
    /// * `reader` - Where raw events come from.
    /// * `sender` - Channel to the dispatch loop.
    /// * `bindings` - Control-key letters for the toggles.
    /// * `poll_timeout` - How long each poll waits before checking shutdown.
    pub fn spawn<R: EventReader>(
        reader: R,
        sender: Sender<Action>,
        bindings: KeyBindings,
        poll_timeout: Duration,
    ) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let classifier = Classifier::new(bindings);

        let handle = thread::Builder::new()
            .name(INPUT_THREAD_NAME.to_string())
            .spawn(move || {
                Self::run_loop(reader, &sender, classifier, &shutdown_clone, poll_timeout);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the polling thread to stop.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Stop the polling thread and wait for it.
    ///
    /// The dispatch loop must have dropped its receiver (or be draining it)
    /// so a blocked send can return.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("event source thread panicked outside the polling boundary");
            }
        }
    }

    /// Main polling loop.
    fn run_loop<R: EventReader>(
        mut reader: R,
        sender: &Sender<Action>,
        mut classifier: Classifier,
        shutdown: &AtomicBool,
        poll_timeout: Duration,
    ) {
        while !shutdown.load(Ordering::Relaxed) {
            let polled = panic::catch_unwind(AssertUnwindSafe(|| Self::poll_once(&mut reader, poll_timeout)));

            let event = match polled {
                Ok(Ok(Some(event))) => event,
                Ok(Ok(None)) => continue,
                Ok(Err(err)) => {
                    log::warn!("event polling failed: {err}");
                    thread::sleep(poll_timeout);
                    continue;
                }
                Err(payload) => {
                    log::error!("event polling panicked: {}", panic_message(payload.as_ref()));
                    thread::sleep(poll_timeout);
                    continue;
                }
            };

            let Some(action) = classifier.classify(&event) else {
                continue;
            };
            log::debug!("action: {action:?}");

            if sender.send(action).is_err() {
                // Receiver dropped
                break;
            }
            if action.is_terminal() {
                // Keys typed after this belong to whatever runs next.
                break;
            }
        }
    }

    fn poll_once<R: EventReader>(reader: &mut R, timeout: Duration) -> io::Result<Option<Event>> {
        if reader.poll(timeout)? {
            reader.read().map(Some)
        } else {
            Ok(None)
        }
    }
}

impl Drop for EventSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
