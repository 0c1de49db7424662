//! Dispatch Loop: the single consumer of [`Action`]s.
//!
//! The engine owns the [`Session`] and the [`Renderer`]. Each action mutates
//! the input state, optionally re-runs the evaluator, and repaints whichever
//! regions the mutation left dirty. Actions that end the session are handed
//! back to the caller as a [`Finish`] so the terminal can be released before
//! anything is written to standard output or disk.

use super::messages::Action;
use crate::eval::Evaluator;
use crate::renderer::{RenderError, Renderer, DEFAULT_SAVE_PROMPT};
use crate::session::Session;
use crate::state::Mode;
use crossbeam_channel::Receiver;
use std::io::Write;
use std::time::Duration;

/// Control-key letters for the actions that have no dedicated key.
///
/// Escape, Ctrl+C and Ctrl+D always exit and are not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    /// Ctrl+letter flipping compact output.
    pub toggle_compact: char,
    /// Ctrl+letter flipping raw string output.
    pub toggle_raw: char,
    /// Ctrl+letter printing the result and exiting.
    pub print: char,
    /// Ctrl+letter opening the save prompt.
    pub save: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            toggle_compact: 'e',
            toggle_raw: 'r',
            print: 'p',
            save: 's',
        }
    }
}

/// Configuration for the interactive session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long the event source waits per poll before checking shutdown.
    /// Also the back-off after a polling fault.
    pub poll_timeout: Duration,
    /// Capacity of the action channel.
    pub channel_capacity: usize,
    /// Whether to draw on the alternate screen.
    pub alternate_screen: bool,
    /// Label shown before the path in save mode.
    pub save_prompt: String,
    /// Control-key letters.
    pub bindings: KeyBindings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(50),
            channel_capacity: 64,
            alternate_screen: true,
            save_prompt: DEFAULT_SAVE_PROMPT.to_string(),
            bindings: KeyBindings::default(),
        }
    }
}

/// How the interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// Leave without output.
    Exit,
    /// Write the current result to standard output.
    Print,
    /// Write the current result to the typed save path.
    Save,
}

/// The dispatch loop.
pub struct Engine<E, W: Write> {
    session: Session<E>,
    renderer: Renderer<W>,
    /// Last successful evaluation, shown in the results region.
    results: Vec<u8>,
}

impl<E: Evaluator, W: Write> Engine<E, W> {
    /// Paint the input row and `initial_results`, computed by the caller
    /// before the terminal was taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the first frame cannot be written.
    pub fn start(session: Session<E>, renderer: Renderer<W>, initial_results: Vec<u8>) -> Result<Self, RenderError> {
        let mut engine = Self {
            session,
            renderer,
            results: initial_results,
        };
        engine.session.input_mut().mark_results_dirty();
        engine.repaint()?;
        Ok(engine)
    }

    /// Borrow the session.
    pub const fn session(&self) -> &Session<E> {
        &self.session
    }

    /// Borrow the renderer.
    pub const fn renderer(&self) -> &Renderer<W> {
        &self.renderer
    }

    /// The bytes currently shown in the results region.
    pub fn results(&self) -> &[u8] {
        &self.results
    }

    /// Tear down into the session and renderer.
    pub fn into_parts(self) -> (Session<E>, Renderer<W>) {
        (self.session, self.renderer)
    }

    /// Pull actions until one ends the session.
    ///
    /// A disconnected channel means the event source is gone; that ends the
    /// session as [`Finish::Exit`].
    ///
    /// # Errors
    ///
    /// Returns an error if a frame cannot be written.
    pub fn run(&mut self, actions: &Receiver<Action>) -> Result<Finish, RenderError> {
        loop {
            let Ok(action) = actions.recv() else {
                log::warn!("action channel disconnected; exiting");
                return Ok(Finish::Exit);
            };
            if let Some(finish) = self.dispatch(action)? {
                return Ok(finish);
            }
        }
    }

    /// Apply one action and repaint what it changed.
    ///
    /// Returns `Some` when the action ends the session.
    ///
    /// # Errors
    ///
    /// Returns an error if a frame cannot be written.
    pub fn dispatch(&mut self, action: Action) -> Result<Option<Finish>, RenderError> {
        debug_assert!(
            edits_mode(action).is_none_or(|mode| mode == self.session.input().mode()),
            "{action:?} classified for a different mode than {:?}",
            self.session.input().mode()
        );
        match action {
            Action::Exit => return Ok(Some(Finish::Exit)),
            Action::Print => return Ok(Some(Finish::Print)),
            Action::SaveSubmit => return Ok(Some(Finish::Save)),
            Action::Commit(ch) | Action::SaveCommit(ch) => {
                let input = self.session.input_mut();
                input.stage(ch);
                input.append_char();
            }
            Action::Backspace | Action::SaveBackspace => self.session.input_mut().backspace(),
            Action::EnterSavePrompt => self.session.input_mut().enter_save_mode(),
            Action::ToggleCompact => {
                self.session.options_mut().toggle_compact();
                self.reevaluate();
            }
            Action::ToggleRaw => {
                self.session.options_mut().toggle_raw();
                self.reevaluate();
            }
            Action::Submit => self.reevaluate(),
        }
        self.repaint()?;
        Ok(None)
    }

    fn reevaluate(&mut self) {
        let program = self.session.input().program();
        log::debug!("evaluating {program:?} with {:?}", self.session.options());

        match self.session.evaluate() {
            Ok(results) => {
                self.results = results;
                self.session.input_mut().mark_results_dirty();
            }
            Err(err) => log::warn!("evaluation failed: {err}"),
        }
    }

    fn repaint(&mut self) -> Result<(), RenderError> {
        let input = self.session.input_mut();
        if input.take_input_dirty() {
            self.renderer.render_input_row(input.active_text(), input.mode())?;
        }
        if input.take_results_dirty() {
            self.renderer.render_results(&self.results)?;
        }
        Ok(())
    }
}

/// The editing mode an edit action was classified in, if it is an edit.
const fn edits_mode(action: Action) -> Option<Mode> {
    match action {
        Action::Commit(_) | Action::Backspace => Some(Mode::Program),
        Action::SaveCommit(_) | Action::SaveBackspace => Some(Mode::SavePath),
        _ => None,
    }
}
