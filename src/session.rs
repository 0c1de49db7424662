//! Session: the root owner of everything one interactive run works on.

use crate::eval::{EvalError, EvalOptions, Evaluator};
use crate::state::InputState;

/// The source document, the evaluator, its options, and the input state.
///
/// The document is fixed for the session's lifetime; every evaluation sees
/// the original bytes and the current program.
#[derive(Debug)]
pub struct Session<E> {
    input: InputState,
    options: EvalOptions,
    document: Vec<u8>,
    evaluator: E,
}

impl<E: Evaluator> Session<E> {
    /// Start a session editing `program`.
    pub fn new(document: Vec<u8>, program: impl Into<String>, options: EvalOptions, evaluator: E) -> Self {
        Self {
            input: InputState::new(program),
            options,
            document,
            evaluator,
        }
    }

    /// Run the current program against the document.
    ///
    /// # Errors
    ///
    /// Whatever the evaluator reports.
    pub fn evaluate(&self) -> Result<Vec<u8>, EvalError> {
        self.evaluator
            .evaluate(&self.document, self.input.program(), self.options)
    }

    /// The input state.
    pub const fn input(&self) -> &InputState {
        &self.input
    }

    /// Mutable input state.
    pub const fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Current evaluator options.
    pub const fn options(&self) -> EvalOptions {
        self.options
    }

    /// Mutable evaluator options.
    pub const fn options_mut(&mut self) -> &mut EvalOptions {
        &mut self.options
    }

    /// The source document.
    pub fn document(&self) -> &[u8] {
        &self.document
    }

    /// The evaluator.
    pub const fn evaluator(&self) -> &E {
        &self.evaluator
    }
}
