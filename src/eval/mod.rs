//! Evaluator: the query backend the display engine calls out to.
//!
//! The engine treats evaluation as a pure function of the original document,
//! the program text, and the two output toggles. It only ever shows an
//! error's message; it does not branch on the kind of failure.

mod shell;

pub use shell::JqShell;

use std::io;
use thiserror::Error;

/// Output toggles read on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalOptions {
    /// One result per line instead of pretty-printed.
    pub compact: bool,
    /// Strings are emitted without quotes.
    pub raw: bool,
}

impl EvalOptions {
    /// Flip `compact`.
    pub fn toggle_compact(&mut self) {
        self.compact = !self.compact;
    }

    /// Flip `raw`.
    pub fn toggle_raw(&mut self) {
        self.raw = !self.raw;
    }
}

/// Why an evaluation produced no output.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The backend executable could not be started.
    #[error("cannot start `{binary}`: {source}")]
    Spawn {
        /// Executable that was invoked.
        binary: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The backend ran and rejected the program or the document.
    #[error("{message}")]
    Rejected {
        /// Exit code, when the process was not killed by a signal.
        code: Option<i32>,
        /// The backend's diagnostic text.
        message: String,
    },

    /// Talking to the backend failed midway.
    #[error("evaluator I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Something that can run a program against a document.
///
/// Implementations must be repeatable: identical arguments give identical
/// output.
pub trait Evaluator {
    /// Run `program` over `document`.
    fn evaluate(&self, document: &[u8], program: &str, options: EvalOptions) -> Result<Vec<u8>, EvalError>;
}

impl<F> Evaluator for F
where
    F: Fn(&[u8], &str, EvalOptions) -> Result<Vec<u8>, EvalError>,
{
    fn evaluate(&self, document: &[u8], program: &str, options: EvalOptions) -> Result<Vec<u8>, EvalError> {
        self(document, program, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles_flip_independently() {
        let mut options = EvalOptions::default();
        options.toggle_compact();
        assert_eq!(options, EvalOptions { compact: true, raw: false });
        options.toggle_raw();
        options.toggle_compact();
        assert_eq!(options, EvalOptions { compact: false, raw: true });
    }

    #[test]
    fn test_closure_is_an_evaluator() {
        let echo = |doc: &[u8], _: &str, _: EvalOptions| -> Result<Vec<u8>, EvalError> { Ok(doc.to_vec()) };
        assert_eq!(echo.evaluate(b"{}", ".", EvalOptions::default()).unwrap(), b"{}");
    }

    #[test]
    fn test_rejected_displays_message_only() {
        let err = EvalError::Rejected {
            code: Some(3),
            message: "jq: error: syntax error".to_string(),
        };
        assert_eq!(err.to_string(), "jq: error: syntax error");
    }
}
