//! # jq-live
//!
//! Edit a `jq` program in the terminal and watch its output recompute
//! against a fixed input document.
//!
//! ## Core Concepts
//!
//! - **Closed action set**: key presses are classified once, on the event
//!   source thread, into [`Action`]s
//! - **Single dispatch loop**: the only writer of the input state; it calls
//!   the [`Evaluator`] and tells the [`Renderer`] what to repaint
//! - **Double-buffered rendering**: only the dirty regions are diffed, and
//!   each frame reaches the terminal in one write
//!
//! ## Example
//!
//! ```rust
//! use jq_live::{Action, Engine, EvalError, EvalOptions, Renderer, Session};
//!
//! let evaluate = |doc: &[u8], _: &str, _: EvalOptions| -> Result<Vec<u8>, EvalError> {
//!     Ok(doc.to_vec())
//! };
//! let session = Session::new(b"1\n".to_vec(), ".", EvalOptions::default(), evaluate);
//! let renderer = Renderer::new(Vec::new(), 20, 5, "save to: ");
//!
//! let mut engine = Engine::start(session, renderer, b"1\n".to_vec()).unwrap();
//! engine.dispatch(Action::Commit('|')).unwrap();
//! assert_eq!(engine.renderer().frame().row_text(0), ".|");
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod app;
pub mod buffer;
pub mod eval;
pub mod layout;
pub mod logging;
pub mod renderer;
pub mod session;
pub mod state;
pub mod terminal;

// Re-exports for convenience
pub use actor::{Action, Engine, EngineConfig, Finish, KeyBindings};
pub use buffer::{Cell, Grid, Style};
pub use eval::{EvalError, EvalOptions, Evaluator, JqShell};
pub use renderer::{RenderError, Renderer};
pub use session::Session;
pub use state::{InputState, Mode};
