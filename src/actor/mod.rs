//! Actors: the event source thread and the dispatch loop it feeds.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐       Action        ┌──────────────┐   evaluate   ┌───────────┐
//! │ Event Source │ ──────────────────▶ │ Dispatch     │ ───────────▶ │ Evaluator │
//! │  (thread)    │  bounded, ordered   │ Loop (caller)│              └───────────┘
//! └──────────────┘                     └──────┬───────┘
//!                                             │ render_input_row / render_results
//!                                             ▼
//!                                      ┌──────────────┐
//!                                      │   Renderer   │
//!                                      └──────────────┘
//! ```

mod engine;
mod input;
mod messages;

pub use engine::{Engine, EngineConfig, Finish, KeyBindings};
pub use input::{Classifier, EventReader, EventSource, TerminalEvents, INPUT_THREAD_NAME};
pub use messages::Action;
