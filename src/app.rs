//! Application runner: takes the terminal, runs the dispatch loop, gives the
//! terminal back, then does the exit-path work (print or save).

use crate::actor::{Engine, EngineConfig, EventSource, Finish, TerminalEvents};
use crate::eval::{EvalError, Evaluator};
use crate::logging;
use crate::renderer::Renderer;
use crate::session::Session;
use crate::terminal::{self, TerminalGuard};
use anyhow::Context;
use crossbeam_channel::bounded;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

/// Errors on the way out, after the terminal has been released.
#[derive(Debug, Error)]
pub enum FinishError {
    /// The save prompt was submitted without a path.
    #[error("no save path given")]
    EmptySavePath,

    /// Evaluating the program for the save failed.
    #[error("cannot evaluate program for saving: {0}")]
    Evaluate(#[from] EvalError),

    /// Writing the save file failed.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        /// Resolved destination.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Streaming the result to standard output failed.
    #[error("cannot write result to standard output: {0}")]
    Print(#[source] io::Error),
}

/// Process outcome after a session that did not hit a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Exit status 0.
    Success,
    /// Exit status 1: the printed program failed to evaluate.
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Self::SUCCESS,
            Outcome::Failure => Self::FAILURE,
        }
    }
}

/// Run an interactive session on the real terminal.
///
/// `initial_results` is the evaluation of the starting program, computed
/// before the terminal is taken so a failure there never touches the screen.
pub fn run<E: Evaluator>(config: &EngineConfig, session: Session<E>, initial_results: Vec<u8>) -> anyhow::Result<Outcome> {
    logging::install_panic_hook();
    let (width, height) = terminal::size().context("cannot read terminal size")?;
    let mut guard = TerminalGuard::acquire(config.alternate_screen).context("cannot take over the terminal")?;

    let renderer = Renderer::new(terminal::display_stream(), width, height, config.save_prompt.as_str());
    let mut engine = Engine::start(session, renderer, initial_results).context("cannot draw the first frame")?;

    let (tx, rx) = bounded(config.channel_capacity);
    let source = EventSource::spawn(TerminalEvents, tx, config.bindings, config.poll_timeout)
        .context("cannot start the event source")?;

    let finish = engine.run(&rx);

    drop(rx);
    source.join();
    guard.release().context("cannot restore the terminal")?;

    let finish = finish.context("cannot draw to the terminal")?;
    log::debug!("session finished: {finish:?}");

    let (session, _) = engine.into_parts();
    let cwd = std::env::current_dir().context("cannot read the working directory")?;
    let stdout = io::stdout();
    Ok(complete(&session, finish, &mut stdout.lock(), &cwd)?)
}

/// Exit-path work for a finished session.
///
/// * `Exit` does nothing.
/// * `Print` re-evaluates and writes the result to `out`; an evaluation
///   error is reported on standard error and yields [`Outcome::Failure`].
/// * `Save` re-evaluates and writes the result to the save path, resolved
///   against `cwd`. Every failure is fatal.
pub fn complete<E: Evaluator>(
    session: &Session<E>,
    finish: Finish,
    out: &mut impl Write,
    cwd: &Path,
) -> Result<Outcome, FinishError> {
    match finish {
        Finish::Exit => Ok(Outcome::Success),
        Finish::Print => match session.evaluate() {
            Ok(results) => {
                out.write_all(&results)
                    .and_then(|()| out.flush())
                    .map_err(FinishError::Print)?;
                Ok(Outcome::Success)
            }
            Err(err) => {
                log::error!("print failed: {err}");
                eprintln!("{err}");
                Ok(Outcome::Failure)
            }
        },
        Finish::Save => {
            let path = save_destination(session.input().save_path(), cwd)?;
            let results = session.evaluate()?;
            std::fs::write(&path, results).map_err(|source| FinishError::Write {
                path: path.clone(),
                source,
            })?;
            log::debug!("saved result to {}", path.display());
            Ok(Outcome::Success)
        }
    }
}

/// Resolve a typed save path against `cwd`. Absolute paths are kept.
pub fn save_destination(typed: &str, cwd: &Path) -> Result<PathBuf, FinishError> {
    if typed.is_empty() {
        return Err(FinishError::EmptySavePath);
    }
    Ok(cwd.join(typed))
}
