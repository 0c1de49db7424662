//! `jq` executable adapter.

use super::{EvalError, EvalOptions, Evaluator};
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;

/// Runs programs through an installed `jq` binary, feeding the document on
/// standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JqShell {
    binary: String,
}

impl Default for JqShell {
    fn default() -> Self {
        Self::new("jq")
    }
}

impl JqShell {
    /// Use `binary` (a name looked up on `PATH`, or a path).
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The executable this shell invokes.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Command-line arguments for one evaluation.
    pub fn args(program: &str, options: EvalOptions) -> Vec<&str> {
        let mut args = Vec::with_capacity(3);
        if options.compact {
            args.push("-c");
        }
        if options.raw {
            args.push("-r");
        }
        args.push(program);
        args
    }
}

impl Evaluator for JqShell {
    fn evaluate(&self, document: &[u8], program: &str, options: EvalOptions) -> Result<Vec<u8>, EvalError> {
        log::debug!("processing program: {program} ({options:?})");

        let mut child = Command::new(&self.binary)
            .args(Self::args(program, options))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EvalError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        // The document is fed from a second thread: jq may fill its stdout
        // pipe before it has read all of stdin.
        let stdin = child.stdin.take();
        let binary = &self.binary;
        let output = thread::scope(|scope| {
            if let Some(mut stdin) = stdin {
                scope.spawn(move || {
                    if let Err(err) = stdin.write_all(document) {
                        // A program that never reads its input closes the pipe early.
                        if err.kind() != ErrorKind::BrokenPipe {
                            log::warn!("writing document to {binary} failed: {err}");
                        }
                    }
                });
            }
            child.wait_with_output()
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim_end() {
                "" => format!("{} exited with {}", self.binary, output.status),
                text => text.to_string(),
            };
            return Err(EvalError::Rejected {
                code: output.status.code(),
                message,
            });
        }

        log::debug!("program result: {} bytes", output.stdout.len());
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_plain() {
        assert_eq!(JqShell::args(".a", EvalOptions::default()), vec![".a"]);
    }

    #[test]
    fn test_args_with_toggles() {
        let options = EvalOptions {
            compact: true,
            raw: true,
        };
        assert_eq!(JqShell::args(".", options), vec!["-c", "-r", "."]);

        let raw_only = EvalOptions {
            compact: false,
            raw: true,
        };
        assert_eq!(JqShell::args(".", raw_only), vec!["-r", "."]);
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let shell = JqShell::new("jq-live-test-no-such-binary");
        let err = shell
            .evaluate(b"{}", ".", EvalOptions::default())
            .unwrap_err();
        assert!(matches!(err, EvalError::Spawn { .. }));
        assert!(err.to_string().contains("jq-live-test-no-such-binary"));
    }

    #[test]
    fn test_default_binary() {
        assert_eq!(JqShell::default().binary(), "jq");
    }
}
