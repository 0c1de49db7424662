//! Debug sink: an optional file logger behind the `log` facade.
//!
//! Without a sink no logger is installed and every `log` macro is a no-op.

use crate::actor::INPUT_THREAD_NAME;
use anyhow::Context;
use simplelog::{Config, ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::Path;
use std::sync::Once;
use std::{panic, thread};

/// Line format for the debug file: `[LEVEL] target: message`, nothing else.
pub fn sink_config() -> Config {
    ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Error)
        .build()
}

/// Install the debug sink at `path`, truncating an existing file.
///
/// # Errors
///
/// Fails if the file cannot be created or a logger is already installed.
pub fn init(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path).with_context(|| format!("cannot open debug log {}", path.display()))?;
    WriteLogger::init(LevelFilter::Debug, sink_config(), file).context("cannot install debug logger")?;
    log::debug!("debug log opened at {}", path.display());
    Ok(())
}

/// Route panics raised on the event source thread to the debug sink.
///
/// That thread recovers from driver panics, and the default hook would print
/// them onto the display stream. Panics on any other thread still reach the
/// previous hook. Installing twice is a no-op.
pub fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if routes_to_log(thread::current().name()) {
                log::error!(target: "jq_live::panic", "{info}");
            } else {
                default_panic(info);
            }
        }));
    });
}

/// Whether a panic on the thread named `thread` is logged instead of printed.
pub fn routes_to_log(thread: Option<&str>) -> bool {
    thread == Some(INPUT_THREAD_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata, Record};
    use std::sync::Mutex;

    struct Capture(Mutex<Vec<String>>);

    impl Log for Capture {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if record.level() == Level::Error && record.target() == "jq_live::panic" {
                let mut lines = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                lines.push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

    #[test]
    fn test_routes_only_the_input_thread() {
        assert!(routes_to_log(Some(INPUT_THREAD_NAME)));
        assert!(!routes_to_log(Some("main")));
        assert!(!routes_to_log(None));
    }

    #[test]
    fn test_input_thread_panic_goes_to_log() {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(log::LevelFilter::Trace);
        install_panic_hook();
        install_panic_hook();

        let caught = thread::Builder::new()
            .name(INPUT_THREAD_NAME.to_string())
            .spawn(|| panic::catch_unwind(|| panic!("escape sequence overran buffer")).is_err())
            .unwrap()
            .join()
            .unwrap();
        assert!(caught);

        let lines = CAPTURE.0.lock().unwrap();
        let hits = lines
            .iter()
            .filter(|line| line.contains("escape sequence overran buffer"))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_no_path_installs_nothing() {
        init(None).unwrap();
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = init(Some(&dir.path().join("missing").join("debug.log"))).unwrap_err();
        assert!(err.to_string().contains("debug.log"));
    }
}
