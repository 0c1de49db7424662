use anyhow::Context;
use clap::Parser;
use jq_live::actor::EngineConfig;
use jq_live::app;
use jq_live::eval::{EvalOptions, JqShell};
use jq_live::logging;
use jq_live::session::Session;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "jq-live", version, about = "Edit a jq program and watch its output update")]
struct Args {
    /// Start with compact output
    #[arg(short, long)]
    compact: bool,

    /// Start with raw string output
    #[arg(short, long)]
    raw: bool,

    /// Write a debug log to PATH (truncated)
    #[arg(long, value_name = "PATH")]
    debug: Option<PathBuf>,

    /// jq executable to run programs with
    #[arg(long, value_name = "BIN", default_value = "jq")]
    jq: String,

    /// Draw on the main screen instead of the alternate screen
    #[arg(long)]
    no_alt_screen: bool,

    /// Initial program
    #[arg(default_value = ".")]
    program: String,

    /// Input document; standard input when omitted
    file: Option<PathBuf>,
}

fn read_document(file: Option<&PathBuf>) -> anyhow::Result<Vec<u8>> {
    match file {
        Some(path) => std::fs::read(path).with_context(|| format!("cannot read {}", path.display())),
        None => {
            let mut document = Vec::new();
            std::io::stdin()
                .read_to_end(&mut document)
                .context("cannot read standard input")?;
            Ok(document)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    logging::init(args.debug.as_deref())?;

    let document = read_document(args.file.as_ref())?;
    let options = EvalOptions {
        compact: args.compact,
        raw: args.raw,
    };
    let session = Session::new(document, args.program, options, JqShell::new(args.jq));

    let initial = session
        .evaluate()
        .with_context(|| format!("cannot evaluate {:?}", session.input().program()))?;

    let config = EngineConfig {
        alternate_screen: !args.no_alt_screen,
        ..EngineConfig::default()
    };
    log::info!("jq-live starting with {:?}", session.input().program());

    let outcome = app::run(&config, session, initial)?;
    Ok(outcome.into())
}
