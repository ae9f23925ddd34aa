use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::io::Write;

use tootview::cli::{parse_args, run_cli_command, CliCommand};
use tootview::config::ReconcilerConfig;
use tootview::logging;
use tootview::replay::{self, ReplayScript};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = parse_args(std::env::args());
    if run_cli_command(&command) {
        return Ok(());
    }
    let CliCommand::Replay(path) = command else {
        return Ok(());
    };

    logging::init();

    let script = ReplayScript::load(&path)?;
    let config = ReconcilerConfig::from_env();
    tracing::info!(
        path = %path.display(),
        steps = script.steps.len(),
        kind = ?script.kind,
        "Replaying collection session"
    );

    let outputs = replay::run(&script, config).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for output in &outputs {
        let line = serde_json::to_string(output).wrap_err("Failed to encode replay output")?;
        writeln!(out, "{}", line)?;
    }
    out.flush()?;

    tracing::info!(outputs = outputs.len(), "Replay finished");
    Ok(())
}
