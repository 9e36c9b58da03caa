/// glmath Terminal Demo
///
/// Renders a lit cube or a two-segment arm as ASCII art.
/// Controls:
///   - WASD / Arrow Keys: Rotate (arm: left/right base, up/down upper segment)
///   - E/R: Roll rotation
///   - Mouse drag: Spin the scene
///   - P: Toggle perspective/orthographic
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use glmath_terminal::{Config, TerminalApp};
use std::fs::File;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Sends diagnostics to `--log-file` when given. The alternate screen owns
/// stdout, so nothing is logged to the terminal.
fn init_logging(config: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let Some(path) = &config.log_file else {
        return Ok(None);
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let _guard = init_logging(&config)?;

    let mut app = TerminalApp::new(&config)?;
    app.run()
}
