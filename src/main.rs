use maze_carver::{app, config::Config, logging};

fn main() -> std::io::Result<()> {
    // Prints help/version or the parse error and exits with clap's status codes
    let config = Config::from_args(std::env::args_os()).unwrap_or_else(|e| e.exit());

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = match &config.log_file {
        Some(path) => Some(logging::init(path, config.log_level)?),
        None => None,
    };

    let mut stdout = std::io::stdout();
    app::setup_terminal(&mut stdout)?;
    let result = app::run(&mut stdout, &config);
    app::restore_terminal(&mut stdout)?;
    if let Err(e) = &result {
        tracing::error!("[main] app exited with error: {}", e);
    }
    result
}
