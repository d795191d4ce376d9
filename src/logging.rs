use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

/// Install a global subscriber writing to `path`.
///
/// The terminal belongs to the renderer, so logs only ever go to a file. The
/// returned guard flushes the background writer when dropped and must be held
/// until the app exits.
pub fn init(path: &Path, level: Level) -> std::io::Result<WorkerGuard> {
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Log file path {:?} has no file name", path),
        )
    })?;
    std::fs::create_dir_all(directory)?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    Ok(guard)
}
