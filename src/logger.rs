use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::fmt;
use std::fs;
use std::path::Path;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "simulation.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Initializes the global logger.
///
/// Call once at the start of `main`. Library code only uses the `log` facade.
///
/// The level comes from `RUST_LOG` (e.g. `RUST_LOG=debug`) and defaults to `info`. Records go to
/// stderr and, if the log directory is writable, to `logs/simulation.log`.
pub fn init() {
    let level = level_filter(std::env::var("RUST_LOG").ok().as_deref());
    let log_file_path = Path::new(LOG_DIR).join(LOG_FILE);

    let mut dispatch = Dispatch::new().level(level).level_for("serde", LevelFilter::Warn).chain(console_sink());

    match file_sink(&log_file_path) {
        Ok(sink) => dispatch = dispatch.chain(sink),
        Err(e) => eprintln!("Logging to console only, cannot open '{}': {}", log_file_path.display(), e),
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("Failed to apply logger configuration: {}", e);
        return;
    }

    log::info!("Logger initialized at level {}.", level);
}

/// Parses a `RUST_LOG` value, falling back to `info` when unset or unknown.
fn level_filter(value: Option<&str>) -> LevelFilter {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(LevelFilter::Info)
}

fn console_sink() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    Dispatch::new().format(move |out, message, record| write_line(out, message, record, colors.color(record.level()))).chain(std::io::stderr())
}

fn file_sink(path: &Path) -> std::io::Result<Dispatch> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = fern::log_file(path)?;

    Ok(Dispatch::new().format(|out, message, record| write_line(out, message, record, record.level())).chain(file))
}

fn write_line(out: FormatCallback, message: &fmt::Arguments, record: &Record, level: impl fmt::Display) {
    out.finish(format_args!("[{} {} {}] {}", Local::now().format(TIMESTAMP_FORMAT), level, record.target(), message))
}
