use std::fs::OpenOptions;

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

use crate::config::LoggingConfig;

/// Install the global logger: stderr at the configured level, plus an
/// appending file logger when `file` is set.
///
/// Best-effort: an unopenable log file is skipped and a logger that is
/// already installed is left in place. Returns whether this call installed it.
pub fn init(config: &LoggingConfig) -> bool {
    let level = config.level_filter();
    let log_config = ConfigBuilder::new()
        .set_target_level(log::LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        log_config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = config.file_path() {
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => loggers.push(WriteLogger::new(level, log_config, file)),
            Err(e) => eprintln!("shellglue: cannot open log file {}: {e}", path.display()),
        }
    }

    CombinedLogger::init(loggers).is_ok()
}
