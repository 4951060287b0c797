use crate::error::Result;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self},
    prelude::*,
};

/// Resolved logging options.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub file: Option<PathBuf>,
}

impl LogSettings {
    pub fn from_flags(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Self {
        Self {
            level: level_for(verbosity, quiet),
            file: log_file,
        }
    }
}

/// `--quiet` wins over any `-v`; otherwise each `-v` lowers the threshold one level from WARN.
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

/// Installs the global subscriber: a compact stderr layer plus an optional plain-text file
/// layer, both filtered at `settings.level`.
pub fn setup_logging(settings: &LogSettings) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(settings.level)
        .with(stderr_layer);

    if let Some(path) = &settings.file {
        let file = open_log_file(path)?;
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true);

        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }

    Ok(())
}
