#![deny(missing_docs)]
//! Shared logging utilities for the BOIB harvester workspace.
//!
//! This crate provides the `boib_*` logging macros used by the engine and the
//! command-line app, plus the initializers that install the global logger.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! boib_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! boib_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! boib_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! boib_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! boib_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where and how verbosely log records are written.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Maximum level written by every backend.
    pub level: LevelFilter,
    /// Whether records go to stderr/stdout.
    pub terminal: bool,
    /// Optional log file, truncated on startup.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            terminal: true,
            file: None,
        }
    }
}

impl LogSettings {
    /// Maps `-v`/`-q` style counters onto a level, starting from `Info`.
    pub fn with_verbosity(mut self, verbose: u8, quiet: u8) -> Self {
        const LEVELS: [LevelFilter; 6] = [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
            LevelFilter::Trace,
        ];
        let index = (3 + i16::from(verbose) - i16::from(quiet)).clamp(0, 5) as usize;
        self.level = LEVELS[index];
        self
    }
}

/// Installs the global logger described by `settings`.
///
/// Returns the number of backends installed. A file that cannot be created is
/// reported on stderr and skipped; an already installed logger is left alone.
pub fn initialize(settings: &LogSettings) -> usize {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if settings.terminal {
        loggers.push(TermLogger::new(
            settings.level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if let Some(path) = settings.file.as_ref() {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(settings.level, config, file)),
            Err(err) => eprintln!("Warning: could not create log file at {path:?}: {err}"),
        }
    }

    let installed = loggers.len();
    if installed == 0 || CombinedLogger::init(loggers).is_err() {
        return 0;
    }
    installed
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}
