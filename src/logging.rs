/// Structured logging for the flow monitor.
///
/// Context-rich leveled logging with component and gauge identifiers.
/// Console output by default, with an optional append-only log file for
/// unattended operation. Fetch failures are classified by kind so transient
/// network blips log quieter than schema drift.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::FetchError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Usgs,
    Render,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Usgs => write!(f, "USGS"),
            Component::Render => write!(f, "RENDER"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to emit
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>) {
        *LOGGER.lock().unwrap() = Some(Logger { min_level, log_file });
    }

    fn log(&self, level: LogLevel, component: Component, gauge_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let gauge_part = gauge_id.map(|g| format!(" [{}]", g)).unwrap_or_default();
        let entry = format!("{} {} {}{}: {}", timestamp, level, component, gauge_part, message);

        match level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", entry),
            LogLevel::Info | LogLevel::Debug => println!("{}", entry),
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>) {
    Logger::init(min_level, log_file.map(String::from));
}

pub fn info(component: Component, gauge_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, component, gauge_id, message);
    }
}

pub fn warn(component: Component, gauge_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, component, gauge_id, message);
    }
}

pub fn error(component: Component, gauge_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, component, gauge_id, message);
    }
}

pub fn debug(component: Component, gauge_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, component, gauge_id, message);
    }
}

// ---------------------------------------------------------------------------
// Fetch failure classification
// ---------------------------------------------------------------------------

/// Log level appropriate for a fetch failure.
///
/// Network failures and empty feeds are routine for a field gauge (cell
/// modem dropouts, winter ice) and log as warnings. Schema drift and server
/// errors indicate something changed upstream and log as errors.
pub fn classify_fetch_failure(err: &FetchError) -> LogLevel {
    match err {
        FetchError::NetworkError(_) => LogLevel::Warning,
        FetchError::EmptyData => LogLevel::Warning,
        FetchError::ServerError(_) => LogLevel::Error,
        FetchError::SchemaError(_) => LogLevel::Error,
    }
}

/// Log a fetch failure at its classified severity.
pub fn log_fetch_failure(gauge_id: &str, err: &FetchError) {
    let message = format!("fetch failed: {}", err);
    match classify_fetch_failure(err) {
        LogLevel::Error => error(Component::Usgs, Some(gauge_id), &message),
        _ => warn(Component::Usgs, Some(gauge_id), &message),
    }
}
