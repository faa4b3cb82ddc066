//! Logging facilities for viewrecon.
//!
//! All diagnostics flow through a [`Logger`]. By default a logger forwards to
//! the `tracing` crate under the [`targets`] below, so any installed
//! subscriber sees them. A host may install a single [`LogSink`] override
//! (for example a callback into a managed runtime); while one is installed,
//! messages go only to that sink.
//!
//! # Tracing Integration
//!
//! To see logs in a standalone binary, install a subscriber early in `main`:
//!
//! ```ignore
//! use viewrecon_core::logging::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::default());
//! ```
//!
//! # Sink Override
//!
//! ```
//! use std::sync::Arc;
//! use viewrecon_core::logging::{LogLevel, Logger};
//!
//! let logger = Logger::new();
//! logger.set_sink(Some(Arc::new(|level: LogLevel, message: &str| {
//!     eprintln!("{level:?}: {message}");
//! })));
//! viewrecon_core::recon_info!(logger, "context created for view {}", 7);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Once, OnceLock};

use parking_lot::{Mutex, RwLock};
use tracing_subscriber::EnvFilter;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Root target for every viewrecon message.
    pub const CORE: &str = "viewrecon";
}

/// Prefix prepended to messages delivered to a sink override.
pub const MESSAGE_PREFIX: &str = "[recon]";

/// Process-wide default logger.
static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

static SUBSCRIBER_INIT: Once = Once::new();

/// Severity of a log message, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum LogLevel {
    /// Verbose lifecycle detail.
    Debug = 0,
    /// Successful lifecycle events.
    #[default]
    Info = 1,
    /// Recoverable problems.
    Warning = 2,
    /// Failures.
    Error = 3,
}

impl LogLevel {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Debug,
            1 => Self::Info,
            2 => Self::Warning,
            _ => Self::Error,
        }
    }
}

/// A destination for formatted log messages.
pub trait LogSink: Send + Sync {
    /// Receive one message. `message` already carries [`MESSAGE_PREFIX`].
    fn log(&self, level: LogLevel, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(LogLevel, &str) + Send + Sync,
{
    fn log(&self, level: LogLevel, message: &str) {
        self(level, message)
    }
}

/// Level-filtered logger with an optional sink override.
pub struct Logger {
    min_level: AtomicU8,
    sink: RwLock<Option<Arc<dyn LogSink>>>,
}

impl Logger {
    /// Create a logger at [`LogLevel::Info`] with no sink override.
    pub fn new() -> Self {
        Self::with_level(LogLevel::default())
    }

    /// Create a logger with the given minimum level.
    pub fn with_level(level: LogLevel) -> Self {
        Self {
            min_level: AtomicU8::new(level as u8),
            sink: RwLock::new(None),
        }
    }

    /// The process-wide default logger.
    ///
    /// Components constructed without an explicit logger use this one.
    pub fn global() -> &'static Logger {
        GLOBAL_LOGGER.get_or_init(Logger::new)
    }

    /// Install or clear the sink override.
    pub fn set_sink(&self, sink: Option<Arc<dyn LogSink>>) {
        *self.sink.write() = sink;
    }

    /// Returns `true` if a sink override is installed.
    pub fn has_sink(&self) -> bool {
        self.sink.read().is_some()
    }

    /// Set the minimum level; messages below it are dropped.
    pub fn set_level(&self, level: LogLevel) {
        self.min_level.store(level as u8, Ordering::Relaxed);
    }

    /// The current minimum level.
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    /// Returns `true` if a message at `level` would be emitted.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    /// Emit a message.
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        // Clone out of the lock so a sink that logs cannot deadlock us.
        let sink = self.sink.read().clone();
        match sink {
            Some(sink) => {
                let message = format!("{MESSAGE_PREFIX} {args}");
                sink.log(level, &message);
            }
            None => match level {
                LogLevel::Debug => tracing::debug!(target: targets::CORE, "{}", args),
                LogLevel::Info => tracing::info!(target: targets::CORE, "{}", args),
                LogLevel::Warning => tracing::warn!(target: targets::CORE, "{}", args),
                LogLevel::Error => tracing::error!(target: targets::CORE, "{}", args),
            },
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("has_sink", &self.has_sink())
            .finish()
    }
}

/// A sink that keeps every message in memory.
///
/// Useful for hosts that poll diagnostics and for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug-level logger wired to a fresh memory sink.
    pub fn logger() -> (Logger, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::with_level(LogLevel::Debug);
        logger.set_sink(Some(sink.clone()));
        (logger, sink)
    }

    /// Snapshot of the recorded messages.
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    /// Number of recorded messages at `level`.
    pub fn count(&self, level: LogLevel) -> usize {
        self.lines.lock().iter().filter(|(l, _)| *l == level).count()
    }

    /// Returns `true` if any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|(_, m)| m.contains(needle))
    }

    /// Drop all recorded messages.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: LogLevel, message: &str) {
        self.lines.lock().push((level, message.to_owned()));
    }
}

/// Logging configuration for [`init_logging`].
///
/// `env_filter` follows the `tracing-subscriber` filter syntax (e.g. "info",
/// "viewrecon=debug"). When absent, `RUST_LOG` is consulted, then "info".
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub min_level: LogLevel,
}

/// Install a `tracing-subscriber` fmt subscriber and set the global level.
///
/// The subscriber is installed at most once; later calls only update the
/// global logger's level.
pub fn init_logging(config: &LoggingConfig) {
    SUBSCRIBER_INIT.call_once(|| {
        let filter = match &config.env_filter {
            Some(directives) => EnvFilter::new(directives),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };
        // Another subscriber may already be installed by the host.
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
    Logger::global().set_level(config.min_level);
}

/// Log at debug level through a [`Logger`].
#[macro_export]
macro_rules! recon_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logging::LogLevel::Debug, format_args!($($arg)*))
    };
}

/// Log at info level through a [`Logger`].
#[macro_export]
macro_rules! recon_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logging::LogLevel::Info, format_args!($($arg)*))
    };
}

/// Log at warning level through a [`Logger`].
#[macro_export]
macro_rules! recon_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logging::LogLevel::Warning, format_args!($($arg)*))
    };
}

/// Log at error level through a [`Logger`].
#[macro_export]
macro_rules! recon_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logging::LogLevel::Error, format_args!($($arg)*))
    };
}
