//! Logging macros for ergonomic message formatting.
//!
//! These macros format eagerly at the call site, like `println!`; use the
//! `logf`/`*_with` methods when rendering should be deferred to the
//! dispatcher. Each macro returns the call's `Result` so unknown-level and
//! future call-boundary errors stay visible.
//!
//! # Examples
//!
//! ```
//! use fanlog::prelude::*;
//! use fanlog::{attrs, info};
//!
//! let logger = Logger::new();
//!
//! info!(logger, "server started").unwrap();
//!
//! let port = 8080;
//! info!(logger, "listening on port {}", port).unwrap();
//!
//! let tagged = attrs! { "service" => "api", "port" => port };
//! logger.info_with("ready", vec![], tagged).unwrap();
//! ```

/// Log a message at an explicit level with automatic formatting.
///
/// # Examples
///
/// ```
/// # use fanlog::prelude::*;
/// # let logger = Logger::new();
/// use fanlog::log;
/// log!(logger, Level::Info, "simple message").unwrap();
/// log!(logger, Level::Error, "error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message (without terminating; see
/// [`Loggable::fatal_exit`](crate::Loggable::fatal_exit) for the terminal
/// variant).
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}

/// Build an [`AttrSet`](crate::AttrSet) from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use fanlog::attrs;
///
/// let empty = attrs! {};
/// assert!(empty.is_empty());
///
/// let set = attrs! { "user" => "alice", "attempts" => 3, "admin" => false };
/// assert_eq!(set.len(), 3);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::AttrSet::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut set = $crate::AttrSet::new();
        $( set.set($key, $value); )+
        set
    }};
}
