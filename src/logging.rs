//! Subscriber setup for test and demo runs
//!
//! The factory emits `debug` events for build, rebuild, replacement and
//! removal, and `trace` events for every resolution, all under the
//! `generic_factory` target. The subscriber installed here only lets that
//! target through, so a test's own dependencies stay quiet.
//!
//! - `logging-json` - one JSON object per event, for CI log collection
//! - `logging-pretty` - colorful multi-line output for local debugging
//!
//! Without either feature the `init*` functions do nothing.
//!
//! ```rust,ignore
//! use generic_factory::logging;
//!
//! logging::init();
//!
//! // or, to see every resolution
//! logging::builder().trace().pretty().init();
//! ```

use tracing::Level;

/// Target every factory event is emitted under
pub const TARGET: &str = "generic_factory";

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON structured logging (default)
    #[default]
    Json,
    /// Pretty colorful output (development)
    Pretty,
}

/// Builder for the factory's subscriber
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    level: Level,
    format: LogFormat,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Json,
        }
    }
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum level for factory events
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Include per-resolution `trace` events
    pub fn trace(self) -> Self {
        self.with_level(Level::TRACE)
    }

    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    pub fn pretty(mut self) -> Self {
        self.format = LogFormat::Pretty;
        self
    }

    /// `EnvFilter` directive restricting output to the factory's target
    pub fn directive(&self) -> String {
        format!("{}={}", TARGET, self.level.as_str().to_ascii_lowercase())
    }

    /// Install the subscriber as the global default.
    ///
    /// Panics if a global subscriber is already set.
    #[cfg(any(feature = "logging-json", feature = "logging-pretty"))]
    pub fn init(self) {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter = EnvFilter::new(self.directive());
        let registry = tracing_subscriber::registry().with(filter);

        match self.format {
            #[cfg(feature = "logging-json")]
            LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).init(),
            // JSON output needs `logging-json`; fall back to the plain formatter
            #[cfg(not(feature = "logging-json"))]
            LogFormat::Json => registry.with(fmt::layer().with_target(true)).init(),
            LogFormat::Pretty => registry.with(fmt::layer().pretty().with_target(true)).init(),
        }
    }

    #[cfg(not(any(feature = "logging-json", feature = "logging-pretty")))]
    pub fn init(self) {}
}

pub fn builder() -> LoggingBuilder {
    LoggingBuilder::new()
}

/// JSON when `logging-json` is enabled, pretty otherwise
pub fn init() {
    if cfg!(feature = "logging-json") {
        init_json();
    } else {
        init_pretty();
    }
}

/// Factory events at `debug` as JSON, one object per line (shown expanded).
///
/// ```json
/// {
///   "timestamp": "2026-01-01T00:00:00.000Z",
///   "level": "DEBUG",
///   "fields": { "message": "Building container", "scope_id": 1, "components": 2 },
///   "target": "generic_factory"
/// }
/// ```
pub fn init_json() {
    builder().json().init();
}

/// Factory events at `debug`, human readable.
///
/// ```text
///   2026-01-01T00:00:00.000Z DEBUG generic_factory: Building container, scope_id: 1, components: 2
/// ```
pub fn init_pretty() {
    builder().pretty().init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = LoggingBuilder::default();
        assert_eq!(builder.level, Level::DEBUG);
        assert_eq!(builder.format, LogFormat::Json);
        assert_eq!(builder.directive(), "generic_factory=debug");
    }

    #[test]
    fn test_directive_follows_level() {
        assert_eq!(builder().trace().directive(), "generic_factory=trace");
        assert_eq!(
            builder().with_level(Level::WARN).directive(),
            "generic_factory=warn"
        );
    }

    #[test]
    fn test_format_selection() {
        assert_eq!(builder().pretty().format, LogFormat::Pretty);
        assert_eq!(builder().pretty().json().format, LogFormat::Json);
    }
}
