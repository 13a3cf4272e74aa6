//! Shared logging utilities for consistent tracing across all units of a run

use crate::types::UnitId;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Build the per-crate filter directive for a base level
pub fn filter_directive(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!(
        "orchestrator={base_level},producer={base_level},aggregator={base_level},shared={base_level}"
    )
}

/// Initialize the stdout tracing subscriber with an optional log level
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = filter_directive(log_level);

    fmt()
        .with_env_filter(EnvFilter::new(&env_filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for unit-aware info logging
#[macro_export]
macro_rules! process_info {
    ($unit:expr, $($arg:tt)*) => {
        tracing::info!(
            unit = %$unit,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for unit-aware warning logging
#[macro_export]
macro_rules! process_warn {
    ($unit:expr, $($arg:tt)*) => {
        tracing::warn!(
            unit = %$unit,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for unit-aware error logging
#[macro_export]
macro_rules! process_error {
    ($unit:expr, $($arg:tt)*) => {
        tracing::error!(
            unit = %$unit,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for unit-aware debug logging
#[macro_export]
macro_rules! process_debug {
    ($unit:expr, $($arg:tt)*) => {
        tracing::debug!(
            unit = %$unit,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(unit: &UnitId, details: &str) {
    info!(
        unit = %unit,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(unit: &UnitId, reason: &str) {
    info!(
        unit = %unit,
        timestamp = format_timestamp(),
        "🛑 Shutting down: {}",
        reason
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(unit: &UnitId, context: &str, error: &dyn std::fmt::Display) {
    error!(
        unit = %unit,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(unit: &UnitId, message: &str) {
    info!(
        unit = %unit,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}
