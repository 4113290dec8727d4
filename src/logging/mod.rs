//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels
//! - Console output for interactive runs
//! - JSON log files with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use courtside::logging::init_logging;
//! use courtside::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the completion of one recipe
///
/// # Example
///
/// ```no_run
/// use courtside::log_recipe_complete;
/// use std::time::Duration;
///
/// log_recipe_complete!("standings", 30, 2, Duration::from_millis(850));
/// ```
#[macro_export]
macro_rules! log_recipe_complete {
    ($recipe:expr, $records:expr, $skipped:expr, $duration:expr) => {
        tracing::info!(
            recipe = %$recipe,
            records = $records,
            skipped = $skipped,
            duration_ms = $duration.as_millis() as u64,
            "Recipe completed"
        )
    };
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    #[test]
    fn test_log_recipe_complete_as_match_arm() {
        let outcome: Result<(), String> = Ok(());
        match outcome {
            Ok(()) => crate::log_recipe_complete!("standings", 30usize, 0usize, Duration::from_millis(5)),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
