//! Shared logging setup for embedders.
//!
//! Provides a consistent tracing configuration so hosts wiring the engine
//! into a service or CLI get the same log shape. The `RUST_LOG` environment
//! variable overrides the verbosity flags when set.

use tracing_subscriber::EnvFilter;

use crate::error::{DataproofError, Result};

/// Initializes structured logging based on verbosity level.
///
/// Diagnostics from the validation pipeline are scoped to the crate; the
/// quiet flag silences everything below errors globally. Installing a
/// second subscriber in the same process fails with an internal error.
///
/// # Arguments
/// * `verbose` - Verbosity level (0=INFO, 1=DEBUG, 2+=TRACE)
/// * `quiet` - If true, only show ERROR level logs
///
/// # Example
/// ```rust,no_run
/// use dataproof::logging::init_logging;
///
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let default_directive = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "dataproof=info",
        (false, 1) => "dataproof=debug",
        (false, _) => "dataproof=trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| DataproofError::internal(format!("Failed to initialize logging: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per test process, so
    // a single test owns both the success and the already-installed paths.
    #[test]
    fn test_init_logging_installs_once() {
        assert!(init_logging(1, false).is_ok());

        let err = init_logging(0, false).unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("Failed to initialize logging"));
    }
}
