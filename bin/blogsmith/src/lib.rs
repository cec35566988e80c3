//! blogsmith CLI library
//!
//! Command implementations and logging setup used by the `blogsmith` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use blogsmith::cmd;
//!
//! // Build the blog found in the current directory
//! cmd::build::run(Path::new("."), None, None).unwrap();
//! ```

pub mod cmd;

pub use blogsmith_core::BuildConfig;
pub use blogsmith_generator::{BuildStats, Builder};

/// Log level for the given verbosity flags.
///
/// `quiet` wins over `verbose`: quiet = WARN, 0 = INFO, 1 = DEBUG, 2+ = TRACE.
pub fn log_level(verbose: u8, quiet: bool) -> tracing::Level {
    if quiet {
        return tracing::Level::WARN;
    }
    match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Initialize tracing with the specified verbosity level.
///
/// Directives from `RUST_LOG` are combined with the level chosen by
/// [`log_level`].
///
/// # Example
///
/// ```no_run
/// blogsmith::init_tracing(1, false); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = log_level(verbose, quiet);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
