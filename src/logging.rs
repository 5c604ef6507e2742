//! Logging setup for the smb-shares binary.
//!
//! Library code logs through `tracing` macros; this module installs a stderr
//! subscriber so those events reach the operator. `RUST_LOG` takes precedence
//! over the verbosity flag when set.

use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

/// Log verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only
    #[default]
    Quiet,
    /// Debug level
    Verbose,
}

impl Verbosity {
    /// Pick a verbosity from the `-v` flag.
    pub fn from_flag(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Quiet
        }
    }

    /// Get the tracing level filter for this verbosity.
    pub fn as_level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::WARN,
            Verbosity::Verbose => LevelFilter::DEBUG,
        }
    }
}

/// Initialize stderr logging.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(verbosity.as_level_filter().into())
        .from_env_lossy();

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(Verbosity::from_flag(false), Verbosity::Quiet);
        assert_eq!(Verbosity::Quiet.as_level_filter(), LevelFilter::WARN);
        assert_eq!(Verbosity::from_flag(true).as_level_filter(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Verbose);
    }
}
