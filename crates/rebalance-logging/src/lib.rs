//! Tracing subscriber setup shared by the rebalance binaries.
//!
//! `RUST_LOG` always wins. Without it, the filter comes from the verbosity
//! the user asked for on the command line.

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose events are shown by default.
const CRATES: [&str; 3] = ["rebalance_core", "rebalance_stats", "rebalance_cli"];

/// Default filter directive for a verbosity level.
///
/// `-q` gives warnings only, no flag gives info, `-v` gives per-round debug
/// output and `-vv` the full per-queue trace dump.
pub fn default_directive(verbose: u8, quiet: bool) -> String {
    let level = if quiet {
        Level::WARN
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    let level = level.as_str().to_ascii_lowercase();

    let mut directive = String::from("warn");
    for krate in CRATES {
        directive.push(',');
        directive.push_str(krate);
        directive.push('=');
        directive.push_str(&level);
    }
    directive
}

/// Build the filter: `RUST_LOG` if set and valid, else `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbose: u8, quiet: bool) {
    let filter = env_filter(&default_directive(verbose, quiet));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_info() {
        let directive = default_directive(0, false);
        assert!(directive.starts_with("warn,"));
        assert!(directive.contains("rebalance_core=info"));
        assert!(directive.contains("rebalance_cli=info"));
    }

    #[test]
    fn verbosity_levels() {
        assert!(default_directive(1, false).contains("rebalance_core=debug"));
        assert!(default_directive(2, false).contains("rebalance_core=trace"));
        assert!(default_directive(9, false).contains("rebalance_stats=trace"));
    }

    #[test]
    fn quiet_overrides_verbose() {
        assert!(default_directive(2, true).contains("rebalance_core=warn"));
    }

    #[test]
    fn directive_parses() {
        for verbose in 0..3 {
            assert!(EnvFilter::try_new(default_directive(verbose, false)).is_ok());
        }
    }

    #[test]
    fn init_twice_is_harmless() {
        init(0, true);
        init(1, false);
    }
}
