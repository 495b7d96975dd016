//! Logging configuration for the relay node.

use eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::args::LogArgs;

/// Build the log filter from command line arguments.
///
/// The filter is built with the following precedence:
/// 1. If `--quiet` is set, only errors are shown
/// 2. Otherwise, start with `RUST_LOG` env var if set, or the verbosity level
/// 3. Apply any custom filter from `--log.filter`
pub fn build_filter(args: &LogArgs) -> EnvFilter {
    if args.quiet {
        return EnvFilter::new(args.base_level());
    }

    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.base_level()));

    if let Some(custom_filter) = &args.filter {
        for directive in custom_filter.split(',') {
            match directive.trim().parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(err) => eprintln!("ignoring invalid log directive {directive:?}: {err}"),
            }
        }
    }

    filter
}

/// Install the global tracing subscriber.
pub fn init_logging(args: &LogArgs) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(build_filter(args));

    if args.json {
        builder
            .json()
            .try_init()
            .map_err(|err| eyre::eyre!("failed to install logger: {err}"))
    } else {
        builder
            .try_init()
            .map_err(|err| eyre::eyre!("failed to install logger: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_filter() {
        let args = LogArgs {
            quiet: true,
            filter: Some("waypoint=trace".to_owned()),
            ..Default::default()
        };
        assert_eq!(build_filter(&args).to_string(), "error");
    }

    #[test]
    fn test_custom_directives_are_added() {
        let args = LogArgs {
            filter: Some("waypoint=trace, not a directive ==".to_owned()),
            ..Default::default()
        };
        let filter = build_filter(&args).to_string();
        assert!(filter.contains("waypoint=trace"), "{filter}");
    }
}
