//! Tracing subscriber setup.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogFormat;

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber, writing to stderr so stdout stays free for
/// script output. `RUST_LOG` overrides the default `info` filter.
///
/// A subscriber installed earlier wins; the failure is logged, not returned.
pub fn init(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if let Err(error) = installed {
        warn!(error = %error, "tracing init failed");
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(LogFormat::Json)]
    #[case(LogFormat::Pretty)]
    fn repeated_initialisation_is_harmless(#[case] format: LogFormat) {
        init(format);
        init(format);
    }
}
