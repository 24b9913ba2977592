use std::io::IsTerminal;
use std::str::FromStr;

use tracing::metadata::LevelFilter;
use tracing_subscriber::{
    filter::FilterFn, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

const DEFAULT_LEVEL: LevelFilter = LevelFilter::WARN;

/// Resolves the `LOG_LEVEL` value, falling back to `warn`.
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value.map_or(DEFAULT_LEVEL, |level| {
        LevelFilter::from_str(level).unwrap_or_else(|_| {
            eprintln!("Invalid log level specified {level}, defaulting to {DEFAULT_LEVEL}");
            DEFAULT_LEVEL
        })
    })
}

/// Logs go to stderr; stdout is reserved for the test report.
pub fn init() {
    let level = level_from(std::env::var("LOG_LEVEL").ok().as_deref());

    tracing_subscriber::Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(false)
                .with_line_number(false)
                .compact()
                .with_ansi(std::io::stderr().is_terminal())
                .with_filter(level)
                .with_filter(FilterFn::new(|metadata| {
                    metadata.target().starts_with("email_tester")
                })),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_defaults_to_warn() {
        assert_eq!(level_from(None), LevelFilter::WARN);
        assert_eq!(level_from(Some("verbose")), LevelFilter::WARN);
    }

    #[test]
    fn test_level_is_parsed() {
        assert_eq!(level_from(Some("debug")), LevelFilter::DEBUG);
        assert_eq!(level_from(Some("off")), LevelFilter::OFF);
    }
}
