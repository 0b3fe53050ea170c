use std::str::FromStr;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,actix_web=info";

/// Output style of the fmt layer, picked with `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl LogFormat {
    /// Reads `LOG_FORMAT`, falling back to [`LogFormat::Full`] when unset or unknown.
    pub fn from_env() -> Self {
        Self::from_var("LOG_FORMAT")
    }

    fn from_var(key: &str) -> Self {
        std::env::var(key)
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let format = LogFormat::from_env();

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Full => registry.with(fmt::layer().with_target(true)).init(),
        LogFormat::Compact => registry.with(fmt::layer().compact().with_target(false)).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert_eq!("FULL".parse::<LogFormat>(), Ok(LogFormat::Full));
        assert_eq!("".parse::<LogFormat>(), Ok(LogFormat::Full));
        assert!("json".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_format_from_env_file() {
        let path = std::env::temp_dir().join(format!("store-rating-log-{}.env", std::process::id()));
        std::fs::write(&path, "STORE_RATING_TEST_LOG_FORMAT=compact\n").unwrap();

        assert!(crate::infrastructure::config::load_env_file_from(&path));
        assert_eq!(LogFormat::from_var("STORE_RATING_TEST_LOG_FORMAT"), LogFormat::Compact);
        assert_eq!(LogFormat::from_var("STORE_RATING_TEST_LOG_FORMAT_UNSET"), LogFormat::Full);

        std::fs::remove_file(&path).unwrap();
    }
}
