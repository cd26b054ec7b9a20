use std::env;
use std::str::FromStr;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Largest payload the CLI will read by default (16 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log: LogConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Pretty-print JSON written to stdout.
    pub pretty: bool,
    pub max_input_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogConfig {
                format: parse_env_or("BLABLA_LOG_FORMAT", LogFormat::Pretty),
            },
            output: OutputConfig {
                pretty: parse_env_or("BLABLA_PRETTY_OUTPUT", true),
                max_input_bytes: parse_env_or("BLABLA_MAX_INPUT_BYTES", DEFAULT_MAX_INPUT_BYTES),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Log format from `BLABLA_LOG_FORMAT`, read without logging.
///
/// Used to install the subscriber before [`Config::from_env`] runs, so its
/// warnings about invalid values are not dropped. An invalid value falls back
/// to [`LogFormat::Pretty`] here and is reported by `Config::from_env`.
pub fn log_format_from_env() -> LogFormat {
    env::var("BLABLA_LOG_FORMAT")
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(LogFormat::Pretty)
}
