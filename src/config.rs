//! Endpoint and timing settings, loaded from TOML and overridden from the environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_PARSER_URL: &str = "http://127.0.0.1:8080/travelata-parser";
const DEFAULT_BOT_URL: &str = "http://127.0.0.1:8080/telegram-bot";

/// Monitor settings, merged from the config file, environment and flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Deal parser endpoint
    #[serde(default = "default_parser_url")]
    pub parser_url: String,

    /// Bot endpoint that relays deals to Telegram
    #[serde(default = "default_bot_url")]
    pub bot_url: String,

    /// Seconds between automatic parse + refresh cycles in watch mode
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Pause between two bot dispatches in milliseconds
    #[serde(default = "default_dispatch_delay_ms")]
    pub dispatch_delay_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_parser_url() -> String {
    DEFAULT_PARSER_URL.to_string()
}

fn default_bot_url() -> String {
    DEFAULT_BOT_URL.to_string()
}

fn default_refresh_interval_secs() -> u64 {
    600
}

fn default_dispatch_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parser_url: default_parser_url(),
            bot_url: default_bot_url(),
            refresh_interval_secs: default_refresh_interval_secs(),
            dispatch_delay_ms: default_dispatch_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("hot-tours").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("TOURS_PARSER_URL") {
            self.parser_url = url;
        }

        if let Ok(url) = std::env::var("TOURS_BOT_URL") {
            self.bot_url = url;
        }

        if let Ok(interval) = std::env::var("TOURS_INTERVAL") {
            match interval.parse() {
                Ok(secs) => self.refresh_interval_secs = secs,
                Err(_) => warn!("Ignoring TOURS_INTERVAL={:?}, expected seconds", interval),
            }
        }

        if let Ok(delay) = std::env::var("TOURS_DELAY") {
            match delay.parse() {
                Ok(ms) => self.dispatch_delay_ms = ms,
                Err(_) => warn!("Ignoring TOURS_DELAY={:?}, expected milliseconds", delay),
            }
        }

        self
    }

    /// Interval between automatic refresh cycles.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Pause between two dispatches.
    pub fn dispatch_delay(&self) -> Duration {
        Duration::from_millis(self.dispatch_delay_ms)
    }

    /// Timeout applied to each HTTP request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Output format for the deal board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.parser_url, DEFAULT_PARSER_URL);
        assert_eq!(config.bot_url, DEFAULT_BOT_URL);
        assert_eq!(config.refresh_interval_secs, 600);
        assert_eq!(config.dispatch_delay_ms, 1000);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.format, OutputFormat::Table);
    }

    #[test]
    fn test_durations() {
        let config = Config::new();
        assert_eq!(config.refresh_interval(), Duration::from_millis(600_000));
        assert_eq!(config.dispatch_delay(), Duration::from_millis(1000));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_interval_clamped() {
        let config = Config { refresh_interval_secs: 0, ..Config::default() };
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        let err = "invalid".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            parser_url = "https://functions.example.net/parser"
            refresh_interval_secs = 300
            format = "markdown"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.parser_url, "https://functions.example.net/parser");
        assert_eq!(config.bot_url, DEFAULT_BOT_URL);
        assert_eq!(config.refresh_interval_secs, 300);
        assert_eq!(config.dispatch_delay_ms, 1000);
        assert_eq!(config.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            bot_url = "https://functions.example.net/bot"
            dispatch_delay_ms = 250
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.bot_url, "https://functions.example.net/bot");
        assert_eq!(config.dispatch_delay_ms, 250);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let err = Config::from_file("/nonexistent/path/config.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs = 5").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_config_with_env() {
        let orig_parser = std::env::var("TOURS_PARSER_URL").ok();
        let orig_delay = std::env::var("TOURS_DELAY").ok();
        let orig_interval = std::env::var("TOURS_INTERVAL").ok();

        std::env::set_var("TOURS_PARSER_URL", "http://parser.local/deals");
        std::env::set_var("TOURS_DELAY", "1500");
        std::env::set_var("TOURS_INTERVAL", "not_a_number");

        let config = Config::new().with_env();
        assert_eq!(config.parser_url, "http://parser.local/deals");
        assert_eq!(config.dispatch_delay_ms, 1500);
        // Invalid values are ignored
        assert_eq!(config.refresh_interval_secs, 600);

        match orig_parser {
            Some(v) => std::env::set_var("TOURS_PARSER_URL", v),
            None => std::env::remove_var("TOURS_PARSER_URL"),
        }
        match orig_delay {
            Some(v) => std::env::set_var("TOURS_DELAY", v),
            None => std::env::remove_var("TOURS_DELAY"),
        }
        match orig_interval {
            Some(v) => std::env::set_var("TOURS_INTERVAL", v),
            None => std::env::remove_var("TOURS_INTERVAL"),
        }
    }
}
