//! Session configuration, loaded from an optional TOML file.
//!
//! Every field has a default so a partial file (or none at all) works.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::domain::uci::SearchLimit;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub engine: EngineConfig,
    pub layout: LayoutConfig,
    pub log: LogConfig,
    pub session: TimingConfig,
}

/// How to start the opponent engine and how long it may think.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub path: String,
    pub args: Vec<String>,
    /// Fixed search depth per move
    pub depth: u32,
    /// Fixed think time per move; takes precedence over `depth` when set
    pub movetime_ms: Option<u64>,
    /// Sent as `setoption name <key> value <value>` during the handshake
    pub options: BTreeMap<String, OptionValue>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: "stockfish".to_string(),
            args: Vec::new(),
            depth: 15,
            movetime_ms: None,
            options: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn search_limit(&self) -> SearchLimit {
        match self.movetime_ms {
            Some(ms) => SearchLimit::MoveTimeMs(ms),
            None => SearchLimit::Depth(self.depth),
        }
    }

    /// Options rendered as UCI option values
    pub fn uci_options(&self) -> BTreeMap<String, String> {
        self.options
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }
}

/// A UCI option value as written in TOML
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(n) => write!(f, "{}", n),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

/// Board placement in window pixels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub board_x: f32,
    pub board_y: f32,
    pub square_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        // 600px board centred vertically in an 800px window
        Self {
            board_x: 0.0,
            board_y: 100.0,
            square_size: 75.0,
        }
    }
}

/// Move history panel geometry, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub line_height: u32,
    pub viewport_height: u32,
    /// Pixels scrolled per wheel notch
    pub scroll_step: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            line_height: 30,
            viewport_height: 800,
            scroll_step: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long the result stays on screen before the session closes
    pub close_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: 3000,
        }
    }
}

impl TimingConfig {
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

impl SessionConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(engine = %config.engine.path, "Config loaded successfully");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_classic_layout() {
        let config = SessionConfig::default();
        assert_eq!(config.engine.path, "stockfish");
        assert_eq!(config.engine.search_limit(), SearchLimit::Depth(15));
        assert_eq!(config.layout.square_size * 8.0, 600.0);
        assert_eq!(config.log.line_height, 30);
        assert_eq!(config.session.close_delay(), Duration::from_secs(3));
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(SessionConfig::from_toml("").unwrap(), SessionConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SessionConfig::from_toml(
            r#"
            [engine]
            path = "/usr/games/stockfish"
            movetime_ms = 250

            [engine.options]
            Threads = 2
            "Skill Level" = 5
            Ponder = false
            UCI_Variant = "chess"

            [log]
            viewport_height = 400
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.path, "/usr/games/stockfish");
        assert_eq!(config.engine.depth, 15);
        assert_eq!(config.engine.search_limit(), SearchLimit::MoveTimeMs(250));
        let options = config.engine.uci_options();
        assert_eq!(options["Threads"], "2");
        assert_eq!(options["Skill Level"], "5");
        assert_eq!(options["Ponder"], "false");
        assert_eq!(options["UCI_Variant"], "chess");
        assert_eq!(config.log.viewport_height, 400);
        assert_eq!(config.log.line_height, 30);
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(SessionConfig::from_toml("[engine]\ndepth = \"deep\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[session]\nclose_delay_ms = 10").unwrap();
        let config = SessionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.session.close_delay(), Duration::from_millis(10));

        assert!(SessionConfig::from_file("/nonexistent/session.toml").is_err());
    }
}
