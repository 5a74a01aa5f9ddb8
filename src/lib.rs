//! Chess against a UCI engine: board perspective, click-to-move selection,
//! turn order, move history and game-over detection.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod ui;

pub use config::SessionConfig;
pub use error::{ConfigError, EngineError, RulesError, SessionError};
pub use models::{InputEvent, Phase, Session};
