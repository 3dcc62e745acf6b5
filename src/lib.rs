//! Tint - colored highlights that follow document edits
//!
//! This crate keeps per-document sets of colored, non-overlapping range
//! annotations in sync with text edits, renders them through a host
//! [`render::Renderer`] and persists them through a host
//! [`persistence::Storage`]. Hosts drive it Elm-style: send a [`Msg`] to
//! [`update::update`] and perform the returned [`Cmd`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod highlight;
pub mod messages;
pub mod model;
pub mod persistence;
pub mod render;
pub mod session;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::HighlighterConfig;
pub use error::HighlightError;
pub use messages::Msg;
pub use session::Session;
