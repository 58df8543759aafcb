//! Core pieces of the TestPilot prompt relay: the completion-API client
//! and its configuration.

pub mod chat;
pub mod config;
mod error;
mod fs_ext;

pub use chat::CompletionClient;
pub use config::RelayConfig;
pub use error::{Error, Result};
