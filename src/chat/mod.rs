//! Chat application module for single-turn conversations with the persona.
//!
//! This module holds the conversation session controller and the pieces the `yechat` REPL
//! builds around it:
//!
//! - One outstanding reply at a time, guarded by a busy flag
//! - An opening message handed off from outside, sent at most once
//! - Slash commands for starting over and reviewing the transcript
//!
//! # Architecture
//!
//! - [`session`]: the controller, its append-only log and observable state
//! - [`handoff`]: the single-use opening message
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: Slash command parsing
//! - [`render`]: terminal display of the transcript

mod commands;
mod config;
pub mod handoff;
mod render;
pub mod session;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use handoff::Handoff;
pub use render::{ASSISTANT_LABEL, PlainTextRenderer, Renderer, USER_LABEL, format_message};
pub use session::{ChatSession, SessionState};
