//! A single-turn persona chat over a hosted chat-completions provider.
//!
//! [`CompletionClient`] turns one piece of user text into one reply and never fails; faults
//! surface as [`FALLBACK_REPLY`].  [`chat::ChatSession`] owns the transcript, allows one
//! outstanding reply at a time, and publishes its state to any number of subscribers.

pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod observability;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{
    Completion, CompletionClient, DEFAULT_API_URL, FALLBACK_REPLY, Generate, PERSONA,
};
pub use client_logger::ClientLogger;
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use types::*;
