//! Logging hook for completion client operations.
//!
//! [`ClientLogger`] lets an embedder capture every exchange passing through
//! [`CompletionClient`](crate::CompletionClient), including the failures the client swallows
//! before they can reach a transcript.

use crate::Error;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse};

/// A trait for logging completion client operations.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Mutex;
/// use yechat::{ClientLogger, ChatCompletionRequest, ChatCompletionResponse, Error};
///
/// struct FailureLog(Mutex<Vec<String>>);
///
/// impl ClientLogger for FailureLog {
///     fn log_request(&self, _: &ChatCompletionRequest) {}
///     fn log_response(&self, _: &ChatCompletionResponse) {}
///     fn log_failure(&self, error: &Error) {
///         self.0.lock().unwrap().push(error.to_string());
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, request: &ChatCompletionRequest);

    /// Log a successfully parsed response.
    fn log_response(&self, response: &ChatCompletionResponse);

    /// Log a failure that the client is about to replace with its fallback text.
    fn log_failure(&self, error: &Error);
}
