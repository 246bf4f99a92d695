use std::env;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use url::Url;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{COMPLETION_DURATION, COMPLETION_FALLBACKS, COMPLETION_REQUESTS};
use crate::types::{
    ChatCompletionRequest, ChatCompletionResponse, ErrorResponse, KnownModel, Model,
};

/// Provider base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
/// Environment variable holding the bearer credential.
pub const API_KEY_ENV: &str = "YECHAT_API_KEY";
/// Environment variable holding the provider base URL.
pub const API_URL_ENV: &str = "YECHAT_API_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Sampling temperature sent with every request.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Output bound sent with every request.
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// The reply that stands in for the assistant whenever a completion fails.
pub const FALLBACK_REPLY: &str = "Sorry, I had trouble responding. Please try again.";

/// The persona directive prepended to every request as the system message.
pub const PERSONA: &str = "You are Kanye West, also known as Ye\u{2014}one of the most influential, controversial, and creative minds in music, fashion, and culture. You speak in a raw, unfiltered, and philosophical way, often making bold claims and visionary statements. You reference art, music, and innovation frequently, and you are confident in your genius.

Your speech is poetic, sometimes cryptic, and you love making unexpected connections between ideas. You can be humorous, but also profound. You embrace contradiction and challenge conventional thinking. You often compare yourself to great historical figures and talk about pushing boundaries.

You never play it safe\u{2014}you speak with passion, emotion, and conviction. Your language is spontaneous, sometimes erratic, but always captivating. Keep responses engaging, deep, and full of Kanye-like energy.";

/// Something that turns one piece of user text into one reply.
///
/// Implementations must always resolve to displayable text.  Failures are expected to be folded
/// into the returned string so that the caller never needs an error branch.
#[async_trait::async_trait]
pub trait Generate: Send + Sync {
    /// Produce the reply for `text`.
    async fn generate(&self, text: &str) -> String;
}

#[async_trait::async_trait]
impl<G: Generate + ?Sized> Generate for Arc<G> {
    async fn generate(&self, text: &str) -> String {
        (**self).generate(text).await
    }
}

/// The outcome of one completion, before it is collapsed to plain text.
#[derive(Debug, Clone)]
pub enum Completion {
    /// The provider's text, verbatim.
    Success(String),
    /// The fallback reply, with the error it replaced.
    Fallback {
        /// Text to show in place of a reply.
        text: String,
        /// What went wrong.
        error: Error,
    },
}

impl Completion {
    /// The text to display for this completion.
    pub fn text(&self) -> &str {
        match self {
            Completion::Success(text) => text,
            Completion::Fallback { text, .. } => text,
        }
    }

    /// Consume the completion, keeping only its display text.
    pub fn into_text(self) -> String {
        match self {
            Completion::Success(text) => text,
            Completion::Fallback { text, .. } => text,
        }
    }

    /// True if the provider's answer was replaced by the fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Completion::Fallback { .. })
    }

    /// The error behind a fallback.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Completion::Success(_) => None,
            Completion::Fallback { error, .. } => Some(error),
        }
    }
}

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// Every request carries the persona directive and exactly one user message; the client keeps
/// no conversation memory between calls.
#[derive(Clone)]
pub struct CompletionClient {
    api_key: String,
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
    model: Model,
    persona: String,
    temperature: f32,
    max_tokens: u32,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl CompletionClient {
    /// Create a new completion client.
    ///
    /// The API key can be provided directly or read from the YECHAT_API_KEY environment
    /// variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var(API_KEY_ENV).map_err(|_| {
                Error::authentication(format!(
                    "API key not provided and {API_KEY_ENV} environment variable not set"
                ))
            })?,
        };

        let base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Url::parse(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
            model: Model::Known(KnownModel::Gpt35Turbo),
            persona: PERSONA.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            logger: None,
        })
    }

    /// Attach a logger that sees every request, response, and absorbed failure.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Use a different model.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Use a different persona directive.
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// The configured provider base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The model sent with each request.
    pub fn model(&self) -> &Model {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| Error::authentication("API key is not a valid header value"))?;
        bearer.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Build the request for one piece of user text.
    pub fn request_for(&self, text: &str) -> ChatCompletionRequest {
        ChatCompletionRequest::single_turn(
            self.model.clone(),
            &self.persona,
            text,
            self.temperature,
            self.max_tokens,
        )
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };
        log::error!("completion provider returned {status}: {error_body}");

        let detail = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or_default();
        let error_message = detail.message.unwrap_or_else(|| error_body.clone());

        match status_code {
            400 => Error::bad_request(error_message, detail.param),
            401 => Error::authentication(error_message),
            403 => Error::permission(error_message),
            404 => Error::not_found(error_message),
            408 => Error::timeout(error_message, None),
            429 => Error::rate_limit(error_message, retry_after),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(error_message, retry_after),
            _ => Error::api(status_code, detail.error_type, error_message),
        }
    }

    /// Send a request and return the typed response or the typed error.
    pub async fn send(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let url = self.endpoint();
        if let Some(logger) = &self.logger {
            logger.log_request(request);
        }
        log::debug!("POST {url} model={}", request.model);

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers()?)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let response = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                Error::serialization(
                    format!("Failed to parse response: {}", e),
                    Some(Box::new(e)),
                )
            })?;
        if let Some(logger) = &self.logger {
            logger.log_response(&response);
        }
        Ok(response)
    }

    /// Complete one piece of user text, keeping the failure visible.
    pub async fn complete(&self, text: &str) -> Completion {
        COMPLETION_REQUESTS.click();
        let start = Instant::now();
        let request = self.request_for(text);
        let outcome = self.send(&request).await.and_then(|response| {
            response
                .first_text()
                .map(str::to_string)
                .ok_or_else(|| Error::serialization("response contained no choices", None))
        });
        COMPLETION_DURATION.add(start.elapsed().as_secs_f64());
        match outcome {
            Ok(text) => Completion::Success(text),
            Err(error) => self.fallback(error),
        }
    }

    fn fallback(&self, error: Error) -> Completion {
        COMPLETION_FALLBACKS.click();
        log::warn!(
            "completion {}; replacing with fallback reply: {error}",
            describe_fault(&error)
        );
        if let Some(logger) = &self.logger {
            logger.log_failure(&error);
        }
        Completion::Fallback {
            text: FALLBACK_REPLY.to_string(),
            error,
        }
    }
}

/// Short operator-facing summary of an absorbed fault, e.g. `rate limited (HTTP 429)`.
fn describe_fault(error: &Error) -> String {
    let kind = if error.is_rate_limit() {
        "rate limited"
    } else if error.is_timeout() {
        "timed out"
    } else if error.is_connection() {
        "unreachable"
    } else if error.is_server_error() {
        "provider failure"
    } else {
        "failed"
    };
    match error.status_code() {
        Some(status) => format!("{kind} (HTTP {status})"),
        None => kind.to_string(),
    }
}

#[async_trait::async_trait]
impl Generate for CompletionClient {
    async fn generate(&self, text: &str) -> String {
        match AssertUnwindSafe(self.complete(text)).catch_unwind().await {
            Ok(completion) => completion.into_text(),
            Err(_) => {
                COMPLETION_FALLBACKS.click();
                log::error!("completion panicked; replacing with fallback reply");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

impl fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}
