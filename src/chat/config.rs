//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved configuration that
//! the binary reads once at startup.  The provider URL and credential may come from the command
//! line or the environment; nothing is reconfigured at runtime.

use std::env;

use arrrg_derive::CommandLine;

use crate::chat::handoff::Handoff;
use crate::client::{API_KEY_ENV, API_URL_ENV, CompletionClient, DEFAULT_API_URL};
use crate::error::{Error, Result};
use crate::types::{KnownModel, Model};

/// Command-line arguments for the yechat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the chat-completions provider.
    #[arrrg(optional, "Provider base URL (default: $YECHAT_API_URL or https://api.openai.com/v1)", "URL")]
    pub api_url: Option<String>,

    /// Bearer credential for the provider.
    #[arrrg(optional, "Provider API key (default: $YECHAT_API_KEY)", "KEY")]
    pub api_key: Option<String>,

    /// Model to request replies from.
    #[arrrg(optional, "Model to use (default: gpt-3.5-turbo)", "MODEL")]
    pub model: Option<String>,

    /// Opening message for the first chat.
    #[arrrg(optional, "Send this message as soon as the chat opens", "TEXT")]
    pub message: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Resolved configuration for the chat application.
#[derive(Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Provider base URL.
    pub api_url: String,

    /// Bearer credential.
    pub api_key: String,

    /// Model sent with every request.
    pub model: Model,

    /// Opening message for the first chat, if any.
    pub message: Option<String>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Resolves configuration from arguments and the process environment.
    ///
    /// Each value comes from the command line if given, then the environment, then the default.
    /// There is no default credential.
    pub fn from_env(args: ChatArgs) -> Result<Self> {
        Self::resolve(args, |key| env::var(key).ok())
    }

    /// Resolves configuration from arguments and an arbitrary variable lookup.
    pub fn resolve<F>(args: ChatArgs, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = args
            .api_url
            .or_else(|| lookup(API_URL_ENV))
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_key = args
            .api_key
            .or_else(|| lookup(API_KEY_ENV))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::authentication(format!(
                    "API key not provided; pass --api-key or set {API_KEY_ENV}"
                ))
            })?;
        url::Url::parse(&api_url).map_err(|err| {
            Error::configuration(format!("invalid provider URL {api_url:?}: {err}"))
        })?;
        let model = args
            .model
            .filter(|model| !model.trim().is_empty())
            .map(|model| model.parse().unwrap_or(Model::Custom(model)))
            .unwrap_or(Model::Known(KnownModel::Gpt35Turbo));
        Ok(Self {
            api_url,
            api_key,
            model,
            message: args.message,
            use_color: !args.no_color,
        })
    }

    /// Builds the completion client described by this configuration.
    pub fn client(&self) -> Result<CompletionClient> {
        Ok(CompletionClient::with_options(
            Some(self.api_key.clone()),
            Some(self.api_url.clone()),
            None,
        )?
        .with_model(self.model.clone()))
    }

    /// The opening message as a handoff for the first session.
    pub fn handoff(&self) -> Handoff {
        Handoff::from(self.message.clone())
    }
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("message", &self.message)
            .field("use_color", &self.use_color)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_with_key_from_environment() {
        let config =
            ChatConfig::resolve(ChatArgs::default(), lookup(&[(API_KEY_ENV, "sk-env")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_key, "sk-env");
        assert!(config.use_color);
        assert!(config.message.is_none());
        assert!(!config.handoff().is_pending());
    }

    #[test]
    fn arguments_win_over_environment() {
        let args = ChatArgs {
            api_url: Some("http://localhost:8080/v1".to_string()),
            api_key: Some("sk-arg".to_string()),
            model: Some("gpt-4o".to_string()),
            message: Some("Tell me about your art".to_string()),
            no_color: true,
        };
        let env = lookup(&[
            (API_KEY_ENV, "sk-env"),
            (API_URL_ENV, "https://elsewhere.example.com/v1"),
        ]);
        let config = ChatConfig::resolve(args, env).unwrap();
        assert_eq!(config.api_url, "http://localhost:8080/v1");
        assert_eq!(config.api_key, "sk-arg");
        assert!(!config.use_color);
        assert_eq!(config.model, Model::Known(KnownModel::Gpt4o));
        assert_eq!(config.client().unwrap().model(), &config.model);
        assert_eq!(config.handoff().peek(), Some("Tell me about your art"));
    }

    #[test]
    fn model_defaults_and_custom_names() {
        let env = lookup(&[(API_KEY_ENV, "sk-env")]);
        let config = ChatConfig::resolve(ChatArgs::default(), &env).unwrap();
        assert_eq!(config.model, Model::Known(KnownModel::Gpt35Turbo));
        assert_eq!(config.client().unwrap().model().to_string(), "gpt-3.5-turbo");

        let args = ChatArgs {
            model: Some("local-llama".to_string()),
            ..ChatArgs::default()
        };
        let config = ChatConfig::resolve(args, &env).unwrap();
        assert_eq!(config.model, Model::Custom("local-llama".to_string()));
        let request = config.client().unwrap().request_for("hi");
        assert_eq!(request.model.to_string(), "local-llama");
    }

    #[test]
    fn url_from_environment() {
        let env = lookup(&[
            (API_KEY_ENV, "sk-env"),
            (API_URL_ENV, "https://proxy.example.com/v1"),
        ]);
        let config = ChatConfig::resolve(ChatArgs::default(), env).unwrap();
        assert_eq!(config.api_url, "https://proxy.example.com/v1");
        assert_eq!(config.client().unwrap().base_url(), "https://proxy.example.com/v1");
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = ChatConfig::resolve(ChatArgs::default(), lookup(&[])).unwrap_err();
        assert!(err.is_authentication());
        let err = ChatConfig::resolve(ChatArgs::default(), lookup(&[(API_KEY_ENV, "  ")]))
            .unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn bad_url_is_a_configuration_error() {
        let args = ChatArgs {
            api_url: Some("nowhere".to_string()),
            ..ChatArgs::default()
        };
        let err = ChatConfig::resolve(args, lookup(&[(API_KEY_ENV, "sk")])).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn debug_redacts_key() {
        let config =
            ChatConfig::resolve(ChatArgs::default(), lookup(&[(API_KEY_ENV, "sk-secret")]))
                .unwrap();
        assert!(!format!("{config:?}").contains("sk-secret"));
    }
}
