use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A chat-completion model identifier.
///
/// This can be a known model or a custom string for models this crate has never heard of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier
    Custom(String),
}

/// Known chat-completion models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// GPT-3.5 Turbo
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,

    /// GPT-4o
    #[serde(rename = "gpt-4o")]
    Gpt4o,

    /// GPT-4o mini
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
}

impl KnownModel {
    fn as_str(&self) -> &'static str {
        match self {
            KnownModel::Gpt35Turbo => "gpt-3.5-turbo",
            KnownModel::Gpt4o => "gpt-4o",
            KnownModel::Gpt4oMini => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{known_model}"),
            Model::Custom(custom) => write!(f, "{custom}"),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let known = [
            KnownModel::Gpt35Turbo,
            KnownModel::Gpt4o,
            KnownModel::Gpt4oMini,
        ]
        .into_iter()
        .find(|model| model.as_str() == s);
        Ok(match known {
            Some(model) => Model::Known(model),
            None => Model::Custom(s.to_string()),
        })
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_models_serialize_as_wire_names() {
        let model = Model::Known(KnownModel::Gpt35Turbo);
        assert_eq!(serde_json::to_value(&model).unwrap(), json!("gpt-3.5-turbo"));
        assert_eq!(model.to_string(), "gpt-3.5-turbo");
    }

    #[test]
    fn parse_falls_back_to_custom() {
        assert_eq!(
            "gpt-4o".parse::<Model>().unwrap(),
            Model::Known(KnownModel::Gpt4o)
        );
        assert_eq!(
            "ye-2".parse::<Model>().unwrap(),
            Model::Custom("ye-2".to_string())
        );
    }

    #[test]
    fn deserialize_unknown_is_custom() {
        let model: Model = serde_json::from_value(json!("local-llama")).unwrap();
        assert_eq!(model, Model::Custom("local-llama".to_string()));
        let model: Model = serde_json::from_value(json!("gpt-4o-mini")).unwrap();
        assert_eq!(model, Model::Known(KnownModel::Gpt4oMini));
    }
}
