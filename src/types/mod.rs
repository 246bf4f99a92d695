// Public modules
pub mod chat_completion;
pub mod message;
pub mod model;

// Re-exports
pub use chat_completion::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessageParam, Choice, ChoiceMessage,
    ErrorDetail, ErrorResponse, WireRole,
};
pub use message::{Message, MessageRole};
pub use model::{KnownModel, Model};
