//! API Module
//!
//! Upstream chat completion types and response cleanup.

pub mod completion;
pub mod reasoning;

pub use completion::{
    Choice, CompletionRequest, CompletionResponse, ContentPart, Message, MessageContent, Usage,
};
pub use reasoning::strip_reasoning;
