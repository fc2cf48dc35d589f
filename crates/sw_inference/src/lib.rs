pub mod chat;
pub mod prompts;

pub use chat::{ChatConfig, ChatModel, SamplingParams};
pub use prompts::OutputStyle;
