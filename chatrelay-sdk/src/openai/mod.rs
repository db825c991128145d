pub mod client;
pub mod types;

pub use client::OpenAIAssistantsClient;
pub use types::*;
