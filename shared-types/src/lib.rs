//! Request and response bodies exchanged between the chatrelay API and its web client.

pub mod chat;
pub mod typescript_gen;

pub use chat::{
    ChatErrorResponse, ChatReplyResponse, ChatRequest, HealthResponse, NewThreadResponse,
    NEW_THREAD_ACTION, NEW_THREAD_MESSAGE,
};
pub use typescript_gen::generate_typescript_definitions;
