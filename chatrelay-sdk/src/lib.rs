//! # chatrelay SDK
//!
//! Async client for hosted assistant conversations: threads hold messages,
//! runs invoke an assistant against a thread and are polled until they finish.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatrelay_sdk::client::AssistantClient;
//! use chatrelay_sdk::openai::OpenAIAssistantsClient;
//! use chatrelay_sdk::types::MessageRole;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAIAssistantsClient::new("your-api-key")?;
//!     let thread = client.create_thread().await?;
//!     client
//!         .create_message(&thread.id, MessageRole::User, "Hello!")
//!         .await?;
//!     let run = client.create_run(&thread.id, "asst_123").await?;
//!     let run = client.retrieve_run(&thread.id, &run.id).await?;
//!     println!("Run status: {}", run.status);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod openai;
pub mod types;
