use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chatrelay_sdk::client::AssistantClient;
use chatrelay_sdk::openai::OpenAIAssistantsClient;

use crate::config::OpenAIConfig;

pub fn create_assistant_client(config: &OpenAIConfig) -> anyhow::Result<Arc<dyn AssistantClient>> {
    let api_key = config.api_key()?;

    let mut client = OpenAIAssistantsClient::new(api_key)
        .context("Failed to create OpenAI client")?
        .with_timeout(Duration::from_secs(config.request_timeout_secs))?;

    if let Some(base_url) = config.base_url.as_deref().filter(|u| !u.is_empty()) {
        client = client.with_base_url(base_url);
    }

    Ok(Arc::new(client))
}
