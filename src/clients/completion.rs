//! Language-completion collaborator.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One completion request, carrying the durable session identity so the
/// agent server can preserve conversational context.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub text: String,
    pub room_id: String,
    pub user_id: String,
    pub user_name: String,
}

/// One element of the agent's reply array.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionReply {
    #[serde(default)]
    pub text: String,
}

/// Produces a conversational reply for user input.
///
/// The pipeline inspects the first reply's `text`; an empty array or empty
/// text is an application-level error handled there, not here.
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Vec<CompletionReply>>;
}

/// HTTP client for the agent server's `POST {base}/{agent_id}/message` route.
pub struct AgentCompletionClient {
    base_url: String,
    agent_id: String,
    client: reqwest::Client,
}

impl AgentCompletionClient {
    pub fn new(base_url: String, agent_id: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            base_url,
            agent_id,
            client,
        })
    }
}

#[async_trait::async_trait]
impl CompletionService for AgentCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Vec<CompletionReply>> {
        let url = format!("{}/{}/message", self.base_url, self.agent_id);
        debug!(%url, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let replies: Vec<CompletionReply> = response.json().await?;
        debug!(replies = replies.len(), "Completion response received");

        Ok(replies)
    }
}
