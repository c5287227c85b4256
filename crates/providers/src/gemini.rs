// Model channel over a Gemini-style generateContent HTTP API. A missing
// key is reported per call as NotConfigured, which the orchestrator
// surfaces as an ordinary chat message.

use crate::prompts;
use async_trait::async_trait;
use flum_core::{strip_fences, ChannelError, ModelChannel, Turn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    os_hint: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            os_hint: std::env::consts::OS.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_os_hint(mut self, os_hint: impl Into<String>) -> Self {
        self.os_hint = os_hint.into();
        self
    }

    fn api_key(&self) -> Result<&str, ChannelError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ChannelError::NotConfigured(
                    "no API key set; add one to config.toml or FLUM_API_KEY".to_string(),
                )
            })
    }

    async fn generate(&self, contents: Vec<Value>) -> Result<String, ChannelError> {
        let key = self.api_key()?;
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, key
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({ "contents": contents }))
            .send()
            .await
            .map_err(|err| ChannelError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChannelError::Api(format!("{status}: {body}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| ChannelError::Api(err.to_string()))?;

        body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ChannelError::Api("reply carried no text candidate".to_string()))
    }
}

// Maps the transcript plus the final prompt into Gemini contents entries.
pub(crate) fn contents_from(history: &[Turn], final_prompt: &str) -> Vec<Value> {
    let mut contents: Vec<Value> = history
        .iter()
        .map(|turn| {
            json!({
                "role": turn.role.as_api_str(),
                "parts": [{ "text": turn.content }]
            })
        })
        .collect();
    contents.push(json!({
        "role": "user",
        "parts": [{ "text": final_prompt }]
    }));
    contents
}

#[derive(Deserialize)]
struct SuggestionReply {
    #[serde(default)]
    suggestions: Vec<String>,
}

#[async_trait]
impl ModelChannel for GeminiClient {
    async fn send(&self, prompt: &str, history: &[Turn]) -> Result<String, ChannelError> {
        let full_prompt = prompts::command_prompt(&self.os_hint, prompt);
        debug!(turns = history.len(), "sending command request");
        self.generate(contents_from(history, &full_prompt)).await
    }

    async fn suggest(
        &self,
        original_prompt: &str,
        summary: &str,
    ) -> Result<Vec<String>, ChannelError> {
        let prompt = prompts::suggestion_prompt(original_prompt, summary);
        let raw = self.generate(contents_from(&[], &prompt)).await?;

        let reply: SuggestionReply = serde_json::from_str(&strip_fences(&raw))
            .map_err(|err| ChannelError::Api(format!("undecodable suggestions: {err}")))?;

        let mut suggestions = reply.suggestions;
        suggestions.truncate(3);
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flum_core::Transcript;

    #[test]
    fn contents_preserve_history_order_and_roles() {
        let mut transcript = Transcript::new();
        transcript.push_user("my pc is noisy");
        transcript.push_model("{\"response_type\": \"clarification\"}");

        let contents = contents_from(transcript.turns(), "the fans spin constantly");
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "the fans spin constantly");
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let client = GeminiClient::new(None, "gemini-1.5-flash-latest");
        let result = client.send("hello", &[]).await;
        assert!(matches!(result, Err(ChannelError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn empty_key_is_not_configured() {
        let client = GeminiClient::new(Some(String::new()), "gemini-1.5-flash-latest");
        let result = client.suggest("a", "b").await;
        assert!(matches!(result, Err(ChannelError::NotConfigured(_))));
    }
}
