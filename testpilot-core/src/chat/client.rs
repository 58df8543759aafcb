use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::RelayConfig;
use crate::error::{Error, Result};

use super::Message;

const COMPLETIONS_PATH: &str = "/chat/completions";

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> From<&'a Message> for ApiMessage<'a> {
    fn from(message: &'a Message) -> Self {
        ApiMessage {
            role: message.role(),
            content: message.content(),
        }
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiChoiceMessage,
}

#[derive(Deserialize)]
struct ApiChoiceMessage {
    content: String,
}

/// HTTP client for an OpenAI-style chat-completions API.
///
/// Holds the fixed parts of every call (endpoint, model id, system
/// instruction, credential); [`CompletionClient::complete`] contributes only
/// the user prompt. The request timeout bounds how long a hung upstream can
/// stall a caller.
pub struct CompletionClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    system_prompt: String,
    url: String,
}

impl CompletionClient {
    pub fn new(config: &RelayConfig, api_key: Option<String>) -> Result<Self> {
        let url = format!(
            "{}{COMPLETIONS_PATH}",
            config.base_url.trim_end_matches('/')
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if api_key.is_none() {
            tracing::warn!(
                "{} is not set; requests will be sent unauthenticated",
                crate::config::API_KEY_VAR
            );
        }

        Ok(CompletionClient {
            client,
            api_key,
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            url,
        })
    }

    /// Build a client whose credential comes from the environment.
    pub fn from_env(config: &RelayConfig) -> Result<Self> {
        Self::new(config, crate::config::api_key_from_env())
    }

    /// Send one prompt and return the first completion choice.
    #[instrument(skip(self, prompt))]
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let messages = [
            Message::System(self.system_prompt.clone()),
            Message::User(prompt.to_string()),
        ];
        let request = ApiRequest {
            model: &self.model,
            messages: messages.iter().map(ApiMessage::from).collect(),
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(ref api_key) = self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body, "completion API returned an error");
            return Err(Error::UpstreamStatus { status });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(Error::UpstreamDecode)?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(Error::MissingCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_shape() {
        let messages = [
            Message::System("You are a helpful assistant.".into()),
            Message::User("hello ✓".into()),
        ];
        let request = ApiRequest {
            model: "gpt-4",
            messages: messages.iter().map(ApiMessage::from).collect(),
        };

        let value = serde_json::to_value(&request).expect("request should serialize");

        assert_eq!(value["model"], "gpt-4");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "You are a helpful assistant.");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "hello ✓");
    }

    #[test]
    fn only_the_first_choice_is_read() {
        let response: ApiResponse = serde_json::from_str(
            r#"{"choices": [
                {"message": {"role": "assistant", "content": "first"}},
                {"message": {"role": "assistant", "content": "second"}}
            ]}"#,
        )
        .expect("response should parse");

        let reply = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content);

        assert_eq!(reply.as_deref(), Some("first"));
    }

    #[test]
    fn extra_response_fields_are_ignored() {
        let response: ApiResponse = serde_json::from_str(
            r#"{
                "id": "chatcmpl-123",
                "object": "chat.completion",
                "choices": [{"index": 0, "message": {"content": "ok"}, "finish_reason": "stop"}],
                "usage": {"total_tokens": 3}
            }"#,
        )
        .expect("response should parse");

        assert_eq!(response.choices[0].message.content, "ok");
    }

    #[test]
    fn empty_choices_parses_to_no_reply() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"choices": []}"#).expect("response should parse");

        assert!(response.choices.is_empty());
    }
}
