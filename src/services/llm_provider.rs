use crate::config::LlmConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::time::Duration;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// One chat-completion call: a system framing, a user prompt and sampling limits.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub json_response: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    content: Some(text.into()),
                },
            }],
        }
    }

    pub fn first_choice(&self) -> Option<&ChatChoice> {
        self.choices.first()
    }
}

/// Anything that can answer a chat-completion request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion>;
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    Azure { url: String },
    OpenAi { url: String },
}

/// Chat-completion client for Azure OpenAI deployments and the OpenAI API.
#[derive(Clone)]
pub struct OpenAiCompatibleProvider {
    client: Client,
    target: Target,
    api_key: Option<String>,
    deployment: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: &LlmConfig, client: Client) -> Self {
        let target = match &config.endpoint {
            Some(endpoint) => Target::Azure {
                url: format!(
                    "{}/openai/deployments/{}/chat/completions?api-version={}",
                    endpoint.trim_end_matches('/'),
                    config.deployment,
                    config.api_version
                ),
            },
            None => Target::OpenAi {
                url: OPENAI_CHAT_URL.to_string(),
            },
        };

        if config.api_key.is_none() {
            tracing::warn!("No AI provider key configured; AI endpoints will fail until one is set");
        }

        Self {
            client,
            target,
            api_key: config.api_key.clone(),
            deployment: config.deployment.clone(),
        }
    }

    pub fn url(&self) -> &str {
        match &self.target {
            Target::Azure { url } | Target::OpenAi { url } => url,
        }
    }

    pub fn payload(&self, request: &ChatRequest) -> JsonValue {
        let mut payload = serde_json::json!({
            "model": self.deployment,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.user_prompt}
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });
        if request.json_response {
            payload["response_format"] = serde_json::json!({ "type": "json_object" });
        }
        payload
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Llm("AI provider key is not configured".to_string()))?;

        let builder = self
            .client
            .post(self.url())
            .json(&self.payload(&request))
            .timeout(Duration::from_secs(120));
        let builder = match self.target {
            Target::Azure { .. } => builder.header("api-key", api_key),
            Target::OpenAi { .. } => builder.bearer_auth(api_key),
        };

        tracing::debug!(
            deployment = %self.deployment,
            max_tokens = request.max_tokens,
            "Sending chat completion request"
        );
        let res = builder.send().await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("status {}: {}", status, text)));
        }

        let completion: ChatCompletion = res.json().await?;
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm_config(endpoint: Option<&str>) -> LlmConfig {
        LlmConfig {
            endpoint: endpoint.map(str::to_string),
            api_key: Some("key".to_string()),
            deployment: "gpt-4".to_string(),
            api_version: "2023-05-15".to_string(),
        }
    }

    #[test]
    fn azure_endpoint_addresses_the_deployment() {
        let provider = OpenAiCompatibleProvider::new(
            &llm_config(Some("https://example.openai.azure.com/")),
            Client::new(),
        );
        assert_eq!(
            provider.url(),
            "https://example.openai.azure.com/openai/deployments/gpt-4/chat/completions?api-version=2023-05-15"
        );
    }

    #[test]
    fn missing_endpoint_falls_back_to_openai() {
        let provider = OpenAiCompatibleProvider::new(&llm_config(None), Client::new());
        assert_eq!(provider.url(), OPENAI_CHAT_URL);
    }

    #[test]
    fn payload_carries_sampling_settings_and_json_directive() {
        let provider = OpenAiCompatibleProvider::new(&llm_config(None), Client::new());
        let mut request = ChatRequest {
            system_prompt: "system".to_string(),
            user_prompt: "user".to_string(),
            temperature: 0.3,
            max_tokens: 800,
            json_response: true,
        };

        let payload = provider.payload(&request);
        assert_eq!(payload["model"], "gpt-4");
        assert_eq!(payload["max_tokens"], 800);
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "user");
        assert_eq!(payload["response_format"]["type"], "json_object");
        assert!((payload["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);

        request.json_response = false;
        assert!(provider.payload(&request).get("response_format").is_none());
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let mut config = llm_config(None);
        config.api_key = None;
        let provider = OpenAiCompatibleProvider::new(&config, Client::new());
        let err = provider
            .complete(ChatRequest {
                system_prompt: String::new(),
                user_prompt: String::new(),
                temperature: 0.7,
                max_tokens: 10,
                json_response: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
    }

    #[test]
    fn completion_tolerates_null_content() {
        let completion: ChatCompletion =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
                .unwrap();
        assert!(completion.first_choice().unwrap().message.content.is_none());
    }
}
