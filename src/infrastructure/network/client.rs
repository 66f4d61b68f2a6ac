use crate::domain::error::TranslateError;
use crate::domain::language::language_name;
use crate::domain::provider::{ApiStyle, ProviderId, ProviderSpec};
use crate::domain::text::clean_translation_response;
use crate::domain::traits::{ProviderTranslation, Translator};
use crate::infrastructure::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const TEMPERATURE: f64 = 0.3;
const KEY_CHECK_TEXT: &str = "Hello world";
const KEY_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

impl Message {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Translator backed by one provider's chat endpoint.
pub struct ChatTranslator {
    client: Client,
    provider: ProviderId,
    spec: ProviderSpec,
    endpoint: String,
    api_key: Option<String>,
}

impl ChatTranslator {
    pub fn new(client: Client, config: &Config, provider: ProviderId) -> Self {
        Self {
            client,
            provider,
            spec: provider.spec(),
            endpoint: config.endpoint(provider),
            api_key: config.api_key(provider),
        }
    }

    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    fn messages(&self, text: &str, target_name: &str, source_name: &str) -> Vec<Message> {
        match self.provider {
            ProviderId::Groq => vec![
                Message::new(
                    "system",
                    format!(
                        "You are an expert translator. Translate text naturally to {target_name}, preserving meaning and business context."
                    ),
                ),
                Message::new(
                    "user",
                    format!(
                        "You are a professional translator specializing in natural, fluent translations.\n\n\
                         Translate this {source_name} text to {target_name}:\n\"{text}\"\n\n\
                         Requirements:\n\
                         - Make it sound completely natural in {target_name}\n\
                         - Preserve the original meaning and tone\n\
                         - Use appropriate business terminology\n\
                         - Don't add explanations or notes\n\
                         - Return ONLY the translation\n\nTranslation:"
                    ),
                ),
            ],
            ProviderId::OpenAi => vec![
                Message::new(
                    "system",
                    format!("You are a professional translator. Translate to natural {target_name}."),
                ),
                Message::new(
                    "user",
                    format!(
                        "Translate this {source_name} business text to natural, fluent {target_name}:\n\n\"{text}\"\n\n\
                         Make it sound native and professional. Return only the translation."
                    ),
                ),
            ],
            ProviderId::Claude => vec![Message::new(
                "user",
                format!(
                    "Translate to natural {target_name}:\n\n\"{text}\"\n\n\
                     Make it sound fluent and professional. Return only the translation."
                ),
            )],
            ProviderId::DeepSeek | ProviderId::Perplexity => vec![Message::new(
                "user",
                format!(
                    "Translate to natural {target_name}:\n\n\"{text}\"\n\nMake it sound fluent and professional."
                ),
            )],
        }
    }

    fn require_key(&self) -> Result<&str, TranslateError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| TranslateError::NotConfigured(self.provider.label().to_string()))
    }

    /// POST one request in the provider's wire format.
    async fn complete(
        &self,
        api_key: &str,
        messages: Vec<Message>,
        max_tokens: u32,
        temperature: Option<f64>,
        top_p: Option<f64>,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, TranslateError> {
        let mut request = match self.spec.style {
            ApiStyle::ChatCompletions => self
                .client
                .post(&self.endpoint)
                .bearer_auth(api_key)
                .json(&ChatRequest {
                    model: self.spec.model.to_string(),
                    messages,
                    temperature,
                    max_tokens,
                    top_p,
                }),
            ApiStyle::Messages => self
                .client
                .post(&self.endpoint)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&MessagesRequest {
                    model: self.spec.model.to_string(),
                    max_tokens,
                    temperature,
                    messages,
                }),
        };
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        Ok(request.send().await?)
    }

    async fn extract_text(&self, response: reqwest::Response) -> Result<String, TranslateError> {
        let text = match self.spec.style {
            ApiStyle::ChatCompletions => response
                .json::<ChatResponse>()
                .await?
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content),
            ApiStyle::Messages => response
                .json::<MessagesResponse>()
                .await?
                .content
                .into_iter()
                .next()
                .and_then(|block| block.text),
        };
        text.ok_or_else(|| {
            TranslateError::Provider(format!("{} returned no choices", self.provider.label()))
        })
    }

    /// Send a tiny request with `api_key`; `true` when the provider answers 200.
    pub async fn check_key(&self, api_key: &str) -> Result<bool, TranslateError> {
        let messages = vec![Message::new(
            "user",
            format!("Translate to Arabic: {}", KEY_CHECK_TEXT),
        )];
        let response = self
            .complete(api_key, messages, 50, None, None, Some(KEY_CHECK_TIMEOUT))
            .await?;
        Ok(response.status() == reqwest::StatusCode::OK)
    }
}

#[async_trait]
impl Translator for ChatTranslator {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<ProviderTranslation, TranslateError> {
        let api_key = self.require_key()?;
        let target_name = language_name(target_language).unwrap_or(target_language);
        let source_name = language_name(source_language).unwrap_or("English");

        let messages = self.messages(text, target_name, source_name);
        let response = self
            .complete(
                api_key,
                messages,
                self.spec.max_tokens,
                Some(TEMPERATURE),
                self.spec.top_p,
                None,
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let mut message = format!(
                "{} API error: HTTP {}",
                self.provider.label(),
                status.as_u16()
            );
            if !body.is_empty() {
                message.push_str(&format!(" - {}", body));
            }
            return Err(TranslateError::Provider(message));
        }

        let raw = self.extract_text(response).await?;
        let translated_text = clean_translation_response(&raw);
        debug!(provider = %self.provider, chars = translated_text.chars().count(), "provider replied");

        if translated_text.is_empty() {
            return Err(TranslateError::Provider(format!(
                "{} returned empty translation",
                self.provider.label()
            )));
        }

        Ok(ProviderTranslation {
            translated_text,
            confidence: self.spec.confidence,
            model: self.spec.reported_model.to_string(),
            provider: self.provider.as_str().to_string(),
        })
    }
}
