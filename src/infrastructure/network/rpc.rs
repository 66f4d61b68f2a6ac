use crate::domain::error::TranslateError;
use crate::domain::language::SupportedLanguage;
use crate::domain::model::{
    translation_custom_fields, BulkTranslateResponse, KeyValidation, OperationStatus,
    ProviderTable, ProviderTestResult, TextTranslation, TranslationExport, TranslationRequest,
    TranslationStats,
};
use crate::domain::provider::{ProviderAvailability, SetupGuideEntry};
use crate::domain::traits::TranslationBackend;
use crate::infrastructure::config::BackendConfig;
use crate::infrastructure::storage::db::TranslationStore;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

const METHOD_PREFIX: &str = "ai_translate.translate";

#[derive(Deserialize, Debug)]
struct Envelope {
    message: Option<Value>,
}

/// Backend that forwards each operation to a hosted service as a
/// whitelisted method call: `POST {url}/api/method/ai_translate.translate.<name>`.
pub struct RpcBackend {
    client: Client,
    base_url: String,
    authorization: Option<String>,
    /// Local record of the fields the service has created.
    field_registry: Option<TranslationStore>,
}

impl RpcBackend {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: None,
            field_registry: None,
        }
    }

    pub fn from_config(client: Client, config: &BackendConfig) -> Result<Self, TranslateError> {
        let url = config
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| TranslateError::Config("backend.url is required in remote mode".to_string()))?;
        let mut backend = Self::new(client, url);
        if let (Some(key), Some(secret)) = (&config.api_key, &config.api_secret) {
            backend = backend.with_token(key, secret);
        }
        Ok(backend)
    }

    pub fn with_token(mut self, api_key: &str, api_secret: &str) -> Self {
        self.authorization = Some(format!("token {}:{}", api_key, api_secret));
        self
    }

    /// Mirror successful field setup into `store` so forms opened later count as provisioned.
    pub fn with_field_registry(mut self, store: TranslationStore) -> Self {
        self.field_registry = Some(store);
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/api/method/{}.{}", self.base_url, METHOD_PREFIX, method)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, args: Value) -> Result<T, TranslateError> {
        debug!(method, "remote call");
        let mut request = self.client.post(self.method_url(method)).json(&args);
        if let Some(auth) = &self.authorization {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Api(format!(
                "{} returned HTTP {}: {}",
                method,
                status.as_u16(),
                body
            )));
        }

        let envelope: Envelope = response.json().await?;
        let message = envelope
            .message
            .filter(|m| !m.is_null())
            .ok_or_else(|| TranslateError::MalformedResponse(format!("{} returned no message", method)))?;

        serde_json::from_value(message)
            .map_err(|e| TranslateError::MalformedResponse(format!("{}: {}", method, e)))
    }
}

#[async_trait]
impl TranslationBackend for RpcBackend {
    async fn list_providers(&self) -> Result<ProviderTable<ProviderAvailability>, TranslateError> {
        self.call("get_available_ai_providers", json!({})).await
    }

    async fn bulk_translate(
        &self,
        items: &[TranslationRequest],
        target_language_code: &str,
        provider_id: &str,
    ) -> Result<BulkTranslateResponse, TranslateError> {
        // items_data travels as a JSON-encoded string
        let items_data = serde_json::to_string(items)?;
        self.call(
            "bulk_ai_translate_items",
            json!({
                "items_data": items_data,
                "target_language": target_language_code,
                "ai_provider": provider_id,
            }),
        )
        .await
    }

    async fn translate_text(
        &self,
        text: &str,
        target_language_code: &str,
        source_language_code: &str,
        provider_id: &str,
    ) -> Result<TextTranslation, TranslateError> {
        self.call(
            "ai_translate_text",
            json!({
                "text": text,
                "target_language": target_language_code,
                "source_language": source_language_code,
                "ai_provider": provider_id,
            }),
        )
        .await
    }

    async fn test_all_providers(&self) -> Result<ProviderTable<ProviderTestResult>, TranslateError> {
        self.call("test_ai_providers", json!({})).await
    }

    async fn setup_guide(&self) -> Result<ProviderTable<SetupGuideEntry>, TranslateError> {
        self.call("get_ai_setup_guide", json!({})).await
    }

    async fn translation_stats(&self) -> Result<TranslationStats, TranslateError> {
        self.call("get_translation_stats", json!({})).await
    }

    async fn create_custom_fields(&self) -> Result<OperationStatus, TranslateError> {
        let status: OperationStatus = self.call("create_translation_custom_fields", json!({})).await?;
        if status.success {
            if let Some(store) = &self.field_registry {
                let added = store.create_custom_fields(translation_custom_fields()).await?;
                info!(added, "recorded remote custom fields");
            }
        }
        Ok(status)
    }

    async fn validate_api_key(
        &self,
        provider_id: &str,
        api_key: &str,
    ) -> Result<KeyValidation, TranslateError> {
        self.call(
            "validate_api_key",
            json!({ "provider": provider_id, "api_key": api_key }),
        )
        .await
    }

    async fn export_translations(&self) -> Result<TranslationExport, TranslateError> {
        self.call("export_translations", json!({})).await
    }

    async fn clear_translation_log(&self) -> Result<OperationStatus, TranslateError> {
        self.call("clear_all_translations", json!({})).await
    }

    async fn supported_languages(&self) -> Result<Vec<SupportedLanguage>, TranslateError> {
        self.call("get_supported_languages", json!({})).await
    }
}
