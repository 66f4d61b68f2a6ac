use crate::domain::error::TranslateError;
use crate::domain::language::{supported_languages, SupportedLanguage};
use crate::domain::model::{
    translation_custom_fields, BatchSummary, BulkTranslateResponse, KeyValidation,
    OperationStatus, ProviderTable, ProviderTestResult, TextTranslation, TranslationExport,
    TranslationRequest, TranslationResult, TranslationStats, STATUS_FAILED,
    STATUS_NOT_CONFIGURED, STATUS_SUCCESS,
};
use crate::domain::provider::{ProviderAvailability, ProviderId, SetupGuideEntry};
use crate::domain::text::prepare_source_text;
use crate::domain::traits::{ProviderTranslation, TranslationBackend, Translator};
use crate::infrastructure::config::Config;
use crate::infrastructure::network::client::ChatTranslator;
use crate::infrastructure::storage::db::TranslationStore;
use async_trait::async_trait;
use chrono::Utc;
use futures_util::future::join_all;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Sentence used by every provider diagnostic.
pub const SAMPLE_TEXT: &str = "High-quality professional business solution";
pub const SAMPLE_TARGET: &str = "ar";
pub const SAMPLE_SOURCE: &str = "en";

/// Source language of invoice descriptions.
const ITEM_SOURCE_LANGUAGE: &str = "en";

/// Backend that calls the AI providers directly from this process.
pub struct LocalBackend {
    config: Config,
    client: Client,
    translators: HashMap<ProviderId, Arc<dyn Translator>>,
    store: Option<TranslationStore>,
}

impl LocalBackend {
    pub fn new(config: Config, client: Client, store: Option<TranslationStore>) -> Self {
        let translators = ProviderId::ALL
            .into_iter()
            .map(|p| {
                let translator: Arc<dyn Translator> =
                    Arc::new(ChatTranslator::new(client.clone(), &config, p));
                (p, translator)
            })
            .collect();

        Self {
            config,
            client,
            translators,
            store,
        }
    }

    /// Replace the translator used for `provider`.
    pub fn with_translator(mut self, provider: ProviderId, translator: Arc<dyn Translator>) -> Self {
        self.translators.insert(provider, translator);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> Option<&TranslationStore> {
        self.store.as_ref()
    }

    fn is_configured(&self, provider: ProviderId) -> bool {
        self.config.has_api_key(provider)
    }

    async fn call_provider(
        &self,
        provider: ProviderId,
        text: &str,
        target: &str,
        source: &str,
    ) -> Result<ProviderTranslation, TranslateError> {
        match self.translators.get(&provider) {
            Some(translator) => translator.translate(text, target, source).await,
            None => Err(TranslateError::NotConfigured(provider.label().to_string())),
        }
    }

    /// First configured provider, in [`ProviderId::AUTO_ORDER`], that succeeds.
    async fn translate_auto(
        &self,
        text: &str,
        target: &str,
        source: &str,
    ) -> Result<ProviderTranslation, TranslateError> {
        for provider in ProviderId::AUTO_ORDER {
            if !self.is_configured(provider) {
                continue;
            }
            match self.call_provider(provider, text, target, source).await {
                Ok(result) => return Ok(result),
                Err(e) => warn!(provider = %provider, error = %e, "provider failed"),
            }
        }
        Err(TranslateError::Provider(
            "All available AI providers failed".to_string(),
        ))
    }

    /// Translate one text with the named provider, falling back on error.
    pub async fn translate_one(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
        provider_id: &str,
    ) -> TextTranslation {
        if text.trim().is_empty() {
            return TextTranslation::failure(provider_id, "No text provided for translation");
        }

        let text = prepare_source_text(text);
        let start = Instant::now();

        let primary = provider_id.parse::<ProviderId>().ok();
        let attempt = match primary {
            Some(provider) => {
                self.call_provider(provider, &text, target_language, source_language)
                    .await
            }
            None => self.translate_auto(&text, target_language, source_language).await,
        };

        let primary_error = match attempt {
            Ok(result) => {
                return TextTranslation {
                    success: true,
                    translated_text: result.translated_text,
                    error: None,
                    ai_provider: result.provider,
                    source_language: Some(source_language.to_string()),
                    target_language: Some(target_language.to_string()),
                    model_used: Some(result.model),
                    confidence_score: Some(result.confidence),
                    processing_time: Some(start.elapsed().as_secs_f64()),
                    warning: None,
                    ai_enhanced: true,
                };
            }
            Err(e) => e,
        };

        error!(provider = provider_id, error = %primary_error, "AI translation failed");

        for fallback in ProviderId::FALLBACK_ORDER {
            if Some(fallback) == primary || !self.is_configured(fallback) {
                continue;
            }
            info!(provider = %fallback, "trying fallback provider");
            match self
                .call_provider(fallback, &text, target_language, source_language)
                .await
            {
                Ok(result) => {
                    return TextTranslation {
                        success: true,
                        translated_text: result.translated_text,
                        error: None,
                        ai_provider: format!("{} (fallback: {})", provider_id, fallback),
                        source_language: Some(source_language.to_string()),
                        target_language: Some(target_language.to_string()),
                        model_used: Some(result.model),
                        confidence_score: Some(result.confidence),
                        processing_time: Some(start.elapsed().as_secs_f64()),
                        warning: Some(format!(
                            "Primary provider {} failed, used {}",
                            provider_id, fallback
                        )),
                        ai_enhanced: true,
                    };
                }
                Err(e) => warn!(provider = %fallback, error = %e, "fallback provider also failed"),
            }
        }

        TextTranslation::failure(
            provider_id,
            format!("All AI providers failed. Primary error: {}", primary_error),
        )
    }

    pub async fn bulk(
        &self,
        items: &[TranslationRequest],
        target_language: &str,
        provider_id: &str,
    ) -> BulkTranslateResponse {
        let configured = provider_id
            .parse::<ProviderId>()
            .map(|p| self.is_configured(p))
            .unwrap_or(false);

        if !configured {
            return BulkTranslateResponse {
                results: Vec::new(),
                summary: BatchSummary {
                    total_items: items.len(),
                    failed_translations: items.len(),
                    ai_provider: Some(provider_id.to_string()),
                    error: Some(format!("AI provider {} is not configured", provider_id)),
                    ..BatchSummary::default()
                },
            };
        }

        let mut results = Vec::with_capacity(items.len());
        let mut successful = 0;
        let mut failed = 0;
        let mut total_time = 0.0;

        for item in items {
            if item.description.trim().is_empty() {
                results.push(TranslationResult::failed(
                    &item.item_code,
                    "No description to translate",
                ));
                failed += 1;
                continue;
            }

            let translation = self
                .translate_one(
                    item.description.trim(),
                    target_language,
                    ITEM_SOURCE_LANGUAGE,
                    provider_id,
                )
                .await;

            if translation.success {
                successful += 1;
                total_time += translation.processing_time.unwrap_or(0.0);
            } else {
                failed += 1;
            }

            results.push(TranslationResult {
                item_code: item.item_code.clone(),
                success: translation.success,
                translated_text: translation.translated_text,
                error: translation.error.unwrap_or_default(),
                ai_enhanced: translation.ai_enhanced,
                processing_time: translation.processing_time.unwrap_or(0.0),
                confidence_score: translation.confidence_score.unwrap_or(0.0),
                model_used: translation.model_used.unwrap_or_default(),
                ai_provider: if translation.ai_provider.is_empty() {
                    provider_id.to_string()
                } else {
                    translation.ai_provider
                },
            });
        }

        BulkTranslateResponse {
            results,
            summary: BatchSummary {
                total_items: items.len(),
                successful_translations: successful,
                failed_translations: failed,
                average_processing_time: total_time / successful.max(1) as f64,
                ai_provider: Some(provider_id.to_string()),
                ai_enhanced_count: successful,
                total_processing_time: total_time,
                error: None,
            },
        }
    }

    async fn probe(&self, provider: ProviderId) -> ProviderTestResult {
        if !self.is_configured(provider) {
            return ProviderTestResult {
                status: STATUS_NOT_CONFIGURED.to_string(),
                error: Some("API key not configured".to_string()),
                translated_text: Some(String::new()),
                processing_time: Some(0.0),
                ..ProviderTestResult::default()
            };
        }

        let start = Instant::now();
        let result = self
            .translate_one(SAMPLE_TEXT, SAMPLE_TARGET, SAMPLE_SOURCE, provider.as_str())
            .await;
        let elapsed = start.elapsed().as_secs_f64();

        if result.success {
            ProviderTestResult {
                status: STATUS_SUCCESS.to_string(),
                model: Some(result.model_used.unwrap_or_else(|| "unknown".to_string())),
                processing_time: Some(elapsed),
                translated_text: Some(result.translated_text),
                confidence: Some(result.confidence_score.unwrap_or(0.0)),
                error: None,
            }
        } else {
            ProviderTestResult {
                status: STATUS_FAILED.to_string(),
                error: Some(result.error.unwrap_or_else(|| "Unknown error".to_string())),
                translated_text: Some(String::new()),
                processing_time: Some(elapsed),
                ..ProviderTestResult::default()
            }
        }
    }

    async fn stats(&self) -> Result<TranslationStats, TranslateError> {
        let mut provider_stats: std::collections::BTreeMap<String, usize> = ProviderId::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), 0))
            .collect();

        let (total, activity) = match &self.store {
            Some(store) => {
                for (provider, count) in store.provider_counts().await? {
                    provider_stats.insert(provider, count);
                }
                (
                    store.count_translations().await?,
                    store.recent_activity(Utc::now().timestamp()).await?,
                )
            }
            None => (0, Vec::new()),
        };

        Ok(TranslationStats {
            total_translations: total,
            configured_providers: self
                .config
                .configured_providers()
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            provider_stats,
            recent_activity: activity,
            error: None,
        })
    }

    fn require_store(&self) -> Result<&TranslationStore, TranslateError> {
        self.store
            .as_ref()
            .ok_or_else(|| TranslateError::Storage("no translation store configured".to_string()))
    }
}

#[async_trait]
impl TranslationBackend for LocalBackend {
    async fn list_providers(&self) -> Result<ProviderTable<ProviderAvailability>, TranslateError> {
        Ok(ProviderId::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), p.availability(self.is_configured(*p))))
            .collect())
    }

    async fn bulk_translate(
        &self,
        items: &[TranslationRequest],
        target_language_code: &str,
        provider_id: &str,
    ) -> Result<BulkTranslateResponse, TranslateError> {
        Ok(self.bulk(items, target_language_code, provider_id).await)
    }

    async fn translate_text(
        &self,
        text: &str,
        target_language_code: &str,
        source_language_code: &str,
        provider_id: &str,
    ) -> Result<TextTranslation, TranslateError> {
        Ok(self
            .translate_one(text, target_language_code, source_language_code, provider_id)
            .await)
    }

    async fn test_all_providers(&self) -> Result<ProviderTable<ProviderTestResult>, TranslateError> {
        let probes = ProviderId::ALL.iter().map(|p| self.probe(*p));
        let results = join_all(probes).await;
        Ok(ProviderId::ALL
            .iter()
            .map(|p| p.as_str().to_string())
            .zip(results)
            .collect())
    }

    async fn setup_guide(&self) -> Result<ProviderTable<SetupGuideEntry>, TranslateError> {
        Ok(ProviderId::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), p.setup_guide()))
            .collect())
    }

    async fn translation_stats(&self) -> Result<TranslationStats, TranslateError> {
        match self.stats().await {
            Ok(stats) => Ok(stats),
            Err(e) => {
                error!(error = %e, "failed to collect translation stats");
                Ok(TranslationStats {
                    error: Some(e.to_string()),
                    ..TranslationStats::default()
                })
            }
        }
    }

    async fn create_custom_fields(&self) -> Result<OperationStatus, TranslateError> {
        let store = match self.require_store() {
            Ok(store) => store,
            Err(e) => return Ok(OperationStatus::failed(e.to_string())),
        };
        match store.create_custom_fields(translation_custom_fields()).await {
            Ok(added) => {
                info!(added, "translation custom fields provisioned");
                Ok(OperationStatus::ok("Custom fields created successfully"))
            }
            Err(e) => Ok(OperationStatus::failed(e.to_string())),
        }
    }

    async fn validate_api_key(
        &self,
        provider_id: &str,
        api_key: &str,
    ) -> Result<KeyValidation, TranslateError> {
        let provider = match provider_id.parse::<ProviderId>() {
            Ok(p) => p,
            Err(_) => {
                return Ok(KeyValidation {
                    valid: false,
                    test_result: None,
                    error: Some("Unknown provider".to_string()),
                })
            }
        };

        let checker = ChatTranslator::new(self.client.clone(), &self.config, provider);
        match checker.check_key(api_key).await {
            Ok(accepted) => Ok(KeyValidation {
                valid: true,
                test_result: Some(accepted),
                error: None,
            }),
            Err(e) => Ok(KeyValidation {
                valid: false,
                test_result: None,
                error: Some(e.to_string()),
            }),
        }
    }

    async fn export_translations(&self) -> Result<TranslationExport, TranslateError> {
        let exported = match self.require_store() {
            Ok(store) => store.export().await,
            Err(e) => Err(e),
        };
        Ok(match exported {
            Ok(data) => TranslationExport {
                success: true,
                count: data.len(),
                data,
                error: None,
            },
            Err(e) => TranslationExport {
                success: false,
                error: Some(e.to_string()),
                ..TranslationExport::default()
            },
        })
    }

    async fn clear_translation_log(&self) -> Result<OperationStatus, TranslateError> {
        let cleared = match self.require_store() {
            Ok(store) => store.clear().await,
            Err(e) => Err(e),
        };
        Ok(match cleared {
            Ok(_) => OperationStatus::ok("All translations cleared"),
            Err(e) => OperationStatus::failed(e.to_string()),
        })
    }

    async fn supported_languages(&self) -> Result<Vec<SupportedLanguage>, TranslateError> {
        Ok(supported_languages())
    }
}
