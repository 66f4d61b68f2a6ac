use crate::domain::error::TranslateError;
use crate::domain::language::SupportedLanguage;
use crate::domain::model::{
    BulkTranslateResponse, KeyValidation, LineItem, OperationStatus, ProviderTable,
    ProviderTestResult, TextTranslation, TranslationExport, TranslationRequest, TranslationStats,
};
use crate::domain::provider::{ProviderAvailability, SetupGuideEntry};
use crate::domain::ui::{ButtonAction, DialogOutcome, Indicator, Notice, SettingsDialog};
use async_trait::async_trait;

/// Text translated by one provider, before it is wrapped into a reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTranslation {
    pub translated_text: String,
    pub confidence: f64,
    pub model: String,
    pub provider: String,
}

/// A single AI provider endpoint.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<ProviderTranslation, TranslateError>;
}

/// The remote translation service the orchestrator talks to.
///
/// Every method is one request with exactly one reply. Implementations must
/// not retry on their own.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn list_providers(&self) -> Result<ProviderTable<ProviderAvailability>, TranslateError>;

    async fn bulk_translate(
        &self,
        items: &[TranslationRequest],
        target_language_code: &str,
        provider_id: &str,
    ) -> Result<BulkTranslateResponse, TranslateError>;

    async fn translate_text(
        &self,
        text: &str,
        target_language_code: &str,
        source_language_code: &str,
        provider_id: &str,
    ) -> Result<TextTranslation, TranslateError>;

    async fn test_all_providers(&self) -> Result<ProviderTable<ProviderTestResult>, TranslateError>;

    async fn setup_guide(&self) -> Result<ProviderTable<SetupGuideEntry>, TranslateError>;

    async fn translation_stats(&self) -> Result<TranslationStats, TranslateError>;

    async fn create_custom_fields(&self) -> Result<OperationStatus, TranslateError>;

    async fn validate_api_key(
        &self,
        provider_id: &str,
        api_key: &str,
    ) -> Result<KeyValidation, TranslateError>;

    async fn export_translations(&self) -> Result<TranslationExport, TranslateError>;

    async fn clear_translation_log(&self) -> Result<OperationStatus, TranslateError>;

    async fn supported_languages(&self) -> Result<Vec<SupportedLanguage>, TranslateError>;
}

/// The invoice document as exposed by the host form.
pub trait InvoiceForm {
    fn doctype(&self) -> &str;

    fn name(&self) -> &str;

    /// Whether the schema carries the translation custom fields.
    fn has_translation_fields(&self) -> bool;

    fn items(&self) -> &[LineItem];

    fn set_translated_description(&mut self, index: usize, text: &str) -> Result<(), TranslateError>;

    fn translation_language(&self) -> Option<&str>;

    fn set_translation_language(&mut self, language: &str);

    fn ai_provider(&self) -> Option<&str>;

    fn set_ai_provider(&mut self, provider: &str);

    fn save(&mut self) -> Result<(), TranslateError>;

    fn refresh_fields(&mut self);

    fn remove_button_group(&mut self, group: &str);

    fn add_button(&mut self, action: ButtonAction, group: &str);
}

/// Dialogs and notifications offered by the host.
pub trait HostUi {
    fn msgprint(&self, notice: Notice);

    fn show_alert(&self, message: &str, indicator: Indicator);

    fn confirm(&self, message: &str) -> bool;

    fn show_progress(&self, title: &str, message: &str);

    fn hide_progress(&self);

    fn settings_dialog(&self, dialog: &SettingsDialog) -> DialogOutcome;

    fn reload(&self);
}
