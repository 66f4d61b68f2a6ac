//! 测试用的内存替身: 后端、界面、表单
#![allow(dead_code)]

use ai_translate::domain::error::TranslateError;
use ai_translate::domain::language::{supported_languages, SupportedLanguage};
use ai_translate::domain::model::{
    BatchSummary, BulkTranslateResponse, KeyValidation, LineItem, OperationStatus,
    ProviderTable, ProviderTestResult, TextTranslation, TranslationExport, TranslationRequest,
    TranslationResult, TranslationStats, INVOICE_DOCTYPE,
};
use ai_translate::domain::provider::{ProviderAvailability, ProviderId, SetupGuideEntry};
use ai_translate::domain::traits::{HostUi, InvoiceForm, TranslationBackend};
use ai_translate::domain::ui::{ButtonAction, DialogOutcome, Indicator, Notice, SettingsDialog};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct BulkCall {
    pub items: Vec<TranslationRequest>,
    pub target_language: String,
    pub provider: String,
}

pub struct FakeBackend {
    pub configured: Vec<ProviderId>,
    /// Makes the provider listing fail.
    pub providers_down: bool,
    /// `None` makes the bulk call fail.
    pub bulk_reply: Option<BulkTranslateResponse>,
    pub text_reply: TextTranslation,
    pub test_reply: Option<ProviderTable<ProviderTestResult>>,
    pub fields_reply: Option<OperationStatus>,
    pub calls: Mutex<Vec<&'static str>>,
    pub bulk_calls: Mutex<Vec<BulkCall>>,
    pub text_calls: Mutex<Vec<(String, String, String, String)>>,
}

impl FakeBackend {
    pub fn new(configured: &[ProviderId]) -> Self {
        Self {
            configured: configured.to_vec(),
            providers_down: false,
            bulk_reply: None,
            text_reply: TextTranslation::default(),
            test_reply: None,
            fields_reply: None,
            calls: Mutex::new(Vec::new()),
            bulk_calls: Mutex::new(Vec::new()),
            text_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_bulk_reply(mut self, results: Vec<TranslationResult>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        self.bulk_reply = Some(BulkTranslateResponse {
            summary: BatchSummary {
                total_items: results.len(),
                successful_translations: successful,
                failed_translations: results.len() - successful,
                average_processing_time: 0.5,
                ai_provider: Some("groq".to_string()),
                ..BatchSummary::default()
            },
            results,
        });
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn bulk_calls(&self) -> Vec<BulkCall> {
        self.bulk_calls.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str) {
        self.calls.lock().unwrap().push(method);
    }
}

pub fn ok_result(text: &str) -> TranslationResult {
    TranslationResult {
        success: true,
        translated_text: text.to_string(),
        ..TranslationResult::default()
    }
}

pub fn failed_result(error: &str) -> TranslationResult {
    TranslationResult {
        success: false,
        error: error.to_string(),
        ..TranslationResult::default()
    }
}

#[async_trait]
impl TranslationBackend for FakeBackend {
    async fn list_providers(&self) -> Result<ProviderTable<ProviderAvailability>, TranslateError> {
        self.record("list_providers");
        if self.providers_down {
            return Err(TranslateError::Api(
                "get_available_ai_providers returned HTTP 502".to_string(),
            ));
        }
        Ok(ProviderId::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), p.availability(self.configured.contains(p))))
            .collect())
    }

    async fn bulk_translate(
        &self,
        items: &[TranslationRequest],
        target_language_code: &str,
        provider_id: &str,
    ) -> Result<BulkTranslateResponse, TranslateError> {
        self.record("bulk_translate");
        self.bulk_calls.lock().unwrap().push(BulkCall {
            items: items.to_vec(),
            target_language: target_language_code.to_string(),
            provider: provider_id.to_string(),
        });
        self.bulk_reply
            .clone()
            .ok_or_else(|| TranslateError::MalformedResponse("no message".to_string()))
    }

    async fn translate_text(
        &self,
        text: &str,
        target_language_code: &str,
        source_language_code: &str,
        provider_id: &str,
    ) -> Result<TextTranslation, TranslateError> {
        self.record("translate_text");
        self.text_calls.lock().unwrap().push((
            text.to_string(),
            target_language_code.to_string(),
            source_language_code.to_string(),
            provider_id.to_string(),
        ));
        Ok(self.text_reply.clone())
    }

    async fn test_all_providers(&self) -> Result<ProviderTable<ProviderTestResult>, TranslateError> {
        self.record("test_all_providers");
        self.test_reply
            .clone()
            .ok_or_else(|| TranslateError::Api("HTTP 500".to_string()))
    }

    async fn setup_guide(&self) -> Result<ProviderTable<SetupGuideEntry>, TranslateError> {
        self.record("setup_guide");
        Ok(ProviderId::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), p.setup_guide()))
            .collect())
    }

    async fn translation_stats(&self) -> Result<TranslationStats, TranslateError> {
        self.record("translation_stats");
        Ok(TranslationStats {
            total_translations: 12,
            configured_providers: self.configured.iter().map(|p| p.as_str().to_string()).collect(),
            ..TranslationStats::default()
        })
    }

    async fn create_custom_fields(&self) -> Result<OperationStatus, TranslateError> {
        self.record("create_custom_fields");
        self.fields_reply
            .clone()
            .ok_or_else(|| TranslateError::Api("HTTP 403".to_string()))
    }

    async fn validate_api_key(
        &self,
        _provider_id: &str,
        _api_key: &str,
    ) -> Result<KeyValidation, TranslateError> {
        self.record("validate_api_key");
        Ok(KeyValidation::default())
    }

    async fn export_translations(&self) -> Result<TranslationExport, TranslateError> {
        self.record("export_translations");
        Ok(TranslationExport::default())
    }

    async fn clear_translation_log(&self) -> Result<OperationStatus, TranslateError> {
        self.record("clear_translation_log");
        Ok(OperationStatus::ok("All translations cleared"))
    }

    async fn supported_languages(&self) -> Result<Vec<SupportedLanguage>, TranslateError> {
        self.record("supported_languages");
        Ok(supported_languages())
    }
}

pub struct FakeUi {
    pub confirm_answer: bool,
    /// `None` presses Start with the dialog defaults.
    pub dialog_answer: Option<DialogOutcome>,
    pub notices: Mutex<Vec<Notice>>,
    pub alerts: Mutex<Vec<(String, Indicator)>>,
    pub confirms: Mutex<Vec<String>>,
    pub dialogs: Mutex<Vec<SettingsDialog>>,
    pub progress: Mutex<Vec<&'static str>>,
    pub reloads: Mutex<usize>,
}

impl FakeUi {
    pub fn new() -> Self {
        Self {
            confirm_answer: true,
            dialog_answer: None,
            notices: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
            confirms: Mutex::new(Vec::new()),
            dialogs: Mutex::new(Vec::new()),
            progress: Mutex::new(Vec::new()),
            reloads: Mutex::new(0),
        }
    }

    pub fn declining() -> Self {
        Self {
            confirm_answer: false,
            ..Self::new()
        }
    }

    pub fn answering(outcome: DialogOutcome) -> Self {
        Self {
            dialog_answer: Some(outcome),
            ..Self::new()
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn notice_titles(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.title).collect()
    }

    pub fn alerts(&self) -> Vec<(String, Indicator)> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn dialogs(&self) -> Vec<SettingsDialog> {
        self.dialogs.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<&'static str> {
        self.progress.lock().unwrap().clone()
    }

    pub fn reloads(&self) -> usize {
        *self.reloads.lock().unwrap()
    }
}

impl HostUi for FakeUi {
    fn msgprint(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn show_alert(&self, message: &str, indicator: Indicator) {
        self.alerts.lock().unwrap().push((message.to_string(), indicator));
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_string());
        self.confirm_answer
    }

    fn show_progress(&self, _title: &str, _message: &str) {
        self.progress.lock().unwrap().push("show");
    }

    fn hide_progress(&self) {
        self.progress.lock().unwrap().push("hide");
    }

    fn settings_dialog(&self, dialog: &SettingsDialog) -> DialogOutcome {
        self.dialogs.lock().unwrap().push(dialog.clone());
        self.dialog_answer
            .clone()
            .unwrap_or_else(|| DialogOutcome::Start(dialog.defaults()))
    }

    fn reload(&self) {
        *self.reloads.lock().unwrap() += 1;
    }
}

#[derive(Default)]
pub struct MemoryForm {
    pub doctype: String,
    pub items: Vec<LineItem>,
    pub language: Option<String>,
    pub provider: Option<String>,
    pub fields: bool,
    pub buttons: Vec<(String, ButtonAction)>,
    pub saves: usize,
    pub refreshes: usize,
}

impl MemoryForm {
    pub fn with_descriptions(descriptions: &[&str]) -> Self {
        Self {
            doctype: INVOICE_DOCTYPE.to_string(),
            items: descriptions
                .iter()
                .enumerate()
                .map(|(i, d)| LineItem::new(&format!("ITEM-{}", i + 1), d))
                .collect(),
            fields: true,
            ..Self::default()
        }
    }

    pub fn translated(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|i| i.translated_description.as_str())
            .collect()
    }

    pub fn button_actions(&self) -> Vec<ButtonAction> {
        self.buttons.iter().map(|(_, a)| *a).collect()
    }
}

impl InvoiceForm for MemoryForm {
    fn doctype(&self) -> &str {
        &self.doctype
    }

    fn name(&self) -> &str {
        "SINV-TEST"
    }

    fn has_translation_fields(&self) -> bool {
        self.fields
    }

    fn items(&self) -> &[LineItem] {
        &self.items
    }

    fn set_translated_description(&mut self, index: usize, text: &str) -> Result<(), TranslateError> {
        match self.items.get_mut(index) {
            Some(item) => {
                item.translated_description = text.to_string();
                Ok(())
            }
            None => Err(TranslateError::Form(format!("no row {}", index))),
        }
    }

    fn translation_language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    fn set_translation_language(&mut self, language: &str) {
        self.language = Some(language.to_string());
    }

    fn ai_provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    fn set_ai_provider(&mut self, provider: &str) {
        self.provider = Some(provider.to_string());
    }

    fn save(&mut self) -> Result<(), TranslateError> {
        self.saves += 1;
        Ok(())
    }

    fn refresh_fields(&mut self) {
        self.refreshes += 1;
    }

    fn remove_button_group(&mut self, group: &str) {
        self.buttons.retain(|(g, _)| g != group);
    }

    fn add_button(&mut self, action: ButtonAction, group: &str) {
        self.buttons.push((group.to_string(), action));
    }
}
