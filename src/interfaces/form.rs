// Invoice form backed by a JSON file
use crate::domain::error::TranslateError;
use crate::domain::language::get_language_code;
use crate::domain::model::{Invoice, LineItem, TranslationRecord, INVOICE_DOCTYPE};
use crate::domain::provider::DEFAULT_PROVIDER;
use crate::domain::traits::InvoiceForm;
use crate::domain::ui::ButtonAction;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct JsonInvoiceForm {
    path: PathBuf,
    invoice: Invoice,
    provisioned: bool,
    buttons: Vec<(String, ButtonAction)>,
    saves: usize,
}

impl JsonInvoiceForm {
    pub fn new(path: impl Into<PathBuf>, invoice: Invoice, provisioned: bool) -> Self {
        Self {
            path: path.into(),
            invoice,
            provisioned,
            buttons: Vec::new(),
            saves: 0,
        }
    }

    /// Read an invoice file; a missing name is taken from the file stem.
    pub fn load(path: &Path, provisioned: bool) -> Result<Self, TranslateError> {
        let content = std::fs::read_to_string(path)?;
        let mut invoice: Invoice = serde_json::from_str(&content)?;
        if invoice.name.is_empty() {
            invoice.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(Self::new(path, invoice, provisioned))
    }

    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    pub fn buttons(&self) -> Vec<ButtonAction> {
        self.buttons.iter().map(|(_, action)| *action).collect()
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Log rows for every translated item, stamped `modified`.
    pub fn translation_records(&self, modified: i64) -> Vec<TranslationRecord> {
        let language = self
            .invoice
            .translation_language
            .as_deref()
            .map(get_language_code)
            .unwrap_or_else(|| get_language_code(""));
        let provider = self
            .invoice
            .ai_provider
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PROVIDER.as_str());

        self.invoice
            .items
            .iter()
            .filter(|item| item.is_translated())
            .map(|item| TranslationRecord {
                invoice_name: self.invoice.name.clone(),
                item_code: item.item_code.clone(),
                original_text: item.description.clone(),
                translated_text: item.translated_description.clone(),
                target_language: language.to_string(),
                ai_provider: provider.to_string(),
                modified,
            })
            .collect()
    }
}

impl InvoiceForm for JsonInvoiceForm {
    fn doctype(&self) -> &str {
        INVOICE_DOCTYPE
    }

    fn name(&self) -> &str {
        &self.invoice.name
    }

    fn has_translation_fields(&self) -> bool {
        self.provisioned
    }

    fn items(&self) -> &[LineItem] {
        &self.invoice.items
    }

    fn set_translated_description(&mut self, index: usize, text: &str) -> Result<(), TranslateError> {
        let item = self
            .invoice
            .items
            .get_mut(index)
            .ok_or_else(|| TranslateError::Form(format!("no item at row {}", index + 1)))?;
        item.translated_description = text.to_string();
        Ok(())
    }

    fn translation_language(&self) -> Option<&str> {
        self.invoice.translation_language.as_deref()
    }

    fn set_translation_language(&mut self, language: &str) {
        self.invoice.translation_language = Some(language.to_string());
    }

    fn ai_provider(&self) -> Option<&str> {
        self.invoice.ai_provider.as_deref()
    }

    fn set_ai_provider(&mut self, provider: &str) {
        self.invoice.ai_provider = Some(provider.to_string());
    }

    fn save(&mut self) -> Result<(), TranslateError> {
        let json = serde_json::to_string_pretty(&self.invoice)?;
        std::fs::write(&self.path, json)?;
        self.saves += 1;
        debug!(path = %self.path.display(), "invoice saved");
        Ok(())
    }

    fn refresh_fields(&mut self) {}

    fn remove_button_group(&mut self, group: &str) {
        self.buttons.retain(|(g, _)| g != group);
    }

    fn add_button(&mut self, action: ButtonAction, group: &str) {
        self.buttons.push((group.to_string(), action));
    }
}
