use crate::application::service::{SAMPLE_SOURCE, SAMPLE_TARGET, SAMPLE_TEXT};
use crate::domain::language::{get_language_code, DEFAULT_LANGUAGE, TARGET_LANGUAGES};
use crate::domain::model::{
    in_display_order, BatchSummary, LineItem, TranslationRequest, TranslationResult,
};
use crate::domain::provider::DEFAULT_PROVIDER;
use crate::domain::traits::{HostUi, InvoiceForm, TranslationBackend};
use crate::domain::ui::{
    ButtonAction, DialogOutcome, Indicator, Notice, SettingsDialog, TranslationSettings,
};
use crate::presentation::html;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Pause between a successful field setup and the page reload.
pub const RELOAD_DELAY: Duration = Duration::from_secs(2);

/// How a workflow ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    NoProviders,
    NoEligibleItems,
    Cancelled,
    /// The bulk call came back; `applied` items were written.
    Translated { applied: usize, summary: BatchSummary },
    /// The bulk call failed or its reply was unusable.
    Failed(String),
    /// Only the single provider diagnostic ran.
    ProviderTested(bool),
    Done,
}

/// Notice texts of one bulk workflow.
struct BulkWording {
    progress_title: &'static str,
    progress_message: &'static str,
    failure_title: &'static str,
    failure_message: &'static str,
}

const SMART: BulkWording = BulkWording {
    progress_title: "Smart AI Translation",
    progress_message: "Preparing smart translation...",
    failure_title: "Smart Translation Failed",
    failure_message: "Smart AI translation failed. Please try again.",
};

const QUICK: BulkWording = BulkWording {
    progress_title: "AI Bulk Translation",
    progress_message: "Preparing bulk translation request...",
    failure_title: "Translation Failed",
    failure_message:
        "AI bulk translation failed. Please check your provider configuration and try again.",
};

/// Indices of the items a run would submit, in invoice order.
///
/// Items without source text never qualify. Unless `overwrite_existing` is
/// set, items that already carry a translation are left alone too.
pub fn select_items(items: &[LineItem], settings: &TranslationSettings) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.has_source_text())
        .filter(|(_, item)| settings.overwrite_existing || !item.is_translated())
        .map(|(i, _)| i)
        .collect()
}

/// Write results onto the selected items by position; returns how many were written.
///
/// `selected[n]` receives `results[n]`. Failed or empty results leave their
/// item untouched.
pub fn apply_results<F: InvoiceForm + ?Sized>(
    form: &mut F,
    selected: &[usize],
    results: &[TranslationResult],
) -> usize {
    if results.len() != selected.len() {
        warn!(
            submitted = selected.len(),
            returned = results.len(),
            "result count differs from submitted items"
        );
    }

    let mut applied = 0;
    for (&index, result) in selected.iter().zip(results) {
        if !result.is_applicable() {
            continue;
        }
        match form.set_translated_description(index, &result.translated_text) {
            Ok(()) => applied += 1,
            Err(e) => warn!(index, error = %e, "could not write translation"),
        }
    }
    applied
}

/// Language chosen on the invoice, or Arabic.
pub fn default_language<F: InvoiceForm + ?Sized>(form: &F) -> String {
    form.translation_language()
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string()
}

/// Binds form buttons to backend calls and backend replies to form writes.
pub struct TranslationOrchestrator<U> {
    backend: Arc<dyn TranslationBackend>,
    ui: U,
    reload_delay: Duration,
}

impl<U: HostUi> TranslationOrchestrator<U> {
    pub fn new(backend: Arc<dyn TranslationBackend>, ui: U) -> Self {
        Self {
            backend,
            ui,
            reload_delay: RELOAD_DELAY,
        }
    }

    pub fn with_reload_delay(mut self, delay: Duration) -> Self {
        self.reload_delay = delay;
        self
    }

    pub fn backend(&self) -> &Arc<dyn TranslationBackend> {
        &self.backend
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub async fn dispatch<F: InvoiceForm + ?Sized>(
        &self,
        action: ButtonAction,
        form: &mut F,
    ) -> Outcome {
        debug!(button = action.label(), "button pressed");
        match action {
            ButtonAction::SetupFields => {
                self.setup_fields().await;
                Outcome::Done
            }
            ButtonAction::SmartTranslate => self.show_ai_dialog(form).await,
            ButtonAction::QuickTranslate => self.quick_translate(form).await,
            ButtonAction::TestProviders => {
                self.test_providers().await;
                Outcome::Done
            }
            ButtonAction::SetupGuide => {
                self.show_setup_guide().await;
                Outcome::Done
            }
            ButtonAction::TranslationStats => {
                self.show_translation_stats().await;
                Outcome::Done
            }
            ButtonAction::ClearTranslations => self.clear_all_translations(form),
        }
    }

    /// Configured provider ids in catalog order; `None` after telling the user why.
    pub async fn available_providers(&self) -> Option<Vec<String>> {
        let providers = match self.backend.list_providers().await {
            Ok(providers) => providers,
            Err(e) => {
                warn!(error = %e, "listing providers failed");
                self.ui.msgprint(Notice::new(
                    "Provider Check Failed",
                    format!("Could not load AI providers: {}", html::escape(&e.to_string())),
                    Indicator::Red,
                ));
                return None;
            }
        };

        let available: Vec<String> = in_display_order(&providers)
            .into_iter()
            .filter(|(_, info)| info.configured)
            .map(|(id, _)| id.clone())
            .collect();

        if available.is_empty() {
            self.ui.msgprint(Notice::new(
                "No AI Providers Configured",
                "Please configure at least one AI provider. Click AI Setup Guide for instructions.",
                Indicator::Orange,
            ));
            return None;
        }
        Some(available)
    }

    /// Dialog contents for a run, seeded from the invoice.
    pub fn settings_dialog<F: InvoiceForm + ?Sized>(
        &self,
        form: &F,
        providers: Vec<String>,
    ) -> SettingsDialog {
        let default_provider = form
            .ai_provider()
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .or_else(|| providers.first().cloned())
            .unwrap_or_default();

        SettingsDialog {
            providers,
            default_provider,
            languages: TARGET_LANGUAGES.iter().map(|(name, _)| *name).collect(),
            default_language: default_language(form),
        }
    }

    /// Smart translate: pick provider and options, then run.
    pub async fn show_ai_dialog<F: InvoiceForm + ?Sized>(&self, form: &mut F) -> Outcome {
        let Some(providers) = self.available_providers().await else {
            return Outcome::NoProviders;
        };

        let dialog = self.settings_dialog(&*form, providers);
        match self.ui.settings_dialog(&dialog) {
            DialogOutcome::Start(settings) => self.smart_translate(form, &settings).await,
            DialogOutcome::TestProvider(provider) => {
                Outcome::ProviderTested(self.test_single_provider(&provider).await)
            }
            DialogOutcome::Cancelled => Outcome::Cancelled,
        }
    }

    pub async fn smart_translate<F: InvoiceForm + ?Sized>(
        &self,
        form: &mut F,
        settings: &TranslationSettings,
    ) -> Outcome {
        let selected = select_items(form.items(), settings);
        if selected.is_empty() {
            self.ui.msgprint(Notice::new(
                "No Items to Translate",
                "No items found to translate with current settings.",
                Indicator::Orange,
            ));
            return Outcome::NoEligibleItems;
        }

        let language_code = get_language_code(&settings.target_language);
        self.run_bulk(form, &selected, language_code, &settings.ai_provider, &SMART)
            .await
    }

    /// Translate every described item with the invoice's own provider and language.
    pub async fn quick_translate<F: InvoiceForm + ?Sized>(&self, form: &mut F) -> Outcome {
        let selected: Vec<usize> = form
            .items()
            .iter()
            .enumerate()
            .filter(|(_, item)| item.has_source_text())
            .map(|(i, _)| i)
            .collect();

        if selected.is_empty() {
            self.ui.msgprint(Notice::new(
                "No Items to Translate",
                "No items with descriptions found in this invoice.",
                Indicator::Orange,
            ));
            return Outcome::NoEligibleItems;
        }

        let provider = form
            .ai_provider()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PROVIDER.as_str())
            .to_string();
        let language = default_language(&*form);

        let question = format!(
            "Quick AI Translation will use {} to translate all {} items to {}. Continue?",
            provider.to_uppercase(),
            selected.len(),
            language
        );
        if !self.ui.confirm(&question) {
            return Outcome::Cancelled;
        }

        self.run_bulk(form, &selected, get_language_code(&language), &provider, &QUICK)
            .await
    }

    async fn run_bulk<F: InvoiceForm + ?Sized>(
        &self,
        form: &mut F,
        selected: &[usize],
        language_code: &str,
        provider: &str,
        wording: &BulkWording,
    ) -> Outcome {
        let requests: Vec<TranslationRequest> = selected
            .iter()
            .map(|&i| TranslationRequest::from(&form.items()[i]))
            .collect();

        self.ui
            .show_progress(wording.progress_title, wording.progress_message);
        let reply = self
            .backend
            .bulk_translate(&requests, language_code, provider)
            .await;
        self.ui.hide_progress();

        match reply {
            Ok(response) => {
                let applied = apply_results(form, selected, &response.results);
                self.ui.msgprint(bulk_summary_notice(&response.summary));
                form.refresh_fields();
                Outcome::Translated {
                    applied,
                    summary: response.summary,
                }
            }
            Err(e) => {
                warn!(error = %e, provider, "bulk translation failed");
                self.ui.msgprint(Notice::new(
                    wording.failure_title,
                    wording.failure_message,
                    Indicator::Red,
                ));
                Outcome::Failed(e.to_string())
            }
        }
    }

    /// Translate the canonical sample with one provider; never touches the invoice.
    pub async fn test_single_provider(&self, provider: &str) -> bool {
        let name = provider.to_uppercase();
        self.ui
            .show_alert(&format!("Testing {} provider...", name), Indicator::Blue);

        match self
            .backend
            .translate_text(SAMPLE_TEXT, SAMPLE_TARGET, SAMPLE_SOURCE, provider)
            .await
        {
            Ok(reply) if reply.success => {
                self.ui.show_alert(
                    &format!("{} is working correctly!", name),
                    Indicator::Green,
                );
                true
            }
            Ok(reply) => {
                let error = reply.error.unwrap_or_else(|| "Unknown error".to_string());
                self.ui
                    .show_alert(&format!("{} test failed: {}", name, error), Indicator::Red);
                false
            }
            Err(e) => {
                self.ui
                    .show_alert(&format!("{} test failed: {}", name, e), Indicator::Red);
                false
            }
        }
    }

    pub async fn test_providers(&self) {
        self.ui
            .show_alert("Testing all AI providers...", Indicator::Blue);

        match self.backend.test_all_providers().await {
            Ok(results) => {
                let (working, _) = html::test_tally(&results);
                self.ui.msgprint(Notice::new(
                    "AI Provider Test Results",
                    html::test_results_html(&results),
                    if working > 0 {
                        Indicator::Green
                    } else {
                        Indicator::Orange
                    },
                ));
            }
            Err(e) => {
                warn!(error = %e, "provider test failed");
                self.ui.msgprint(Notice::new(
                    "Test Failed",
                    "Failed to test AI providers. Please check your configuration.",
                    Indicator::Red,
                ));
            }
        }
    }

    pub async fn show_setup_guide(&self) {
        let guide = match self.backend.setup_guide().await {
            Ok(guide) => guide,
            Err(e) => {
                warn!(error = %e, "setup guide unavailable");
                Default::default()
            }
        };
        self.ui.msgprint(Notice::new(
            "AI Setup Guide",
            html::setup_guide_html(&guide),
            Indicator::Blue,
        ));
    }

    pub async fn show_translation_stats(&self) {
        let stats = match self.backend.translation_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "translation stats unavailable");
                Default::default()
            }
        };
        self.ui.msgprint(Notice::new(
            "Translation Statistics",
            html::stats_html(&stats),
            Indicator::Blue,
        ));
    }

    /// Empty every item's translation after confirmation. Local only.
    pub fn clear_all_translations<F: InvoiceForm + ?Sized>(&self, form: &mut F) -> Outcome {
        if !self.ui.confirm(
            "Clear all translations in this invoice?<br><br>This will remove all AI translated descriptions from the current invoice items.",
        ) {
            return Outcome::Cancelled;
        }

        for index in 0..form.items().len() {
            if let Err(e) = form.set_translated_description(index, "") {
                warn!(index, error = %e, "could not clear translation");
            }
        }

        self.ui
            .show_alert("All translations cleared successfully", Indicator::Green);
        form.refresh_fields();
        Outcome::Done
    }

    /// Create the custom fields, then reload once they exist.
    pub async fn setup_fields(&self) -> bool {
        if !self
            .ui
            .confirm("This will create the required custom fields for AI translation. Continue?")
        {
            return false;
        }

        match self.backend.create_custom_fields().await {
            Ok(status) if status.success => {
                self.ui.show_alert(
                    "AI translation fields created successfully. Please refresh the page.",
                    Indicator::Green,
                );
                tokio::time::sleep(self.reload_delay).await;
                self.ui.reload();
                true
            }
            Ok(status) => {
                self.ui.msgprint(Notice::new(
                    "Setup Error",
                    status.error.unwrap_or_else(|| {
                        "Failed to create custom fields. Please check permissions.".to_string()
                    }),
                    Indicator::Red,
                ));
                false
            }
            Err(e) => {
                warn!(error = %e, "field setup failed");
                self.ui.msgprint(Notice::new(
                    "Setup Error",
                    "Failed to create custom fields. Please check permissions.",
                    Indicator::Red,
                ));
                false
            }
        }
    }
}

pub fn bulk_summary_notice(summary: &BatchSummary) -> Notice {
    Notice::new(
        "AI Translation Results",
        html::bulk_results_html(summary),
        if summary.failed_translations > 0 {
            Indicator::Orange
        } else {
            Indicator::Green
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str, translated: &str) -> LineItem {
        LineItem {
            item_code: "X".to_string(),
            description: description.to_string(),
            translated_description: translated.to_string(),
        }
    }

    #[test]
    fn whitespace_descriptions_are_skipped() {
        let items = vec![item("  ", ""), item("\t\n", ""), item("Desk", "")];
        let settings = TranslationSettings::new("groq", "Arabic");
        assert_eq!(select_items(&items, &settings), vec![2]);
    }

    #[test]
    fn overwrite_includes_translated_items() {
        let items = vec![item("Desk", "مكتب"), item("Chair", "")];
        let mut settings = TranslationSettings::new("groq", "Arabic");
        assert_eq!(select_items(&items, &settings), vec![1]);
        settings.overwrite_existing = true;
        assert_eq!(select_items(&items, &settings), vec![0, 1]);
    }
}
