use crate::application::orchestrator::TranslationOrchestrator;
use crate::domain::error::TranslateError;
use crate::domain::language::DEFAULT_LANGUAGE;
use crate::domain::model::INVOICE_DOCTYPE;
use crate::domain::provider::DEFAULT_PROVIDER;
use crate::domain::traits::{HostUi, InvoiceForm, TranslationBackend};
use crate::domain::ui::{ButtonAction, Indicator, BUTTON_GROUP};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Onload,
    Refresh,
    AiProviderChanged,
    TranslationLanguageChanged,
}

pub type FormHandler = fn(&mut dyn InvoiceForm) -> Result<(), TranslateError>;

/// Handlers registered per lifecycle event, run in registration order.
#[derive(Default)]
pub struct FormEvents {
    handlers: HashMap<LifecycleEvent, Vec<FormHandler>>,
}

impl FormEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, event: LifecycleEvent, handler: FormHandler) -> Self {
        self.handlers.entry(event).or_default().push(handler);
        self
    }

    pub fn handler_count(&self, event: LifecycleEvent) -> usize {
        self.handlers.get(&event).map_or(0, Vec::len)
    }

    /// Run every handler of `event`; stops at the first error.
    pub fn fire(&self, event: LifecycleEvent, form: &mut dyn InvoiceForm) -> Result<(), TranslateError> {
        debug!(?event, doctype = form.doctype(), "lifecycle event");
        if let Some(handlers) = self.handlers.get(&event) {
            for handler in handlers {
                handler(form)?;
            }
        }
        Ok(())
    }
}

/// The table bound to the invoice form.
pub fn invoice_events() -> FormEvents {
    FormEvents::new()
        .on(LifecycleEvent::Onload, install_buttons)
        .on(LifecycleEvent::Refresh, install_buttons)
        .on(LifecycleEvent::Refresh, apply_defaults)
        .on(LifecycleEvent::AiProviderChanged, save_on_provider_change)
        .on(LifecycleEvent::TranslationLanguageChanged, save_on_language_change)
}

/// Replace the translation button group.
///
/// An unprovisioned form only gets the setup button.
pub fn install_buttons(form: &mut dyn InvoiceForm) -> Result<(), TranslateError> {
    if form.doctype() != INVOICE_DOCTYPE {
        return Ok(());
    }

    form.remove_button_group(BUTTON_GROUP);
    if !form.has_translation_fields() {
        debug!("translation fields missing, offering setup only");
        form.add_button(ButtonAction::SetupFields, BUTTON_GROUP);
        return Ok(());
    }

    for action in ButtonAction::TRANSLATION_BUTTONS {
        form.add_button(action, BUTTON_GROUP);
    }
    Ok(())
}

pub fn apply_defaults(form: &mut dyn InvoiceForm) -> Result<(), TranslateError> {
    if !form.has_translation_fields() {
        return Ok(());
    }
    if form.translation_language().map_or(true, str::is_empty) {
        form.set_translation_language(DEFAULT_LANGUAGE);
    }
    if form.ai_provider().map_or(true, str::is_empty) {
        form.set_ai_provider(DEFAULT_PROVIDER.as_str());
    }
    Ok(())
}

fn save_on_provider_change(form: &mut dyn InvoiceForm) -> Result<(), TranslateError> {
    if form.ai_provider().is_some_and(|p| !p.is_empty()) {
        form.save()?;
    }
    Ok(())
}

fn save_on_language_change(form: &mut dyn InvoiceForm) -> Result<(), TranslateError> {
    if form.translation_language().is_some_and(|l| !l.is_empty()) {
        form.save()?;
    }
    Ok(())
}

/// Which translation fields the current form exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormReport {
    pub doctype: String,
    pub name: String,
    pub language: bool,
    pub provider: bool,
    pub items: usize,
}

/// Manual helpers for inspecting a form whose buttons did not appear.
#[derive(Debug, Clone, Copy, Default)]
pub struct Diagnostics;

impl Diagnostics {
    pub fn force_buttons(&self, form: &mut dyn InvoiceForm) -> Result<(), TranslateError> {
        info!(doctype = form.doctype(), "forcing translation buttons");
        install_buttons(form)
    }

    pub fn test_buttons<U: HostUi + ?Sized>(
        &self,
        form: &mut dyn InvoiceForm,
        ui: &U,
    ) -> Result<(), TranslateError> {
        self.force_buttons(form)?;
        ui.show_alert("AI buttons forced to show", Indicator::Blue);
        Ok(())
    }

    pub fn check_form(&self, form: &dyn InvoiceForm) -> FormReport {
        let provisioned = form.has_translation_fields();
        let report = FormReport {
            doctype: form.doctype().to_string(),
            name: form.name().to_string(),
            language: provisioned,
            provider: provisioned,
            items: form.items().len(),
        };
        info!(?report, "form check");
        report
    }
}

/// Everything the host wires up for one invoice screen.
pub struct Initialized<U> {
    pub orchestrator: TranslationOrchestrator<U>,
    pub events: FormEvents,
    pub diagnostics: Diagnostics,
}

pub fn init<U: HostUi>(backend: Arc<dyn TranslationBackend>, ui: U) -> Initialized<U> {
    Initialized {
        orchestrator: TranslationOrchestrator::new(backend, ui),
        events: invoice_events(),
        diagnostics: Diagnostics,
    }
}
