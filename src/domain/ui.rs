use crate::domain::language::DEFAULT_LANGUAGE;
use serde::{Deserialize, Serialize};

/// Colour hint attached to a notice or alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Green,
    Orange,
    Red,
    Blue,
}

/// A blocking message box. `message` may contain HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub indicator: Indicator,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>, indicator: Indicator) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            indicator,
        }
    }
}

/// Options chosen in the settings dialog before a run.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationSettings {
    pub ai_provider: String,
    pub target_language: String,
    pub overwrite_existing: bool,
    pub skip_empty: bool,
}

impl TranslationSettings {
    pub fn new(ai_provider: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            ai_provider: ai_provider.into(),
            target_language: target_language.into(),
            overwrite_existing: false,
            skip_empty: true,
        }
    }
}

/// What the settings dialog offers and pre-selects.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDialog {
    pub providers: Vec<String>,
    pub default_provider: String,
    pub languages: Vec<&'static str>,
    pub default_language: String,
}

impl SettingsDialog {
    pub fn defaults(&self) -> TranslationSettings {
        TranslationSettings::new(self.default_provider.clone(), self.default_language.clone())
    }
}

impl Default for SettingsDialog {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            default_provider: String::new(),
            languages: Vec::new(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome {
    /// Primary action: start the run.
    Start(TranslationSettings),
    /// Secondary action: probe the chosen provider only.
    TestProvider(String),
    Cancelled,
}

pub const BUTTON_GROUP: &str = "AI Translation";

/// Custom buttons the orchestrator installs on the invoice form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    SetupFields,
    SmartTranslate,
    QuickTranslate,
    TestProviders,
    SetupGuide,
    TranslationStats,
    ClearTranslations,
}

impl ButtonAction {
    pub const TRANSLATION_BUTTONS: [ButtonAction; 6] = [
        ButtonAction::SmartTranslate,
        ButtonAction::QuickTranslate,
        ButtonAction::TestProviders,
        ButtonAction::SetupGuide,
        ButtonAction::TranslationStats,
        ButtonAction::ClearTranslations,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ButtonAction::SetupFields => "Setup AI Translation",
            ButtonAction::SmartTranslate => "Smart AI Translate",
            ButtonAction::QuickTranslate => "Quick AI Translate",
            ButtonAction::TestProviders => "Test AI Providers",
            ButtonAction::SetupGuide => "AI Setup Guide",
            ButtonAction::TranslationStats => "Translation Stats",
            ButtonAction::ClearTranslations => "Clear All Translations",
        }
    }
}
