use serde::{Deserialize, Serialize};

/// Target languages offered on the invoice, in display order.
///
/// Each entry is (display name, short code). The display names are the
/// options of the invoice-level `translation_language` field.
pub const TARGET_LANGUAGES: [(&str, &str); 19] = [
    ("Arabic", "ar"),
    ("Spanish", "es"),
    ("French", "fr"),
    ("German", "de"),
    ("Italian", "it"),
    ("Portuguese", "pt"),
    ("Russian", "ru"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Chinese (Simplified)", "zh"),
    ("Chinese (Traditional)", "zh-tw"),
    ("Hindi", "hi"),
    ("Urdu", "ur"),
    ("Turkish", "tr"),
    ("Dutch", "nl"),
    ("Swedish", "sv"),
    ("Danish", "da"),
    ("Norwegian", "no"),
    ("Finnish", "fi"),
];

pub const DEFAULT_LANGUAGE: &str = "Arabic";
pub const FALLBACK_LANGUAGE_CODE: &str = "ar";

// 提示词用的语言名 (code, English name, native name)
const PROMPT_LANGUAGES: [(&str, &str, &str); 20] = [
    ("ar", "Arabic", "العربية"),
    ("es", "Spanish", "Español"),
    ("fr", "French", "Français"),
    ("de", "German", "Deutsch"),
    ("it", "Italian", "Italiano"),
    ("pt", "Portuguese", "Português"),
    ("ru", "Russian", "Русский"),
    ("ja", "Japanese", "日本語"),
    ("ko", "Korean", "한국어"),
    ("zh", "Chinese", "中文"),
    ("zh-tw", "Traditional Chinese", "中文(繁體)"),
    ("hi", "Hindi", "हिन्दी"),
    ("ur", "Urdu", "اردو"),
    ("tr", "Turkish", "Türkçe"),
    ("nl", "Dutch", "Nederlands"),
    ("sv", "Swedish", "Svenska"),
    ("da", "Danish", "Dansk"),
    ("no", "Norwegian", "Norsk"),
    ("fi", "Finnish", "Suomi"),
    ("en", "English", "English"),
];

/// Map a display language name to its short code.
///
/// Unknown names fall back to `"ar"`. That fallback is kept as observed even
/// though it silently turns a typo into an Arabic translation.
pub fn get_language_code(language_name: &str) -> &'static str {
    TARGET_LANGUAGES
        .iter()
        .find(|(name, _)| *name == language_name)
        .map(|(_, code)| *code)
        .unwrap_or(FALLBACK_LANGUAGE_CODE)
}

/// English name of a language code, used when prompting the models.
pub fn language_name(code: &str) -> Option<&'static str> {
    PROMPT_LANGUAGES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, name, _)| *name)
}

pub fn native_language_name(code: &str) -> Option<&'static str> {
    PROMPT_LANGUAGES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, _, native)| *native)
}

pub fn is_target_language(language_name: &str) -> bool {
    TARGET_LANGUAGES.iter().any(|(name, _)| *name == language_name)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupportedLanguage {
    pub code: String,
    pub name: String,
    pub native_name: String,
}

pub fn supported_languages() -> Vec<SupportedLanguage> {
    PROMPT_LANGUAGES
        .iter()
        .map(|(code, name, native)| SupportedLanguage {
            code: code.to_string(),
            name: name.to_string(),
            native_name: native.to_string(),
        })
        .collect()
}
