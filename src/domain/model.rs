use crate::domain::provider::ProviderId;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Provider id → value, as returned by the backend's per-provider operations.
pub type ProviderTable<T> = BTreeMap<String, T>;

/// Entries of a [`ProviderTable`] in canonical provider order.
pub fn in_display_order<T>(table: &ProviderTable<T>) -> Vec<(&String, &T)> {
    let mut entries: Vec<_> = table.iter().collect();
    entries.sort_by_key(|(id, _)| ProviderId::display_rank(id));
    entries
}

// 发票 (由宿主表单持有)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Invoice {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub translation_language: Option<String>,
    #[serde(default)]
    pub ai_provider: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

// 发票行
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LineItem {
    #[serde(default)]
    pub item_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub translated_description: String,
}

impl LineItem {
    pub fn new(item_code: &str, description: &str) -> Self {
        Self {
            item_code: item_code.to_string(),
            description: description.to_string(),
            translated_description: String::new(),
        }
    }

    pub fn has_source_text(&self) -> bool {
        !self.description.trim().is_empty()
    }

    pub fn is_translated(&self) -> bool {
        !self.translated_description.is_empty()
    }
}

/// One item as submitted to bulk translation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationRequest {
    pub item_code: String,
    pub description: String,
}

impl From<&LineItem> for TranslationRequest {
    fn from(item: &LineItem) -> Self {
        Self {
            item_code: item.item_code.clone(),
            description: item.description.clone(),
        }
    }
}

/// Per-item outcome of a bulk translation, positionally aligned with the request.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TranslationResult {
    #[serde(default)]
    pub item_code: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub translated_text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(default)]
    pub ai_enhanced: bool,
    #[serde(default)]
    pub processing_time: f64,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub model_used: String,
    #[serde(default)]
    pub ai_provider: String,
}

impl TranslationResult {
    pub fn failed(item_code: &str, error: impl Into<String>) -> Self {
        Self {
            item_code: item_code.to_string(),
            error: error.into(),
            ..Self::default()
        }
    }

    /// Whether this result should be written onto its line item.
    pub fn is_applicable(&self) -> bool {
        self.success && !self.translated_text.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BatchSummary {
    #[serde(default)]
    pub total_items: usize,
    #[serde(default)]
    pub successful_translations: usize,
    #[serde(default)]
    pub failed_translations: usize,
    #[serde(default)]
    pub average_processing_time: f64,
    #[serde(default)]
    pub ai_provider: Option<String>,
    #[serde(default)]
    pub ai_enhanced_count: usize,
    #[serde(default)]
    pub total_processing_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkTranslateResponse {
    pub results: Vec<TranslationResult>,
    #[serde(default)]
    pub summary: BatchSummary,
}

/// Outcome of translating a single text.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TextTranslation {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub translated_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub ai_provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default)]
    pub ai_enhanced: bool,
}

impl TextTranslation {
    pub fn failure(ai_provider: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ai_provider: ai_provider.to_string(),
            ..Self::default()
        }
    }
}

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_NOT_CONFIGURED: &str = "not_configured";
pub const STATUS_FAILED: &str = "failed";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProviderTestResult {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProviderTestResult {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    pub fn is_not_configured(&self) -> bool {
        self.status == STATUS_NOT_CONFIGURED
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityDay {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TranslationStats {
    #[serde(default)]
    pub total_translations: usize,
    #[serde(default)]
    pub configured_providers: Vec<String>,
    #[serde(default)]
    pub provider_stats: BTreeMap<String, usize>,
    #[serde(default)]
    pub recent_activity: Vec<ActivityDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `{success, message?, error?}` reply of operations with no payload.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OperationStatus {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct KeyValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_result: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// 导出的翻译记录
//
// 托管服务直接返回数据库行: 空列为 null, modified 为日期时间字符串
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationRecord {
    pub invoice_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub item_code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub original_text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub translated_text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target_language: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ai_provider: String,
    /// Unix seconds.
    #[serde(default, deserialize_with = "seconds_or_datetime")]
    pub modified: i64,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds(i64),
    Text(String),
    Missing,
}

fn seconds_or_datetime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Seconds(seconds) => Ok(seconds),
        RawTimestamp::Text(text) => parse_datetime(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid datetime: {}", text))),
        RawTimestamp::Missing => Ok(0),
    }
}

/// Unix seconds for `2024-05-01 10:11:12[.ffffff]` (read as UTC) or RFC 3339 text.
pub fn parse_datetime(text: &str) -> Option<i64> {
    let text = text.trim();
    chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .map(|dt| dt.and_utc().timestamp())
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(text).map(|dt| dt.timestamp()))
        .ok()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TranslationExport {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<TranslationRecord>,
    #[serde(default)]
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A custom field the orchestrator expects the host schema to carry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomFieldDef {
    pub doctype: String,
    pub fieldname: String,
    pub label: String,
    pub fieldtype: String,
    pub options: Option<String>,
    pub default_value: Option<String>,
    pub insert_after: String,
    pub read_only: bool,
}

pub const INVOICE_DOCTYPE: &str = "Sales Invoice";
pub const INVOICE_ITEM_DOCTYPE: &str = "Sales Invoice Item";

/// The three fields the translation buttons rely on.
pub fn translation_custom_fields() -> Vec<CustomFieldDef> {
    let language_options = std::iter::once("")
        .chain(crate::domain::language::TARGET_LANGUAGES.iter().map(|(name, _)| *name))
        .collect::<Vec<_>>()
        .join("\n");
    let provider_options = std::iter::once("")
        .chain(ProviderId::ALL.iter().map(|p| p.as_str()))
        .collect::<Vec<_>>()
        .join("\n");

    vec![
        CustomFieldDef {
            doctype: INVOICE_DOCTYPE.to_string(),
            fieldname: "translation_language".to_string(),
            label: "Translation Language".to_string(),
            fieldtype: "Select".to_string(),
            options: Some(language_options),
            default_value: Some(crate::domain::language::DEFAULT_LANGUAGE.to_string()),
            insert_after: "language".to_string(),
            read_only: false,
        },
        CustomFieldDef {
            doctype: INVOICE_ITEM_DOCTYPE.to_string(),
            fieldname: "translated_description".to_string(),
            label: "AI Translated Description".to_string(),
            fieldtype: "Text".to_string(),
            options: None,
            default_value: None,
            insert_after: "description".to_string(),
            read_only: true,
        },
        CustomFieldDef {
            doctype: INVOICE_DOCTYPE.to_string(),
            fieldname: "ai_provider".to_string(),
            label: "AI Provider".to_string(),
            fieldtype: "Select".to_string(),
            options: Some(provider_options),
            default_value: Some(crate::domain::provider::DEFAULT_PROVIDER.as_str().to_string()),
            insert_after: "translation_language".to_string(),
            read_only: false,
        },
    ]
}
