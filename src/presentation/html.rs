// HTML fragments shown in host message boxes
use crate::domain::model::{
    in_display_order, BatchSummary, ProviderTable, ProviderTestResult, TranslationStats,
};
use crate::domain::provider::SetupGuideEntry;
use std::fmt::Write;

/// Rough per-item cost used for the estimate line, in dollars.
const COST_PER_ITEM: f64 = 0.001;

const CARD: &str =
    "text-align: center; padding: 15px; background: white; border-radius: 8px; border: 1px solid #dee2e6;";
const STAT_CARD: &str =
    "text-align: center; padding: 20px; background: #f8f9fa; border-radius: 10px;";
const PANEL: &str = "margin: 15px 0; padding: 15px; border: 1px solid #dee2e6; border-radius: 8px;";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Success rate in percent with one decimal; an empty batch reads 0.0.
pub fn success_rate(summary: &BatchSummary) -> String {
    if summary.total_items == 0 {
        return "0.0".to_string();
    }
    format!(
        "{:.1}",
        summary.successful_translations as f64 / summary.total_items as f64 * 100.0
    )
}

pub fn cost_estimate(summary: &BatchSummary) -> String {
    format!("{:.3}", summary.total_items as f64 * COST_PER_ITEM)
}

fn stat_tile(out: &mut String, value: &str, label: &str, color: &str) {
    write!(
        out,
        "<div style=\"{CARD}\"><div style=\"font-size: 24px; font-weight: bold; color: {color};\">{value}</div>\
         <div style=\"font-size: 12px; color: #666;\">{label}</div></div>"
    )
    .ok();
}

pub fn bulk_results_html(summary: &BatchSummary) -> String {
    let mut html = String::new();
    html.push_str("<div style=\"padding: 20px; background: #f8f9fa; border-radius: 10px;\">");
    html.push_str(
        "<h3 style=\"text-align: center; margin-bottom: 20px; color: #28a745;\">AI Translation Complete!</h3>",
    );
    html.push_str("<div style=\"display: grid; grid-template-columns: repeat(auto-fit, minmax(120px, 1fr)); gap: 15px; margin: 20px 0;\">");
    stat_tile(
        &mut html,
        &summary.successful_translations.to_string(),
        "Successful",
        "#28a745",
    );
    stat_tile(
        &mut html,
        &format!("{}%", success_rate(summary)),
        "Success Rate",
        "#007bff",
    );
    stat_tile(
        &mut html,
        &format!("{:.1}s", summary.average_processing_time),
        "Avg Speed",
        "#6f42c1",
    );
    html.push_str("</div>");

    let provider = summary
        .ai_provider
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or("Auto")
        .to_uppercase();
    html.push_str("<div style=\"background: white; padding: 15px; border-radius: 8px; margin-top: 15px; border: 1px solid #dee2e6;\">");
    html.push_str("<div style=\"display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap;\">");
    write!(
        html,
        "<div><strong>AI Provider:</strong> {}</div><div><strong>Est. Cost:</strong> ~${}</div>",
        escape(&provider),
        cost_estimate(summary)
    )
    .ok();
    html.push_str("</div>");

    if summary.failed_translations > 0 {
        write!(
            html,
            "<div style=\"margin-top: 10px; padding: 10px; background: #fff3cd; border-radius: 5px; border: 1px solid #ffeaa7;\">\
             <strong>Note:</strong> {} items failed to translate</div>",
            summary.failed_translations
        )
        .ok();
    }
    if let Some(error) = summary.error.as_deref().filter(|e| !e.is_empty()) {
        write!(
            html,
            "<div style=\"color: #dc3545; margin-top: 10px;\"><strong>Error:</strong> {}</div>",
            escape(error)
        )
        .ok();
    }

    html.push_str("</div></div>");
    html
}

/// Status icon and label of one provider probe.
pub fn test_status(result: &ProviderTestResult) -> (&'static str, &'static str) {
    if result.is_success() {
        ("✅", "Working")
    } else if result.is_not_configured() {
        ("⚙️", "Not Configured")
    } else {
        ("❌", "Failed")
    }
}

/// `(working, total)` over a probe table.
pub fn test_tally(results: &ProviderTable<ProviderTestResult>) -> (usize, usize) {
    let working = results.values().filter(|r| r.is_success()).count();
    (working, results.len())
}

pub fn test_results_html(results: &ProviderTable<ProviderTestResult>) -> String {
    let mut html = String::from("<div style=\"padding: 20px;\"><h3>AI Provider Test Results</h3>");

    for (provider, result) in in_display_order(results) {
        let (icon, label) = test_status(result);
        write!(
            html,
            "<div style=\"{PANEL}\"><h4>{} {}</h4><div><strong>Status:</strong> {}</div>",
            icon,
            escape(&provider.to_uppercase()),
            label
        )
        .ok();

        if result.is_success() {
            write!(
                html,
                "<div><strong>Model:</strong> {}</div><div><strong>Response Time:</strong> {:.2}s</div>\
                 <div style=\"background: #f8f9fa; padding: 10px; border-radius: 5px; margin-top: 10px; font-style: italic;\">\"{}\"</div>",
                escape(result.model.as_deref().unwrap_or("Unknown")),
                result.processing_time.unwrap_or(0.0),
                escape(
                    result
                        .translated_text
                        .as_deref()
                        .filter(|t| !t.is_empty())
                        .unwrap_or("No translation returned")
                )
            )
            .ok();
        }

        if let Some(error) = result.error.as_deref().filter(|e| !e.is_empty()) {
            write!(
                html,
                "<div style=\"color: #dc3545; margin-top: 10px;\"><strong>Error:</strong> {}</div>",
                escape(error)
            )
            .ok();
        }
        html.push_str("</div>");
    }

    let (working, total) = test_tally(results);
    write!(
        html,
        "<div style=\"margin-top: 20px; padding: 15px; background: #f8f9fa; border-radius: 8px; text-align: center;\">\
         <h4>Summary</h4><div><strong>{} of {}</strong> providers working</div></div>",
        working, total
    )
    .ok();
    html.push_str("</div>");
    html
}

pub fn setup_guide_html(guide: &ProviderTable<SetupGuideEntry>) -> String {
    let mut html = String::from(
        "<div style=\"padding: 20px;\"><h2>AI Translation Setup Guide</h2>\
         <p>Configure one or more AI providers to start translating:</p>",
    );

    for (_, info) in in_display_order(guide) {
        write!(
            html,
            "<div style=\"margin: 20px 0; padding: 20px; border: 1px solid #dee2e6; border-radius: 8px;\">\
             <h3>{name}</h3>\
             <div><strong>Free Tier:</strong> {free}</div>\
             <div><strong>Sign Up:</strong> <a href=\"{signup}\" target=\"_blank\">{signup}</a></div>\
             <div><strong>API Keys:</strong> <a href=\"{keys}\" target=\"_blank\">{keys}</a></div>\
             <div style=\"margin-top: 15px; background: #f8f9fa; padding: 15px; border-radius: 5px;\">\
             <strong>config.toml:</strong><br><code>{config_key} = \"your_api_key_here\"</code></div></div>",
            name = escape(&info.name),
            free = escape(&info.free_tier),
            signup = escape(&info.signup_url),
            keys = escape(&info.api_key_url),
            config_key = escape(&info.config_key),
        )
        .ok();
    }

    html.push_str(
        "<div style=\"background: #d4edda; padding: 15px; border-radius: 5px; margin-top: 20px;\">\
         <strong>Quick Start:</strong> Get Groq (free) at console.groq.com</div></div>",
    );
    html
}

pub fn stats_html(stats: &TranslationStats) -> String {
    let mut html = String::from("<div style=\"padding: 20px;\"><h3>Translation Statistics</h3>");
    html.push_str("<div style=\"display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; margin: 20px 0;\">");
    write!(
        html,
        "<div style=\"{STAT_CARD}\"><div style=\"font-size: 24px; font-weight: bold; color: #007bff;\">{}</div><div>Total Translations</div></div>\
         <div style=\"{STAT_CARD}\"><div style=\"font-size: 24px; font-weight: bold; color: #28a745;\">{}</div><div>Configured Providers</div></div>",
        stats.total_translations,
        stats.configured_providers.len()
    )
    .ok();
    html.push_str("</div>");

    if !stats.configured_providers.is_empty() {
        html.push_str("<div style=\"margin-top: 20px;\"><h4>Active Providers:</h4><div style=\"display: flex; flex-wrap: wrap; gap: 10px;\">");
        for provider in &stats.configured_providers {
            write!(
                html,
                "<span style=\"background: #007bff; color: white; padding: 5px 12px; border-radius: 15px; font-size: 12px;\">{}</span>",
                escape(&provider.to_uppercase())
            )
            .ok();
        }
        html.push_str("</div></div>");
    }

    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_has_zero_rate() {
        assert_eq!(success_rate(&BatchSummary::default()), "0.0");
    }

    #[test]
    fn cost_uses_three_decimals() {
        let summary = BatchSummary {
            total_items: 7,
            ..BatchSummary::default()
        };
        assert_eq!(cost_estimate(&summary), "0.007");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }
}
