use once_cell::sync::Lazy;
use regex::Regex;

/// Longest source text sent to a provider, in characters.
pub const MAX_TEXT_CHARS: usize = 5000;

// 模型常见的前缀 ("Translation:", "Arabic:" ...)
static RESPONSE_PREFIXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^translation:\s*",
        r"(?i)^here is the translation:\s*",
        r"(?i)^the translation is:\s*",
        r"(?i)^translated text:\s*",
        r"(?i)^result:\s*",
        r"(?i)^output:\s*",
        r"(?i)^answer:\s*",
        r"(?i)^\w+:\s*",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip the chatter models wrap around a translation.
///
/// Each known prefix is removed once, in order, then one pair of wrapping
/// quotes, then runs of whitespace collapse to a single space.
pub fn clean_translation_response(text: &str) -> String {
    let mut text = text.trim().to_string();
    if text.is_empty() {
        return text;
    }

    for pattern in RESPONSE_PREFIXES.iter() {
        text = pattern.replace(&text, "").into_owned();
    }

    text = strip_wrapping_quotes(&text).to_string();

    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn strip_wrapping_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.starts_with(quote) && text.ends_with(quote) {
            if text.len() == quote.len_utf8() {
                return "";
            }
            return &text[quote.len_utf8()..text.len() - quote.len_utf8()];
        }
    }
    text
}

/// Trim the input and cap it at [`MAX_TEXT_CHARS`], marking the cut with `...`.
pub fn prepare_source_text(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() > MAX_TEXT_CHARS {
        let mut cut: String = text.chars().take(MAX_TEXT_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}
