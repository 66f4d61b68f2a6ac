use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// AI providers the backend knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Groq,
    OpenAi,
    Claude,
    DeepSeek,
    Perplexity,
}

/// Wire format spoken by a provider's endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStyle {
    /// `/chat/completions` with `choices[0].message.content`
    ChatCompletions,
    /// Anthropic `/v1/messages` with `content[0].text`
    Messages,
}

pub const DEFAULT_PROVIDER: ProviderId = ProviderId::Groq;

impl ProviderId {
    /// Canonical display order.
    pub const ALL: [ProviderId; 5] = [
        ProviderId::Groq,
        ProviderId::OpenAi,
        ProviderId::Claude,
        ProviderId::DeepSeek,
        ProviderId::Perplexity,
    ];

    /// Order tried when no usable provider was named.
    pub const AUTO_ORDER: [ProviderId; 5] = [
        ProviderId::Groq,
        ProviderId::DeepSeek,
        ProviderId::OpenAi,
        ProviderId::Claude,
        ProviderId::Perplexity,
    ];

    /// Order tried after the requested provider errored.
    pub const FALLBACK_ORDER: [ProviderId; 3] =
        [ProviderId::Groq, ProviderId::DeepSeek, ProviderId::OpenAi];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Groq => "groq",
            ProviderId::OpenAi => "openai",
            ProviderId::Claude => "claude",
            ProviderId::DeepSeek => "deepseek",
            ProviderId::Perplexity => "perplexity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProviderId::Groq => "Groq",
            ProviderId::OpenAi => "OpenAI",
            ProviderId::Claude => "Claude",
            ProviderId::DeepSeek => "DeepSeek",
            ProviderId::Perplexity => "Perplexity",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::Groq => "GROQ_API_KEY",
            ProviderId::OpenAi => "OPENAI_API_KEY",
            ProviderId::Claude => "CLAUDE_API_KEY",
            ProviderId::DeepSeek => "DEEPSEEK_API_KEY",
            ProviderId::Perplexity => "PERPLEXITY_API_KEY",
        }
    }

    /// Key name shown in the setup guide.
    pub fn config_key(&self) -> String {
        format!("{}_api_key", self.as_str())
    }

    pub fn spec(&self) -> ProviderSpec {
        match self {
            ProviderId::Groq => ProviderSpec {
                style: ApiStyle::ChatCompletions,
                endpoint: "https://api.groq.com/openai/v1/chat/completions",
                model: "llama3-70b-8192",
                reported_model: "llama3-70b-8192",
                confidence: 0.95,
                max_tokens: 1024,
                top_p: Some(0.9),
            },
            ProviderId::OpenAi => ProviderSpec {
                style: ApiStyle::ChatCompletions,
                endpoint: "https://api.openai.com/v1/chat/completions",
                model: "gpt-3.5-turbo",
                reported_model: "gpt-3.5-turbo",
                confidence: 0.96,
                max_tokens: 1000,
                top_p: None,
            },
            ProviderId::Claude => ProviderSpec {
                style: ApiStyle::Messages,
                endpoint: "https://api.anthropic.com/v1/messages",
                model: "claude-3-haiku-20240307",
                reported_model: "claude-3-haiku",
                confidence: 0.97,
                max_tokens: 1000,
                top_p: None,
            },
            ProviderId::DeepSeek => ProviderSpec {
                style: ApiStyle::ChatCompletions,
                endpoint: "https://api.deepseek.com/v1/chat/completions",
                model: "deepseek-chat",
                reported_model: "deepseek-chat",
                confidence: 0.90,
                max_tokens: 1000,
                top_p: None,
            },
            ProviderId::Perplexity => ProviderSpec {
                style: ApiStyle::ChatCompletions,
                endpoint: "https://api.perplexity.ai/chat/completions",
                model: "llama-3.1-sonar-large-128k-online",
                reported_model: "llama-3.1-sonar-large",
                confidence: 0.92,
                max_tokens: 1000,
                top_p: None,
            },
        }
    }

    pub fn availability(&self, configured: bool) -> ProviderAvailability {
        let (name, speed, quality, cost) = match self {
            ProviderId::Groq => ("Groq (Llama3)", "Ultra Fast", "Very Good", "Free"),
            ProviderId::OpenAi => ("OpenAI (GPT-3.5)", "Fast", "Excellent", "Low"),
            ProviderId::Claude => ("Claude (Haiku)", "Fast", "Excellent", "Low"),
            ProviderId::DeepSeek => ("DeepSeek", "Fast", "Good", "Very Low"),
            ProviderId::Perplexity => ("Perplexity AI", "Fast", "Very Good", "Low"),
        };
        ProviderAvailability {
            name: name.to_string(),
            configured,
            speed: speed.to_string(),
            quality: quality.to_string(),
            cost: cost.to_string(),
        }
    }

    pub fn setup_guide(&self) -> SetupGuideEntry {
        let (name, free_tier, signup_url, api_key_url) = match self {
            ProviderId::Groq => (
                "Groq (Recommended - Fast & Free)",
                "Yes - 6,000 requests/minute",
                "https://console.groq.com",
                "https://console.groq.com/keys",
            ),
            ProviderId::OpenAi => (
                "OpenAI GPT-3.5",
                "No - $0.002/1K tokens",
                "https://platform.openai.com/signup",
                "https://platform.openai.com/api-keys",
            ),
            ProviderId::Claude => (
                "Anthropic Claude",
                "Limited free tier",
                "https://console.anthropic.com",
                "https://console.anthropic.com/settings/keys",
            ),
            ProviderId::DeepSeek => (
                "DeepSeek",
                "Yes - Good free tier",
                "https://platform.deepseek.com",
                "https://platform.deepseek.com/api_keys",
            ),
            ProviderId::Perplexity => (
                "Perplexity AI",
                "Limited free tier",
                "https://www.perplexity.ai",
                "https://www.perplexity.ai/settings/api",
            ),
        };
        let availability = self.availability(false);
        SetupGuideEntry {
            name: name.to_string(),
            free_tier: free_tier.to_string(),
            signup_url: signup_url.to_string(),
            api_key_url: api_key_url.to_string(),
            config_key: self.config_key(),
            model: Some(self.spec().reported_model.to_string()),
            speed: Some(availability.speed),
            quality: Some(availability.quality),
        }
    }

    /// Position in [`ProviderId::ALL`]; unknown ids sort last.
    pub fn display_rank(id: &str) -> usize {
        id.parse::<ProviderId>()
            .ok()
            .and_then(|p| ProviderId::ALL.iter().position(|x| *x == p))
            .unwrap_or(ProviderId::ALL.len())
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(ProviderId::Groq),
            "openai" => Ok(ProviderId::OpenAi),
            "claude" => Ok(ProviderId::Claude),
            "deepseek" => Ok(ProviderId::DeepSeek),
            "perplexity" => Ok(ProviderId::Perplexity),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// Static request parameters for one provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderSpec {
    pub style: ApiStyle,
    pub endpoint: &'static str,
    pub model: &'static str,
    pub reported_model: &'static str,
    pub confidence: f64,
    pub max_tokens: u32,
    pub top_p: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderAvailability {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub configured: bool,
    #[serde(default)]
    pub speed: String,
    #[serde(default)]
    pub quality: String,
    #[serde(default)]
    pub cost: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetupGuideEntry {
    pub name: String,
    pub free_tier: String,
    pub signup_url: String,
    pub api_key_url: String,
    pub config_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}
