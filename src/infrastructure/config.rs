use crate::domain::error::TranslateError;
use crate::domain::provider::ProviderId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_provider")]
    pub default_provider: String,
    pub database_path: Option<String>,
    /// Fall back to `<ID>_API_KEY` environment variables for provider keys.
    #[serde(default = "default_enable")]
    pub read_env_keys: bool,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub proxy: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Call the AI providers from this process.
    #[default]
    Local,
    /// Forward every operation to a hosted translation service.
    Remote,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BackendConfig {
    #[serde(default)]
    pub mode: BackendMode,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    /// Overrides the provider's public endpoint.
    pub base_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub groq: ProviderConfig,
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub claude: ProviderConfig,
    #[serde(default)]
    pub deepseek: ProviderConfig,
    #[serde(default)]
    pub perplexity: ProviderConfig,
}

impl ProvidersConfig {
    pub fn get(&self, provider: ProviderId) -> &ProviderConfig {
        match provider {
            ProviderId::Groq => &self.groq,
            ProviderId::OpenAi => &self.openai,
            ProviderId::Claude => &self.claude,
            ProviderId::DeepSeek => &self.deepseek,
            ProviderId::Perplexity => &self.perplexity,
        }
    }

    pub fn get_mut(&mut self, provider: ProviderId) -> &mut ProviderConfig {
        match provider {
            ProviderId::Groq => &mut self.groq,
            ProviderId::OpenAi => &mut self.openai,
            ProviderId::Claude => &mut self.claude,
            ProviderId::DeepSeek => &mut self.deepseek,
            ProviderId::Perplexity => &mut self.perplexity,
        }
    }
}

impl Logging {
    /// `EnvFilter` directive for the configured level; unknown levels read as warn.
    pub fn filter_directive(&self) -> &'static str {
        match self.level.to_uppercase().as_str() {
            "DEBUG" => "debug",
            "INFO" => "info",
            "WARN" => "warn",
            "ERROR" => "error",
            _ => "warn",
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: "WARN".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            proxy: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            default_provider: default_provider(),
            database_path: None,
            read_env_keys: true,
            logging: Logging::default(),
            http: HttpConfig::default(),
            backend: BackendConfig::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl Config {
    /// API key for a provider: the config value, else `<ID>_API_KEY` from the environment.
    pub fn api_key(&self, provider: ProviderId) -> Option<String> {
        self.providers
            .get(provider)
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                if self.read_env_keys {
                    std::env::var(provider.env_var()).ok()
                } else {
                    None
                }
            })
            .filter(|k| !k.trim().is_empty())
    }

    pub fn has_api_key(&self, provider: ProviderId) -> bool {
        self.api_key(provider).is_some()
    }

    pub fn endpoint(&self, provider: ProviderId) -> String {
        self.providers
            .get(provider)
            .base_url
            .clone()
            .unwrap_or_else(|| provider.spec().endpoint.to_string())
    }

    pub fn configured_providers(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|p| self.has_api_key(*p))
            .collect()
    }
}

// Defaults
fn default_language() -> String {
    crate::domain::language::DEFAULT_LANGUAGE.to_string()
}
fn default_provider() -> String {
    crate::domain::provider::DEFAULT_PROVIDER.as_str().to_string()
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!("ai-translate/{}", env!("CARGO_PKG_VERSION"))
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ai-translate").join("config.toml"))
}

/// Translation log database (config directory unless overridden)
pub fn get_database_path(config: &Config) -> PathBuf {
    if let Some(path) = config.database_path.as_deref().filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ai-translate")
        .join("translations.db")
}

pub fn load_config() -> Result<Config, TranslateError> {
    match get_config_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config, TranslateError> {
    let content = fs::read_to_string(path)?;
    match parse_config(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!(
                "Warning: Failed to parse config file: {}. Using defaults.",
                e
            );
            Ok(Config::default())
        }
    }
}

pub fn parse_config(content: &str) -> Result<Config, TranslateError> {
    Ok(toml::from_str::<Config>(content)?)
}

pub fn generate_config_sample() -> Result<(), TranslateError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            eprintln!("Config file already exists at: {}", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sample = Config::default();
        let toml_content = toml::to_string_pretty(&sample)
            .map_err(|e| TranslateError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, toml_content)
            .map_err(|e| TranslateError::Config(format!("Failed to write config file: {}", e)))?;
        println!("Generated config file at: {}", path.display());
    } else {
        return Err(TranslateError::Config(
            "Cannot determine config directory".to_string(),
        ));
    }

    Ok(())
}
