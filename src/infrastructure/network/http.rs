// HTTP client utilities
use crate::domain::error::TranslateError;
use crate::infrastructure::config::HttpConfig;
use reqwest::Client;
use std::time::Duration;

/// Build the shared HTTP client from the `[http]` config section.
pub fn create_client(http: &HttpConfig) -> Result<Client, TranslateError> {
    let mut builder = Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(http.timeout_secs))
        .user_agent(http.user_agent.clone());

    if let Some(proxy) = http.proxy.as_deref().filter(|p| !p.is_empty()) {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}
