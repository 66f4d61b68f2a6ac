use crate::application::service::LocalBackend;
use crate::domain::error::TranslateError;
use crate::domain::model::translation_custom_fields;
use crate::domain::traits::TranslationBackend;
use crate::infrastructure::config::{BackendMode, Config};
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::network::rpc::RpcBackend;
use crate::infrastructure::storage::db::TranslationStore;
use reqwest::Client;
use std::sync::Arc;
use tokio_rusqlite::Connection;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: TranslationStore,
    pub http_client: Client,
    pub backend: Arc<dyn TranslationBackend>,
}

impl AppState {
    pub fn new(db: Connection, config: Config) -> Result<Self, TranslateError> {
        let http_client = create_client(&config.http)?;
        let store = TranslationStore::new(db);

        let backend: Arc<dyn TranslationBackend> = match config.backend.mode {
            BackendMode::Local => Arc::new(LocalBackend::new(
                config.clone(),
                http_client.clone(),
                Some(store.clone()),
            )),
            BackendMode::Remote => Arc::new(
                RpcBackend::from_config(http_client.clone(), &config.backend)?
                    .with_field_registry(store.clone()),
            ),
        };

        Ok(Self {
            config: Arc::new(config),
            store,
            http_client,
            backend,
        })
    }

    /// Whether the translation fields exist, so forms get the full button set.
    pub async fn form_provisioned(&self) -> Result<bool, TranslateError> {
        self.store
            .has_custom_fields(&translation_custom_fields())
            .await
    }
}
