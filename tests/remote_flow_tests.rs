//! 远程模式端到端测试: 字段创建后即可批量翻译

mod common;

use ai_translate::application::lifecycle::{self, LifecycleEvent};
use ai_translate::application::orchestrator::Outcome;
use ai_translate::domain::ui::ButtonAction;
use ai_translate::infrastructure::config::{BackendConfig, BackendMode, Config};
use ai_translate::infrastructure::storage::db::init_memory_database;
use ai_translate::state::AppState;
use common::{FakeUi, MemoryForm};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PREFIX: &str = "/api/method/ai_translate.translate.";

fn remote_config(server: &MockServer) -> Config {
    Config {
        read_env_keys: false,
        backend: BackendConfig {
            mode: BackendMode::Remote,
            url: Some(server.uri()),
            api_key: None,
            api_secret: None,
        },
        ..Config::default()
    }
}

async fn mount(server: &MockServer, name: &str, message: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(format!("{}{}", PREFIX, name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": message })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_remote_setup_unlocks_smart_translate() {
    let server = MockServer::start().await;
    mount(
        &server,
        "create_translation_custom_fields",
        json!({ "success": true, "message": "Custom fields created successfully" }),
    )
    .await;
    mount(
        &server,
        "get_available_ai_providers",
        json!({ "groq": { "name": "Groq (Llama3)", "configured": true } }),
    )
    .await;
    mount(
        &server,
        "bulk_ai_translate_items",
        json!({
            "results": [
                { "item_code": "ITEM-1", "success": true, "translated_text": "مكتب خشبي" },
                { "item_code": "ITEM-2", "success": true, "translated_text": "كرسي مكتب" }
            ],
            "summary": {
                "total_items": 2,
                "successful_translations": 2,
                "failed_translations": 0,
                "average_processing_time": 0.4,
                "ai_provider": "groq"
            }
        }),
    )
    .await;

    let state = AppState::new(init_memory_database().await.unwrap(), remote_config(&server)).unwrap();
    let init = lifecycle::init(state.backend.clone(), FakeUi::new());
    let orchestrator = init.orchestrator.with_reload_delay(Duration::ZERO);

    assert!(!state.form_provisioned().await.unwrap());
    assert!(orchestrator.setup_fields().await);
    assert!(state.form_provisioned().await.unwrap());

    let mut form = MemoryForm::with_descriptions(&["Wooden desk", "Office chair"]);
    form.fields = state.form_provisioned().await.unwrap();
    init.events.fire(LifecycleEvent::Refresh, &mut form).unwrap();
    assert!(form.button_actions().contains(&ButtonAction::SmartTranslate));

    let outcome = orchestrator
        .dispatch(ButtonAction::SmartTranslate, &mut form)
        .await;

    assert!(matches!(outcome, Outcome::Translated { applied: 2, .. }));
    assert_eq!(form.translated(), vec!["مكتب خشبي", "كرسي مكتب"]);
}

#[tokio::test]
async fn test_rejected_remote_setup_leaves_form_unprovisioned() {
    let server = MockServer::start().await;
    mount(
        &server,
        "create_translation_custom_fields",
        json!({ "success": false, "error": "Insufficient Permission" }),
    )
    .await;

    let state = AppState::new(init_memory_database().await.unwrap(), remote_config(&server)).unwrap();
    let init = lifecycle::init(state.backend.clone(), FakeUi::new());
    let orchestrator = init.orchestrator.with_reload_delay(Duration::ZERO);

    assert!(!orchestrator.setup_fields().await);
    assert!(!state.form_provisioned().await.unwrap());
}
