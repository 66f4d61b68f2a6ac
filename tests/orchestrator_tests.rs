//! 翻译编排器测试

mod common;

use ai_translate::application::orchestrator::{Outcome, TranslationOrchestrator};
use ai_translate::domain::model::{
    OperationStatus, ProviderTestResult, TextTranslation, STATUS_FAILED, STATUS_SUCCESS,
};
use ai_translate::domain::provider::ProviderId;
use ai_translate::domain::ui::{ButtonAction, DialogOutcome, Indicator, TranslationSettings};
use common::{failed_result, ok_result, FakeBackend, FakeUi, MemoryForm};
use std::sync::Arc;
use std::time::Duration;

fn orchestrator(backend: &Arc<FakeBackend>, ui: FakeUi) -> TranslationOrchestrator<FakeUi> {
    TranslationOrchestrator::new(backend.clone(), ui).with_reload_delay(Duration::ZERO)
}

#[tokio::test]
async fn test_no_configured_provider_never_opens_dialog() {
    let backend = Arc::new(FakeBackend::new(&[]));
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["Desk"]);

    let outcome = orch.show_ai_dialog(&mut form).await;

    assert_eq!(outcome, Outcome::NoProviders);
    assert!(orch.ui().dialogs().is_empty());
    assert_eq!(backend.calls(), vec!["list_providers"]);
    let notices = orch.ui().notices();
    assert_eq!(notices[0].title, "No AI Providers Configured");
    assert_eq!(notices[0].indicator, Indicator::Orange);
}

#[tokio::test]
async fn test_zero_eligible_items_makes_no_bulk_call() {
    let backend = Arc::new(FakeBackend::new(&[ProviderId::Groq]).with_bulk_reply(vec![]));
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["Desk", "  "]);
    form.items[0].translated_description = "مكتب".to_string();

    let outcome = orch.show_ai_dialog(&mut form).await;

    assert_eq!(outcome, Outcome::NoEligibleItems);
    assert!(backend.bulk_calls().is_empty());
    assert_eq!(orch.ui().notice_titles(), vec!["No Items to Translate"]);
    assert_eq!(form.translated(), vec!["مكتب", ""]);
}

#[tokio::test]
async fn test_blank_description_is_not_submitted() {
    let backend = Arc::new(
        FakeBackend::new(&[ProviderId::Groq]).with_bulk_reply(vec![ok_result("a"), ok_result("c")]),
    );
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["A", "", "C"]);

    orch.show_ai_dialog(&mut form).await;

    let calls = backend.bulk_calls();
    assert_eq!(calls.len(), 1);
    let codes: Vec<&str> = calls[0].items.iter().map(|i| i.item_code.as_str()).collect();
    assert_eq!(codes, vec!["ITEM-1", "ITEM-3"]);
    // results land on the submitted items, skipping the blank one
    assert_eq!(form.translated(), vec!["a", "", "c"]);
}

#[tokio::test]
async fn test_results_apply_positionally_and_failures_leave_items_alone() {
    let backend = Arc::new(
        FakeBackend::new(&[ProviderId::Groq])
            .with_bulk_reply(vec![ok_result("X"), failed_result("timeout")]),
    );
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["first", "second"]);

    let outcome = orch.show_ai_dialog(&mut form).await;

    assert_eq!(form.translated(), vec!["X", ""]);
    match outcome {
        Outcome::Translated { applied, summary } => {
            assert_eq!(applied, 1);
            assert_eq!(summary.successful_translations, 1);
            assert_eq!(summary.failed_translations, 1);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let notice = &orch.ui().notices()[0];
    assert_eq!(notice.title, "AI Translation Results");
    assert_eq!(notice.indicator, Indicator::Orange);
    assert!(notice.message.contains("50.0%"));
    assert!(notice.message.contains("1 items failed to translate"));
    assert_eq!(form.refreshes, 1);
    assert_eq!(orch.ui().progress(), vec!["show", "hide"]);
}

#[tokio::test]
async fn test_empty_successful_text_is_not_written() {
    let backend = Arc::new(
        FakeBackend::new(&[ProviderId::Groq]).with_bulk_reply(vec![ok_result(""), ok_result("B")]),
    );
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["a", "b"]);

    orch.show_ai_dialog(&mut form).await;

    assert_eq!(form.translated(), vec!["", "B"]);
}

#[tokio::test]
async fn test_short_result_list_applies_what_came_back() {
    let backend =
        Arc::new(FakeBackend::new(&[ProviderId::Groq]).with_bulk_reply(vec![ok_result("one")]));
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["a", "b", "c"]);

    orch.show_ai_dialog(&mut form).await;

    assert_eq!(form.translated(), vec!["one", "", ""]);
}

#[tokio::test]
async fn test_malformed_bulk_response_shows_failure() {
    let backend = Arc::new(FakeBackend::new(&[ProviderId::Groq]));
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["Desk"]);

    let outcome = orch.show_ai_dialog(&mut form).await;

    assert!(matches!(outcome, Outcome::Failed(_)));
    assert_eq!(backend.bulk_calls().len(), 1);
    let notice = &orch.ui().notices()[0];
    assert_eq!(notice.title, "Smart Translation Failed");
    assert_eq!(notice.indicator, Indicator::Red);
    assert_eq!(form.translated(), vec![""]);
    assert_eq!(orch.ui().progress(), vec!["show", "hide"]);
}

#[tokio::test]
async fn test_language_names_are_sent_as_codes() {
    let backend = Arc::new(FakeBackend::new(&[ProviderId::Groq]).with_bulk_reply(vec![]));
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["Desk"]);

    let settings = TranslationSettings::new("groq", "Chinese (Traditional)");
    orch.smart_translate(&mut form, &settings).await;
    let settings = TranslationSettings::new("groq", "Klingon");
    orch.smart_translate(&mut form, &settings).await;

    let targets: Vec<String> = backend
        .bulk_calls()
        .into_iter()
        .map(|c| c.target_language)
        .collect();
    assert_eq!(targets, vec!["zh-tw", "ar"]);
}

#[tokio::test]
async fn test_dialog_defaults_follow_the_invoice() {
    let backend = Arc::new(
        FakeBackend::new(&[ProviderId::Groq, ProviderId::Claude]).with_bulk_reply(vec![]),
    );
    let orch = orchestrator(&backend, FakeUi::new());

    let mut form = MemoryForm::with_descriptions(&["Desk"]);
    orch.show_ai_dialog(&mut form).await;

    let mut form = MemoryForm::with_descriptions(&["Desk"]);
    form.provider = Some("claude".to_string());
    form.language = Some("French".to_string());
    orch.show_ai_dialog(&mut form).await;

    let dialogs = orch.ui().dialogs();
    assert_eq!(dialogs[0].providers, vec!["groq", "claude"]);
    assert_eq!(dialogs[0].default_provider, "groq");
    assert_eq!(dialogs[0].default_language, "Arabic");
    assert_eq!(dialogs[0].languages.len(), 19);
    assert_eq!(dialogs[1].default_provider, "claude");
    assert_eq!(dialogs[1].default_language, "French");

    let calls = backend.bulk_calls();
    assert_eq!(calls[1].provider, "claude");
    assert_eq!(calls[1].target_language, "fr");
}

#[tokio::test]
async fn test_dialog_test_button_probes_without_touching_invoice() {
    let mut fake = FakeBackend::new(&[ProviderId::Groq]);
    fake.text_reply = TextTranslation {
        success: true,
        translated_text: "حل".to_string(),
        ..TextTranslation::default()
    };
    let backend = Arc::new(fake);
    let orch = orchestrator(
        &backend,
        FakeUi::answering(DialogOutcome::TestProvider("groq".to_string())),
    );
    let mut form = MemoryForm::with_descriptions(&["Desk"]);

    let outcome = orch.show_ai_dialog(&mut form).await;

    assert_eq!(outcome, Outcome::ProviderTested(true));
    assert!(backend.bulk_calls().is_empty());
    let sent = backend.text_calls.lock().unwrap().clone();
    assert_eq!(
        sent,
        vec![(
            "High-quality professional business solution".to_string(),
            "ar".to_string(),
            "en".to_string(),
            "groq".to_string()
        )]
    );
    assert_eq!(form.translated(), vec![""]);
    assert_eq!(
        orch.ui().alerts().last().cloned(),
        Some(("GROQ is working correctly!".to_string(), Indicator::Green))
    );
}

#[tokio::test]
async fn test_single_provider_failure_reports_error() {
    let mut fake = FakeBackend::new(&[ProviderId::Groq]);
    fake.text_reply = TextTranslation::failure("openai", "OpenAI API key not configured");
    let backend = Arc::new(fake);
    let orch = orchestrator(&backend, FakeUi::new());

    assert!(!orch.test_single_provider("openai").await);
    assert_eq!(
        orch.ui().alerts(),
        vec![
            ("Testing OPENAI provider...".to_string(), Indicator::Blue),
            (
                "OPENAI test failed: OpenAI API key not configured".to_string(),
                Indicator::Red
            ),
        ]
    );
}

#[tokio::test]
async fn test_cancelled_dialog_does_nothing() {
    let backend = Arc::new(FakeBackend::new(&[ProviderId::Groq]).with_bulk_reply(vec![]));
    let orch = orchestrator(&backend, FakeUi::answering(DialogOutcome::Cancelled));
    let mut form = MemoryForm::with_descriptions(&["Desk"]);

    assert_eq!(orch.show_ai_dialog(&mut form).await, Outcome::Cancelled);
    assert!(backend.bulk_calls().is_empty());
}

#[tokio::test]
async fn test_overwrite_resubmits_translated_items() {
    let backend = Arc::new(
        FakeBackend::new(&[ProviderId::Groq]).with_bulk_reply(vec![ok_result("1"), ok_result("2")]),
    );
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["a", "b"]);
    form.items[0].translated_description = "old".to_string();

    let mut settings = TranslationSettings::new("groq", "Arabic");
    settings.overwrite_existing = true;
    orch.smart_translate(&mut form, &settings).await;

    assert_eq!(backend.bulk_calls()[0].items.len(), 2);
    assert_eq!(form.translated(), vec!["1", "2"]);
}

#[tokio::test]
async fn test_clear_empties_every_item_without_remote_call() {
    let backend = Arc::new(FakeBackend::new(&[ProviderId::Groq]));
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["a", "b", ""]);
    form.items[0].translated_description = "x".to_string();
    form.items[1].translated_description = "y".to_string();

    let outcome = orch.dispatch(ButtonAction::ClearTranslations, &mut form).await;

    assert_eq!(outcome, Outcome::Done);
    assert_eq!(form.translated(), vec!["", "", ""]);
    assert!(backend.calls().is_empty());
    assert_eq!(
        orch.ui().alerts(),
        vec![("All translations cleared successfully".to_string(), Indicator::Green)]
    );
    assert_eq!(form.refreshes, 1);
}

#[tokio::test]
async fn test_clear_declined_keeps_translations() {
    let backend = Arc::new(FakeBackend::new(&[ProviderId::Groq]));
    let orch = orchestrator(&backend, FakeUi::declining());
    let mut form = MemoryForm::with_descriptions(&["a"]);
    form.items[0].translated_description = "x".to_string();

    assert_eq!(orch.clear_all_translations(&mut form), Outcome::Cancelled);
    assert_eq!(form.translated(), vec!["x"]);
}

#[tokio::test]
async fn test_quick_translate_uses_invoice_settings() {
    let backend = Arc::new(
        FakeBackend::new(&[ProviderId::DeepSeek])
            .with_bulk_reply(vec![ok_result("uno"), ok_result("dos")]),
    );
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["one", "", "two"]);
    form.items[0].translated_description = "old".to_string();
    form.provider = Some("deepseek".to_string());
    form.language = Some("Spanish".to_string());

    orch.dispatch(ButtonAction::QuickTranslate, &mut form).await;

    let call = &backend.bulk_calls()[0];
    assert_eq!(call.provider, "deepseek");
    assert_eq!(call.target_language, "es");
    assert_eq!(call.items.len(), 2);
    assert_eq!(form.translated(), vec!["uno", "", "dos"]);
    assert_eq!(
        orch.ui().confirms.lock().unwrap()[0],
        "Quick AI Translation will use DEEPSEEK to translate all 2 items to Spanish. Continue?"
    );
}

#[tokio::test]
async fn test_quick_translate_defaults_and_failure_notice() {
    let backend = Arc::new(FakeBackend::new(&[ProviderId::Groq]));
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["one"]);

    let outcome = orch.quick_translate(&mut form).await;

    assert!(matches!(outcome, Outcome::Failed(_)));
    let call = &backend.bulk_calls()[0];
    assert_eq!(call.provider, "groq");
    assert_eq!(call.target_language, "ar");
    assert_eq!(orch.ui().notice_titles(), vec!["Translation Failed"]);
}

#[tokio::test]
async fn test_quick_translate_declined_or_empty() {
    let backend = Arc::new(FakeBackend::new(&[ProviderId::Groq]).with_bulk_reply(vec![]));
    let orch = orchestrator(&backend, FakeUi::declining());

    let mut form = MemoryForm::with_descriptions(&["one"]);
    assert_eq!(orch.quick_translate(&mut form).await, Outcome::Cancelled);

    let mut form = MemoryForm::with_descriptions(&["", " "]);
    assert_eq!(orch.quick_translate(&mut form).await, Outcome::NoEligibleItems);
    assert!(backend.bulk_calls().is_empty());
}

#[tokio::test]
async fn test_all_providers_tally() {
    let mut fake = FakeBackend::new(&[ProviderId::Groq]);
    fake.test_reply = Some(
        [
            (
                "groq".to_string(),
                ProviderTestResult {
                    status: STATUS_SUCCESS.to_string(),
                    model: Some("llama3-70b-8192".to_string()),
                    processing_time: Some(0.42),
                    translated_text: Some("حل".to_string()),
                    ..ProviderTestResult::default()
                },
            ),
            (
                "openai".to_string(),
                ProviderTestResult {
                    status: STATUS_FAILED.to_string(),
                    error: Some("HTTP 401".to_string()),
                    ..ProviderTestResult::default()
                },
            ),
        ]
        .into_iter()
        .collect(),
    );
    let backend = Arc::new(fake);
    let orch = orchestrator(&backend, FakeUi::new());

    orch.test_providers().await;

    let notice = &orch.ui().notices()[0];
    assert_eq!(notice.title, "AI Provider Test Results");
    assert_eq!(notice.indicator, Indicator::Green);
    assert!(notice.message.contains("1 of 2"));
    assert!(notice.message.contains("0.42s"));
}

#[tokio::test]
async fn test_all_providers_error_notice() {
    let backend = Arc::new(FakeBackend::new(&[ProviderId::Groq]));
    let orch = orchestrator(&backend, FakeUi::new());

    orch.dispatch(ButtonAction::TestProviders, &mut MemoryForm::default())
        .await;

    let notice = &orch.ui().notices()[0];
    assert_eq!(notice.title, "Test Failed");
    assert_eq!(notice.indicator, Indicator::Red);
}

#[tokio::test]
async fn test_guide_and_stats_are_rendered() {
    let backend = Arc::new(FakeBackend::new(&[ProviderId::Groq, ProviderId::Claude]));
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::default();

    orch.dispatch(ButtonAction::SetupGuide, &mut form).await;
    orch.dispatch(ButtonAction::TranslationStats, &mut form).await;

    let notices = orch.ui().notices();
    assert_eq!(notices[0].title, "AI Setup Guide");
    assert!(notices[0].message.contains("groq_api_key"));
    assert_eq!(notices[1].title, "Translation Statistics");
    assert!(notices[1].message.contains(">12<"));
    assert!(notices[1].message.contains("CLAUDE"));
}

#[tokio::test]
async fn test_setup_fields_success_reloads() {
    let mut fake = FakeBackend::new(&[]);
    fake.fields_reply = Some(OperationStatus::ok("Custom fields created successfully"));
    let backend = Arc::new(fake);
    let orch = orchestrator(&backend, FakeUi::new());

    assert!(orch.setup_fields().await);
    assert_eq!(orch.ui().reloads(), 1);
    assert_eq!(
        orch.ui().alerts()[0].0,
        "AI translation fields created successfully. Please refresh the page."
    );
}

#[tokio::test]
async fn test_setup_fields_failure_shows_reason() {
    let mut fake = FakeBackend::new(&[]);
    fake.fields_reply = Some(OperationStatus::failed("Insufficient Permission for Custom Field"));
    let backend = Arc::new(fake);
    let orch = orchestrator(&backend, FakeUi::new());

    assert!(!orch.setup_fields().await);
    assert_eq!(orch.ui().reloads(), 0);
    let notice = &orch.ui().notices()[0];
    assert_eq!(notice.title, "Setup Error");
    assert_eq!(notice.message, "Insufficient Permission for Custom Field");
}

#[tokio::test]
async fn test_setup_fields_call_error_shows_generic_notice() {
    // no fields_reply: the backend call itself errors
    let backend = Arc::new(FakeBackend::new(&[]));
    let orch = orchestrator(&backend, FakeUi::new());

    assert!(!orch.setup_fields().await);
    assert_eq!(backend.calls(), vec!["create_custom_fields"]);
    assert_eq!(orch.ui().reloads(), 0);
    assert!(orch.ui().alerts().is_empty());
    let notices = orch.ui().notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Setup Error");
    assert_eq!(notices[0].indicator, Indicator::Red);
    assert_eq!(
        notices[0].message,
        "Failed to create custom fields. Please check permissions."
    );
}

#[tokio::test]
async fn test_provider_listing_error_aborts_workflow() {
    let mut fake = FakeBackend::new(&[ProviderId::Groq]).with_bulk_reply(vec![ok_result("x")]);
    fake.providers_down = true;
    let backend = Arc::new(fake);
    let orch = orchestrator(&backend, FakeUi::new());
    let mut form = MemoryForm::with_descriptions(&["Desk"]);

    let outcome = orch.show_ai_dialog(&mut form).await;

    assert_eq!(outcome, Outcome::NoProviders);
    assert_eq!(backend.calls(), vec!["list_providers"]);
    assert!(orch.ui().dialogs().is_empty());
    let notices = orch.ui().notices();
    assert_eq!(notices[0].title, "Provider Check Failed");
    assert_eq!(notices[0].indicator, Indicator::Red);
    assert!(notices[0].message.contains("HTTP 502"));
    assert_eq!(form.translated(), vec![""]);
}
