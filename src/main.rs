// Main entry point
use ai_translate::application::lifecycle::{self, LifecycleEvent};
use ai_translate::application::orchestrator::{Outcome, TranslationOrchestrator};
use ai_translate::domain::model::in_display_order;
use ai_translate::domain::traits::{HostUi, InvoiceForm};
use ai_translate::domain::ui::{ButtonAction, Indicator};
use ai_translate::infrastructure;
use ai_translate::infrastructure::config::{load_config, load_config_from, BackendMode};
use ai_translate::interfaces::cli::{Cli, Command};
use ai_translate::interfaces::form::JsonInvoiceForm;
use ai_translate::presentation::terminal::{DialogAnswers, TerminalUi};
use ai_translate::presentation::theme::Theme;
use ai_translate::state::AppState;
use clap::Parser;
use colored::Colorize;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            eprintln!("\nInterrupted, shutting down...");
            let _ = shutdown_tx.send(());
        }
    });

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if let Command::GenerateConfig = cli.command {
        infrastructure::config::generate_config_sample()?;
        return Ok(());
    }

    let db_path = infrastructure::config::get_database_path(&config);
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db_conn = infrastructure::storage::db::init_database(&db_path).await?;
    let state = AppState::new(db_conn, config)?;

    let success = tokio::select! {
        result = run(&cli, &state) => result?,
        _ = shutdown_rx => {
            eprintln!("Operation interrupted");
            return Ok(());
        }
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

/// Run one command; `false` means it ended in a reported failure.
async fn run(cli: &Cli, state: &AppState) -> anyhow::Result<bool> {
    let answers = match &cli.command {
        Command::Translate(args) => DialogAnswers {
            provider: args.provider.clone(),
            language: args.language.clone(),
            overwrite_existing: args.overwrite,
            include_empty: args.include_empty,
            test_only: args.test_only,
        },
        _ => DialogAnswers::default(),
    };
    let ui = TerminalUi::new(Theme::from_name(cli.theme.as_deref().unwrap_or("")))
        .assume_yes(cli.yes)
        .with_answers(answers);
    let init = lifecycle::init(state.backend.clone(), ui);
    let orchestrator = &init.orchestrator;
    let backend = orchestrator.backend();

    match &cli.command {
        Command::Translate(args) => {
            press_button(cli, state, &init, &args.invoice, ButtonAction::SmartTranslate).await
        }
        Command::Quick { invoice } => {
            press_button(cli, state, &init, invoice, ButtonAction::QuickTranslate).await
        }
        Command::Clear { invoice } => {
            press_button(cli, state, &init, invoice, ButtonAction::ClearTranslations).await
        }
        Command::SetupFields => Ok(orchestrator.setup_fields().await),
        Command::Providers => {
            let providers = backend.list_providers().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&providers)?);
                return Ok(true);
            }
            for (id, info) in in_display_order(&providers) {
                let mark = if info.configured {
                    "✔ configured".green()
                } else {
                    "✘ not configured".red()
                };
                println!(
                    "{:<12} {:<32} {:<16} speed: {:<10} quality: {:<10} cost: {}",
                    id.cyan(),
                    info.name,
                    mark,
                    info.speed,
                    info.quality,
                    info.cost
                );
            }
            Ok(true)
        }
        Command::TestProviders => {
            if cli.json {
                let results = backend.test_all_providers().await?;
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(true);
            }
            orchestrator.test_providers().await;
            Ok(true)
        }
        Command::TestProvider { provider } => Ok(orchestrator.test_single_provider(provider).await),
        Command::Text(args) => {
            let text = args.text.join(" ");
            let reply = backend
                .translate_text(&text, &args.to, &args.from, &args.provider)
                .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else if reply.success {
                println!("{}", reply.translated_text);
                if let Some(warning) = &reply.warning {
                    eprintln!("{}", warning.yellow());
                }
                eprintln!(
                    "{}",
                    format!(
                        "{} · {} · {:.2}s",
                        reply.ai_provider,
                        reply.model_used.as_deref().unwrap_or("-"),
                        reply.processing_time.unwrap_or(0.0)
                    )
                    .bright_black()
                );
            } else {
                eprintln!(
                    "{}",
                    format!("✘ {}", reply.error.as_deref().unwrap_or("Translation failed")).red()
                );
            }
            Ok(reply.success)
        }
        Command::Guide => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&backend.setup_guide().await?)?);
                return Ok(true);
            }
            orchestrator.show_setup_guide().await;
            Ok(true)
        }
        Command::Stats => {
            if cli.json {
                let stats = backend.translation_stats().await?;
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(true);
            }
            orchestrator.show_translation_stats().await;
            Ok(true)
        }
        Command::ValidateKey { provider, api_key } => {
            let validation = backend.validate_api_key(provider, api_key).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&validation)?);
            } else if validation.valid && validation.test_result == Some(true) {
                println!("{}", format!("✔ {} key accepted", provider).green());
            } else {
                println!(
                    "{}",
                    format!(
                        "✘ {} key rejected{}",
                        provider,
                        validation
                            .error
                            .as_deref()
                            .map(|e| format!(": {}", e))
                            .unwrap_or_default()
                    )
                    .red()
                );
            }
            Ok(validation.valid)
        }
        Command::Export { output } => {
            let export = backend.export_translations().await?;
            let json = serde_json::to_string_pretty(&export)?;
            match output {
                Some(path) => {
                    tokio::fs::write(path, json).await?;
                    println!("Exported {} translations to {}", export.count, path.display());
                }
                None => println!("{}", json),
            }
            Ok(export.success)
        }
        Command::PurgeLog => {
            if !orchestrator
                .ui()
                .confirm("Delete every entry of the translation log?")
            {
                return Ok(true);
            }
            let status = backend.clear_translation_log().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else if status.success {
                orchestrator.ui().show_alert(
                    status.message.as_deref().unwrap_or("Translation log cleared"),
                    Indicator::Green,
                );
            } else {
                orchestrator.ui().show_alert(
                    status.error.as_deref().unwrap_or("Could not clear the translation log"),
                    Indicator::Red,
                );
            }
            Ok(status.success)
        }
        Command::Languages => {
            let languages = backend.supported_languages().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&languages)?);
            } else {
                for lang in languages {
                    println!("{:<6} {:<20} {}", lang.code.cyan(), lang.name, lang.native_name);
                }
            }
            Ok(true)
        }
        Command::GenerateConfig => {
            infrastructure::config::generate_config_sample()?;
            Ok(true)
        }
        Command::Status => {
            print_status(state).await?;
            Ok(true)
        }
        Command::CheckForm { invoice } => {
            let mut form = open_form(state, invoice).await?;
            let report = init.diagnostics.check_form(&form);
            init.diagnostics.test_buttons(&mut form, orchestrator.ui())?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Doctype: {}", report.doctype);
                println!("Invoice: {}", report.name);
                println!("Translation language field: {}", yes_no(report.language));
                println!("AI provider field: {}", yes_no(report.provider));
                println!("Items: {}", report.items);
                for action in form.buttons() {
                    println!("  [{}]", action.label().cyan());
                }
            }
            Ok(true)
        }
    }
}

fn yes_no(present: bool) -> colored::ColoredString {
    if present {
        "present".green()
    } else {
        "missing".red()
    }
}

async fn open_form(state: &AppState, path: &Path) -> anyhow::Result<JsonInvoiceForm> {
    let provisioned = state.form_provisioned().await?;
    Ok(JsonInvoiceForm::load(path, provisioned)?)
}

/// Load the invoice, run its lifecycle, press `action`, then save and log the result.
async fn press_button(
    cli: &Cli,
    state: &AppState,
    init: &lifecycle::Initialized<TerminalUi>,
    path: &Path,
    action: ButtonAction,
) -> anyhow::Result<bool> {
    let mut form = open_form(state, path).await?;
    init.events.fire(LifecycleEvent::Onload, &mut form)?;
    init.events.fire(LifecycleEvent::Refresh, &mut form)?;

    if !form.buttons().contains(&action) {
        eprintln!(
            "{}",
            "✘ This invoice has no translation fields yet. Run `ai-translate setup-fields` first."
                .red()
        );
        return Ok(false);
    }

    let orchestrator: &TranslationOrchestrator<TerminalUi> = &init.orchestrator;
    let outcome = orchestrator.dispatch(action, &mut form).await;

    match &outcome {
        Outcome::Translated { .. } | Outcome::Done => {
            form.save()?;
            // the hosted service keeps its own log
            if state.config.backend.mode == BackendMode::Local {
                let records = form.translation_records(chrono::Utc::now().timestamp());
                state.store.sync_invoice(form.name(), records).await?;
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(form.invoice())?);
            }
        }
        _ => {}
    }

    Ok(!matches!(outcome, Outcome::Failed(_) | Outcome::ProviderTested(false)))
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &infrastructure::config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn print_status(state: &AppState) -> anyhow::Result<()> {
    println!("{}", "ai-translate Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = &state.config;
    let db_path = infrastructure::config::get_database_path(config);
    let count = state.store.count_translations().await?;
    println!("Database: {} ({} translations)", db_path.display(), count);

    println!(
        "Config: {}",
        infrastructure::config::get_config_path()
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );

    match config.backend.mode {
        BackendMode::Local => println!("Backend: local"),
        BackendMode::Remote => println!(
            "Backend: remote ({})",
            config.backend.url.as_deref().unwrap_or("no url")
        ),
    }

    let provisioned = state.form_provisioned().await?;
    println!(
        "Custom fields: {}",
        if provisioned { "created" } else { "not created" }
    );

    let configured = config.configured_providers();
    if configured.is_empty() {
        println!("Providers: {}", "none configured".yellow());
    } else {
        let names: Vec<&str> = configured.iter().map(|p| p.as_str()).collect();
        println!("Providers: {}", names.join(", "));
    }

    Ok(())
}
