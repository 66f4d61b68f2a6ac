use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ai-translate")]
#[command(about = "Translate invoice line items with AI providers.")]
#[command(version)]
pub struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Choose color theme (default, mono)
    #[arg(short = 'T', long, global = true)]
    pub theme: Option<String>,

    /// Use this config file instead of the default one
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Smart AI Translate: choose provider and language, then translate
    Translate(TranslateArgs),

    /// Quick AI Translate with the invoice's own provider and language
    Quick {
        /// Invoice JSON file
        invoice: PathBuf,
    },

    /// Clear all translated descriptions of an invoice
    Clear {
        /// Invoice JSON file
        invoice: PathBuf,
    },

    /// Create the custom translation fields
    SetupFields,

    /// List AI providers and whether they are configured
    Providers,

    /// Test every AI provider with a sample sentence
    TestProviders,

    /// Test one AI provider with a sample sentence
    TestProvider {
        provider: String,
    },

    /// Translate free text
    Text(TextArgs),

    /// Show how to configure each provider
    Guide,

    /// Show translation statistics
    Stats,

    /// Check an API key against its provider
    ValidateKey {
        provider: String,
        api_key: String,
    },

    /// Export the translation log
    Export {
        /// Write to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Delete every entry of the translation log
    PurgeLog,

    /// List supported languages
    Languages,

    /// Generate config sample
    GenerateConfig,

    /// Show status
    Status,

    /// Inspect an invoice form and re-install its buttons
    CheckForm {
        /// Invoice JSON file
        invoice: PathBuf,
    },
}

#[derive(Args)]
pub struct TranslateArgs {
    /// Invoice JSON file
    pub invoice: PathBuf,

    /// AI provider (defaults to the invoice's provider or the first configured one)
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// Target language name, e.g. "French" (defaults to the invoice's language)
    #[arg(short = 'l', long)]
    pub language: Option<String>,

    /// Re-translate items that already have a translation
    #[arg(long)]
    pub overwrite: bool,

    /// Do not skip items with an empty description
    #[arg(long)]
    pub include_empty: bool,

    /// Only test the chosen provider
    #[arg(long)]
    pub test_only: bool,
}

#[derive(Args)]
pub struct TextArgs {
    /// Text to translate
    #[arg(num_args = 1.., required = true)]
    pub text: Vec<String>,

    /// Target language code
    #[arg(short = 't', long, default_value = "ar")]
    pub to: String,

    /// Source language code
    #[arg(short = 'f', long, default_value = "en")]
    pub from: String,

    /// AI provider, or "auto"
    #[arg(short = 'p', long, default_value = "auto")]
    pub provider: String,
}
