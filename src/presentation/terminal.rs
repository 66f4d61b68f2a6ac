// Terminal stand-in for the host's dialogs and message boxes
use crate::domain::language::is_target_language;
use crate::domain::traits::HostUi;
use crate::domain::ui::{DialogOutcome, Indicator, Notice, SettingsDialog};
use crate::presentation::theme::Theme;
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

static BREAK_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(div|h[1-6]|p|li)>").expect("valid regex")
});
static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Flatten a notice's HTML into plain lines.
pub fn html_to_text(html: &str) -> String {
    let text = BREAK_TAGS.replace_all(html, "\n");
    let text = TAGS.replace_all(&text, "");
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Answers the settings dialog would have received from the user.
#[derive(Debug, Clone, Default)]
pub struct DialogAnswers {
    pub provider: Option<String>,
    pub language: Option<String>,
    pub overwrite_existing: bool,
    pub include_empty: bool,
    /// Press "Test Provider" instead of "Start".
    pub test_only: bool,
}

pub struct TerminalUi {
    theme: Theme,
    assume_yes: bool,
    answers: DialogAnswers,
    spinner: Mutex<Option<ProgressBar>>,
    reload_requested: AtomicBool,
}

impl TerminalUi {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            assume_yes: false,
            answers: DialogAnswers::default(),
            spinner: Mutex::new(None),
            reload_requested: AtomicBool::new(false),
        }
    }

    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn with_answers(mut self, answers: DialogAnswers) -> Self {
        self.answers = answers;
        self
    }

    pub fn reload_requested(&self) -> bool {
        self.reload_requested.load(Ordering::SeqCst)
    }

    fn read_answer(&self) -> bool {
        let mut line = String::new();
        let stdin = std::io::stdin();
        if stdin.lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

impl HostUi for TerminalUi {
    fn msgprint(&self, notice: Notice) {
        let header = format!("{} {}", Theme::symbol(notice.indicator), notice.title);
        println!("{}", self.theme.paint(notice.indicator, &header));
        println!("{}", (self.theme.line)(&"─".repeat(40)));
        for line in html_to_text(&notice.message).lines() {
            println!("  {}", line);
        }
        println!();
    }

    fn show_alert(&self, message: &str, indicator: Indicator) {
        println!(
            "{}",
            self.theme
                .paint(indicator, &format!("{} {}", Theme::symbol(indicator), message))
        );
    }

    fn confirm(&self, message: &str) -> bool {
        let question = html_to_text(message).replace('\n', " ");
        if self.assume_yes {
            println!("{} {}", question, (self.theme.label)("[y]"));
            return true;
        }
        print!("{} {} ", question, (self.theme.label)("[y/N]"));
        std::io::stdout().flush().ok();
        self.read_answer()
    }

    fn show_progress(&self, title: &str, message: &str) {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {prefix:.bold} {msg}") {
            bar.set_style(style);
        }
        bar.set_prefix(title.to_string());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(previous) = slot.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }

    fn hide_progress(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn settings_dialog(&self, dialog: &SettingsDialog) -> DialogOutcome {
        let mut settings = dialog.defaults();
        if let Some(provider) = &self.answers.provider {
            settings.ai_provider = provider.clone();
        }
        if let Some(language) = &self.answers.language {
            settings.target_language = language.clone();
        }
        settings.overwrite_existing = self.answers.overwrite_existing;
        settings.skip_empty = !self.answers.include_empty;

        if !dialog.providers.iter().any(|p| p == &settings.ai_provider) {
            self.show_alert(
                &format!(
                    "Provider '{}' is not configured. Choose one of: {}",
                    settings.ai_provider,
                    dialog.providers.join(", ")
                ),
                Indicator::Red,
            );
            return DialogOutcome::Cancelled;
        }
        if !is_target_language(&settings.target_language) {
            self.show_alert(
                &format!(
                    "Language '{}' is not in the list; the Arabic code will be used",
                    settings.target_language
                ),
                Indicator::Orange,
            );
        }

        println!(
            "{} {}  {} {}",
            (self.theme.label)("Provider:"),
            settings.ai_provider.to_uppercase(),
            (self.theme.label)("Language:"),
            settings.target_language
        );

        if self.answers.test_only {
            DialogOutcome::TestProvider(settings.ai_provider)
        } else {
            DialogOutcome::Start(settings)
        }
    }

    fn reload(&self) {
        self.reload_requested.store(true, Ordering::SeqCst);
        println!("{}", (self.theme.line)("Reloading form..."));
    }
}
