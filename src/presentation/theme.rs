use crate::domain::ui::Indicator;
use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub label: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub green: fn(&str) -> String,
    pub orange: fn(&str) -> String,
    pub red: fn(&str) -> String,
    pub blue: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "default" | "" => Self::standard(),
            "mono" => Self::mono(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::standard()
            }
        }
    }

    /// Style for text carrying `indicator`.
    pub fn paint(&self, indicator: Indicator, text: &str) -> String {
        let style = match indicator {
            Indicator::Green => self.green,
            Indicator::Orange => self.orange,
            Indicator::Red => self.red,
            Indicator::Blue => self.blue,
        };
        style(text)
    }

    pub fn symbol(indicator: Indicator) -> &'static str {
        match indicator {
            Indicator::Green => "✔",
            Indicator::Orange => "!",
            Indicator::Red => "✘",
            Indicator::Blue => "i",
        }
    }

    fn standard() -> Self {
        Self {
            title: |s| s.bold().underline().to_string(),
            label: |s| s.cyan().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            green: |s| s.green().bold().to_string(),
            orange: |s| s.yellow().bold().to_string(),
            red: |s| s.red().bold().to_string(),
            blue: |s| s.bright_blue().to_string(),
        }
    }

    fn mono() -> Self {
        Self {
            title: |s| s.bold().to_string(),
            label: |s| s.normal().to_string(),
            line: |s| s.normal().to_string(),
            green: |s| s.normal().to_string(),
            orange: |s| s.normal().to_string(),
            red: |s| s.normal().to_string(),
            blue: |s| s.normal().to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::standard()
    }
}
