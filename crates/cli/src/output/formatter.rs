//! Human-readable and JSON rendering shared by all commands

use console::Style;
use serde::Serialize;

use super::OutputConfig;

/// Styles applied to the parts of a listing
#[derive(Debug, Clone)]
pub struct Theme {
    /// Branches and common prefixes
    pub prefix: Style,
    pub size: Style,
    pub date: Style,
    /// Config keys
    pub key: Style,
    /// Addresses and repository names
    pub name: Style,
    pub ok: Style,
    pub failure: Style,
    pub caution: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            prefix: Style::new().blue().bold(),
            size: Style::new().green(),
            date: Style::new().dim(),
            key: Style::new().cyan(),
            name: Style::new().bold(),
            ok: Style::new().green(),
            failure: Style::new().red(),
            caution: Style::new().yellow(),
        }
    }
}

impl Theme {
    /// No styling at all
    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            prefix: none.clone(),
            size: none.clone(),
            date: none.clone(),
            key: none.clone(),
            name: none.clone(),
            ok: none.clone(),
            failure: none.clone(),
            caution: none,
        }
    }
}

/// Prints command results according to [`OutputConfig`]
///
/// JSON mode never emits ANSI escapes.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
    theme: Theme,
}

impl Formatter {
    pub fn new(config: OutputConfig) -> Self {
        let plain = config.no_color || config.json;
        Self {
            config,
            theme: if plain { Theme::plain() } else { Theme::default() },
        }
    }

    pub fn is_json(&self) -> bool {
        self.config.json
    }

    pub fn style_prefix(&self, text: &str) -> String {
        self.theme.prefix.apply_to(text).to_string()
    }

    pub fn style_size(&self, text: &str) -> String {
        self.theme.size.apply_to(text).to_string()
    }

    pub fn style_date(&self, text: &str) -> String {
        self.theme.date.apply_to(text).to_string()
    }

    pub fn style_key(&self, text: &str) -> String {
        self.theme.key.apply_to(text).to_string()
    }

    pub fn style_name(&self, text: &str) -> String {
        self.theme.name.apply_to(text).to_string()
    }

    /// Confirmation line on stdout; silent in quiet and JSON modes
    pub fn success(&self, message: &str) {
        if !self.config.quiet && !self.config.json {
            println!("{} {message}", self.theme.ok.apply_to("✓"));
        }
    }

    /// Error on stderr, printed even in quiet mode
    ///
    /// In JSON mode the message is wrapped as `{"error": ...}`.
    pub fn error(&self, message: &str) {
        if !self.config.json {
            eprintln!("{} {message}", self.theme.failure.apply_to("✗"));
            return;
        }
        let body = serde_json::json!({ "error": message });
        match serde_json::to_string_pretty(&body) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("{message}"),
        }
    }

    /// Warning on stderr; silent in quiet and JSON modes
    pub fn warning(&self, message: &str) {
        if !self.config.quiet && !self.config.json {
            eprintln!("{} {message}", self.theme.caution.apply_to("⚠"));
        }
    }

    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    /// Plain line on stdout; silent in quiet mode
    pub fn println(&self, message: &str) {
        if !self.config.quiet {
            println!("{message}");
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESC: char = '\u{1b}';

    #[test]
    fn test_default_formatter_styles_output() {
        console::set_colors_enabled(true);
        let formatter = Formatter::default();
        assert!(!formatter.is_json());

        let styled = formatter.style_prefix("main/");
        assert!(styled.contains(ESC));
        assert!(styled.contains("main/"));
    }

    #[test]
    fn test_json_mode_is_unstyled() {
        console::set_colors_enabled(true);
        let formatter = Formatter::new(OutputConfig {
            json: true,
            ..Default::default()
        });
        assert!(formatter.is_json());
        assert_eq!(formatter.style_prefix("main/"), "main/");
        assert_eq!(formatter.style_key("listing.max_keys"), "listing.max_keys");
    }

    #[test]
    fn test_no_color_is_unstyled() {
        console::set_colors_enabled(true);
        let formatter = Formatter::new(OutputConfig {
            no_color: true,
            ..Default::default()
        });
        assert!(!formatter.is_json());
        assert_eq!(formatter.style_size("1 KiB"), "1 KiB");
        assert_eq!(formatter.style_name("127.0.0.1:8000"), "127.0.0.1:8000");
    }
}
