use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles keyed by what a line reports about a generation round.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub heading: Style,
    pub created: Style,
    pub updated: Style,
    pub unchanged: Style,
    pub failure: Style,
    pub notice: Style,
    pub label: Style,
}

impl Theme {
    /// Colored on a terminal unless `NO_COLOR` is set
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if no_color || !console::Term::stdout().is_term() {
            Self::plain()
        } else {
            Self::colored()
        }
    }

    pub fn colored() -> Self {
        Self {
            heading: Style::new().cyan().bold(),
            created: Style::new().green().bold(),
            updated: Style::new().yellow(),
            unchanged: Style::new().bright_black(),
            failure: Style::new().red().bold(),
            notice: Style::new().yellow().bold(),
            label: Style::new().white().dimmed(),
        }
    }

    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            heading: none,
            created: none,
            updated: none,
            unchanged: none,
            failure: none,
            notice: none,
            label: none,
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_plain_theme_adds_no_escapes() {
        let plain = Theme::plain();
        assert_eq!("CalculatorImpl".style(plain.heading).to_string(), "CalculatorImpl");
    }

    #[test]
    fn test_colored_theme_marks_created() {
        let colored = Theme::colored();
        assert_ne!("CalculatorImpl.kt".style(colored.created).to_string(), "CalculatorImpl.kt");
    }
}
