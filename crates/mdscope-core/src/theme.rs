use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

/// Which palette is in effect. Persisted as a plain string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dark" => Some(ThemeMode::Dark),
            "light" => Some(ThemeMode::Light),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub text: Style,
    pub muted: Style,
    pub faint: Style,
    pub accent: Style,
    pub success: Style,
    pub warning: Style,
    pub danger: Style,
    pub border: Style,
    pub code_inline: Style,
    pub link: Style,
    /// Outline entry for the section currently being read.
    pub outline_active: Style,
    /// Row the cursor/selection sits on in list panels.
    pub selection: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            text: Style::default(),
            muted: Style::default().fg(Color::DarkGray),
            faint: Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            accent: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            danger: Style::default().fg(Color::Red),
            border: Style::default().fg(Color::DarkGray),
            code_inline: Style::default().fg(Color::Cyan),
            link: Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            outline_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selection: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    pub fn light() -> Self {
        Self {
            text: Style::default().fg(Color::Black),
            muted: Style::default().fg(Color::Gray),
            faint: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            accent: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Magenta),
            danger: Style::default().fg(Color::Red),
            border: Style::default().fg(Color::Gray),
            code_inline: Style::default().fg(Color::Blue),
            link: Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            outline_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selection: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Style for a heading of `level` (1 is the most prominent).
    pub fn heading(&self, level: u8) -> Style {
        match level {
            1 => self.accent.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            2 => self.accent.add_modifier(Modifier::BOLD),
            _ => self.text.add_modifier(Modifier::BOLD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_through_strings() {
        for mode in [ThemeMode::Dark, ThemeMode::Light] {
            assert_eq!(ThemeMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(ThemeMode::parse("sepia"), None);
    }

    #[test]
    fn toggle_flips_and_returns() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
    }
}
