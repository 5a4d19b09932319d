use ratatui::style::{Color, Modifier, Style};

const AMBER_400: Color = Color::Rgb(251, 191, 36);
const AMBER_500: Color = Color::Rgb(245, 158, 11);
const AMBER_600: Color = Color::Rgb(217, 119, 6);
const AMBER_700: Color = Color::Rgb(180, 83, 9);
const AMBER_800: Color = Color::Rgb(146, 64, 14);
const CYAN_400: Color = Color::Rgb(34, 211, 238);
const CYAN_600: Color = Color::Rgb(8, 145, 178);
const RED_400: Color = Color::Rgb(248, 113, 113);
const RED_700: Color = Color::Rgb(185, 28, 28);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => ThemeKind::Light,
            _ => ThemeKind::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub kind: ThemeKind,
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Chrome
    pub title_style: Style,
    pub title_accent_style: Style,
    pub subtitle_style: Style,
    pub footer_style: Style,
    pub loading_style: Style,
    pub error_style: Style,

    // Bubbles
    pub user_avatar_style: Style,
    pub model_avatar_style: Style,
    pub user_text_style: Style,
    pub model_text_style: Style,
    pub timestamp_style: Style,

    // Structured content
    pub heading2_style: Style,
    pub heading3_style: Style,
    pub heading_rule_style: Style,
    pub bold_style: Style,
    pub italic_style: Style,
    pub option_prefix_style: Style,
    pub option_text_style: Style,
    pub option_selected_style: Style,
    pub inert_option_prefix_style: Style,

    // Input area
    pub input_border_style: Style,
    pub input_text_style: Style,
    pub input_placeholder_style: Style,
    pub input_disabled_style: Style,
}

impl Theme {
    pub fn dark() -> Self {
        let bg = Color::Rgb(18, 18, 18);
        Theme {
            kind: ThemeKind::Dark,
            background_color: bg,

            title_style: Style::default().fg(Color::Rgb(243, 244, 246)),
            title_accent_style: Style::default()
                .fg(AMBER_600)
                .add_modifier(Modifier::BOLD),
            subtitle_style: Style::default().fg(Color::Rgb(107, 114, 128)),
            footer_style: Style::default().fg(Color::Rgb(75, 85, 99)),
            loading_style: Style::default().fg(Color::Rgb(156, 163, 175)),
            error_style: Style::default().fg(RED_400),

            user_avatar_style: Style::default()
                .fg(AMBER_600)
                .add_modifier(Modifier::BOLD),
            model_avatar_style: Style::default().fg(CYAN_400).add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Rgb(243, 244, 246)),
            model_text_style: Style::default().fg(Color::Rgb(229, 231, 235)),
            timestamp_style: Style::default()
                .fg(Color::Rgb(107, 114, 128))
                .add_modifier(Modifier::DIM),

            heading2_style: Style::default()
                .fg(AMBER_500)
                .add_modifier(Modifier::BOLD),
            heading3_style: Style::default()
                .fg(AMBER_500)
                .add_modifier(Modifier::BOLD),
            heading_rule_style: Style::default().fg(Color::Rgb(55, 65, 81)),
            bold_style: Style::default()
                .fg(AMBER_400)
                .add_modifier(Modifier::BOLD),
            italic_style: Style::default().add_modifier(Modifier::ITALIC),
            option_prefix_style: Style::default()
                .fg(AMBER_500)
                .add_modifier(Modifier::BOLD),
            option_text_style: Style::default().fg(Color::Rgb(209, 213, 219)),
            option_selected_style: Style::default()
                .bg(Color::Rgb(51, 51, 51))
                .add_modifier(Modifier::BOLD),
            inert_option_prefix_style: Style::default().fg(Color::Rgb(156, 163, 175)),

            input_border_style: Style::default().fg(Color::Rgb(55, 65, 81)),
            input_text_style: Style::default().fg(Color::White),
            input_placeholder_style: Style::default().fg(Color::Rgb(107, 114, 128)),
            input_disabled_style: Style::default()
                .fg(Color::Rgb(75, 85, 99))
                .add_modifier(Modifier::DIM),
        }
    }

    pub fn light() -> Self {
        Theme {
            kind: ThemeKind::Light,
            background_color: Color::Rgb(249, 250, 251),

            title_style: Style::default().fg(Color::Rgb(17, 24, 39)),
            title_accent_style: Style::default()
                .fg(AMBER_600)
                .add_modifier(Modifier::BOLD),
            subtitle_style: Style::default().fg(Color::Rgb(156, 163, 175)),
            footer_style: Style::default().fg(Color::Rgb(156, 163, 175)),
            loading_style: Style::default().fg(Color::Rgb(107, 114, 128)),
            error_style: Style::default().fg(RED_700),

            user_avatar_style: Style::default()
                .fg(AMBER_600)
                .add_modifier(Modifier::BOLD),
            model_avatar_style: Style::default().fg(CYAN_600).add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Rgb(17, 24, 39)),
            model_text_style: Style::default().fg(Color::Rgb(31, 41, 55)),
            timestamp_style: Style::default().fg(Color::Rgb(156, 163, 175)),

            heading2_style: Style::default()
                .fg(AMBER_800)
                .add_modifier(Modifier::BOLD),
            heading3_style: Style::default()
                .fg(AMBER_800)
                .add_modifier(Modifier::BOLD),
            heading_rule_style: Style::default().fg(Color::Rgb(253, 230, 138)),
            bold_style: Style::default()
                .fg(AMBER_700)
                .add_modifier(Modifier::BOLD),
            italic_style: Style::default().add_modifier(Modifier::ITALIC),
            option_prefix_style: Style::default()
                .fg(AMBER_600)
                .add_modifier(Modifier::BOLD),
            option_text_style: Style::default().fg(Color::Rgb(55, 65, 81)),
            option_selected_style: Style::default()
                .bg(Color::Rgb(255, 251, 235))
                .add_modifier(Modifier::BOLD),
            inert_option_prefix_style: Style::default().fg(Color::Rgb(107, 114, 128)),

            input_border_style: Style::default().fg(Color::Rgb(209, 213, 219)),
            input_text_style: Style::default().fg(Color::Rgb(17, 24, 39)),
            input_placeholder_style: Style::default().fg(Color::Rgb(156, 163, 175)),
            input_disabled_style: Style::default()
                .fg(Color::Rgb(209, 213, 219))
                .add_modifier(Modifier::DIM),
        }
    }

    pub fn from_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self::dark(),
            ThemeKind::Light => Self::light(),
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::from_kind(ThemeKind::from_name(name))
    }

    pub fn toggled(&self) -> Self {
        Self::from_kind(self.kind.toggled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_dark() {
        assert_eq!(Theme::from_name("LIGHT").kind, ThemeKind::Light);
        assert_eq!(Theme::from_name("solarized").kind, ThemeKind::Dark);
    }

    #[test]
    fn toggling_twice_returns_to_start() {
        let theme = Theme::dark();
        assert_eq!(theme.toggled().kind, ThemeKind::Light);
        assert_eq!(theme.toggled().toggled().kind, ThemeKind::Dark);
    }
}
