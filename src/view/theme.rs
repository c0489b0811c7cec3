//! Color themes for the studio chrome and the syntax highlighter.

use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub dim: Color,
    pub error: Color,
    pub gutter: Color,
    pub gutter_current: Color,
    pub header_bg: Color,
    pub status_bg: Color,

    pub syntax_comment: Color,
    pub syntax_constant: Color,
    pub syntax_function: Color,
    pub syntax_keyword: Color,
    pub syntax_operator: Color,
    pub syntax_string: Color,
    pub syntax_type: Color,
    pub syntax_variable: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(10, 10, 14),
            foreground: Color::Rgb(220, 224, 232),
            accent: Color::Rgb(96, 165, 250),
            dim: Color::Rgb(108, 112, 134),
            error: Color::Rgb(243, 139, 168),
            gutter: Color::Rgb(70, 74, 94),
            gutter_current: Color::Rgb(220, 224, 232),
            header_bg: Color::Rgb(22, 22, 30),
            status_bg: Color::Rgb(16, 16, 22),

            syntax_comment: Color::Rgb(108, 112, 134),
            syntax_constant: Color::Rgb(250, 179, 135),
            syntax_function: Color::Rgb(137, 180, 250),
            syntax_keyword: Color::Rgb(203, 166, 247),
            syntax_operator: Color::Rgb(137, 220, 235),
            syntax_string: Color::Rgb(166, 227, 161),
            syntax_type: Color::Rgb(249, 226, 175),
            syntax_variable: Color::Rgb(205, 214, 244),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 250),
            foreground: Color::Rgb(40, 44, 52),
            accent: Color::Rgb(37, 99, 235),
            dim: Color::Rgb(140, 145, 160),
            error: Color::Rgb(200, 40, 70),
            gutter: Color::Rgb(180, 184, 200),
            gutter_current: Color::Rgb(40, 44, 52),
            header_bg: Color::Rgb(238, 238, 242),
            status_bg: Color::Rgb(232, 232, 238),

            syntax_comment: Color::Rgb(140, 145, 160),
            syntax_constant: Color::Rgb(186, 96, 10),
            syntax_function: Color::Rgb(37, 99, 235),
            syntax_keyword: Color::Rgb(130, 60, 190),
            syntax_operator: Color::Rgb(20, 120, 140),
            syntax_string: Color::Rgb(40, 130, 60),
            syntax_type: Color::Rgb(170, 120, 20),
            syntax_variable: Color::Rgb(40, 44, 52),
        }
    }

    /// Resolve a theme by config name, defaulting to dark.
    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_defaults_to_dark() {
        assert_eq!(Theme::by_name("light"), Theme::light());
        assert_eq!(Theme::by_name("dark"), Theme::dark());
        assert_eq!(Theme::by_name("no-such-theme"), Theme::dark());
    }

    #[test]
    fn test_themes_differ() {
        assert_ne!(Theme::dark().syntax_keyword, Theme::light().syntax_keyword);
    }
}
