//! Syntax highlighting with tree-sitter.
//!
//! The overlay renderer colorizes the whole buffer (studio buffers are a
//! screenful of sample code, not gigabyte files) and caches the spans until
//! the next edit invalidates them. Spans store categories, not colors, so a
//! theme switch does not force a re-parse.
//!
//! Failures never block editing: a language without a grammar in our stack
//! (SQL) or a query error just means plain, uncolored text.

use crate::model::language::Language;
use crate::view::theme::Theme;
use ratatui::style::Color;
use std::ops::Range;
use tree_sitter_highlight::{HighlightConfiguration, HighlightEvent, Highlighter as TSHighlighter};

/// Highlight category names used for default languages.
/// The order matches the `configure()` call in `highlight_config()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightCategory {
    Attribute,
    Comment,
    Constant,
    Function,
    Keyword,
    Number,
    Operator,
    Property,
    String,
    Type,
    Variable,
}

/// The capture names handed to `HighlightConfiguration::configure` for
/// every grammar except TypeScript; index order matches
/// `HighlightCategory::from_default_index`.
const DEFAULT_CAPTURES: &[&str] = &[
    "attribute",
    "comment",
    "constant",
    "function",
    "keyword",
    "number",
    "operator",
    "property",
    "string",
    "type",
    "variable",
];

impl HighlightCategory {
    /// Map a default language highlight index to a category.
    fn from_default_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Attribute),
            1 => Some(Self::Comment),
            2 => Some(Self::Constant),
            3 => Some(Self::Function),
            4 => Some(Self::Keyword),
            5 => Some(Self::Number),
            6 => Some(Self::Operator),
            7 => Some(Self::Property),
            8 => Some(Self::String),
            9 => Some(Self::Type),
            10 => Some(Self::Variable),
            _ => None,
        }
    }

    /// Map a TypeScript highlight index to a category.
    /// TypeScript has more captures; we map them to the closest theme color.
    fn from_typescript_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Attribute), // attribute
            1 => Some(Self::Comment),   // comment
            2 => Some(Self::Constant),  // constant
            3 => Some(Self::Constant),  // constant.builtin
            4 => Some(Self::Type),      // constructor
            5 => Some(Self::String),    // embedded (template substitutions)
            6 => Some(Self::Function),  // function
            7 => Some(Self::Function),  // function.builtin
            8 => Some(Self::Function),  // function.method
            9 => Some(Self::Keyword),   // keyword
            10 => Some(Self::Number),   // number
            11 => Some(Self::Operator), // operator
            12 => Some(Self::Property), // property
            13 => Some(Self::Operator), // punctuation.bracket
            14 => Some(Self::Operator), // punctuation.delimiter
            15 => Some(Self::Constant), // punctuation.special (template ${})
            16 => Some(Self::String),   // string
            17 => Some(Self::String),   // string.special (regex)
            18 => Some(Self::Type),     // type
            19 => Some(Self::Type),     // type.builtin
            20 => Some(Self::Variable), // variable
            21 => Some(Self::Constant), // variable.builtin (this, super)
            22 => Some(Self::Variable), // variable.parameter
            _ => None,
        }
    }

    /// Get the color for this category from the theme.
    pub fn color(&self, theme: &Theme) -> Color {
        match self {
            Self::Attribute => theme.syntax_constant,
            Self::Comment => theme.syntax_comment,
            Self::Constant => theme.syntax_constant,
            Self::Function => theme.syntax_function,
            Self::Keyword => theme.syntax_keyword,
            Self::Number => theme.syntax_constant,
            Self::Operator => theme.syntax_operator,
            Self::Property => theme.syntax_variable,
            Self::String => theme.syntax_string,
            Self::Type => theme.syntax_type,
            Self::Variable => theme.syntax_variable,
        }
    }
}

/// A highlighted span of text.
#[derive(Debug, Clone)]
pub struct HighlightSpan {
    /// Byte range in the buffer
    pub range: Range<usize>,
    /// Color for this span
    pub color: Color,
}

/// Internal span used for caching (stores category instead of color).
#[derive(Debug, Clone)]
struct CachedSpan {
    range: Range<usize>,
    category: HighlightCategory,
}

fn highlight_config(language: Language) -> Result<HighlightConfiguration, String> {
    let mut config = match language {
        Language::JavaScript => HighlightConfiguration::new(
            tree_sitter_javascript::LANGUAGE.into(),
            "javascript",
            tree_sitter_javascript::HIGHLIGHT_QUERY,
            "", // injections query
            "", // locals query
        )
        .map_err(|e| format!("Failed to create JavaScript highlight config: {e}"))?,
        Language::Python => HighlightConfiguration::new(
            tree_sitter_python::LANGUAGE.into(),
            "python",
            tree_sitter_python::HIGHLIGHTS_QUERY,
            "",
            "",
        )
        .map_err(|e| format!("Failed to create Python highlight config: {e}"))?,
        Language::TypeScript => {
            // TypeScript extends JavaScript: TS-specific highlights first
            // (higher priority), then the JavaScript base highlights.
            let combined_highlights = format!(
                "{}\n{}",
                tree_sitter_typescript::HIGHLIGHTS_QUERY,
                tree_sitter_javascript::HIGHLIGHT_QUERY
            );
            let mut config = HighlightConfiguration::new(
                tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
                "typescript",
                &combined_highlights,
                "",
                tree_sitter_typescript::LOCALS_QUERY,
            )
            .map_err(|e| format!("Failed to create TypeScript highlight config: {e}"))?;
            // Must include all captures from both JS and TS queries.
            config.configure(&[
                "attribute",
                "comment",
                "constant",
                "constant.builtin",
                "constructor",
                "embedded",
                "function",
                "function.builtin",
                "function.method",
                "keyword",
                "number",
                "operator",
                "property",
                "punctuation.bracket",
                "punctuation.delimiter",
                "punctuation.special",
                "string",
                "string.special",
                "type",
                "type.builtin",
                "variable",
                "variable.builtin",
                "variable.parameter",
            ]);
            return Ok(config);
        }
        Language::Html => HighlightConfiguration::new(
            tree_sitter_html::LANGUAGE.into(),
            "html",
            tree_sitter_html::HIGHLIGHTS_QUERY,
            "",
            "",
        )
        .map_err(|e| format!("Failed to create HTML highlight config: {e}"))?,
        Language::Css => HighlightConfiguration::new(
            tree_sitter_css::LANGUAGE.into(),
            "css",
            tree_sitter_css::HIGHLIGHTS_QUERY,
            "",
            "",
        )
        .map_err(|e| format!("Failed to create CSS highlight config: {e}"))?,
        Language::Cpp => HighlightConfiguration::new(
            tree_sitter_cpp::LANGUAGE.into(),
            "cpp",
            tree_sitter_cpp::HIGHLIGHT_QUERY,
            "",
            "",
        )
        .map_err(|e| format!("Failed to create C++ highlight config: {e}"))?,
        // No tree-sitter SQL grammar in our stack; SQL renders as plain
        // text, the same degradation policy as any grammar failure.
        Language::Sql => return Err("No highlight grammar for SQL".to_string()),
    };

    config.configure(DEFAULT_CAPTURES);
    Ok(config)
}

/// Map a tree-sitter highlight index to a highlight category.
fn highlight_category(language: Language, index: usize) -> Option<HighlightCategory> {
    match language {
        Language::TypeScript => HighlightCategory::from_typescript_index(index),
        _ => HighlightCategory::from_default_index(index),
    }
}

/// Syntax highlighter with span caching.
pub struct Highlighter {
    /// Tree-sitter highlighter instance
    ts_highlighter: TSHighlighter,
    /// Language being highlighted
    language: Language,
    /// Highlight configuration for the language
    config: HighlightConfiguration,
    /// Cached spans for the last highlighted source
    cache: Option<Vec<CachedSpan>>,
    /// Length of the source the cache was computed from
    cached_source_len: usize,
}

impl Highlighter {
    /// Create a new highlighter for the given language. `Err` means the
    /// language has no grammar and the caller renders plain text.
    pub fn new(language: Language) -> Result<Self, String> {
        let config = highlight_config(language)?;
        Ok(Self {
            ts_highlighter: TSHighlighter::new(),
            language,
            config,
            cache: None,
            cached_source_len: 0,
        })
    }

    /// Highlight the whole buffer, colored according to the theme.
    ///
    /// Spans come back in source order, non-overlapping. A parse failure
    /// returns whatever spans were produced so far (possibly none) — plain
    /// text, never an error to the caller.
    pub fn highlight(&mut self, source: &str, theme: &Theme) -> Vec<HighlightSpan> {
        if let Some(cache) = &self.cache {
            if self.cached_source_len == source.len() {
                return cache
                    .iter()
                    .map(|span| HighlightSpan {
                        range: span.range.clone(),
                        color: span.category.color(theme),
                    })
                    .collect();
            }
        }

        let mut cached_spans = Vec::new();
        match self.ts_highlighter.highlight(
            &self.config,
            source.as_bytes(),
            None,     // cancellation flag
            |_| None, // injection callback
        ) {
            Ok(highlights) => {
                let mut current_highlight: Option<usize> = None;
                for event in highlights {
                    match event {
                        Ok(HighlightEvent::Source { start, end }) => {
                            if let Some(highlight_idx) = current_highlight {
                                if let Some(category) =
                                    highlight_category(self.language, highlight_idx)
                                {
                                    cached_spans.push(CachedSpan {
                                        range: start..end,
                                        category,
                                    });
                                }
                            }
                        }
                        Ok(HighlightEvent::HighlightStart(s)) => {
                            current_highlight = Some(s.0);
                        }
                        Ok(HighlightEvent::HighlightEnd) => {
                            current_highlight = None;
                        }
                        Err(e) => {
                            tracing::warn!("Highlight error: {}", e);
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to highlight: {}", e);
            }
        }

        self.cache = Some(cached_spans.clone());
        self.cached_source_len = source.len();

        cached_spans
            .into_iter()
            .map(|span| HighlightSpan {
                range: span.range,
                color: span.category.color(theme),
            })
            .collect()
    }

    /// Mark the cache stale; call on every buffer edit.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Get the current language.
    pub fn language(&self) -> Language {
        self.language
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlighter_basic() {
        let source = "function greet() {\n  console.log(\"hi\");\n}";
        let mut highlighter = Highlighter::new(Language::JavaScript).unwrap();
        let theme = Theme::dark();

        let spans = highlighter.highlight(source, &theme);
        assert!(!spans.is_empty());

        // "function" should be highlighted with the theme's keyword color.
        let has_keyword = spans.iter().any(|s| s.color == theme.syntax_keyword);
        assert!(has_keyword, "Should highlight keywords");
    }

    #[test]
    fn test_sql_has_no_grammar() {
        assert!(Highlighter::new(Language::Sql).is_err());
    }

    #[test]
    fn test_every_grammar_language_constructs() {
        for lang in [
            Language::JavaScript,
            Language::Python,
            Language::TypeScript,
            Language::Html,
            Language::Css,
            Language::Cpp,
        ] {
            assert!(Highlighter::new(lang).is_ok(), "{lang} grammar failed");
        }
    }

    #[test]
    fn test_cache_invalidation() {
        let mut highlighter = Highlighter::new(Language::Python).unwrap();
        let theme = Theme::dark();

        highlighter.highlight("print(1)", &theme);
        assert!(highlighter.cache.is_some());

        highlighter.invalidate();
        assert!(highlighter.cache.is_none());

        highlighter.highlight("print(2)", &theme);
        assert!(highlighter.cache.is_some());
    }

    #[test]
    fn test_theme_affects_colors() {
        let source = "def f():\n    return 1";
        let mut highlighter = Highlighter::new(Language::Python).unwrap();

        let dark = Theme::dark();
        let light = Theme::light();
        let dark_spans = highlighter.highlight(source, &dark);
        let light_spans = highlighter.highlight(source, &light);

        assert!(dark_spans.iter().any(|s| s.color == dark.syntax_keyword));
        assert!(light_spans.iter().any(|s| s.color == light.syntax_keyword));
        assert_ne!(dark.syntax_keyword, light.syntax_keyword);
    }

    #[test]
    fn test_spans_are_in_order_and_bounded() {
        let source = "const x = 42;";
        let mut highlighter = Highlighter::new(Language::JavaScript).unwrap();
        let spans = highlighter.highlight(source, &Theme::dark());
        let mut last_start = 0;
        for span in &spans {
            assert!(span.range.start >= last_start);
            assert!(span.range.end <= source.len());
            last_start = span.range.start;
        }
    }
}
