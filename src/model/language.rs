//! The closed set of supported languages.
//!
//! A `Language` is the single source of truth for which template, grammar
//! and pane mode (run vs. preview) is active. Invalid identifiers are
//! rejected at the CLI/config boundary; past it, only these seven values
//! exist.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    Python,
    TypeScript,
    Html,
    Css,
    Sql,
    Cpp,
}

impl Language {
    /// All supported languages, in selector order.
    pub const ALL: [Language; 7] = [
        Language::JavaScript,
        Language::Python,
        Language::TypeScript,
        Language::Html,
        Language::Css,
        Language::Sql,
        Language::Cpp,
    ];

    /// Stable identifier used in config files and prompts.
    pub fn id(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::TypeScript => "typescript",
            Language::Html => "html",
            Language::Css => "css",
            Language::Sql => "sql",
            Language::Cpp => "cpp",
        }
    }

    /// Uppercase name for the header bar and the language picker.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::JavaScript => "JAVASCRIPT",
            Language::Python => "PYTHON",
            Language::TypeScript => "TYPESCRIPT",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Sql => "SQL",
            Language::Cpp => "C++",
        }
    }

    /// Markup/style languages get a live preview pane instead of a run
    /// action.
    pub fn is_preview(&self) -> bool {
        matches!(self, Language::Html | Language::Css)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Language::JavaScript),
            "python" | "py" => Ok(Language::Python),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "html" => Ok(Language::Html),
            "css" => Ok(Language::Css),
            "sql" => Ok(Language::Sql),
            "cpp" | "c++" => Ok(Language::Cpp),
            other => Err(format!(
                "unsupported language '{other}' (expected one of: javascript, python, typescript, html, css, sql, cpp)"
            )),
        }
    }
}
