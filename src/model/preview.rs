//! Preview composer: derives a standalone HTML document from the buffer
//! for the two visual languages.
//!
//! A pure function of (source, language). HTML passes through unchanged;
//! CSS is embedded verbatim in a fixed skeleton containing one sample card
//! so style rules apply to representative markup. Arbitrary text is
//! accepted; malformed input is the rendering frame's problem, not ours.

use std::io;
use std::path::PathBuf;

use super::language::Language;

/// The fixed sample element styled by CSS previews.
const SAMPLE_CARD: &str = r#"<div class="card">
      <h2>Neat Design</h2>
      <button>Click Me</button>
    </div>"#;

/// Compose the preview document, or `None` for run-mode languages.
pub fn compose(language: Language, source: &str) -> Option<String> {
    match language {
        Language::Html => Some(source.to_string()),
        Language::Css => Some(format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <style>{source}</style>
  </head>
  <body>
    {SAMPLE_CARD}
  </body>
</html>
"#
        )),
        _ => None,
    }
}

/// Write the composed document to a temp file so an external browser (the
/// rendering frame) can open it. Returns the written path.
pub fn export_to_temp(document: &str) -> io::Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("aether-preview-{}.html", std::process::id()));
    std::fs::write(&path, document)?;
    Ok(path)
}
