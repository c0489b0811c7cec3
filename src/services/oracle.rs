//! The execution/analysis oracle: the external generative model that
//! stands in for real code execution, explanation and repair.
//!
//! The core only sees the narrow `Oracle` capability trait, so tests run
//! against deterministic stubs. The production implementation talks to the
//! Gemini `generateContent` endpoint over ureq. Every operation is a single
//! best-effort round trip: no retry, no streaming, and transport failures
//! become a synthesized error reply instead of a fault.

use crate::model::language::Language;
use std::time::Duration;

pub const DEFAULT_MODEL_ID: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the API key by default.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// What an oracle operation produced: free text plus an error flag. The
/// text is never validated against the language's grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleReply {
    pub text: String,
    pub is_error: bool,
}

impl OracleReply {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// The three operations the studio delegates to the external model.
pub trait Oracle: Send + Sync {
    /// Conceptually execute `code` and describe the console output.
    fn simulate_run(&self, code: &str, language: Language) -> OracleReply;

    /// Explain `code` for a developer.
    fn explain(&self, code: &str) -> OracleReply;

    /// Rewrite `code` given `context` (usually the last output). The reply
    /// text is the extracted code, ready to apply to the buffer.
    fn fix(&self, code: &str, context: &str) -> OracleReply;
}

/// Production oracle over the Gemini HTTP API.
pub struct GeminiOracle {
    base_url: String,
    model_id: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiOracle {
    pub fn new(
        base_url: impl Into<String>,
        model_id: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model_id: model_id.into(),
            api_key: api_key.into(),
            timeout,
        }
    }

    /// One generateContent round trip. Transport and decode failures come
    /// back as `Err(reason)` for the per-operation error wrapping.
    fn generate(&self, prompt: &str) -> Result<String, String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model_id, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        tracing::debug!(model = %self.model_id, "Sending generateContent request");
        let response = ureq::post(&url)
            .set("Content-Type", "application/json")
            .timeout(self.timeout)
            .send_string(&body.to_string())
            .map_err(|e| {
                tracing::debug!("HTTP request failed: {}", e);
                format!("HTTP request failed: {e}")
            })?;

        let body = response
            .into_string()
            .map_err(|e| format!("Failed to read response body: {e}"))?;

        parse_reply_text(&body)
    }
}

impl Oracle for GeminiOracle {
    fn simulate_run(&self, code: &str, language: Language) -> OracleReply {
        match self.generate(&run_prompt(code, language)) {
            Ok(text) if text.trim().is_empty() => OracleReply::ok("No output generated."),
            Ok(text) => OracleReply::ok(text.trim().to_string()),
            Err(e) => OracleReply::error(format!("Error simulating execution: {e}")),
        }
    }

    fn explain(&self, code: &str) -> OracleReply {
        match self.generate(&explain_prompt(code)) {
            Ok(text) if text.is_empty() => OracleReply::ok("Could not analyze code."),
            Ok(text) => OracleReply::ok(text),
            Err(e) => OracleReply::error(format!("Analysis error: {e}")),
        }
    }

    fn fix(&self, code: &str, context: &str) -> OracleReply {
        match self.generate(&fix_prompt(code, context)) {
            Ok(text) => OracleReply::ok(extract_fenced_block(&text)),
            Err(e) => OracleReply::error(format!("Fix error: {e}")),
        }
    }
}

/// Deterministic stand-in used with `--offline` or when no API key is set.
pub struct CannedOracle;

impl Oracle for CannedOracle {
    fn simulate_run(&self, code: &str, language: Language) -> OracleReply {
        OracleReply::ok(format!(
            "[offline] Would ask the model to simulate {} lines of {}.\nSet {} to enable live runs.",
            code.split('\n').count(),
            language,
            API_KEY_ENV
        ))
    }

    fn explain(&self, _code: &str) -> OracleReply {
        OracleReply::ok(format!(
            "[offline] Explanation requires the live model. Set {API_KEY_ENV} to enable it."
        ))
    }

    fn fix(&self, _code: &str, _context: &str) -> OracleReply {
        // An empty fix reply is never applied to the buffer.
        OracleReply::ok("")
    }
}

/// Pull the concatenated candidate text out of a generateContent response.
fn parse_reply_text(json: &str) -> Result<String, String> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| format!("Invalid response JSON: {e}"))?;

    let parts = value
        .pointer("/candidates/0/content/parts")
        .and_then(|p| p.as_array())
        .ok_or_else(|| "No candidates in response".to_string())?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    Ok(text)
}

/// Extract the inner fenced code block if present, else the raw text
/// verbatim. An optional language tag on the opening fence is skipped.
pub fn extract_fenced_block(text: &str) -> String {
    let Some(open) = text.find("```") else {
        return text.to_string();
    };
    let after_fence = &text[open + 3..];
    let Some(newline) = after_fence.find('\n') else {
        return text.to_string();
    };
    let body = &after_fence[newline + 1..];
    match body.find("```") {
        Some(close) => body[..close].to_string(),
        None => text.to_string(),
    }
}

fn run_prompt(code: &str, language: Language) -> String {
    format!(
        "Act as a code execution engine.\n\
         Language: {language}\n\
         Code:\n\
         ```{language}\n\
         {code}\n\
         ```\n\n\
         Execute this code conceptually and return ONLY the output that would appear in the console/stdout.\n\
         If there is an error, return the error message as it would appear in a terminal.\n\
         Do not add markdown formatting like ``` to the response. Just the raw output string.\n\
         If the code generates a plot or GUI, describe what happens briefly in brackets, e.g., [Window opens with a blue button]."
    )
}

fn explain_prompt(code: &str) -> String {
    format!(
        "Explain the following code snippet concisely for a developer.\n\
         Break it down by logic flow.\n\
         Code:\n\
         ```\n\
         {code}\n\
         ```"
    )
}

fn fix_prompt(code: &str, context: &str) -> String {
    format!(
        "The following code has an issue.\n\
         Code:\n\
         ```\n\
         {code}\n\
         ```\n\
         Error/Issue: {context}\n\n\
         Please provide the fixed version of the code. Return ONLY the code, wrapped in markdown code blocks."
    )
}
