// End-to-end scenario tests against the virtual terminal harness.

mod common;

use std::time::Duration;

use aether::model::language::Language;
use aether::model::templates::template;
use aether::services::oracle::CannedOracle;
use common::harness::StudioHarness;
use common::oracles::{gated_fix_oracle, RecordingOracle};
use crossterm::event::{KeyCode, KeyModifiers};

const WAIT: Duration = Duration::from_secs(2);

#[test]
fn every_language_switch_loads_template_and_clears_output() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::JavaScript, oracle);

    for lang in Language::ALL {
        harness.app.output.replace("stale output", false);
        harness.app.set_language(lang);
        harness.draw();
        assert_eq!(harness.app.buffer.text(), template(lang));
        assert!(harness.app.output.is_empty());
        assert_eq!(harness.app.buffer.caret(), 0);
    }
}

#[test]
fn run_sends_the_current_buffer_not_the_stale_template() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::Python, oracle.clone());

    harness.app.edit_buffer("print(1)");
    harness.key(KeyCode::Char('r'), KeyModifiers::CONTROL);
    assert!(harness.app.run_in_flight());

    harness.wait_until(WAIT, |app| !app.run_in_flight());
    assert_eq!(
        oracle.runs.lock().unwrap().as_slice(),
        &[("print(1)".to_string(), Language::Python)]
    );
    assert_eq!(harness.app.output.text(), "ran");
}

#[test]
fn tab_key_restores_caret_only_after_the_next_frame() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::JavaScript, oracle);

    harness.app.edit_buffer("0123456789");
    harness.app.buffer.set_caret(3);
    harness.key(KeyCode::Tab, KeyModifiers::NONE);

    // Content committed, caret not yet restored.
    assert_eq!(harness.app.buffer.text().len(), 14);
    assert_eq!(harness.app.buffer.caret(), 3);

    harness.draw();
    assert_eq!(harness.app.buffer.caret(), 7);
}

#[test]
fn typing_edits_the_buffer_and_the_status_line() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::Python, oracle);

    harness.app.edit_buffer("");
    harness.type_str("x = 1\nprint(x)");
    assert_eq!(harness.app.buffer.text(), "x = 1\nprint(x)");
    assert_eq!(harness.app.buffer.line_count(), 2);

    harness.draw();
    let screen = harness.screen_text();
    assert!(screen.contains("Ln 2"), "status shows line count: {screen}");
    assert!(screen.contains("UTF-8"));
}

#[test]
fn template_chrome_and_console_render() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::JavaScript, oracle);
    harness.draw();

    let screen = harness.screen_text();
    assert!(screen.contains("Aether Studio"));
    assert!(screen.contains("JAVASCRIPT"));
    assert!(screen.contains("processData"));
    assert!(screen.contains("CONSOLE"));
    assert!(screen.contains("Output will appear here"));
    assert!(screen.contains("READY"));
}

#[test]
fn language_picker_switches_language() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::JavaScript, oracle);

    harness.key(KeyCode::Char('l'), KeyModifiers::CONTROL);
    harness.draw();
    assert!(harness.screen_text().contains("LANGUAGE"));

    harness.key(KeyCode::Down, KeyModifiers::NONE);
    harness.key(KeyCode::Enter, KeyModifiers::NONE);
    harness.draw();

    assert_eq!(harness.app.buffer.language(), Language::Python);
    assert_eq!(harness.app.buffer.text(), template(Language::Python));
    assert!(harness.screen_text().contains("PYTHON"));
}

#[test]
fn css_edit_recomputes_preview_document() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::Css, oracle);

    harness.app.edit_buffer("body{color:red}");
    harness.draw();

    let doc = harness.app.preview.as_deref().expect("css has a preview");
    assert!(doc.contains("<style>body{color:red}</style>"));
    assert!(doc.contains(r#"<div class="card">"#));

    let screen = harness.screen_text();
    assert!(screen.contains("PREVIEW"));
    assert!(!screen.contains("CONSOLE"));
}

#[test]
fn html_preview_is_the_buffer_itself() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::Html, oracle);

    harness.app.edit_buffer("<p>hello preview</p>");
    harness.draw();
    assert_eq!(
        harness.app.preview.as_deref(),
        Some("<p>hello preview</p>")
    );
}

#[test]
fn run_is_unavailable_in_preview_mode() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::Html, oracle.clone());

    harness.key(KeyCode::Char('r'), KeyModifiers::CONTROL);
    assert!(!harness.app.run_in_flight());
    assert!(oracle.runs.lock().unwrap().is_empty());
}

#[test]
fn explain_updates_output_and_clear_key_empties_it() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::Cpp, oracle.clone());

    harness.key(KeyCode::Char('e'), KeyModifiers::CONTROL);
    harness.wait_until(WAIT, |app| !app.analysis_in_flight());
    assert_eq!(harness.app.output.text(), "explained");
    assert_eq!(
        oracle.explains.lock().unwrap().as_slice(),
        &[template(Language::Cpp).to_string()]
    );

    harness.key(KeyCode::Char('k'), KeyModifiers::CONTROL);
    assert!(harness.app.output.is_empty());
}

#[test]
fn fix_passes_last_output_as_context() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::Python, oracle.clone());

    harness.key(KeyCode::Char('r'), KeyModifiers::CONTROL);
    harness.wait_until(WAIT, |app| !app.run_in_flight());

    harness.key(KeyCode::Char('f'), KeyModifiers::CONTROL);
    harness.wait_until(WAIT, |app| !app.analysis_in_flight());

    let fixes = oracle.fixes.lock().unwrap();
    assert_eq!(fixes.len(), 1);
    assert_eq!(fixes[0].1, "ran"); // the run output became the fix context
}

#[test]
fn fix_without_output_uses_general_check_context() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::Python, oracle.clone());

    harness.key(KeyCode::Char('f'), KeyModifiers::CONTROL);
    harness.wait_until(WAIT, |app| !app.analysis_in_flight());

    assert_eq!(oracle.fixes.lock().unwrap()[0].1, "General check");
}

// The accepted race: a fix issued against buffer state A, an edit to state
// B while the request is in flight, then the reply arriving. There is no
// fencing by buffer version — the reply overwrites B (last writer wins).
#[test]
fn fix_reply_overwrites_intervening_edit() {
    let (release, oracle) = gated_fix_oracle();
    let mut harness = StudioHarness::new(Language::Python, oracle);

    harness.app.edit_buffer("state A");
    harness.key(KeyCode::Char('f'), KeyModifiers::CONTROL);
    assert!(harness.app.analysis_in_flight());

    // User keeps editing while the request is in flight.
    harness.app.edit_buffer("state B");

    release.send("fixed by the oracle".to_string()).unwrap();
    harness.wait_until(WAIT, |app| !app.analysis_in_flight());

    assert_eq!(harness.app.buffer.text(), "fixed by the oracle");
    assert_eq!(harness.app.output.text(), "Optimized code applied.");
}

#[test]
fn scroll_offsets_stay_mirrored_while_navigating() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::JavaScript, oracle);

    let long: String = (0..200)
        .map(|i| format!("line number {i}\n"))
        .collect();
    harness.app.edit_buffer(&long);
    harness.app.buffer.move_line_end();
    harness.app.buffer.set_caret(long.len());
    harness.draw();

    let viewport = &harness.app.viewport;
    assert!(viewport.text_offset().y > 0, "caret at the end scrolled down");
    assert_eq!(viewport.overlay_offset(), viewport.text_offset());

    harness.app.buffer.set_caret(0);
    harness.draw();
    assert_eq!(harness.app.viewport.text_offset().y, 0);
    assert_eq!(
        harness.app.viewport.overlay_offset(),
        harness.app.viewport.text_offset()
    );
}

#[test]
fn sql_renders_plain_text_without_blocking_editing() {
    let oracle = RecordingOracle::new();
    let mut harness = StudioHarness::new(Language::Sql, oracle);

    assert!(harness.app.highlighter.is_none());
    harness.draw();
    assert!(harness.screen_text().contains("SELECT name, email"));

    harness.type_str(" -- note");
    harness.draw();
    assert!(harness.app.buffer.text().starts_with(" -- note"));
}

#[test]
fn canned_oracle_answers_offline() {
    let mut harness = StudioHarness::new(Language::Python, std::sync::Arc::new(CannedOracle));

    harness.key(KeyCode::Char('r'), KeyModifiers::CONTROL);
    harness.wait_until(WAIT, |app| !app.run_in_flight());

    assert!(harness.app.output.text().contains("[offline]"));
    assert!(!harness.app.output.is_error());
}
