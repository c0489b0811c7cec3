use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};

use aether::app::StudioApp;
use aether::config::Config;
use aether::model::language::Language;
use aether::services::logging;
use aether::services::oracle::{CannedOracle, GeminiOracle, Oracle};
use aether::view;

/// A terminal code studio
#[derive(Parser, Debug)]
#[command(name = "aether")]
#[command(about = "A terminal code studio with AI-simulated execution", long_about = None)]
#[command(version)]
struct Args {
    /// Initial language (javascript, python, typescript, html, css, sql, cpp)
    #[arg(long, value_name = "LANG")]
    language: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (default: system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Theme override (dark, light)
    #[arg(long, value_name = "THEME")]
    theme: Option<String>,

    /// Use canned replies instead of the live model API
    #[arg(long)]
    offline: bool,
}

/// Pick the oracle: live Gemini when a key is available, canned otherwise.
fn build_oracle(args: &Args, config: &Config) -> Arc<dyn Oracle> {
    if args.offline {
        tracing::info!("Offline mode: using canned oracle");
        return Arc::new(CannedOracle);
    }
    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.is_empty() => Arc::new(GeminiOracle::new(
            config.api_base.clone(),
            config.model_id.clone(),
            key,
            config.request_timeout(),
        )),
        _ => {
            tracing::warn!(
                "{} not set; falling back to canned oracle",
                config.api_key_env
            );
            Arc::new(CannedOracle)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_path);
    logging::init_global(&log_file)?;
    tracing::info!("Studio starting");

    let mut config =
        Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(theme) = &args.theme {
        config.theme = theme.clone();
    }

    let language = args
        .language
        .as_deref()
        .unwrap_or(&config.default_language)
        .parse::<Language>()
        .map_err(anyhow::Error::msg)?;

    let oracle = build_oracle(&args, &config);
    let mut app = StudioApp::new(&config, oracle, language);

    let mut terminal = ratatui::init();
    let result = run_event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn run_event_loop(terminal: &mut ratatui::DefaultTerminal, app: &mut StudioApp) -> Result<()> {
    loop {
        terminal.draw(|frame| view::render(frame, app))?;
        // Settle point: the frame above shows the committed content, so a
        // caret scheduled by tab insertion or a fix apply lands now.
        app.settle();

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Resize(..) => {}
                _ => {}
            }
        }

        app.drain_async();

        if app.should_quit {
            tracing::info!("Studio exiting");
            return Ok(());
        }
    }
}
