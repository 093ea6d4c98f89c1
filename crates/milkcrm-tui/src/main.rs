//! MilkCRM TUI - terminal admin console for the dairy-delivery CRM
//!
//! Built with Ratatui and crossterm.

mod app;
mod config;
mod handlers;
mod tasks;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use milkcrm_core::{RestClient, Session};
use ratatui::prelude::*;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

use app::App;
use config::Config;
use tasks::{Completion, Remote};

/// Environment variable holding the backend session token.
const TOKEN_VAR: &str = "MILKCRM_TOKEN";

/// MilkCRM - terminal admin console for dairy deliveries
#[derive(Parser, Debug)]
#[command(name = "milkcrm")]
#[command(about = "A terminal admin console for the milkcrm delivery backend")]
struct Args {
    /// Path to a custom config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend URL, overriding the config file
    #[arg(long)]
    api_url: Option<String>,

    /// Where to write logs (default: <data dir>/milkcrm/milkcrm.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_logging(args.log_file.clone())?;
    tracing::info!("Starting milkcrm");

    let mut config = Config::load(args.config)?;
    if let Some(url) = args.api_url.as_deref() {
        config.set_api_base_url(url);
    }

    let session = match std::env::var(TOKEN_VAR) {
        Ok(token) => Session::bearer(token),
        Err(_) => {
            tracing::warn!("{} is not set; requests are sent without a session", TOKEN_VAR);
            Session::anonymous()
        }
    };
    let client = RestClient::new(&config.api_base_url, session, config.request_timeout())
        .context("Failed to create the backend client")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let (remote, mut completions) = Remote::new(client);
    let mut app = App::new(remote, config.page_size);

    // Main loop; remote calls run as local tasks on this thread
    let local = tokio::task::LocalSet::new();
    let result = local.block_on(&runtime, run_app(&mut terminal, &mut app, &mut completions));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!("Exited with error: {:#}", e);
        eprintln!("Error: {e:#}");
    }

    Ok(())
}

fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => dirs::data_dir()
            .context("Could not determine data directory")?
            .join("milkcrm")
            .join("milkcrm.log"),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    // The terminal is in raw mode, so logs go to a file
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("milkcrm=info".parse()?))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    completions: &mut UnboundedReceiver<Completion>,
) -> Result<()> {
    app.bootstrap();

    loop {
        while let Ok(apply) = completions.try_recv() {
            apply(app);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handlers::handle_key(app, key) {
                    break;
                }
            }
            continue;
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }

        // Let spawned requests progress while waiting for input
        tokio::select! {
            Some(apply) = completions.recv() => apply(app),
            _ = tokio::time::sleep(Duration::from_millis(100)) => {}
        }
    }

    Ok(())
}
