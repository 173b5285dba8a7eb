mod action;
mod api;
mod app;
mod config;
mod cursor;
mod debounce;
mod error;
mod event;
mod source;
mod tui;
mod types;
mod ui;

use std::panic;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::api::CharacterApi;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::tui::EventHandler;

#[derive(Parser, Debug)]
#[command(
    name = "plumbus",
    about = "A TUI for browsing Rick and Morty characters",
    version
)]
struct Cli {
    /// Character directory endpoint to browse
    #[arg(long)]
    base_url: Option<String>,

    /// Open this character's detail view on startup
    #[arg(long)]
    character: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load();
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    // Run the application
    let result = run(config, cli.character).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(config: Config, character: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize terminal
    let mut terminal = tui::init()?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app state
    let api = Arc::new(CharacterApi::new(config.api.base_url.clone()));
    let mut app = App::new(api, &config, action_tx.clone());

    // Jump straight to a character requested on the command line
    if let Some(id) = character {
        action_tx.send(Action::ShowCharacter(id))?;
    }

    // Create event handler
    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    // Main loop
    loop {
        let deadline = app.debouncer.deadline();

        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
            // Wake at the debounce deadline and commit the pending query.
            _ = sleep_until(deadline), if deadline.is_some() => {
                if let Some(query) = app.debouncer.fire(Instant::now()) {
                    action_tx.send(Action::CommitQuery(query))?;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending::<()>().await,
    }
}
