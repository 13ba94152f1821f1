mod api;
mod app;
mod cli;
mod clipboard;
mod compose;
mod event;
mod filter;
mod forward;
mod help;
mod identity;
mod keys;
mod logging;
mod notifications;
mod poller;
mod settings;
mod storage;
mod theme;
mod threads;
mod time;
mod tui;
mod views;
mod widgets;
mod wizard;

#[cfg(test)]
mod test_utils;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::Frame;
use tracing::info;

use api::{ClientConfig, GroveClient};
use app::{App, AsyncResult};
use cli::{Cli, Commands};
use clipboard::SystemClipboard;
use event::Event;
use poller::NotificationPoller;
use settings::Settings;
use storage::{Storage, StorageLocation};
use time::{format_relative, system_clock};
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = settings::config_dir(cli.config_dir.as_ref())
        .context("Could not determine config directory, pass --config-dir")?;
    let settings = Settings::load(&settings::settings_path(&config_dir))?;

    let (_log_guard, log_file) = logging::init(&config_dir, cli.verbose)?;
    if cli.verbose {
        eprintln!("Logging to {}", log_file.display());
    }

    let db_path = settings::db_path(&config_dir);
    let storage = Storage::open(StorageLocation::Path(db_path.clone()))
        .with_context(|| format!("Failed to open {}", db_path.display()))?;
    let anonymous_id = identity::load_or_create(&storage)
        .await
        .context("Failed to load anonymous identity")?;

    let env_base = std::env::var(settings::API_BASE_ENV).ok();
    let api_base = settings.resolve_api_base(cli.api_base.as_deref(), env_base.as_deref());
    info!(api_base = %api_base, id = %anonymous_id, "starting");

    let mut config = ClientConfig::new(api_base, anonymous_id);
    config.per_page = settings.per_page();
    let client = GroveClient::new(config);

    match cli.command {
        Some(Commands::Stories { category, query }) => {
            print_stories(&client, category, query.as_deref().unwrap_or("")).await
        }
        Some(Commands::Notifications) => print_notifications(&client).await,
        Some(Commands::Whoami) => {
            println!("id:       {}", client.anonymous_id());
            println!("api:      {}", client.base_url());
            println!("database: {}", db_path.display());
            Ok(())
        }
        None => run_tui(client, &settings).await,
    }
}

async fn print_stories(client: &GroveClient, category: Option<u64>, query: &str) -> Result<()> {
    let stories = client
        .fetch_stories()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let now = system_clock().now();
    for story in filter::filter_stories(&stories, category, query) {
        let counts = story.counts();
        let category = story
            .category
            .as_ref()
            .map_or("-", |c| c.name.as_str());
        println!(
            "{:>6}  {}  [{}] {} · {}  ♥ {} 🤗 {} ✨ {}  💬 {}",
            story.id,
            story.title,
            category,
            story.author(),
            format_relative(story.created_at, now),
            counts.heart,
            counts.hug,
            counts.strength,
            story.response_count,
        );
    }
    Ok(())
}

async fn print_notifications(client: &GroveClient) -> Result<()> {
    let feed = client
        .fetch_notifications()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let now = system_clock().now();
    println!("{} unread", feed.unread_count);
    for n in &feed.notifications {
        let marker = if n.is_read { " " } else { "●" };
        println!(
            "{marker} {}  ({})",
            n.message,
            format_relative(n.created_at, now)
        );
    }
    Ok(())
}

async fn run_tui(client: GroveClient, settings: &Settings) -> Result<()> {
    let mut terminal = tui::init()?;
    let mut app = App::new(client, Box::new(SystemClipboard::new()));
    let mut events = EventHandler::new(250);
    // The first tick fires immediately and covers the startup fetch.
    let poller = NotificationPoller::spawn(
        settings.poll_interval(),
        app.result_tx.clone(),
        AsyncResult::PollTick,
    );

    app.load_initial_data();

    let outcome = event_loop(&mut terminal, &mut app, &mut events).await;

    poller.shutdown().await;
    tui::restore()?;
    outcome
}

async fn event_loop(
    terminal: &mut tui::Tui,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(app, frame))?;

        while let Ok(result) = app.result_rx.try_recv() {
            app.handle_async_result(result);
        }

        if app.should_quit {
            return Ok(());
        }

        match events.next().await? {
            Event::Key(key) => {
                if let Some(msg) = keys::handle_key(key, app) {
                    app.update(msg);
                }
            }
            Event::Tick | Event::Resize => {}
        }
    }
}

fn render(app: &App, frame: &mut Frame) {
    use ratatui::layout::{Constraint, Layout};

    let area = frame.area();

    let (main_area, debug_area) = if app.debug.visible {
        let chunks = Layout::vertical([
            Constraint::Min(0),     // Main content
            Constraint::Length(10), // Debug pane
        ])
        .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    views::feed::render(frame, app, main_area);
    views::notifications::render(frame, app, main_area);

    if let Some(debug_area) = debug_area {
        views::debug::render(frame, app, debug_area);
    }

    views::compose::render(frame, app, area);
    views::wizard::render(frame, app, area);
    views::forward::render(frame, app, area);
    views::help_overlay::render(frame, app, area);
    views::notice::render(frame, app, area);
}
