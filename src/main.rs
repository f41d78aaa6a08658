use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;

use hookwatch::action::Action;
use hookwatch::app::{App, Effect, Overlay, View};
use hookwatch::client::{EventsClient, HttpEventsClient};
use hookwatch::config::{Cli, Settings};
use hookwatch::event::{key_to_action, AppEvent, RawEventHandler};
use hookwatch::poller::{Poller, PollerHandle};
use hookwatch::render::{ActionRenderer, TextRenderer};
use hookwatch::widgets;
use hookwatch::worker::{DetailHandle, DetailRequest, DetailWorker};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;

    // Set up logging; stdout belongs to the UI
    if let Some(ref log_file) = settings.log_file {
        let file = std::fs::File::create(log_file)?;
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let client: Arc<dyn EventsClient> = Arc::new(HttpEventsClient::new(
        &settings.base_url,
        settings.request_timeout,
    )?);

    if settings.plain {
        run_plain(client, settings).await
    } else {
        run_tui(client, settings).await
    }
}

async fn run_plain(client: Arc<dyn EventsClient>, settings: Settings) -> Result<()> {
    let poller = Poller::new(client, settings.poll_interval)
        .start(TextRenderer::new(std::io::stdout()));

    tokio::signal::ctrl_c().await?;
    // A hung request is not waited for.
    poller.stop();
    Ok(())
}

async fn run_tui(client: Arc<dyn EventsClient>, settings: Settings) -> Result<()> {
    let mut app = App::new(settings.base_url.clone(), settings.poll_interval);

    // Set up channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let (worker, detail_handle) = DetailWorker::new(client.clone(), action_tx.clone());
    tokio::spawn(worker.run());

    // Set up terminal
    let mut terminal = hookwatch::tui::init()?;
    let mut events = RawEventHandler::new(Duration::from_millis(250));

    // First poll goes out as soon as the screen is up
    let poller = Poller::new(client, settings.poll_interval).start(ActionRenderer::new(action_tx));

    // Main loop
    loop {
        terminal.draw(|frame| render(&mut app, frame))?;

        tokio::select! {
            Some(event) = events.next() => {
                let action = match event {
                    AppEvent::Key(key) => {
                        key_to_action(key, &app.view, &app.input_mode, &app.overlay)
                    }
                    AppEvent::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    let effects = app.update(action);
                    handle_effects(effects, &poller, &detail_handle);
                }
            }
            Some(action) = action_rx.recv() => {
                let effects = app.update(action);
                handle_effects(effects, &poller, &detail_handle);
            }
            else => break,
        }

        if app.should_quit {
            break;
        }
    }

    poller.stop();

    // Restore terminal
    hookwatch::tui::restore()?;

    Ok(())
}

fn render(app: &mut App, frame: &mut ratatui::Frame) {
    let area = frame.area();

    frame.render_widget(
        ratatui::widgets::Block::default().style(
            ratatui::style::Style::default().bg(hookwatch::theme::BG_DARK),
        ),
        area,
    );

    let layout = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Fill(1),   // Content
        Constraint::Length(1), // Footer
    ])
    .split(area);

    widgets::header::render(app, frame, layout[0]);

    match app.view {
        View::EventList => widgets::event_list::render(app, frame, layout[1]),
        View::EventDetail => widgets::event_detail::render(app, frame, layout[1]),
    }

    widgets::footer::render(app, frame, layout[2]);

    if app.overlay == Overlay::Help {
        widgets::help_overlay::render(&app.view, frame, area);
    }

    widgets::error_toast::render(app, frame, area);
}

fn handle_effects(
    effects: Vec<Effect>,
    poller: &PollerHandle<ActionRenderer>,
    detail: &DetailHandle,
) {
    for effect in effects {
        match effect {
            Effect::RefreshNow => poller.refresh(),
            Effect::LoadEventDetail(request_id) => {
                detail.send(DetailRequest::LoadEvent { request_id });
            }
            Effect::Quit => {}
        }
    }
}
