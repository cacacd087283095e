mod app;
mod ui;

use crate::app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use pairwatch::{BinanceConfig, BinanceRestClient, WatchEvents, Watcher, WatcherConfig};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    fs::File,
    io,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tracing::info;

const DEFAULT_LOG_FILE: &str = "pairwatch.log";
const FRAME_RATE: Duration = Duration::from_millis(50);
const INPUT_POLL: Duration = Duration::from_millis(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let client = BinanceRestClient::new(BinanceConfig::from_env())?;
    let (watcher, events) = Watcher::new(Arc::new(client), WatcherConfig::default());
    watcher.load_catalog();
    let mut app = App::new(watcher);

    // Leave the terminal usable if anything panics while the alternate screen is up
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = restore_terminal();
        default_hook(panic);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app, events).await;

    app.watcher.shutdown();

    // Restore terminal
    restore_terminal()?;
    terminal.show_cursor()?;

    info!("pairwatch stopped");
    res.map_err(Into::into)
}

async fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut events: WatchEvents,
) -> io::Result<()> {
    let mut last_draw: Option<Instant> = None;

    while !app.should_quit {
        while let Ok(event) = events.try_recv() {
            app.watcher.handle(event);
        }

        if event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
            // Drain queued input before the next frame
            continue;
        }

        if last_draw.is_none_or(|at| at.elapsed() >= FRAME_RATE) {
            terminal.draw(|f| ui::render(f, app))?;
            last_draw = Some(Instant::now());
        }

        tokio::time::sleep(INPUT_POLL).await;
    }

    Ok(())
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
}

// Log to a file so output does not corrupt the terminal UI.
fn init_logging() -> io::Result<()> {
    let path = std::env::var("PAIRWATCH_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let file = File::create(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
