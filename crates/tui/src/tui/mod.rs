use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::app::{Dispatcher, Message, Route};
use crate::commands::runtime;
use crate::core::TaskApi;

mod app;
mod buffer;
mod constants;
pub(crate) mod helpers;

use app::App;
use constants::{INPUT_SLICE, TICK_RATE};

type Backend = CrosstermBackend<Stdout>;

pub fn run(api: Arc<dyn TaskApi>, route: Route) -> Result<()> {
    let runtime = runtime()?;
    let (tx, rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(api, tx);

    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
    terminal.hide_cursor().context("failed to hide cursor")?;

    tracing::info!(route = %route, "terminal UI started");
    let mut app = App::new(route);
    let result = run_app(&mut terminal, &mut app, &runtime, &dispatcher, rx);

    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    result
}

fn run_app(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    runtime: &Runtime,
    dispatcher: &Dispatcher,
    mut rx: UnboundedReceiver<Message>,
) -> Result<()> {
    let _guard = runtime.enter();
    let mut last_tick = Instant::now();
    loop {
        for request in app.take_requests() {
            dispatcher.dispatch(request);
        }

        terminal.draw(|f| app.draw(f))?;
        if app.should_quit() {
            break;
        }

        if event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Resize(_, _) => {}
                _ => {}
            }
            continue;
        }

        // Let in-flight requests progress until one completes or the tick elapses.
        let timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO)
            .min(INPUT_SLICE);
        if let Ok(Some(message)) = runtime.block_on(tokio::time::timeout(timeout, rx.recv())) {
            app.apply(message);
            while let Ok(message) = rx.try_recv() {
                app.apply(message);
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
