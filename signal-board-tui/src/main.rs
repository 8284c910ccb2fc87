mod poller;
mod sectors;
mod state;
mod style;
mod ui;

use crate::{
    poller::{PollerConfig, spawn_poller},
    state::AppState,
    ui::{sector_count, ui},
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::Mutex;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = PollerConfig::from_env();

    // Create app state and start polling before taking over the terminal
    let state = Arc::new(Mutex::new(AppState::new()));
    let poller = spawn_poller(config, Arc::clone(&state))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run TUI
    let res = run_app(&mut terminal, state).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    poller.abort();

    res.map_err(Into::into)
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: Arc<Mutex<AppState>>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = std::time::Instant::now();
    let mut scroll = 0usize;

    loop {
        let state_snapshot = {
            let s = state.lock().await;
            s.clone()
        };

        // Snapshot may shrink between polls
        let sectors = sector_count(&state_snapshot);
        scroll = scroll.min(sectors.saturating_sub(1));

        terminal.draw(|f| ui(f, &state_snapshot, scroll))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Down => scroll = (scroll + 1).min(sectors.saturating_sub(1)),
                        KeyCode::Up => scroll = scroll.saturating_sub(1),
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = std::time::Instant::now();
        }
    }
}
