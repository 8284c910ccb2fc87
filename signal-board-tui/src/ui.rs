use crate::{
    poller::ConnectionStatus,
    sectors::{SECTORS, SectorView, group_by_sector},
    state::AppState,
    style::signal_style,
};
use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
};
use signal_board::{SignalState, TimeframeKey};

const PLACEHOLDER: &str = "-";

/// Render one frame. `scroll` is the index of the first sector table shown.
pub fn ui(f: &mut Frame, state: &AppState, scroll: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(f.area());

    render_status_bar(f, chunks[0], state);
    render_sectors(f, chunks[1], state, scroll);
}

/// Number of sector tables for the current snapshot, used to clamp scrolling.
pub fn sector_count(state: &AppState) -> usize {
    group_by_sector(SECTORS, &state.snapshot).len()
}

fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let (symbol, text, color) = match state.status {
        ConnectionStatus::Connected => ("●", "CONNECTED", Color::Rgb(0, 255, 127)),
        ConnectionStatus::Connecting => ("◌", "CONNECTING", Color::Rgb(255, 215, 0)),
        ConnectionStatus::Disconnected => ("○", "DISCONNECTED", Color::Rgb(255, 69, 58)),
    };

    let status = Span::styled(
        format!(" {} {} ", symbol, text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    );

    let last_poll = state
        .last_poll
        .map(|time| time.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    let time = Span::styled(
        format!(" ⏱  {} ", last_poll),
        Style::default().fg(Color::Rgb(100, 149, 237)),
    );

    let title = Span::styled(
        format!(" ◆ SIGNAL BOARD ◆ {} symbols ", state.snapshot.len()),
        Style::default()
            .fg(Color::Rgb(255, 215, 0))
            .add_modifier(Modifier::BOLD),
    );

    let mut spans = vec![status, time, title];
    if let Some(error) = &state.last_error {
        spans.push(Span::styled(
            format!(" {} ", error),
            Style::default().fg(Color::Rgb(255, 69, 58)),
        ));
    }
    spans.push(Span::styled(
        " [↑↓] Scroll [Q] Quit ",
        Style::default().fg(Color::Rgb(128, 128, 128)),
    ));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(138, 43, 226)))
        .style(Style::default().bg(Color::Rgb(18, 18, 28)));

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

/// Stack sector tables top to bottom from `scroll` until the area is full
fn render_sectors(f: &mut Frame, area: Rect, state: &AppState, scroll: usize) {
    let columns = state.columns();
    let views = group_by_sector(SECTORS, &state.snapshot);

    let mut remaining = area;
    for view in views.iter().skip(scroll) {
        if remaining.height < 4 {
            break;
        }

        // Borders and header take three lines
        let wanted = view.rows.len() as u16 + 3;
        let height = wanted.min(remaining.height);
        let chunk = Rect { height, ..remaining };

        render_sector(f, chunk, view, &columns);

        remaining = Rect {
            y: remaining.y + height,
            height: remaining.height - height,
            ..remaining
        };
    }
}

fn render_sector(f: &mut Frame, area: Rect, view: &SectorView<'_>, columns: &[TimeframeKey]) {
    let header_style = Style::default()
        .fg(Color::Rgb(255, 215, 0))
        .add_modifier(Modifier::BOLD);

    let header = Row::new(
        ["Ticker", "Price"]
            .into_iter()
            .map(str::to_string)
            .chain(columns.iter().map(|key| key.to_string()))
            .chain(std::iter::once("Updated".to_string()))
            .map(|title| Cell::from(title).style(header_style)),
    )
    .height(1);

    let rows = view.rows.iter().map(|(ticker, record)| {
        let ticker_cell = Cell::from(ticker.to_string()).style(
            Style::default()
                .fg(Color::Rgb(100, 200, 255))
                .add_modifier(Modifier::BOLD),
        );

        let Some(record) = record else {
            let placeholders = (0..columns.len() + 2).map(|_| {
                Cell::from(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
            });
            return Row::new(std::iter::once(ticker_cell).chain(placeholders));
        };

        let price = record
            .price
            .map(|price| price.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        let signals = columns.iter().map(|key| {
            let state = record.signal(key).cloned().unwrap_or(SignalState::NoSignal);
            Cell::from(state.to_string()).style(signal_style(&state))
        });

        let updated = record
            .updated_at
            .with_timezone(&Local)
            .format("%m-%d %H:%M:%S")
            .to_string();

        Row::new(
            std::iter::once(ticker_cell)
                .chain(std::iter::once(
                    Cell::from(price).style(Style::default().fg(Color::White)),
                ))
                .chain(signals)
                .chain(std::iter::once(
                    Cell::from(updated).style(Style::default().fg(Color::Rgb(128, 128, 150))),
                )),
        )
    });

    let widths = [Constraint::Length(8), Constraint::Length(10)]
        .into_iter()
        .chain(columns.iter().map(|_| Constraint::Min(10)))
        .chain(std::iter::once(Constraint::Length(15)))
        .collect::<Vec<_>>();

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" {} ", view.name))
            .border_style(Style::default().fg(Color::Rgb(100, 149, 237)))
            .style(Style::default().bg(Color::Rgb(15, 15, 25))),
    );

    f.render_widget(table, area);
}
