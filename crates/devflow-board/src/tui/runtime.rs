/*
[INPUT]:  Coordinator, UI settings, log buffer, shutdown token
[OUTPUT]: Ratatui-based TUI run loop, rendering entry point, and shared styles
[POS]:    TUI runtime loop and shared helpers
[UPDATE]: When changing TUI layout, keybindings, or runtime controls
[UPDATE]: 2026-10-16 Apply remote outcomes inside the select loop
[UPDATE]: 2026-10-18 Wait briefly for in-flight writes on quit
*/

use std::time::Duration;

use anyhow::Result;
use devflow_board::Coordinator;
use devflow_board::config::UiConfig;
use devflow_board::notice::NoticeLevel;
use ratatui::crossterm::event::Event as CrosstermEvent;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::LogBufferHandle;
use super::app::{ActiveModal, AppState, Tab};
use super::events::{handle_event, handle_settled};
use super::terminal::TerminalGuard;
use super::ui::modal::draw_modal;
use super::ui::*;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

enum UiEvent {
    Input(CrosstermEvent),
}

/// Run the board until the user quits or `shutdown` fires.
pub async fn run_tui(
    coordinator: Coordinator,
    ui: &UiConfig,
    log_buffer: LogBufferHandle,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut terminal = TerminalGuard::new()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let input_shutdown = CancellationToken::new();
    let input_shutdown_clone = input_shutdown.clone();

    tokio::task::spawn_blocking(move || {
        while !input_shutdown_clone.is_cancelled() {
            if ratatui::crossterm::event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                if let Ok(event) = ratatui::crossterm::event::read() {
                    let _ = event_tx.send(UiEvent::Input(event));
                }
            }
        }
    });

    let mut app = AppState::new(coordinator, log_buffer, Tab::from(ui.default_view));
    let mut revision = app.coordinator.subscribe();
    app.coordinator.request_refresh();

    let mut tick = tokio::time::interval(Duration::from_millis(ui.tick_ms));
    let mut should_quit = false;

    while !should_quit {
        tokio::select! {
            _ = tick.tick() => {}
            _ = shutdown.cancelled() => {
                info!("shutdown requested");
                should_quit = true;
            }
            Ok(()) = revision.changed() => {
                app.clamp_selection();
            }
            Some(outcome) = app.coordinator.recv_outcome() => {
                let settled = app.coordinator.settle(outcome);
                handle_settled(&mut app, &settled);
            }
            maybe_event = event_rx.recv() => {
                match maybe_event {
                    Some(UiEvent::Input(event)) => {
                        if handle_event(&mut app, event) {
                            should_quit = true;
                        }
                    }
                    None => should_quit = true,
                }
            }
        }

        terminal.draw(|frame| draw_ui(frame, &mut app))?;
    }

    input_shutdown.cancel();
    drop(terminal);

    let outstanding = app.coordinator.outstanding();
    if outstanding > 0 {
        info!(outstanding, "waiting for in-flight writes");
        match tokio::time::timeout(SHUTDOWN_GRACE, app.coordinator.drain()).await {
            Ok(settled) => info!(settled = settled.len(), "in-flight writes settled"),
            Err(_) => warn!(
                outstanding = app.coordinator.outstanding(),
                "gave up waiting for in-flight writes"
            ),
        }
    }
    Ok(())
}

fn draw_ui(frame: &mut ratatui::Frame, app: &mut AppState) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(4),
        ])
        .split(area);

    draw_tabs(frame, layout[0], app.current_tab);

    match app.current_tab {
        Tab::Board => draw_board(frame, layout[1], app),
        Tab::List => draw_task_list(frame, layout[1], app),
        Tab::Stats => draw_stats(frame, layout[1], app),
        Tab::Logs => draw_logs(frame, layout[1], &app.log_buffer),
    }

    draw_footer(frame, layout[2], app);

    if app.current_tab == Tab::Board {
        draw_drag_overlay(frame, layout[1], app);
    }

    if let Some(active_modal) = app.active_modal.as_ref() {
        let modal = match active_modal {
            ActiveModal::TaskForm(modal) => modal.to_modal(),
            ActiveModal::ConfirmDelete(modal) => modal.to_modal(),
        };
        let modal_area = centered_rect(area, 60, 60);
        draw_modal(frame, modal_area, &modal);
    }
}

fn draw_footer(frame: &mut ratatui::Frame, area: ratatui::layout::Rect, app: &AppState) {
    let key_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let key = |label: &'static str, action: &'static str| {
        [Span::styled(label, key_style), Span::raw(action)]
    };

    let hotkeys: Vec<Span> = if !app.drag.is_idle() {
        [
            key("[Left/Right]", " Column  "),
            key("[Space/Enter]", " Drop  "),
            key("[Esc]", " Cancel"),
        ]
        .into_iter()
        .flatten()
        .collect()
    } else {
        [
            key("[Tab/1-4]", " Views  "),
            key("[Space]", " Pick up  "),
            key("[n]", " New  "),
            key("[e]", " Edit  "),
            key("[d]", " Delete  "),
            key("[t]", " Toggle  "),
            key("[f]", " Filter  "),
            key("[r]", " Refresh  "),
            key("[x]", " Dismiss  "),
            key("[q]", " Quit"),
        ]
        .into_iter()
        .flatten()
        .collect()
    };

    let status = match app.coordinator.notices().latest() {
        Some(notice) => {
            let style = match notice.level {
                NoticeLevel::Error => Style::default().fg(Color::LightRed),
                NoticeLevel::Info => Style::default().fg(Color::LightGreen),
            };
            let count = app.coordinator.notices().len();
            Line::from(vec![
                Span::styled(notice.message.clone(), style),
                Span::styled(
                    format!("  ({count}, [x] dismiss)"),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        None => Line::from(format!("Status: {}", app.status_message)),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title("Hotkeys");
    let text = Text::from(vec![Line::from(hotkeys), status]);
    let widget = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

pub(crate) fn border_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn centered_rect(
    area: ratatui::layout::Rect,
    percent_x: u16,
    percent_y: u16,
) -> ratatui::layout::Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
