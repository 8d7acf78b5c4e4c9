/*
[INPUT]:  Tail of the in-memory log buffer
[OUTPUT]: Logs tab with warnings and errors highlighted
[POS]:    TUI UI logs panel rendering
[UPDATE]: 2026-10-16 Read only the visible tail of the buffer
*/

use std::sync::PoisonError;

use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::LogBufferHandle;
use crate::tui::runtime::border_style;

pub(in crate::tui) fn draw_logs(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    buffer: &LogBufferHandle,
) {
    let visible = area.height.saturating_sub(2) as usize;
    let tail = buffer
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .tail(visible);

    let text: Vec<Line> = tail
        .into_iter()
        .map(|line| {
            let style = level_style(&line);
            Line::styled(line, style)
        })
        .collect();

    let panel = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Logs"),
    );
    frame.render_widget(panel, area);
}

fn level_style(line: &str) -> Style {
    if line.contains(" ERROR ") {
        Style::default().fg(Color::Red)
    } else if line.contains(" WARN ") {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}
