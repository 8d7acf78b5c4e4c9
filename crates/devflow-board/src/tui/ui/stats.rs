/*
[INPUT]:  The task store
[OUTPUT]: Totals, completion gauge and priority / status breakdowns
[POS]:    TUI UI statistics panel rendering
[UPDATE]: 2026-10-16 Add statistics tab
*/

use devflow_board::presenter::Stats;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{BarChart, Block, Borders, Gauge, Paragraph};

use crate::tui::app::AppState;
use crate::tui::runtime::border_style;

pub(in crate::tui) fn draw_stats(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let stats = Stats::from_tasks(app.coordinator.store().tasks());
    let rows = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Min(6),
    ])
    .split(area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let summary = Paragraph::new(vec![
        Line::from(vec![Span::styled("Total:     ", bold), Span::raw(stats.total.to_string())]),
        Line::from(vec![
            Span::styled("Completed: ", bold),
            Span::styled(stats.completed.to_string(), Style::default().fg(Color::LightGreen)),
        ]),
        Line::from(vec![
            Span::styled("Pending:   ", bold),
            Span::styled(stats.pending.to_string(), Style::default().fg(Color::Yellow)),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Summary"),
    );
    frame.render_widget(summary, rows[0]);

    let percent = u16::try_from(stats.completion_rate.min(100)).unwrap_or(100);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Completion"),
        )
        .gauge_style(Style::default().fg(Color::LightGreen))
        .percent(percent);
    frame.render_widget(gauge, rows[1]);

    let charts = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    let by_priority: Vec<(&str, u64)> = stats
        .by_priority
        .iter()
        .map(|(priority, count)| (priority.as_str(), *count as u64))
        .collect();
    let priority_chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("By priority"),
        )
        .data(by_priority.as_slice())
        .bar_width(8)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan));
    frame.render_widget(priority_chart, charts[0]);

    let by_status: Vec<(&str, u64)> = stats
        .by_status
        .iter()
        .map(|(status, count)| (status.as_str(), *count as u64))
        .collect();
    let status_chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("By status"),
        )
        .data(by_status.as_slice())
        .bar_width(10)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::LightGreen));
    frame.render_widget(status_chart, charts[1]);
}
