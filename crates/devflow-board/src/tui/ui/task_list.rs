/*
[INPUT]:  AppState filter, list selection, and the store
[OUTPUT]: Filtered task list and selected-task details rendered into Ratatui frame
[POS]:    TUI UI list view rendering
[UPDATE]: 2026-10-16 Filtered task list with detail pane and calendar link
*/

use devflow_adapter::Task;
use devflow_board::calendar::calendar_link;
use devflow_board::presenter::filtered;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use super::board::priority_style;
use crate::tui::app::AppState;
use crate::tui::runtime::border_style;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub(in crate::tui) fn draw_task_list(frame: &mut ratatui::Frame, area: Rect, app: &mut AppState) {
    let panes = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let tasks = filtered(app.coordinator.store(), app.filter);
    let items = if tasks.is_empty() {
        vec![ListItem::new("No tasks found")]
    } else {
        tasks
            .iter()
            .map(|task| {
                let check = if task.is_completed() { "[x]" } else { "[ ]" };
                let mut spans = vec![
                    Span::raw(format!("{check} ")),
                    Span::raw(task.title.clone()),
                    Span::raw("  "),
                    Span::styled(task.priority.as_str(), priority_style(task.priority)),
                ];
                if app.coordinator.is_syncing(&task.id) {
                    spans.push(Span::styled("  syncing", Style::default().fg(Color::DarkGray)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(format!("Tasks [{}] ({})", app.filter, tasks.len())),
        )
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let selected = app
        .list_state
        .selected()
        .and_then(|index| tasks.get(index).copied());
    let details = details(selected);
    frame.render_stateful_widget(list, panes[0], &mut app.list_state);

    let detail_widget = Paragraph::new(details)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Details"),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(detail_widget, panes[1]);
}

fn details(task: Option<&Task>) -> Vec<Line<'static>> {
    let Some(task) = task else {
        return vec![Line::from("Nothing selected")];
    };

    let label = |name: &str| Span::styled(format!("{name}: "), Style::default().add_modifier(Modifier::BOLD));
    let when = |value: Option<chrono::DateTime<chrono::Utc>>| {
        value
            .map(|instant| instant.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let tags = if task.tags.is_empty() {
        "-".to_string()
    } else {
        task.tags.iter().cloned().collect::<Vec<_>>().join(", ")
    };

    let mut lines = vec![
        Line::from(vec![label("Title"), Span::raw(task.title.clone())]),
        Line::from(vec![label("Status"), Span::raw(task.status.to_string())]),
        Line::from(vec![
            label("Priority"),
            Span::styled(task.priority.to_string(), priority_style(task.priority)),
        ]),
        Line::from(vec![label("Created"), Span::raw(task.created_at.format(DATE_FORMAT).to_string())]),
        Line::from(vec![label("Start"), Span::raw(when(task.start_date))]),
        Line::from(vec![label("End"), Span::raw(when(task.end_date))]),
        Line::from(vec![label("Tags"), Span::raw(tags)]),
        Line::default(),
        Line::from(if task.description.is_empty() {
            "(no description)".to_string()
        } else {
            task.description.clone()
        }),
    ];

    if let Some(link) = calendar_link(task) {
        lines.push(Line::default());
        lines.push(Line::from(label("Add to calendar")));
        lines.push(Line::from(Span::styled(
            link.to_string(),
            Style::default().fg(Color::Blue),
        )));
    }
    lines
}
