/*
[INPUT]:  AppState (store columns, selection, drag session), frame area
[OUTPUT]: Kanban columns and cards; droppable regions registered for this frame; ghost card
[POS]:    TUI UI board panel rendering
[UPDATE]: 2026-10-16 Register column and card regions every frame
[UPDATE]: 2026-10-17 Draw the dragged card as a ghost at the pointer
*/

use devflow_adapter::{Task, TaskPriority};
use devflow_board::collision;
use devflow_board::presenter::{column_title, columns};
use devflow_board::{Coordinator, DropTarget};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::tui::app::AppState;
use crate::tui::runtime::border_style;

pub(in crate::tui) const CARD_HEIGHT: u16 = 4;

pub(in crate::tui) fn draw_board(frame: &mut ratatui::Frame, area: Rect, app: &mut AppState) {
    app.droppables.clear();

    let areas = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let active = app.drag.active().cloned();
    let hovered = app.drag.hovered().cloned();
    let dragging = !app.drag.is_idle();

    for (column, column_area) in columns(app.coordinator.store()).into_iter().zip(areas.iter()) {
        let column_index = AppState::column_index(column.status);
        let focused = column.status == app.board_column;
        let hover_here = match &hovered {
            Some(DropTarget::Column(status)) => *status == column.status,
            Some(DropTarget::Card(id)) => column.tasks.iter().any(|task| &task.id == id),
            None => false,
        };

        let column_style = if dragging && hover_here {
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD)
        } else if focused {
            Style::default().fg(Color::Cyan)
        } else {
            border_style()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(column_style)
            .title(format!(
                "{} ({})",
                column_title(column.status),
                column.tasks.len()
            ));
        let inner = block.inner(*column_area);
        frame.render_widget(block, *column_area);
        app.droppables
            .register(DropTarget::Column(column.status), region_of(*column_area));

        if column.tasks.is_empty() {
            let hint = Paragraph::new(Span::styled(
                "Drop tasks here",
                Style::default().fg(Color::DarkGray),
            ));
            frame.render_widget(hint, inner);
            continue;
        }

        let visible = usize::from((inner.height / CARD_HEIGHT).max(1));
        let selected_row = app.board_rows[column_index];
        let offset = selected_row.saturating_sub(visible - 1);

        for (slot, (row, task)) in column
            .tasks
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .enumerate()
        {
            let top = inner.y + CARD_HEIGHT * slot as u16;
            let height = CARD_HEIGHT.min(inner.bottom().saturating_sub(top));
            if height == 0 {
                break;
            }
            let card_area = Rect::new(inner.x, top, inner.width, height);

            let style = if active.as_ref() == Some(&task.id) {
                CardStyle::Placeholder
            } else if dragging && hovered == Some(DropTarget::Card(task.id.clone())) {
                CardStyle::Hovered
            } else if focused && row == selected_row {
                CardStyle::Selected
            } else {
                CardStyle::Normal
            };
            draw_card(frame, card_area, task, &app.coordinator, style);
            app.droppables
                .register(DropTarget::Card(task.id.clone()), region_of(card_area));
        }
    }
}

/// Ghost of the dragged card, at the pointer for mouse drags, over the
/// hovered column for keyboard drags.
pub(in crate::tui) fn draw_drag_overlay(frame: &mut ratatui::Frame, bounds: Rect, app: &AppState) {
    let Some(task) = app.drag.overlay(app.coordinator.store()) else {
        return;
    };

    let region = match (app.grab, app.pointer) {
        (Some(grab), Some(pointer)) => Some(grab.rect_at(pointer)),
        _ => keyboard_ghost(app, task),
    };
    let Some(area) = region.and_then(|region| area_of(region, bounds)) else {
        return;
    };

    frame.render_widget(Clear, area);
    draw_card(frame, area, task, &app.coordinator, CardStyle::Ghost);
}

fn keyboard_ghost(app: &AppState, task: &Task) -> Option<collision::Rect> {
    match app.drag.hovered() {
        Some(DropTarget::Column(status)) => {
            let column = app.droppables.rect_of(&DropTarget::Column(*status))?;
            let card = app.droppables.rect_of(&DropTarget::Card(task.id.clone()));
            let height = card.map_or(u32::from(CARD_HEIGHT), |card| card.height);
            Some(collision::Rect::new(
                column.x + 2,
                column.y + 1,
                column.width.saturating_sub(4),
                height,
            ))
        }
        _ => {
            let card = app.droppables.rect_of(&DropTarget::Card(task.id.clone()))?;
            Some(collision::Rect::new(card.x + 2, card.y + 1, card.width, card.height))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardStyle {
    Normal,
    Selected,
    Hovered,
    /// The card's own slot while it is being dragged.
    Placeholder,
    Ghost,
}

fn draw_card(
    frame: &mut ratatui::Frame,
    area: Rect,
    task: &Task,
    coordinator: &Coordinator,
    style: CardStyle,
) {
    let (border, border_type) = match style {
        CardStyle::Normal => (Style::default().fg(Color::Gray), BorderType::Plain),
        CardStyle::Selected => (
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            BorderType::Thick,
        ),
        CardStyle::Hovered => (Style::default().fg(Color::LightGreen), BorderType::Plain),
        CardStyle::Placeholder => (Style::default().fg(Color::DarkGray), BorderType::Plain),
        CardStyle::Ghost => (
            Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
            BorderType::Double,
        ),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border);

    let mut title_style = Style::default().add_modifier(Modifier::BOLD);
    if task.is_completed() {
        title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
    }
    if style == CardStyle::Placeholder {
        title_style = Style::default().fg(Color::DarkGray);
    }

    let mut meta = vec![Span::styled(
        task.priority.as_str(),
        priority_style(task.priority),
    )];
    for tag in &task.tags {
        meta.push(Span::raw(" "));
        meta.push(Span::styled(
            format!("#{tag}"),
            Style::default().fg(Color::Blue),
        ));
    }
    if coordinator.is_syncing(&task.id) {
        meta.push(Span::styled(
            "  syncing",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let lines = vec![
        Line::from(Span::styled(task.title.as_str(), title_style)),
        Line::from(meta),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub(in crate::tui) fn priority_style(priority: TaskPriority) -> Style {
    match priority {
        TaskPriority::High => Style::default().fg(Color::LightRed),
        TaskPriority::Medium => Style::default().fg(Color::Yellow),
        TaskPriority::Low => Style::default().fg(Color::Green),
    }
}

/// Terminal cells to collision coordinates.
pub(in crate::tui) fn region_of(area: Rect) -> collision::Rect {
    collision::Rect::new(
        i32::from(area.x),
        i32::from(area.y),
        u32::from(area.width),
        u32::from(area.height),
    )
}

/// Clip a collision rectangle to `bounds`; `None` when nothing is left.
fn area_of(region: collision::Rect, bounds: Rect) -> Option<Rect> {
    let left = region.x.max(i32::from(bounds.x));
    let top = region.y.max(i32::from(bounds.y));
    let right = region
        .x
        .saturating_add_unsigned(region.width)
        .min(i32::from(bounds.right()));
    let bottom = region
        .y
        .saturating_add_unsigned(region.height)
        .min(i32::from(bounds.bottom()));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        u16::try_from(left).ok()?,
        u16::try_from(top).ok()?,
        u16::try_from(right - left).ok()?,
        u16::try_from(bottom - top).ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_mirror_terminal_cells() {
        let region = region_of(Rect::new(2, 3, 10, 4));
        assert_eq!(region, collision::Rect::new(2, 3, 10, 4));
        assert_eq!(area_of(region, Rect::new(0, 0, 80, 24)), Some(Rect::new(2, 3, 10, 4)));
    }

    #[test]
    fn ghost_is_clipped_to_the_frame() {
        let bounds = Rect::new(0, 0, 20, 10);
        assert_eq!(
            area_of(collision::Rect::new(-3, 8, 10, 4), bounds),
            Some(Rect::new(0, 8, 7, 2))
        );
        assert_eq!(area_of(collision::Rect::new(25, 2, 5, 5), bounds), None);
    }
}
