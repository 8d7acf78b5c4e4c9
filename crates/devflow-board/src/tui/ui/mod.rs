/*
[INPUT]:  TUI app state and the coordinator's store for UI components
[OUTPUT]: UI component render functions and module exports
[POS]:    TUI UI module root
[UPDATE]: 2026-10-16 Board, list, stats and logs panels
*/

mod board;
mod layout;
mod logs;
mod stats;
mod task_list;

pub mod modal;

pub(in crate::tui) use board::{draw_board, draw_drag_overlay, region_of};
pub(in crate::tui) use layout::draw_tabs;
pub(in crate::tui) use logs::draw_logs;
pub(in crate::tui) use stats::draw_stats;
pub(in crate::tui) use task_list::draw_task_list;
