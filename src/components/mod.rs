//! UI Components
//!
//! Reusable Leptos components.

mod admin_item_row;
mod bingo_board;
mod bingo_cell;
mod log_panel;
mod new_item_form;
mod rules;
mod status_screen;

pub use admin_item_row::AdminItemRow;
pub use bingo_board::BingoBoard;
pub use bingo_cell::BingoCell;
pub use log_panel::LogPanel;
pub use new_item_form::NewItemForm;
pub use rules::{RulesInline, RulesModal};
pub use status_screen::StatusScreen;
