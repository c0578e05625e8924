// TUI widget modules for each dashboard panel.

pub mod cart_table;
pub mod charts;
pub mod detail;
pub mod filter_bar;
pub mod quit_confirm;
pub mod status_bar;
pub mod summary_cards;
