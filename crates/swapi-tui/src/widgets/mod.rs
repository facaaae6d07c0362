pub mod field_input;
pub mod pane_chrome;
pub mod status_bar;
pub mod toast;
