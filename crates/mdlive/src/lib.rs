//! `mdlive`: a split-pane live markdown editor for the terminal.
//!
//! The editor on the left feeds [`mdlive_markdown::live::LivePreview`] on every keystroke; the
//! preview on the right shows the projected visual tree inside the selected frame. Printing writes
//! the tree as an HTML document and hands it to the browser's print dialog.
pub mod app;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod logging;
pub mod print;
pub mod sample;
pub mod ui;
