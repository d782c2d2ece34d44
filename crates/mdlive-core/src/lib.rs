//! `mdlive-core` provides the terminal building blocks behind the `mdlive` editor.
//!
//! Nothing in this crate knows about Markdown. It holds the input model, the editing surface and
//! the two state containers the app is built around:
//!
//! - [`store::EditorStore`]: the current document text as an immutable snapshot, replaced through
//!   [`store::EditorAction`]s.
//! - [`split::SplitState`]: the editor/preview width ratio and the divider drag state, advanced by
//!   [`split::DividerEvent`]s.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No async runtime: every update is applied synchronously before the next draw.
//! - Backend-agnostic input: widgets see [`input::InputEvent`]. Enable the `crossterm` feature for
//!   the conversion from crossterm events.
//!
//! Useful entry points:
//! - [`textarea::TextArea`]: multi-line input with common editing semantics.
//! - [`help::HelpBar`]: one-line key hints plus a status message.
//! - [`viewport::ViewportState`] and [`scroll::ScrollBindings`]: scrolling for read-only panes.
pub mod theme;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod render;
pub mod scroll;
pub mod viewport;

pub mod help;
pub mod input;
pub mod keymap;
pub mod split;
pub mod store;
pub mod textarea;
