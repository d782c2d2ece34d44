//! Markdown projection and preview for `mdlive`.
//!
//! ## Pipeline
//!
//! - [`content`]: pulldown-cmark events folded into a content tree, with the GFM and raw HTML
//!   extensions switchable through [`content::MarkdownOptions`].
//! - [`project`]: content tree to [`project::VisualTree`] through a [`project::NodeStrategy`].
//!   The default [`project::LabeledCode`] gives fenced code blocks a language header.
//! - [`layout`] and [`view::PreviewView`]: the visual tree as terminal rows.
//! - [`document::PrintDocument`]: the visual tree as a standalone HTML page for the browser's
//!   print dialog.
//!
//! [`live::LivePreview`] ties the editor store to the projector so every edit yields a fresh tree.
pub mod content;
pub mod document;
pub mod html;
pub mod layout;
pub mod live;
pub mod project;
pub mod view;

pub use content::MarkdownOptions;
pub use project::project;
