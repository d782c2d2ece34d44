//! Self-contained HTML documents for the host print dialog.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::project::VisualNode;
use crate::project::VisualTree;

/// Cosmetic page frame for the preview and the print document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameSize {
    #[default]
    #[serde(alias = "A4")]
    A4,
    #[serde(alias = "Letter")]
    Letter,
    #[serde(rename = "full", alias = "full-width", alias = "fullwidth")]
    FullWidth,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown frame size `{0}` (expected a4, letter or full)")]
pub struct ParseFrameSizeError(String);

impl FrameSize {
    pub const ALL: [FrameSize; 3] = [FrameSize::A4, FrameSize::Letter, FrameSize::FullWidth];

    pub fn class_name(self) -> &'static str {
        match self {
            FrameSize::A4 => "frame-a4",
            FrameSize::Letter => "frame-letter",
            FrameSize::FullWidth => "frame-full",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FrameSize::A4 => "A4",
            FrameSize::Letter => "Letter",
            FrameSize::FullWidth => "Full Width",
        }
    }

    /// Widest preview line in terminal columns. `None` uses the whole pane.
    pub fn max_columns(self) -> Option<u16> {
        match self {
            FrameSize::A4 => Some(78),
            FrameSize::Letter => Some(82),
            FrameSize::FullWidth => None,
        }
    }

    fn css_max_width(self) -> &'static str {
        match self {
            FrameSize::A4 => "210mm",
            FrameSize::Letter => "8.5in",
            FrameSize::FullWidth => "none",
        }
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FrameSize::A4 => "a4",
            FrameSize::Letter => "letter",
            FrameSize::FullWidth => "full",
        })
    }
}

impl FromStr for FrameSize {
    type Err = ParseFrameSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(FrameSize::A4),
            "letter" => Ok(FrameSize::Letter),
            "full" | "full-width" | "fullwidth" => Ok(FrameSize::FullWidth),
            _ => Err(ParseFrameSizeError(s.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PrintDocument {
    title: String,
    body: String,
    frame: FrameSize,
}

impl PrintDocument {
    pub fn new(tree: &VisualTree, frame: FrameSize) -> Self {
        let title = first_heading(tree).unwrap_or_else(|| "mdlive".to_string());
        Self {
            title,
            body: tree.to_html(),
            frame,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    /// The complete document. The browser's print dialog opens once it has loaded.
    pub fn to_html(&self) -> String {
        let mut title = String::new();
        crate::html::escape_text(&self.title, &mut title);
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div id="print-content" class="preview {frame}">
{body}
    </div>
    <script>window.addEventListener("load", function () {{ window.print(); }});</script>
</body>
</html>
"#,
            css = generate_css(self.frame),
            frame = self.frame.class_name(),
            body = self.body,
        )
    }
}

fn first_heading(tree: &VisualTree) -> Option<String> {
    tree.nodes().iter().find_map(|n| match n {
        VisualNode::Element(el) if matches!(el.tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
            let text = n.text_content();
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        _ => None,
    })
}

fn generate_css(frame: FrameSize) -> String {
    format!(
        r#"
* {{
    box-sizing: border-box;
}}

body {{
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
    font-size: 14px;
    line-height: 1.6;
    color: #24292e;
    background: #ffffff;
    margin: 0;
    padding: 20px;
}}

.preview {{
    margin: 0 auto;
}}

.{frame_class} {{
    max-width: {max_width};
}}

h1, h2 {{
    border-bottom: 1px solid #e1e4e8;
    padding-bottom: 0.3em;
}}

code {{
    font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace;
    font-size: 0.9em;
    background: #f6f8fa;
    padding: 0.2em 0.4em;
    border-radius: 3px;
}}

pre code {{
    background: none;
    padding: 0;
}}

pre {{
    background: #f6f8fa;
    padding: 12px 16px;
    overflow: auto;
    border-radius: 6px;
}}

.code-block-wrapper {{
    margin: 16px 0;
    border: 1px solid #e1e4e8;
    border-radius: 6px;
    overflow: hidden;
}}

.code-block-header {{
    background: #eaeef2;
    padding: 4px 12px;
    border-bottom: 1px solid #e1e4e8;
}}

.language-label {{
    font-size: 0.75em;
    font-weight: 600;
    text-transform: uppercase;
    color: #57606a;
}}

.code-block-wrapper pre.code-block {{
    margin: 0;
    border-radius: 0;
}}

blockquote {{
    margin: 0;
    padding: 0 1em;
    color: #6a737d;
    border-left: 4px solid #dfe2e5;
}}

table {{
    border-collapse: collapse;
}}

th, td {{
    border: 1px solid #dfe2e5;
    padding: 6px 13px;
}}

hr {{
    border: 0;
    border-top: 1px solid #e1e4e8;
}}

img {{
    max-width: 100%;
}}

@media print {{
    body {{
        padding: 0;
    }}

    pre, .code-block-wrapper, table {{
        page-break-inside: avoid;
    }}
}}
"#,
        frame_class = frame.class_name(),
        max_width = frame.css_max_width(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MarkdownOptions;
    use crate::project;

    #[test]
    fn frame_size_parses_and_displays() {
        for frame in FrameSize::ALL {
            assert_eq!(frame.to_string().parse::<FrameSize>(), Ok(frame));
        }
        assert_eq!("Full-Width".parse::<FrameSize>(), Ok(FrameSize::FullWidth));
        assert!("a5".parse::<FrameSize>().is_err());
    }

    #[test]
    fn document_wraps_content_with_frame_and_print_call() {
        let tree = project::project("# Report & Notes\n\nbody", &MarkdownOptions::default());
        let doc = PrintDocument::new(&tree, FrameSize::Letter);
        assert_eq!(doc.title(), "Report & Notes");
        let html = doc.to_html();
        assert!(html.contains("<title>Report &amp; Notes</title>"));
        assert!(html.contains("<div id=\"print-content\" class=\"preview frame-letter\">"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("window.print()"));
        assert!(html.contains(".frame-letter {\n    max-width: 8.5in;"));
    }

    #[test]
    fn untitled_document_falls_back_to_app_name() {
        let doc = PrintDocument::new(&VisualTree::default(), FrameSize::A4);
        assert_eq!(doc.title(), "mdlive");
    }
}
