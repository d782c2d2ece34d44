//! Markdown source to content tree.
//!
//! The pulldown-cmark event stream is folded into a tree of [`ContentNode`]s. Unknown events are
//! dropped, so any input produces a tree: malformed markdown degrades to literal text.

use pulldown_cmark::Alignment;
use pulldown_cmark::CodeBlockKind;
use pulldown_cmark::Event;
use pulldown_cmark::HeadingLevel;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use url::Url;

/// Which markdown extensions are active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Tables, strikethrough, task lists and footnotes.
    pub gfm: bool,
    /// Embedded HTML is kept as live markup. When off it is shown as literal text.
    pub raw_html: bool,
    /// Relative link and image destinations are resolved against this URL or path.
    pub base_url: Option<String>,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            raw_html: true,
            base_url: None,
        }
    }
}

impl MarkdownOptions {
    fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_FOOTNOTES
        } else {
            Options::empty()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellAlign {
    None,
    Left,
    Center,
    Right,
}

impl From<Alignment> for CellAlign {
    fn from(value: Alignment) -> Self {
        match value {
            Alignment::None => CellAlign::None,
            Alignment::Left => CellAlign::Left,
            Alignment::Center => CellAlign::Center,
            Alignment::Right => CellAlign::Right,
        }
    }
}

/// Nodes that own children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Paragraph,
    Heading(u8),
    BlockQuote,
    /// `start` is `Some` for ordered lists.
    List {
        start: Option<u64>,
    },
    Item,
    Table(Vec<CellAlign>),
    /// Header cells, without an intermediate row.
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link {
        dest: String,
        title: String,
    },
    /// Children hold the alt text.
    Image {
        dest: String,
        title: String,
    },
    FootnoteDefinition(String),
}

/// A code element, inline (`` `x` ``) or block (fenced or indented).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeNode {
    pub block: bool,
    /// `language-<word>` for fenced blocks with an info string.
    pub class: Option<String>,
    /// Verbatim code, including the trailing newline of block code.
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentNode {
    Container {
        kind: ContainerKind,
        children: Vec<ContentNode>,
    },
    Code(CodeNode),
    /// Raw markup, only produced when passthrough is on.
    Html {
        block: bool,
        raw: String,
    },
    Text(String),
    SoftBreak,
    HardBreak,
    Rule,
    TaskMarker(bool),
    FootnoteReference(String),
}

impl ContentNode {
    pub fn container(kind: ContainerKind, children: Vec<ContentNode>) -> Self {
        ContentNode::Container { kind, children }
    }

    /// Concatenated text of this node and its descendants, markup excluded.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain_text(&mut out);
        out
    }

    fn push_plain_text(&self, out: &mut String) {
        match self {
            ContentNode::Container { children, .. } => {
                for c in children {
                    c.push_plain_text(out);
                }
            }
            ContentNode::Code(code) => out.push_str(&code.text),
            ContentNode::Text(t) => out.push_str(t),
            ContentNode::SoftBreak | ContentNode::HardBreak => out.push(' '),
            ContentNode::Html { .. }
            | ContentNode::Rule
            | ContentNode::TaskMarker(_)
            | ContentNode::FootnoteReference(_) => {}
        }
    }
}

/// Parses `source` into top-level content nodes.
pub fn parse(source: &str, options: &MarkdownOptions) -> Vec<ContentNode> {
    let parser = Parser::new_ext(source, options.parser_options());
    let mut b = Builder::new(options);
    for ev in parser {
        b.event(ev);
    }
    b.finish()
}

struct Frame {
    kind: ContainerKind,
    children: Vec<ContentNode>,
}

struct Builder<'a> {
    options: &'a MarkdownOptions,
    root: Vec<ContentNode>,
    stack: Vec<Frame>,
    code: Option<CodeNode>,
    html_block: Option<String>,
}

impl<'a> Builder<'a> {
    fn new(options: &'a MarkdownOptions) -> Self {
        Self {
            options,
            root: Vec::new(),
            stack: Vec::new(),
            code: None,
            html_block: None,
        }
    }

    fn push(&mut self, node: ContentNode) {
        match self.stack.last_mut() {
            Some(frame) => frame.children.push(node),
            None => self.root.push(node),
        }
    }

    fn open(&mut self, kind: ContainerKind) {
        self.stack.push(Frame {
            kind,
            children: Vec::new(),
        });
    }

    fn close(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.push(ContentNode::container(frame.kind, frame.children));
        }
    }

    fn resolve(&self, dest: &str) -> String {
        resolve_url(self.options.base_url.as_deref(), dest)
    }

    fn html(&mut self, raw: String, block: bool) {
        if let Some(buf) = self.html_block.as_mut() {
            buf.push_str(&raw);
            return;
        }
        if self.options.raw_html {
            self.push(ContentNode::Html { block, raw });
        } else {
            self.push(ContentNode::Text(raw));
        }
    }

    fn event(&mut self, ev: Event<'_>) {
        match ev {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some(code) = self.code.as_mut() {
                    code.text.push_str(&text);
                } else if let Some(buf) = self.html_block.as_mut() {
                    buf.push_str(&text);
                } else {
                    self.push(ContentNode::Text(text.into_string()));
                }
            }
            Event::Code(code) => self.push(ContentNode::Code(CodeNode {
                block: false,
                class: None,
                text: code.into_string(),
            })),
            Event::Html(html) => self.html(html.into_string(), true),
            Event::InlineHtml(html) => self.html(html.into_string(), false),
            Event::SoftBreak => self.push(ContentNode::SoftBreak),
            Event::HardBreak => self.push(ContentNode::HardBreak),
            Event::Rule => self.push(ContentNode::Rule),
            Event::TaskListMarker(checked) => self.push(ContentNode::TaskMarker(checked)),
            Event::FootnoteReference(label) => {
                self.push(ContentNode::FootnoteReference(label.into_string()))
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open(ContainerKind::Paragraph),
            Tag::Heading { level, .. } => self.open(ContainerKind::Heading(heading_level(level))),
            Tag::BlockQuote(_) => self.open(ContainerKind::BlockQuote),
            Tag::List(start) => self.open(ContainerKind::List { start }),
            Tag::Item => self.open(ContainerKind::Item),
            Tag::Table(aligns) => self.open(ContainerKind::Table(
                aligns.into_iter().map(CellAlign::from).collect(),
            )),
            Tag::TableHead => self.open(ContainerKind::TableHead),
            Tag::TableRow => self.open(ContainerKind::TableRow),
            Tag::TableCell => self.open(ContainerKind::TableCell),
            Tag::Emphasis => self.open(ContainerKind::Emphasis),
            Tag::Strong => self.open(ContainerKind::Strong),
            Tag::Strikethrough => self.open(ContainerKind::Strikethrough),
            Tag::Link {
                dest_url, title, ..
            } => {
                let dest = self.resolve(&dest_url);
                self.open(ContainerKind::Link {
                    dest,
                    title: title.into_string(),
                });
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let dest = self.resolve(&dest_url);
                self.open(ContainerKind::Image {
                    dest,
                    title: title.into_string(),
                });
            }
            Tag::FootnoteDefinition(label) => {
                self.open(ContainerKind::FootnoteDefinition(label.into_string()))
            }
            Tag::CodeBlock(kind) => {
                let class = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|word| format!("language-{word}")),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeNode {
                    block: true,
                    class,
                    text: String::new(),
                });
            }
            Tag::HtmlBlock => self.html_block = Some(String::new()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    self.push(ContentNode::Code(code));
                }
            }
            TagEnd::HtmlBlock => {
                if let Some(raw) = self.html_block.take() {
                    if self.options.raw_html {
                        self.push(ContentNode::Html { block: true, raw });
                    } else {
                        let text = raw.trim_end_matches('\n').to_string();
                        self.push(ContentNode::container(
                            ContainerKind::Paragraph,
                            vec![ContentNode::Text(text)],
                        ));
                    }
                }
            }
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote(_)
            | TagEnd::List(_)
            | TagEnd::Item
            | TagEnd::Table
            | TagEnd::TableHead
            | TagEnd::TableRow
            | TagEnd::TableCell
            | TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link
            | TagEnd::Image
            | TagEnd::FootnoteDefinition => self.close(),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<ContentNode> {
        if let Some(code) = self.code.take() {
            self.push(ContentNode::Code(code));
        }
        while !self.stack.is_empty() {
            self.close();
        }
        self.root
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Resolves a link destination against an optional base URL or directory path.
pub fn resolve_url(base_url: Option<&str>, dest: &str) -> String {
    let dest = dest.trim();
    if dest.is_empty() {
        return String::new();
    }
    if is_absolute_url(dest) {
        return dest.to_string();
    }
    let Some(base) = base_url.map(str::trim).filter(|s| !s.is_empty()) else {
        return dest.to_string();
    };

    if let Ok(base) = Url::parse(base) {
        return base
            .join(dest)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| dest.to_string());
    }

    let base = base.trim_end_matches(['/', '\\']);
    let mut rest = dest;
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    format!("{base}/{}", rest.trim_start_matches('/'))
}

fn is_absolute_url(dest: &str) -> bool {
    dest.starts_with('#')
        || dest.starts_with('/')
        || dest.starts_with("mailto:")
        || dest.starts_with("data:")
        || dest.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(source: &str, options: &MarkdownOptions) -> ContentNode {
        parse(source, options)
            .into_iter()
            .next()
            .expect("at least one node")
    }

    #[test]
    fn fenced_code_gets_language_class_from_first_word() {
        let node = first("```rust ignore\nfn main() {}\n```\n", &MarkdownOptions::default());
        assert_eq!(
            node,
            ContentNode::Code(CodeNode {
                block: true,
                class: Some("language-rust".to_string()),
                text: "fn main() {}\n".to_string(),
            })
        );
    }

    #[test]
    fn indented_and_bare_fences_have_no_class() {
        let opts = MarkdownOptions::default();
        let ContentNode::Code(code) = first("    let x = 1;\n", &opts) else {
            panic!("expected code");
        };
        assert_eq!(code.class, None);
        let ContentNode::Code(code) = first("```\nplain\n```\n", &opts) else {
            panic!("expected code");
        };
        assert_eq!(code.class, None);
        assert_eq!(code.text, "plain\n");
    }

    #[test]
    fn gfm_off_keeps_table_syntax_as_paragraph() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        let on = first(md, &MarkdownOptions::default());
        assert!(matches!(
            on,
            ContentNode::Container {
                kind: ContainerKind::Table(_),
                ..
            }
        ));
        let off = first(
            md,
            &MarkdownOptions {
                gfm: false,
                ..MarkdownOptions::default()
            },
        );
        assert!(matches!(
            off,
            ContentNode::Container {
                kind: ContainerKind::Paragraph,
                ..
            }
        ));
        assert!(off.plain_text().contains("| a | b |"));
    }

    #[test]
    fn html_block_is_raw_with_passthrough_and_text_without() {
        let md = "<div class=\"x\">hi</div>\n";
        let on = first(md, &MarkdownOptions::default());
        assert_eq!(
            on,
            ContentNode::Html {
                block: true,
                raw: "<div class=\"x\">hi</div>\n".to_string()
            }
        );
        let off = first(
            md,
            &MarkdownOptions {
                raw_html: false,
                ..MarkdownOptions::default()
            },
        );
        assert_eq!(off.plain_text(), "<div class=\"x\">hi</div>");
    }

    #[test]
    fn unclosed_constructs_still_produce_nodes() {
        let nodes = parse("**bold\n\n```js\nnever closed", &MarkdownOptions::default());
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].plain_text().contains("**bold"));
    }

    #[test]
    fn resolves_relative_links_against_base() {
        assert_eq!(
            resolve_url(Some("https://example.com/docs/"), "a/b.md"),
            "https://example.com/docs/a/b.md"
        );
        assert_eq!(resolve_url(Some("/tmp/notes/"), "./img.png"), "/tmp/notes/img.png");
        assert_eq!(resolve_url(Some("https://x.org/"), "#top"), "#top");
        assert_eq!(resolve_url(None, "rel.md"), "rel.md");
    }
}
