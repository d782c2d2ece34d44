//! Content tree to visual tree projection.
//!
//! Each content node is mapped by a [`NodeStrategy`]. The trait's default methods give the plain
//! CommonMark rendering; strategies override the kinds they care about. [`LabeledCode`] is the
//! default and adds a language header above fenced code blocks.

use std::sync::Arc;

use crate::content;
use crate::content::CellAlign;
use crate::content::CodeNode;
use crate::content::ContainerKind;
use crate::content::ContentNode;
use crate::content::MarkdownOptions;
use crate::html;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub classes: Vec<String>,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<VisualNode>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn child(mut self, child: VisualNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: Vec<VisualNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VisualNode {
    Element(Element),
    Text(String),
    /// Markup emitted verbatim by the HTML serializer.
    Raw(String),
}

impl From<Element> for VisualNode {
    fn from(value: Element) -> Self {
        VisualNode::Element(value)
    }
}

impl VisualNode {
    pub fn text(s: impl Into<String>) -> Self {
        VisualNode::Text(s.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            VisualNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Concatenated visible text. Raw markup contributes its text with tags removed.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text_content(&mut out);
        out
    }

    fn push_text_content(&self, out: &mut String) {
        match self {
            VisualNode::Text(t) => out.push_str(t),
            VisualNode::Raw(raw) => out.push_str(&html::raw_to_text(raw)),
            VisualNode::Element(el) => {
                for c in &el.children {
                    c.push_text_content(out);
                }
            }
        }
    }

    fn collect<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if let VisualNode::Element(el) = self {
            if pred(el) {
                out.push(el);
            }
            for c in &el.children {
                c.collect(pred, out);
            }
        }
    }
}

/// The rendered form of one document. Recomputed in full on every change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisualTree {
    nodes: Vec<VisualNode>,
}

impl VisualTree {
    pub fn new(nodes: Vec<VisualNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[VisualNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        html::push_nodes(&self.nodes, &mut out);
        out
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for n in &self.nodes {
            n.push_text_content(&mut out);
        }
        out
    }

    /// Elements carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.find(&|el| el.has_class(class))
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<&Element> {
        self.find(&|el| el.tag == tag)
    }

    fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut out = Vec::new();
        for n in &self.nodes {
            n.collect(pred, &mut out);
        }
        out
    }
}

/// Per-node-kind rendering hooks.
///
/// Children are projected before the hook for their parent runs.
pub trait NodeStrategy {
    fn code(&self, code: &CodeNode) -> VisualNode {
        plain_code(code)
    }

    fn html(&self, raw: &str, _block: bool) -> VisualNode {
        VisualNode::Raw(raw.to_string())
    }

    fn container(&self, kind: &ContainerKind, children: Vec<VisualNode>) -> VisualNode {
        plain_container(kind, children)
    }

    fn table_cell(&self, head: bool, align: CellAlign, children: Vec<VisualNode>) -> VisualNode {
        let mut el = Element::new(if head { "th" } else { "td" });
        if let Some(a) = align_name(align) {
            el = el.attr("style", format!("text-align: {a}"));
        }
        el.children(children).into()
    }
}

/// CommonMark rendering without any decoration.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainStrategy;

impl NodeStrategy for PlainStrategy {}

/// Block code with a `language-<word>` class is wrapped with a header naming the language.
#[derive(Clone, Copy, Debug, Default)]
pub struct LabeledCode;

impl NodeStrategy for LabeledCode {
    fn code(&self, code: &CodeNode) -> VisualNode {
        let language = code.class.as_deref().and_then(language_from_class);
        let (true, Some(language)) = (code.block, language) else {
            return plain_code(code);
        };
        let header = Element::new("div").class("code-block-header").child(
            Element::new("span")
                .class("language-label")
                .child(VisualNode::text(language))
                .into(),
        );
        let pre = Element::new("pre")
            .class("code-block")
            .child(code_element(code).into());
        Element::new("div")
            .class("code-block-wrapper")
            .child(header.into())
            .child(pre.into())
            .into()
    }
}

/// The word after the first `language-` in `class`, made of ASCII alphanumerics and `_`.
pub fn language_from_class(class: &str) -> Option<&str> {
    const PREFIX: &str = "language-";
    for (idx, _) in class.match_indices(PREFIX) {
        let rest = &class[idx + PREFIX.len()..];
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if end > 0 {
            return Some(&rest[..end]);
        }
    }
    None
}

fn code_element(code: &CodeNode) -> Element {
    let mut el = Element::new("code");
    if let Some(class) = &code.class {
        el = el.class(class.clone());
    }
    el.child(VisualNode::text(code.text.clone()))
}

pub fn plain_code(code: &CodeNode) -> VisualNode {
    if code.block {
        Element::new("pre").child(code_element(code).into()).into()
    } else {
        code_element(code).into()
    }
}

pub fn plain_container(kind: &ContainerKind, children: Vec<VisualNode>) -> VisualNode {
    let el = match kind {
        ContainerKind::Paragraph => Element::new("p"),
        ContainerKind::Heading(level) => Element::new(heading_tag(*level)),
        ContainerKind::BlockQuote => Element::new("blockquote"),
        ContainerKind::List { start: None } => Element::new("ul"),
        ContainerKind::List { start: Some(1) } => Element::new("ol"),
        ContainerKind::List { start: Some(n) } => Element::new("ol").attr("start", n.to_string()),
        ContainerKind::Item => {
            let task = children.iter().any(|c| {
                c.as_element().is_some_and(|el| {
                    el.tag == "input" && el.attr_value("type") == Some("checkbox")
                })
            });
            let el = Element::new("li");
            if task { el.class("task-list-item") } else { el }
        }
        ContainerKind::Table(_) => Element::new("table"),
        ContainerKind::TableHead => Element::new("thead"),
        ContainerKind::TableRow => Element::new("tr"),
        ContainerKind::TableCell => Element::new("td"),
        ContainerKind::Emphasis => Element::new("em"),
        ContainerKind::Strong => Element::new("strong"),
        ContainerKind::Strikethrough => Element::new("del"),
        ContainerKind::Link { dest, title } => {
            let el = Element::new("a").attr("href", dest.clone());
            if title.is_empty() {
                el
            } else {
                el.attr("title", title.clone())
            }
        }
        ContainerKind::Image { dest, title } => {
            let alt = VisualTree::new(children).text_content();
            let el = Element::new("img")
                .attr("src", dest.clone())
                .attr("alt", alt);
            let el = if title.is_empty() {
                el
            } else {
                el.attr("title", title.clone())
            };
            return el.into();
        }
        ContainerKind::FootnoteDefinition(label) => Element::new("div")
            .class("footnote-definition")
            .attr("id", label.clone())
            .child(
                Element::new("sup")
                    .class("footnote-definition-label")
                    .child(VisualNode::text(label.clone()))
                    .into(),
            ),
    };
    el.children(children).into()
}

fn heading_tag(level: u8) -> &'static str {
    match level {
        1 => "h1",
        2 => "h2",
        3 => "h3",
        4 => "h4",
        5 => "h5",
        _ => "h6",
    }
}

fn align_name(align: CellAlign) -> Option<&'static str> {
    match align {
        CellAlign::None => None,
        CellAlign::Left => Some("left"),
        CellAlign::Center => Some("center"),
        CellAlign::Right => Some("right"),
    }
}

/// Runs the parser and a strategy over a whole document.
#[derive(Clone)]
pub struct Projector {
    options: MarkdownOptions,
    strategy: Arc<dyn NodeStrategy + Send + Sync>,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(MarkdownOptions::default())
    }
}

impl std::fmt::Debug for Projector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projector")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Projector {
    pub fn new(options: MarkdownOptions) -> Self {
        Self {
            options,
            strategy: Arc::new(LabeledCode),
        }
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn NodeStrategy + Send + Sync>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: MarkdownOptions) {
        self.options = options;
    }

    pub fn project(&self, source: &str) -> VisualTree {
        let content = content::parse(source, &self.options);
        VisualTree::new(self.nodes(&content))
    }

    fn nodes(&self, nodes: &[ContentNode]) -> Vec<VisualNode> {
        nodes.iter().map(|n| self.node(n)).collect()
    }

    fn node(&self, node: &ContentNode) -> VisualNode {
        let s = &*self.strategy;
        match node {
            ContentNode::Container {
                kind: ContainerKind::Table(aligns),
                children,
            } => self.table(aligns, children),
            ContentNode::Container { kind, children } => s.container(kind, self.nodes(children)),
            ContentNode::Code(code) => s.code(code),
            ContentNode::Html { block, raw } => s.html(raw, *block),
            ContentNode::Text(t) => VisualNode::text(t.clone()),
            ContentNode::SoftBreak => VisualNode::text("\n"),
            ContentNode::HardBreak => Element::new("br").into(),
            ContentNode::Rule => Element::new("hr").into(),
            ContentNode::TaskMarker(checked) => {
                let el = Element::new("input")
                    .attr("type", "checkbox")
                    .attr("disabled", "");
                if *checked {
                    el.attr("checked", "").into()
                } else {
                    el.into()
                }
            }
            ContentNode::FootnoteReference(label) => Element::new("sup")
                .class("footnote-reference")
                .child(
                    Element::new("a")
                        .attr("href", format!("#{label}"))
                        .child(VisualNode::text(label.clone()))
                        .into(),
                )
                .into(),
        }
    }

    fn table(&self, aligns: &[CellAlign], rows: &[ContentNode]) -> VisualNode {
        let s = &*self.strategy;
        let mut head = Vec::new();
        let mut body = Vec::new();
        for row in rows {
            let ContentNode::Container { kind, children } = row else {
                continue;
            };
            let is_head = *kind == ContainerKind::TableHead;
            let cells = children
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let content = match cell {
                        ContentNode::Container { children, .. } => self.nodes(children),
                        other => vec![self.node(other)],
                    };
                    let align = aligns.get(i).copied().unwrap_or(CellAlign::None);
                    s.table_cell(is_head, align, content)
                })
                .collect::<Vec<_>>();
            let tr = s.container(&ContainerKind::TableRow, cells);
            if is_head {
                head.push(tr);
            } else {
                body.push(tr);
            }
        }
        let mut table = Element::new("table");
        if !head.is_empty() {
            table = table.child(Element::new("thead").children(head).into());
        }
        if !body.is_empty() {
            table = table.child(Element::new("tbody").children(body).into());
        }
        table.into()
    }
}

/// Projects `source` with the default [`LabeledCode`] strategy.
pub fn project(source: &str, options: &MarkdownOptions) -> VisualTree {
    Projector::new(options.clone()).project(source)
}
