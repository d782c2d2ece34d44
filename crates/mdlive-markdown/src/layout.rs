//! Visual tree to terminal lines.
//!
//! Block elements become wrapped paragraphs with prefixes for quotes and list items. Code lines,
//! table rows and rules are emitted unwrapped and clipped at render time. Raw markup shows only
//! its visible text.

use mdlive_core::theme::Theme;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::html;
use crate::project::Element;
use crate::project::VisualNode;
use crate::project::VisualTree;

const BLOCK_TAGS: &[&str] = &[
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "ul",
    "ol",
    "li",
    "pre",
    "div",
    "table",
    "thead",
    "tbody",
    "tr",
    "hr",
];

#[derive(Clone, Debug, PartialEq)]
pub struct PreviewLine {
    pub spans: Vec<Span<'static>>,
    pub plain: String,
}

impl PreviewLine {
    fn from_segments(segments: Vec<Segment>) -> Self {
        let plain = segments.iter().map(|s| s.text.as_str()).collect::<String>();
        let spans = segments
            .into_iter()
            .filter(|s| !s.text.is_empty())
            .map(|s| Span::styled(s.text, s.style))
            .collect();
        Self { spans, plain }
    }

    pub fn width(&self) -> usize {
        UnicodeWidthStr::width(self.plain.as_str())
    }
}

/// Lays out `tree` for a pane `width` columns wide.
pub fn layout_tree(tree: &VisualTree, width: u16, theme: &Theme) -> Vec<PreviewLine> {
    if width == 0 {
        return Vec::new();
    }
    let mut l = Layout {
        theme,
        width: width as usize,
        out: Vec::new(),
        prefixes: Vec::new(),
        need_blank: false,
    };
    l.blocks(tree.nodes(), theme.text_primary, false);
    l.out
}

#[derive(Clone, Debug)]
struct Segment {
    text: String,
    style: Style,
}

impl Segment {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// One nesting level of line prefix: `first` on the first emitted row, `rest` afterwards.
struct PrefixPart {
    first: Segment,
    rest: Segment,
    used: bool,
}

struct Layout<'t> {
    theme: &'t Theme,
    width: usize,
    out: Vec<PreviewLine>,
    prefixes: Vec<PrefixPart>,
    need_blank: bool,
}

impl Layout<'_> {
    fn take_prefix(&mut self) -> Vec<Segment> {
        self.prefixes
            .iter_mut()
            .map(|p| {
                let seg = if p.used { &p.rest } else { &p.first };
                p.used = true;
                seg.clone()
            })
            .collect()
    }

    fn rest_prefix(&self) -> Vec<Segment> {
        self.prefixes.iter().map(|p| p.rest.clone()).collect()
    }

    fn push_line(&mut self, segments: Vec<Segment>) {
        self.out.push(PreviewLine::from_segments(segments));
    }

    /// Emits the pending blank separator, unless a list marker is still waiting for its row.
    fn begin_block(&mut self) {
        if self.need_blank && !self.out.is_empty() && self.prefixes.iter().all(|p| p.used) {
            let row = trim_trailing_ws(self.rest_prefix());
            self.push_line(row);
        }
        self.need_blank = false;
    }

    fn end_block(&mut self, tight: bool) {
        if !tight {
            self.need_blank = true;
        }
    }

    fn blocks(&mut self, nodes: &[VisualNode], style: Style, tight: bool) {
        let mut run: Vec<&VisualNode> = Vec::new();
        for node in nodes {
            match node {
                VisualNode::Element(el) if BLOCK_TAGS.contains(&el.tag) => {
                    self.flush_run(&mut run, style, tight);
                    self.block(el, style, tight);
                }
                other => run.push(other),
            }
        }
        self.flush_run(&mut run, style, tight);
    }

    fn flush_run(&mut self, run: &mut Vec<&VisualNode>, style: Style, tight: bool) {
        if run.is_empty() {
            return;
        }
        let mut lines = vec![Vec::new()];
        for node in run.drain(..) {
            self.inline(node, style, &mut lines);
        }
        self.paragraph(lines, tight);
    }

    fn paragraph(&mut self, lines: Vec<Vec<Segment>>, tight: bool) {
        let blank = lines
            .iter()
            .all(|l| l.iter().all(|s| s.text.trim().is_empty()));
        if blank {
            return;
        }
        self.begin_block();
        for logical in lines {
            let initial = self.take_prefix();
            let subsequent = self.rest_prefix();
            for row in wrap_segments(&initial, &subsequent, &logical, self.width) {
                self.push_line(row);
            }
        }
        self.end_block(tight);
    }

    fn block(&mut self, el: &Element, style: Style, tight: bool) {
        match el.tag {
            "p" => {
                let lines = self.inline_lines(&el.children, style);
                self.paragraph(lines, tight);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = el.tag[1..].parse::<usize>().unwrap_or(1);
                let marker = Segment::new(format!("{} ", "#".repeat(level)), self.theme.text_muted);
                let mut lines = vec![vec![marker]];
                for c in &el.children {
                    self.inline(c, style.patch(self.theme.title), &mut lines);
                }
                self.paragraph(lines, false);
            }
            "blockquote" => {
                self.begin_block();
                let bar = Segment::new("│ ", self.theme.text_muted);
                self.prefixes.push(PrefixPart {
                    first: bar.clone(),
                    rest: bar,
                    used: false,
                });
                self.blocks(&el.children, style.patch(self.theme.text_muted), false);
                self.prefixes.pop();
                self.need_blank = !tight;
            }
            "ul" | "ol" => self.list(el, style, tight),
            "pre" => self.code_block(el, None, tight),
            "div" if el.has_class("code-block-wrapper") => {
                let label = el
                    .children
                    .iter()
                    .filter_map(VisualNode::as_element)
                    .find(|c| c.has_class("code-block-header"))
                    .map(|h| VisualNode::Element(h.clone()).text_content());
                let pre = el
                    .children
                    .iter()
                    .filter_map(VisualNode::as_element)
                    .find(|c| c.tag == "pre");
                match pre {
                    Some(pre) => self.code_block(pre, label, tight),
                    None => self.blocks(&el.children, style, tight),
                }
            }
            "table" => self.table(el, style, tight),
            "hr" => {
                self.begin_block();
                let mut row = self.take_prefix();
                let used = segments_width(&row);
                let len = self.width.saturating_sub(used).max(1);
                row.push(Segment::new("─".repeat(len), self.theme.divider));
                self.push_line(row);
                self.end_block(tight);
            }
            _ => self.blocks(&el.children, style, tight),
        }
    }

    fn list(&mut self, el: &Element, style: Style, outer_tight: bool) {
        let ordered = el.tag == "ol";
        let mut n: u64 = el
            .attr_value("start")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        let items: Vec<&Element> = el.children.iter().filter_map(VisualNode::as_element).collect();
        let loose = items.iter().any(|li| {
            li.children
                .iter()
                .any(|c| c.as_element().is_some_and(|e| e.tag == "p"))
        });

        self.begin_block();
        for item in items {
            if loose {
                self.begin_block();
            }
            let marker = if ordered {
                format!("{n}. ")
            } else {
                "• ".to_string()
            };
            n += 1;
            let pad = " ".repeat(UnicodeWidthStr::width(marker.as_str()));
            self.prefixes.push(PrefixPart {
                first: Segment::new(marker, self.theme.accent),
                rest: Segment::new(pad, Style::default()),
                used: false,
            });
            self.blocks(&item.children, style, !loose);
            if self.prefixes.last().is_some_and(|p| !p.used) {
                let row = trim_trailing_ws(self.take_prefix());
                self.push_line(row);
            }
            self.prefixes.pop();
        }
        self.end_block(outer_tight);
    }

    fn code_block(&mut self, pre: &Element, label: Option<String>, tight: bool) {
        self.begin_block();
        if let Some(label) = label {
            let mut row = self.take_prefix();
            row.push(Segment::new(format!(" {label} "), self.theme.code_label));
            self.push_line(row);
        }
        let text = VisualNode::Element(pre.clone()).text_content();
        let body = text.strip_suffix('\n').unwrap_or(&text);
        for line in body.split('\n') {
            let mut row = self.take_prefix();
            row.push(Segment::new(format!("  {line}"), self.theme.code_block));
            self.push_line(row);
        }
        self.end_block(tight);
    }

    fn table(&mut self, el: &Element, style: Style, tight: bool) {
        struct Row {
            head: bool,
            cells: Vec<(Vec<Segment>, Align)>,
        }

        let mut rows: Vec<Row> = Vec::new();
        for section in el.children.iter().filter_map(VisualNode::as_element) {
            let head = section.tag == "thead";
            for tr in section.children.iter().filter_map(VisualNode::as_element) {
                let cells = tr
                    .children
                    .iter()
                    .filter_map(VisualNode::as_element)
                    .map(|cell| {
                        let cell_style = if head {
                            style.add_modifier(Modifier::BOLD)
                        } else {
                            style
                        };
                        let lines = self.inline_lines(&cell.children, cell_style);
                        (join_lines(lines), Align::from_element(cell))
                    })
                    .collect();
                rows.push(Row { head, cells });
            }
        }
        if rows.is_empty() {
            return;
        }

        let cols = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        let mut col_w = vec![1usize; cols];
        for r in &rows {
            for (i, (segs, _)) in r.cells.iter().enumerate() {
                col_w[i] = col_w[i].max(segments_width(segs));
            }
        }
        let avail = self
            .width
            .saturating_sub(segments_width(&self.rest_prefix()));
        let gaps = 3 * cols.saturating_sub(1);
        while col_w.iter().sum::<usize>() + gaps > avail {
            let Some((idx, w)) = col_w.iter().copied().enumerate().max_by_key(|(_, w)| *w) else {
                break;
            };
            if w <= 1 {
                break;
            }
            col_w[idx] = w - 1;
        }

        self.begin_block();
        let sep = Segment::new(" │ ", self.theme.divider);
        for (ri, r) in rows.iter().enumerate() {
            let mut row = self.take_prefix();
            for (i, w) in col_w.iter().enumerate() {
                if i > 0 {
                    row.push(sep.clone());
                }
                let (segs, align) = r
                    .cells
                    .get(i)
                    .map(|(s, a)| (s.as_slice(), *a))
                    .unwrap_or((&[][..], Align::Left));
                row.extend(fit_segments(segs, *w, align, style));
            }
            self.push_line(trim_trailing_ws(row));

            let last_head = r.head && rows.get(ri + 1).is_none_or(|next| !next.head);
            if last_head {
                let mut rule = self.take_prefix();
                let text = col_w
                    .iter()
                    .map(|w| "─".repeat(*w))
                    .collect::<Vec<_>>()
                    .join("─┼─");
                rule.push(Segment::new(text, self.theme.divider));
                self.push_line(rule);
            }
        }
        self.end_block(tight);
    }

    fn inline_lines(&self, nodes: &[VisualNode], style: Style) -> Vec<Vec<Segment>> {
        let mut lines = vec![Vec::new()];
        for n in nodes {
            self.inline(n, style, &mut lines);
        }
        lines
    }

    fn inline(&self, node: &VisualNode, style: Style, lines: &mut Vec<Vec<Segment>>) {
        let push = |lines: &mut Vec<Vec<Segment>>, seg: Segment| {
            if let Some(line) = lines.last_mut() {
                line.push(seg);
            }
        };
        match node {
            VisualNode::Text(t) => push(lines, Segment::new(t.replace('\n', " "), style)),
            VisualNode::Raw(raw) => {
                let text = html::raw_to_text(raw);
                if !text.is_empty() {
                    push(lines, Segment::new(text, style.patch(self.theme.text_muted)));
                }
            }
            VisualNode::Element(el) => {
                let inner = match el.tag {
                    "strong" => style.add_modifier(Modifier::BOLD),
                    "em" => style.add_modifier(Modifier::ITALIC),
                    "del" => style.add_modifier(Modifier::CROSSED_OUT),
                    "code" => style.patch(self.theme.code_inline),
                    "a" => style
                        .patch(self.theme.accent)
                        .add_modifier(Modifier::UNDERLINED),
                    "br" => {
                        lines.push(Vec::new());
                        return;
                    }
                    "img" => {
                        let alt = el.attr_value("alt").unwrap_or("");
                        push(
                            lines,
                            Segment::new(format!("[image: {alt}]"), style.patch(self.theme.accent)),
                        );
                        return;
                    }
                    "input" => {
                        let mark = if el.attr_value("checked").is_some() {
                            "[x] "
                        } else {
                            "[ ] "
                        };
                        push(lines, Segment::new(mark, style.patch(self.theme.accent)));
                        return;
                    }
                    "sup" if el.has_class("footnote-reference") => {
                        let label = node.text_content();
                        push(
                            lines,
                            Segment::new(format!("[^{label}]"), style.patch(self.theme.text_muted)),
                        );
                        return;
                    }
                    "span" if el.has_class("language-label") => style.patch(self.theme.code_label),
                    _ => style,
                };
                for c in &el.children {
                    self.inline(c, inner, lines);
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn from_element(el: &Element) -> Self {
        match el.attr_value("style") {
            Some(s) if s.contains("right") => Align::Right,
            Some(s) if s.contains("center") => Align::Center,
            _ => Align::Left,
        }
    }
}

fn join_lines(lines: Vec<Vec<Segment>>) -> Vec<Segment> {
    let mut out = Vec::new();
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            out.push(Segment::new(" ", Style::default()));
        }
        out.extend(line);
    }
    out
}

/// Pads or truncates `segments` to exactly `width` columns.
fn fit_segments(
    segments: &[Segment],
    width: usize,
    align: Align,
    pad_style: Style,
) -> Vec<Segment> {
    let total = segments_width(segments);
    if total > width {
        let mut out = Vec::new();
        let mut cols = 0usize;
        let budget = width.saturating_sub(1);
        'outer: for seg in segments {
            let mut text = String::new();
            for ch in seg.text.chars() {
                let w = UnicodeWidthChar::width(ch).unwrap_or(0);
                if cols + w > budget {
                    out.push(Segment::new(text, seg.style));
                    break 'outer;
                }
                cols += w;
                text.push(ch);
            }
            out.push(Segment::new(text, seg.style));
        }
        out.push(Segment::new("…", pad_style));
        cols += 1;
        if cols < width {
            out.push(Segment::new(" ".repeat(width - cols), pad_style));
        }
        return out;
    }
    let free = width - total;
    let (left, right) = match align {
        Align::Left => (0, free),
        Align::Right => (free, 0),
        Align::Center => (free / 2, free - free / 2),
    };
    let mut out = Vec::with_capacity(segments.len() + 2);
    if left > 0 {
        out.push(Segment::new(" ".repeat(left), pad_style));
    }
    out.extend(segments.iter().cloned());
    if right > 0 {
        out.push(Segment::new(" ".repeat(right), pad_style));
    }
    out
}

fn wrap_segments(
    initial_prefix: &[Segment],
    subsequent_prefix: &[Segment],
    segments: &[Segment],
    width: usize,
) -> Vec<Vec<Segment>> {
    if width == 0 {
        return Vec::new();
    }
    let mut out: Vec<Vec<Segment>> = Vec::new();
    let mut prefix = initial_prefix.to_vec();
    let mut cur: Vec<Segment> = Vec::new();
    let mut cur_cols = segments_width(&prefix);

    let finish = |out: &mut Vec<Vec<Segment>>, prefix: &mut Vec<Segment>, cur: &mut Vec<Segment>| {
        let mut row = std::mem::replace(prefix, subsequent_prefix.to_vec());
        row.append(cur);
        out.push(trim_trailing_ws(row));
        segments_width(prefix)
    };

    for tok in segments.iter().flat_map(split_segment_ws) {
        if cur.is_empty() && is_all_ws(&tok.text) {
            continue;
        }
        let tok_cols = UnicodeWidthStr::width(tok.text.as_str());
        if cur_cols + tok_cols <= width {
            cur_cols += tok_cols;
            cur.push(tok);
            continue;
        }
        if !cur.is_empty() {
            cur_cols = finish(&mut out, &mut prefix, &mut cur);
            if is_all_ws(&tok.text) {
                continue;
            }
        }
        let mut remaining = tok;
        while cur_cols + UnicodeWidthStr::width(remaining.text.as_str()) > width {
            let max = width.saturating_sub(cur_cols).max(1);
            let (head, tail) = split_to_width(&remaining, max);
            cur.push(head);
            cur_cols = finish(&mut out, &mut prefix, &mut cur);
            remaining = tail;
            if remaining.text.is_empty() {
                break;
            }
        }
        if !remaining.text.is_empty() {
            cur_cols += UnicodeWidthStr::width(remaining.text.as_str());
            cur.push(remaining);
        }
    }

    if !cur.is_empty() || !prefix.is_empty() {
        finish(&mut out, &mut prefix, &mut cur);
    }
    out
}

fn split_segment_ws(seg: &Segment) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();
    let mut buf = String::new();
    let mut last_was_ws: Option<bool> = None;
    for ch in seg.text.chars() {
        let is_ws = ch.is_whitespace();
        if last_was_ws.is_some_and(|prev| prev != is_ws) {
            out.push(Segment::new(std::mem::take(&mut buf), seg.style));
        }
        buf.push(ch);
        last_was_ws = Some(is_ws);
    }
    if !buf.is_empty() {
        out.push(Segment::new(buf, seg.style));
    }
    out
}

/// Splits off at most `max_cols` columns, always consuming at least one character. A leading
/// glyph wider than `max_cols` is shown as `…`.
fn split_to_width(seg: &Segment, max_cols: usize) -> (Segment, Segment) {
    let mut cols = 0usize;
    let mut idx = 0usize;
    for (byte_idx, ch) in seg.text.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if cols + w > max_cols {
            if idx == 0 {
                let head = if max_cols == 0 { "" } else { "…" };
                let rest = &seg.text[byte_idx + ch.len_utf8()..];
                return (Segment::new(head, seg.style), Segment::new(rest, seg.style));
            }
            break;
        }
        cols += w;
        idx = byte_idx + ch.len_utf8();
    }
    let (a, b) = seg.text.split_at(idx);
    (Segment::new(a, seg.style), Segment::new(b, seg.style))
}

fn trim_trailing_ws(mut row: Vec<Segment>) -> Vec<Segment> {
    while let Some(last) = row.last_mut() {
        let trimmed = last.text.trim_end().len();
        if trimmed == 0 {
            row.pop();
        } else {
            last.text.truncate(trimmed);
            break;
        }
    }
    row
}

fn segments_width(segments: &[Segment]) -> usize {
    segments
        .iter()
        .map(|s| UnicodeWidthStr::width(s.text.as_str()))
        .sum()
}

fn is_all_ws(s: &str) -> bool {
    s.chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MarkdownOptions;
    use crate::project;

    fn plain(md: &str, width: u16) -> Vec<String> {
        let tree = project::project(md, &MarkdownOptions::default());
        layout_tree(&tree, width, &Theme::default())
            .into_iter()
            .map(|l| l.plain)
            .collect()
    }

    #[test]
    fn wraps_prose_but_not_code() {
        let lines = plain("hello world\n\n```txt\nabcdefghij\n```\n", 5);
        assert_eq!(lines, vec!["hello", "world", "", " txt ", "  abcdefghij"]);
    }

    #[test]
    fn glyph_wider_than_pane_becomes_ellipsis() {
        assert_eq!(plain("🎉", 1), vec!["…"]);
        assert_eq!(plain("中文", 1), vec!["…", "…"]);
        assert_eq!(plain("a🎉b", 2), vec!["a", "🎉", "b"]);
    }

    #[test]
    fn code_without_language_has_no_label_row() {
        let lines = plain("```\nx = 1\n```\n", 40);
        assert_eq!(lines, vec!["  x = 1"]);
    }

    #[test]
    fn heading_and_nested_list() {
        let lines = plain("# Title\n\n- a\n- b\n  - c\n", 40);
        assert_eq!(lines, vec!["# Title", "", "• a", "• b", "  • c"]);
    }

    #[test]
    fn ordered_list_respects_start() {
        let lines = plain("3. x\n4. y\n", 40);
        assert_eq!(lines, vec!["3. x", "4. y"]);
    }

    #[test]
    fn blockquote_prefixes_every_row() {
        let lines = plain("> one two three\n", 9);
        assert_eq!(lines, vec!["│ one two", "│ three"]);
    }

    #[test]
    fn raw_html_shows_visible_text_only() {
        let md = "<style>\nh1 { color: red; }\n</style>\n\n<div class=\"box\">\n  Boxed\n</div>\n";
        assert_eq!(plain(md, 40), vec!["Boxed"]);
    }

    #[test]
    fn table_has_header_rule() {
        let lines = plain("| Column 1 | B |\n|---|---|\n| x | yy |\n", 40);
        assert_eq!(
            lines,
            vec!["Column 1 │ B", "─────────┼───", "x        │ yy"]
        );
    }

    #[test]
    fn narrow_table_truncates_cells() {
        let lines = plain("| abcdef | ghijkl |\n|---|---|\n| 1 | 2 |\n", 9);
        assert!(lines.iter().all(|l| UnicodeWidthStr::width(l.as_str()) <= 9));
        assert!(lines[0].contains('…'));
    }

    #[test]
    fn rule_fills_width_and_task_boxes_render() {
        let lines = plain("- [x] done\n\n---\n", 12);
        assert_eq!(lines, vec!["• [x] done".to_string(), String::new(), "─".repeat(12)]);
    }

    #[test]
    fn long_word_is_split_across_rows() {
        let lines = plain("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }
}
