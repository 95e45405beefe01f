//! Block model of a plan document, its plain-text projection, and the
//! marker patches written back into it.
//!
//! Processed regions live in the tree as [`Marker`] nodes, inline for a
//! single task and block-level for a stack. The projection reports where
//! every marker landed so the scanner can step over them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::stack::StackType;

/// Opening of every rendered marker.
pub const MARKER_OPEN: &str = "[✓ ";
pub const MARKER_CLOSE: char = ']';

/// An already materialized directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Marker {
    /// A `( ... )` task; `text` is the trimmed directive text.
    Task { text: String },
    /// A `seq:`/`group:` block and the number of notes it produced.
    #[serde(rename_all = "camelCase")]
    Stack {
        stack_type: StackType,
        title: String,
        count: usize,
    },
}

impl Marker {
    pub fn task(text: &str) -> Self {
        Marker::Task {
            text: text.trim().to_string(),
        }
    }

    /// Recover a marker from the text between `[✓ ` and `]`. Anything that
    /// does not render back to exactly `body` is a task marker.
    pub fn from_body(body: &str) -> Self {
        let stack = body.split_once(": ").and_then(|(kind, rest)| {
            let stack_type = match kind {
                "seq" => StackType::Sequential,
                "group" => StackType::Group,
                _ => return None,
            };
            let (title, tail) = rest.rsplit_once(" · ")?;
            let (count, _) = tail.split_once(' ')?;
            Some(Marker::Stack {
                stack_type,
                title: title.to_string(),
                count: count.parse().ok()?,
            })
        });
        match stack {
            Some(marker) if marker.body() == body => marker,
            _ => Marker::Task {
                text: body.to_string(),
            },
        }
    }

    fn body(&self) -> String {
        match self {
            Marker::Task { text } => text.clone(),
            Marker::Stack {
                stack_type,
                title,
                count,
            } => {
                let noun = if *count == 1 { "task" } else { "tasks" };
                format!("{}: {} · {} {}", stack_type.as_str(), title, count, noun)
            }
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", MARKER_OPEN, self.body(), MARKER_CLOSE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Span {
    Text {
        text: String,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        italic: bool,
    },
    Marker {
        marker: Marker,
    },
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, false, false)
    }

    pub fn styled(text: impl Into<String>, bold: bool, italic: bool) -> Self {
        Span::Text {
            text: text.into(),
            bold,
            italic,
        }
    }

    pub fn marker(marker: Marker) -> Self {
        Span::Marker { marker }
    }

    fn rendered_len(&self) -> usize {
        match self {
            Span::Text { text, .. } => text.len(),
            Span::Marker { marker } => marker.to_string().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    /// `Some(checked)` for a checkbox item.
    #[serde(default)]
    pub checkbox: Option<bool>,
    pub spans: Vec<Span>,
}

impl ListItem {
    fn prefix(&self) -> &'static str {
        match self.checkbox {
            None => "- ",
            Some(false) => "- [ ] ",
            Some(true) => "- [x] ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph { spans: Vec<Span> },
    List { items: Vec<ListItem> },
    Quote { blocks: Vec<Block> },
    /// A processed stack block, standing alone on its line.
    Marker { marker: Marker },
}

/// Where one projected line came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSource {
    /// Byte range of the line in the projected text.
    pub range: Range<usize>,
    /// Block indices from the root, descending through quotes.
    pub path: Vec<usize>,
    pub item: Option<usize>,
    /// Bytes of list prefix before the item's spans.
    pub prefix: usize,
    /// Offset of the line's first span byte within its block's spans,
    /// non-zero after a soft break.
    pub offset: usize,
}

impl LineSource {
    /// Path of the block list holding this line's block.
    pub fn container(&self) -> &[usize] {
        match self.path.split_last() {
            Some((_, parent)) => parent,
            None => &[],
        }
    }

    fn block_index(&self) -> Option<usize> {
        self.path.last().copied()
    }
}

/// The flattened text the scanner reads: block boundaries are newlines,
/// list items carry `- ` / `- [ ] ` / `- [x] ` prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub text: String,
    pub markers: Vec<(Range<usize>, Marker)>,
    pub lines: Vec<LineSource>,
}

impl Projection {
    pub fn in_marker(&self, pos: usize) -> bool {
        self.markers.iter().any(|(range, _)| range.contains(&pos))
    }

    pub fn has_marker(&self, marker: impl Fn(&Marker) -> bool) -> bool {
        self.markers.iter().any(|(_, m)| marker(m))
    }

    fn begin_line(&mut self, path: &[usize], item: Option<usize>, prefix: usize, offset: usize) {
        if !self.lines.is_empty() {
            self.text.push('\n');
        }
        let start = self.text.len();
        self.lines.push(LineSource {
            range: start..start,
            path: path.to_vec(),
            item,
            prefix,
            offset,
        });
    }

    fn end_line(&mut self) {
        let end = self.text.len();
        if let Some(line) = self.lines.last_mut() {
            line.range.end = end;
        }
    }

    fn push_marker(&mut self, marker: &Marker) {
        let start = self.text.len();
        self.text.push_str(&marker.to_string());
        self.markers.push((start..self.text.len(), marker.clone()));
    }

    fn push_spans(&mut self, spans: &[Span], path: &[usize], item: Option<usize>, prefix: &str) {
        self.begin_line(path, item, prefix.len(), 0);
        self.text.push_str(prefix);
        let mut offset = 0;
        for span in spans {
            match span {
                Span::Text { text, .. } => {
                    for (i, piece) in text.split('\n').enumerate() {
                        if i > 0 {
                            offset += 1;
                            self.end_line();
                            self.begin_line(path, item, 0, offset);
                        }
                        self.text.push_str(piece);
                        offset += piece.len();
                    }
                }
                Span::Marker { marker } => {
                    self.push_marker(marker);
                    offset += span.rendered_len();
                }
            }
        }
        self.end_line();
    }

    fn push_blocks(&mut self, blocks: &[Block], path: &mut Vec<usize>) {
        for (idx, block) in blocks.iter().enumerate() {
            path.push(idx);
            match block {
                Block::Heading { spans, .. } | Block::Paragraph { spans } => {
                    self.push_spans(spans, path, None, "");
                }
                Block::List { items } => {
                    for (item_idx, item) in items.iter().enumerate() {
                        self.push_spans(&item.spans, path, Some(item_idx), item.prefix());
                    }
                }
                Block::Quote { blocks } => self.push_blocks(blocks, path),
                Block::Marker { marker } => {
                    self.begin_line(path, None, 0, 0);
                    self.push_marker(marker);
                    self.end_line();
                }
            }
            path.pop();
        }
    }
}

/// Replace `range` of a [`Projection`] with `marker`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub range: Range<usize>,
    pub marker: Marker,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDocument {
    pub blocks: Vec<Block>,
}

impl PlanDocument {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// One paragraph per line. Rendered markers are read back as marker
    /// nodes, and a line holding nothing but a stack marker becomes a
    /// marker block.
    pub fn from_plain_text(text: &str) -> Self {
        Self {
            blocks: text.split('\n').map(line_block).collect(),
        }
    }

    pub fn project(&self) -> Projection {
        let mut projection = Projection::default();
        projection.push_blocks(&self.blocks, &mut Vec::new());
        projection
    }

    pub fn plain_text(&self) -> String {
        self.project().text
    }

    /// Turn soft breaks inside headings and paragraphs into block
    /// boundaries. The projection is unchanged, but every projected line
    /// then maps to a whole block or list item.
    pub fn split_soft_breaks(&mut self) {
        split_blocks(&mut self.blocks);
    }

    /// Write patches scanned from `projection` (taken from this document
    /// as it is now) into the tree. Overlapping or misaligned patches are
    /// skipped; returns how many were applied.
    pub fn apply_patches(&mut self, projection: &Projection, patches: &[Patch]) -> usize {
        let mut sorted: Vec<&Patch> = patches.iter().collect();
        sorted.sort_by_key(|p| p.range.start);

        let mut accepted = Vec::with_capacity(sorted.len());
        let mut cursor = 0;
        for patch in sorted {
            let Range { start, end } = patch.range;
            if start < cursor || start >= end || end > projection.text.len() {
                tracing::warn!(start, end, "Skipping invalid plan patch");
                continue;
            }
            cursor = end;
            accepted.push(patch);
        }

        // Back to front, so earlier block indices stay valid.
        let mut applied = 0;
        for patch in accepted.into_iter().rev() {
            let done = match patch.marker {
                Marker::Task { .. } => self.patch_inline(projection, patch),
                Marker::Stack { .. } => self.patch_blocks(projection, patch),
            };
            if done {
                applied += 1;
            } else {
                tracing::warn!(
                    start = patch.range.start,
                    end = patch.range.end,
                    "Plan patch does not line up with the document"
                );
            }
        }
        applied
    }

    fn patch_inline(&mut self, projection: &Projection, patch: &Patch) -> bool {
        let Some(line) = projection
            .lines
            .iter()
            .find(|l| l.range.start + l.prefix <= patch.range.start && patch.range.end <= l.range.end)
        else {
            return false;
        };
        let shift = line.range.start + line.prefix;
        let local = patch.range.start - shift + line.offset..patch.range.end - shift + line.offset;
        match spans_mut(&mut self.blocks, &line.path, line.item) {
            Some(spans) => splice_marker(spans, local, &patch.marker),
            None => false,
        }
    }

    fn patch_blocks(&mut self, projection: &Projection, patch: &Patch) -> bool {
        let lines = &projection.lines;
        let Some(first) = lines.iter().position(|l| l.range.start == patch.range.start) else {
            return false;
        };
        let Some(last) = lines.iter().position(|l| l.range.end == patch.range.end) else {
            return false;
        };
        if last < first {
            return false;
        }

        let covered = &lines[first..=last];
        let container = covered[0].container();
        if covered.iter().any(|l| l.container() != container) {
            return false;
        }
        // Every touched block must be covered whole.
        let splits_block = |neighbour: Option<&LineSource>, edge: &LineSource| {
            neighbour.is_some_and(|n| n.path == edge.path)
        };
        if splits_block(first.checked_sub(1).and_then(|i| lines.get(i)), &covered[0])
            || splits_block(lines.get(last + 1), &covered[covered.len() - 1])
        {
            return false;
        }

        let (Some(from), Some(to)) = (covered[0].block_index(), covered[covered.len() - 1].block_index()) else {
            return false;
        };
        let Some(blocks) = container_mut(&mut self.blocks, container) else {
            return false;
        };
        if to >= blocks.len() {
            return false;
        }
        blocks.splice(
            from..=to,
            [Block::Marker {
                marker: patch.marker.clone(),
            }],
        );
        true
    }
}

fn line_block(line: &str) -> Block {
    let spans = tokenize_markers(line);
    match spans.as_slice() {
        [Span::Marker { marker }] if matches!(marker, Marker::Stack { .. }) => Block::Marker {
            marker: marker.clone(),
        },
        _ => Block::Paragraph { spans },
    }
}

/// Split a line into text and marker spans. Brackets inside a marker body
/// nest, so `[✓ see [1]]` is one marker.
fn tokenize_markers(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = line;
    while let Some(start) = rest.find(MARKER_OPEN) {
        let body_start = start + MARKER_OPEN.len();
        let Some(body_len) = closing_bracket(&rest[body_start..]) else {
            break;
        };
        if start > 0 {
            spans.push(Span::plain(&rest[..start]));
        }
        let body = &rest[body_start..body_start + body_len];
        spans.push(Span::marker(Marker::from_body(body)));
        rest = &rest[body_start + body_len + MARKER_CLOSE.len_utf8()..];
    }
    if !rest.is_empty() || spans.is_empty() {
        spans.push(Span::plain(rest));
    }
    spans
}

fn closing_bracket(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (pos, ch) in body.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' if depth == 0 => return Some(pos),
            ']' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn split_spans(spans: Vec<Span>) -> Vec<Vec<Span>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    for span in spans {
        match span {
            Span::Text { text, bold, italic } if text.contains('\n') => {
                for (i, piece) in text.split('\n').enumerate() {
                    if i > 0 {
                        lines.push(std::mem::take(&mut current));
                    }
                    if !piece.is_empty() {
                        current.push(Span::styled(piece, bold, italic));
                    }
                }
            }
            other => current.push(other),
        }
    }
    lines.push(current);
    lines
}

fn split_blocks(blocks: &mut Vec<Block>) {
    let mut out = Vec::with_capacity(blocks.len());
    for block in blocks.drain(..) {
        match block {
            Block::Paragraph { spans } => {
                out.extend(split_spans(spans).into_iter().map(|spans| Block::Paragraph { spans }));
            }
            Block::Heading { level, spans } => {
                out.extend(
                    split_spans(spans)
                        .into_iter()
                        .map(|spans| Block::Heading { level, spans }),
                );
            }
            Block::Quote { mut blocks } => {
                split_blocks(&mut blocks);
                out.push(Block::Quote { blocks });
            }
            other => out.push(other),
        }
    }
    *blocks = out;
}

fn container_mut<'a>(blocks: &'a mut Vec<Block>, path: &[usize]) -> Option<&'a mut Vec<Block>> {
    match path.split_first() {
        None => Some(blocks),
        Some((idx, rest)) => match blocks.get_mut(*idx)? {
            Block::Quote { blocks } => container_mut(blocks, rest),
            _ => None,
        },
    }
}

fn spans_mut<'a>(blocks: &'a mut Vec<Block>, path: &[usize], item: Option<usize>) -> Option<&'a mut Vec<Span>> {
    let (idx, parent) = path.split_last()?;
    let block = container_mut(blocks, parent)?.get_mut(*idx)?;
    match (block, item) {
        (Block::Heading { spans, .. } | Block::Paragraph { spans }, None) => Some(spans),
        (Block::List { items }, Some(item)) => items.get_mut(item).map(|i| &mut i.spans),
        _ => None,
    }
}

/// Replace the rendered byte range `range` of `spans` with a marker span.
/// Refuses ranges that cut into an existing marker or a character.
fn splice_marker(spans: &mut Vec<Span>, range: Range<usize>, marker: &Marker) -> bool {
    let mut pos = 0;
    for span in spans.iter() {
        let (start, end) = (pos, pos + span.rendered_len());
        pos = end;
        if end <= range.start || start >= range.end {
            continue;
        }
        match span {
            Span::Marker { .. } => return false,
            Span::Text { text, .. } => {
                let cut_start = range.start.saturating_sub(start);
                let cut_end = (range.end - start).min(text.len());
                if !text.is_char_boundary(cut_start) || !text.is_char_boundary(cut_end) {
                    return false;
                }
            }
        }
    }
    if range.end > pos {
        return false;
    }

    let mut out = Vec::with_capacity(spans.len() + 2);
    let mut placed = false;
    let mut pos = 0;
    for span in spans.drain(..) {
        let (start, end) = (pos, pos + span.rendered_len());
        pos = end;
        match span {
            Span::Text { text, bold, italic } if end > range.start && start < range.end => {
                let head = &text[..range.start.saturating_sub(start)];
                let tail = &text[(range.end - start).min(text.len())..];
                if !head.is_empty() {
                    out.push(Span::styled(head, bold, italic));
                }
                if !placed {
                    out.push(Span::marker(marker.clone()));
                    placed = true;
                }
                if !tail.is_empty() {
                    out.push(Span::styled(tail, bold, italic));
                }
            }
            other => out.push(other),
        }
    }
    *spans = out;
    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn morning_plan() -> PlanDocument {
        PlanDocument::new(vec![
            Block::Paragraph {
                spans: vec![Span::plain("plan")],
            },
            Block::Paragraph {
                spans: vec![Span::plain("seq: Morning")],
            },
            Block::List {
                items: vec![
                    ListItem {
                        checkbox: None,
                        spans: vec![Span::plain("wake up")],
                    },
                    ListItem {
                        checkbox: Some(false),
                        spans: vec![Span::plain("stretch")],
                    },
                ],
            },
            Block::Paragraph {
                spans: vec![Span::plain("/")],
            },
        ])
    }

    #[test]
    fn test_plain_text_projection() {
        let doc = PlanDocument::new(vec![
            Block::Heading {
                level: 1,
                spans: vec![Span::plain("Today")],
            },
            Block::Paragraph {
                spans: vec![Span::plain("Call "), Span::styled("mum", true, false)],
            },
            Block::List {
                items: vec![
                    ListItem {
                        checkbox: None,
                        spans: vec![Span::plain("plain")],
                    },
                    ListItem {
                        checkbox: Some(false),
                        spans: vec![Span::plain("open")],
                    },
                    ListItem {
                        checkbox: Some(true),
                        spans: vec![Span::plain("done")],
                    },
                ],
            },
            Block::Quote {
                blocks: vec![Block::Paragraph {
                    spans: vec![Span::plain("quoted")],
                }],
            },
        ]);

        let projection = doc.project();
        assert_eq!(
            projection.text,
            "Today\nCall mum\n- plain\n- [ ] open\n- [x] done\nquoted"
        );
        assert_eq!(projection.lines.len(), 6);
        assert_eq!(projection.lines[3].item, Some(1));
        assert_eq!(projection.lines[3].prefix, "- [ ] ".len());
        assert_eq!(projection.lines[5].path, vec![3, 0]);
        assert_eq!(projection.lines[5].container(), &[3]);
    }

    #[test]
    fn test_from_plain_text_projects_back() {
        let text = "seq: Morning\n- wake\n\n/\n[✓ group: Garden · 2 tasks]\nsee [✓ call (mum)] later";
        let doc = PlanDocument::from_plain_text(text);
        assert_eq!(doc.plain_text(), text);
        assert!(matches!(doc.blocks[4], Block::Marker { .. }));

        let projection = doc.project();
        let markers: Vec<_> = projection.markers.iter().map(|(_, m)| m.clone()).collect();
        assert_eq!(
            markers,
            vec![
                Marker::Stack {
                    stack_type: StackType::Group,
                    title: "Garden".into(),
                    count: 2,
                },
                Marker::task("call (mum)"),
            ]
        );
        let (range, _) = &projection.markers[1];
        assert_eq!(&text[range.clone()], "[✓ call (mum)]");
    }

    #[test]
    fn test_marker_body_round_trip() {
        let stack = Marker::Stack {
            stack_type: StackType::Sequential,
            title: "Morning".into(),
            count: 1,
        };
        assert_eq!(stack.to_string(), "[✓ seq: Morning · 1 task]");
        assert_eq!(Marker::from_body("seq: Morning · 1 task"), stack);
        assert_eq!(
            Marker::from_body("seq: Morning · 1 tasks"),
            Marker::task("seq: Morning · 1 tasks")
        );
        assert_eq!(
            PlanDocument::from_plain_text("[✓ see [1]] ok").project().markers[0].1,
            Marker::task("see [1]")
        );
    }

    #[test]
    fn test_inline_patch_keeps_styles() {
        let mut doc = PlanDocument::new(vec![Block::Paragraph {
            spans: vec![Span::plain("Call "), Span::styled("(mum) now", true, false)],
        }]);
        let projection = doc.project();
        let patch = Patch {
            range: 5..10,
            marker: Marker::task("mum"),
        };
        assert_eq!(doc.apply_patches(&projection, &[patch]), 1);
        assert_eq!(
            doc.blocks[0],
            Block::Paragraph {
                spans: vec![
                    Span::plain("Call "),
                    Span::marker(Marker::task("mum")),
                    Span::styled(" now", true, false),
                ],
            }
        );
        assert_eq!(doc.plain_text(), "Call [✓ mum] now");
    }

    #[test]
    fn test_inline_patch_in_list_item_and_after_soft_break() {
        let mut doc = PlanDocument::new(vec![
            Block::List {
                items: vec![ListItem {
                    checkbox: Some(false),
                    spans: vec![Span::plain("buy (milk)")],
                }],
            },
            Block::Paragraph {
                spans: vec![Span::plain("first\nthen (post)")],
            },
        ]);
        let projection = doc.project();
        let text = projection.text.clone();
        let patches = vec![
            Patch {
                range: text.find("(milk)").unwrap()..text.find("(milk)").unwrap() + 6,
                marker: Marker::task("milk"),
            },
            Patch {
                range: text.find("(post)").unwrap()..text.len(),
                marker: Marker::task("post"),
            },
        ];
        assert_eq!(doc.apply_patches(&projection, &patches), 2);
        assert_eq!(doc.plain_text(), "- [ ] buy [✓ milk]\nfirst\nthen [✓ post]");
    }

    #[test]
    fn test_block_patch_replaces_whole_blocks() {
        let mut doc = morning_plan();
        let projection = doc.project();
        let start = projection.lines[1].range.start;
        let marker = Marker::Stack {
            stack_type: StackType::Sequential,
            title: "Morning".into(),
            count: 2,
        };
        let patch = Patch {
            range: start..projection.text.len(),
            marker: marker.clone(),
        };

        assert_eq!(doc.apply_patches(&projection, &[patch]), 1);
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[1], Block::Marker { marker });
        assert_eq!(doc.plain_text(), "plan\n[✓ seq: Morning · 2 tasks]");
    }

    #[test]
    fn test_block_patch_refuses_partial_block() {
        let mut doc = PlanDocument::new(vec![Block::Paragraph {
            spans: vec![Span::plain("intro\nseq: A\n- x\n/")],
        }]);
        let before = doc.clone();
        let projection = doc.project();
        let patch = Patch {
            range: projection.lines[1].range.start..projection.text.len(),
            marker: Marker::Stack {
                stack_type: StackType::Sequential,
                title: "A".into(),
                count: 1,
            },
        };
        assert_eq!(doc.apply_patches(&projection, &[patch.clone()]), 0);
        assert_eq!(doc, before);

        doc.split_soft_breaks();
        assert_eq!(doc.blocks.len(), 4);
        let projection = doc.project();
        assert_eq!(doc.apply_patches(&projection, &[patch]), 1);
        assert_eq!(doc.plain_text(), "intro\n[✓ seq: A · 1 task]");
    }

    #[test]
    fn test_patch_into_marker_is_refused() {
        let mut doc = PlanDocument::from_plain_text("[✓ call (mum)]");
        let projection = doc.project();
        let inner = projection.text.find("(mum)").unwrap();
        let patch = Patch {
            range: inner..inner + 5,
            marker: Marker::task("mum"),
        };
        assert_eq!(doc.apply_patches(&projection, &[patch]), 0);
        assert_eq!(doc.plain_text(), "[✓ call (mum)]");
    }

    #[test]
    fn test_overlapping_patches_skipped() {
        let mut doc = PlanDocument::from_plain_text("(a (b) c)");
        let projection = doc.project();
        let patches = vec![
            Patch {
                range: 0..9,
                marker: Marker::task("a (b) c"),
            },
            Patch {
                range: 3..6,
                marker: Marker::task("b"),
            },
        ];
        assert_eq!(doc.apply_patches(&projection, &patches), 1);
        assert_eq!(doc.plain_text(), "[✓ a (b) c]");
    }
}
