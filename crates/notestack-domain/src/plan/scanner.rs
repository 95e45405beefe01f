//! Line tokenizer and the two block matchers over a plan's projection.
//!
//! Matching is purely textual apart from markers, which the projection
//! reports structurally. Creating notes from matches is the parser's job.
//! All ranges are byte offsets into the projected text.

use std::ops::Range;

use super::document::Projection;
use crate::stack::StackType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    StackHeader { kind: StackType, title: &'a str },
    Bullet { text: &'a str },
    Trigger,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    pub text: &'a str,
    /// Byte range of the line, excluding its newline.
    pub range: Range<usize>,
    /// Block list the line belongs to; a stack block never spans two.
    pub container: &'a [usize],
    pub kind: LineKind<'a>,
}

fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed == "/" {
        return LineKind::Trigger;
    }
    if let Some(rest) = trimmed.strip_prefix('-') {
        return LineKind::Bullet {
            text: strip_checkbox(rest.trim_start()),
        };
    }
    for (prefix, kind) in [("seq:", StackType::Sequential), ("group:", StackType::Group)] {
        if let Some(title) = trimmed.strip_prefix(prefix) {
            let title = title.trim();
            if !title.is_empty() {
                return LineKind::StackHeader { kind, title };
            }
        }
    }
    LineKind::Other
}

fn strip_checkbox(text: &str) -> &str {
    for prefix in ["[ ]", "[x]", "[X]"] {
        if let Some(rest) = text.strip_prefix(prefix) {
            return rest.trim_start();
        }
    }
    text
}

pub(crate) fn lines(projection: &Projection) -> Vec<Line<'_>> {
    projection
        .lines
        .iter()
        .map(|source| {
            let text = &projection.text[source.range.clone()];
            Line {
                text,
                range: source.range.clone(),
                container: source.container(),
                kind: classify(text),
            }
        })
        .collect()
}

/// `seq:`/`group:` header, one or more bullets, then a lone `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackBlock<'a> {
    pub kind: StackType,
    pub title: &'a str,
    pub bullets: Vec<&'a str>,
    /// From the header's first byte through the end of the trigger line.
    pub range: Range<usize>,
}

pub fn find_stack_blocks(projection: &Projection) -> Vec<StackBlock<'_>> {
    let lines = lines(projection);
    let mut blocks = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        let LineKind::StackHeader { kind, title } = lines[idx].kind else {
            idx += 1;
            continue;
        };

        let mut bullets = Vec::new();
        let mut next = idx + 1;
        let container = lines[idx].container;
        while let Some(line) = lines.get(next).filter(|l| l.container == container) {
            let LineKind::Bullet { text } = line.kind else {
                break;
            };
            bullets.push(text);
            next += 1;
        }

        match lines.get(next) {
            Some(line)
                if line.kind == LineKind::Trigger
                    && line.container == container
                    && !bullets.is_empty() =>
            {
                blocks.push(StackBlock {
                    kind,
                    title,
                    bullets,
                    range: lines[idx].range.start..line.range.end,
                });
                idx = next + 1;
            }
            // Incomplete block; the next header may still start a real one.
            _ => idx += 1,
        }
    }

    blocks
}

/// A single-line `( ... )` directive. `inner` excludes the parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMatch<'a> {
    pub inner: &'a str,
    pub range: Range<usize>,
}

/// Find parenthesised tasks outside `skip` regions and outside markers.
/// Unclosed parentheses are not tasks; of nested pairs only the innermost
/// one is.
pub fn find_tasks<'a>(projection: &'a Projection, skip: &[Range<usize>]) -> Vec<TaskMatch<'a>> {
    let mut found = Vec::new();

    for line in lines(projection) {
        if skip
            .iter()
            .any(|r| r.start < line.range.end && line.range.start < r.end)
        {
            continue;
        }
        let base = line.range.start;
        let mut open: Option<usize> = None;

        for (pos, ch) in line.text.char_indices() {
            if projection.in_marker(base + pos) {
                open = None;
                continue;
            }
            match ch {
                '(' => open = Some(pos),
                ')' => {
                    if let Some(start) = open.take() {
                        found.push(TaskMatch {
                            inner: &line.text[start + 1..pos],
                            range: base + start..base + pos + 1,
                        });
                    }
                }
                _ => {}
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::document::{Block, ListItem, PlanDocument, Span};

    fn project(text: &str) -> Projection {
        PlanDocument::from_plain_text(text).project()
    }

    #[test]
    fn test_classify_lines() {
        assert_eq!(
            classify("seq: Morning"),
            LineKind::StackHeader {
                kind: StackType::Sequential,
                title: "Morning"
            }
        );
        assert_eq!(
            classify("  group:  Errands "),
            LineKind::StackHeader {
                kind: StackType::Group,
                title: "Errands"
            }
        );
        assert_eq!(classify("seq:"), LineKind::Other);
        assert_eq!(classify("- [ ] stretch 10m"), LineKind::Bullet { text: "stretch 10m" });
        assert_eq!(classify("-run"), LineKind::Bullet { text: "run" });
        assert_eq!(classify(" / "), LineKind::Trigger);
        assert_eq!(classify("/ not a trigger"), LineKind::Other);
    }

    #[test]
    fn test_line_ranges() {
        let projection = project("ab\n\ncde");
        let ranges: Vec<_> = lines(&projection).into_iter().map(|l| l.range).collect();
        assert_eq!(ranges, vec![0..2, 3..3, 4..7]);
    }

    #[test]
    fn test_find_stack_block() {
        let text = "intro\nseq: Morning\n- wake up\n- [ ] stretch 10m\n/\noutro";
        let projection = project(text);
        let blocks = find_stack_blocks(&projection);
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.kind, StackType::Sequential);
        assert_eq!(block.title, "Morning");
        assert_eq!(block.bullets, vec!["wake up", "stretch 10m"]);
        assert_eq!(&text[block.range.clone()], "seq: Morning\n- wake up\n- [ ] stretch 10m\n/");
    }

    #[test]
    fn test_stack_block_needs_bullets_and_trigger() {
        assert!(find_stack_blocks(&project("seq: A\n/")).is_empty());
        assert!(find_stack_blocks(&project("seq: A\n- one\n- two")).is_empty());
        assert!(find_stack_blocks(&project("seq: A\n- one\nbreak\n/")).is_empty());

        let projection = project("group: A\n- x\nseq: B\n- y\n/");
        let blocks = find_stack_blocks(&projection);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].title, "B");
    }

    #[test]
    fn test_stack_block_stays_inside_one_container() {
        let doc = PlanDocument::new(vec![
            Block::Quote {
                blocks: vec![Block::Paragraph {
                    spans: vec![Span::plain("seq: Quoted")],
                }],
            },
            Block::List {
                items: vec![ListItem {
                    checkbox: None,
                    spans: vec![Span::plain("x")],
                }],
            },
            Block::Paragraph {
                spans: vec![Span::plain("/")],
            },
        ]);
        let projection = doc.project();
        assert_eq!(projection.text, "seq: Quoted\n- x\n/");
        assert!(find_stack_blocks(&projection).is_empty());
    }

    #[test]
    fn test_find_tasks() {
        let text = "call (dentist 10m) and (buy milk --p)\n(unclosed\n((nested))";
        let projection = project(text);
        let tasks = find_tasks(&projection, &[]);
        let inners: Vec<_> = tasks.iter().map(|t| t.inner).collect();
        assert_eq!(inners, vec!["dentist 10m", "buy milk --p", "nested"]);
        assert_eq!(&text[tasks[0].range.clone()], "(dentist 10m)");
    }

    #[test]
    fn test_find_tasks_skips_markers_and_regions() {
        let text = "done [✓ call (mum)] next (email)\n- (inside stack)";
        let second_line = text.find('\n').unwrap() + 1;
        let skip = vec![second_line..text.len()];
        let projection = project(text);
        let inners: Vec<_> = find_tasks(&projection, &skip).iter().map(|t| t.inner).collect();
        assert_eq!(inners, vec!["email"]);
    }
}
