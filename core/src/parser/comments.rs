//! Comment grouping and doc/line comment lookup.
//!
//! Adjacent comments form a group when only whitespace separates them. A
//! group that starts after code on the same line is a trailing group and
//! only extends along that line; any other group may continue on the next
//! line but a blank line ends it. A non-trailing group that ends on the
//! line right before a declaration is its doc comment; a trailing group
//! that starts on the line a spec or field ends is its line comment.

use bumpalo::Bump;

use crate::Vec;
use crate::ast::{Comment, CommentGroup, Span};

struct Group<'a> {
    node: &'a CommentGroup<'a>,
    start: usize,
    end: usize,
    trailing: bool,
}

#[derive(Default)]
pub(super) struct CommentIndex<'a> {
    source: &'a str,
    groups: Vec<Group<'a>>,
}

impl<'a> CommentIndex<'a> {
    /// Groups `comments` (spans into `source`, in order). `masked` is the
    /// source with comments blanked out.
    pub fn build(arena: &'a Bump, source: &'a str, masked: &str, comments: &[Span]) -> Self {
        let mut index = CommentIndex {
            source,
            groups: Vec::new(),
        };
        let mut run: Vec<&Span> = Vec::new();
        let mut trailing = false;

        for span in comments {
            if let Some(last) = run.last() {
                let between = &source[last.end()..span.start()];
                let lines = between.matches('\n').count();
                let joined = between.trim().is_empty() && lines <= usize::from(!trailing);
                if !joined {
                    index.push(arena, &run, trailing);
                    run.clear();
                }
            }
            if run.is_empty() {
                trailing = after_code(source, masked, span.start());
            }
            run.push(span);
        }
        if !run.is_empty() {
            index.push(arena, &run, trailing);
        }
        index
    }

    fn push(&mut self, arena: &'a Bump, run: &[&Span], trailing: bool) {
        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            return;
        };
        let mut list: Vec<&'a Comment<'a>> = Vec::with_capacity(run.len());
        for span in run {
            list.push(arena.alloc(Comment {
                text: span.str_of(self.source),
            }));
        }
        let node = arena.alloc(CommentGroup {
            list: arena.alloc_slice_copy(&list),
            text: &self.source[first.start()..last.end()],
        });
        self.groups.push(Group {
            node,
            start: first.start(),
            end: last.end(),
            trailing,
        });
    }

    /// All groups in source order.
    pub fn groups(&self) -> Vec<&'a CommentGroup<'a>> {
        self.groups.iter().map(|group| group.node).collect()
    }

    /// The doc comment of a declaration starting at `start`.
    pub fn lead(&self, start: usize) -> Option<&'a CommentGroup<'a>> {
        let idx = self.groups.partition_point(|group| group.end <= start);
        let group = self.groups.get(idx.checked_sub(1)?)?;
        let between = &self.source[group.end..start];
        (!group.trailing && between.trim().is_empty() && between.matches('\n').count() == 1)
            .then_some(group.node)
    }

    /// The line comment of a spec or field ending at `end`.
    pub fn line(&self, end: usize) -> Option<&'a CommentGroup<'a>> {
        let idx = self.groups.partition_point(|group| group.start < end);
        let group = self.groups.get(idx)?;
        let between = &self.source[end..group.start];
        let rest_of_line = self.source[group.end..].split('\n').next().unwrap_or_default();
        (group.trailing
            && between.chars().all(|c| matches!(c, ' ' | '\t' | ',' | ';'))
            && rest_of_line.trim().is_empty())
        .then_some(group.node)
    }
}

/// Whether code precedes `pos` on its line.
fn after_code(source: &str, masked: &str, pos: usize) -> bool {
    let line_start = source[..pos].rfind('\n').map_or(0, |i| i + 1);
    !masked[line_start..pos].trim().is_empty()
}
