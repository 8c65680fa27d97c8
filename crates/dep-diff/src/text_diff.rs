//! Line-level display diff.
//!
//! Uses the `similar` crate (Myers diff algorithm) to produce structured
//! hunks with context lines. Nothing here is persisted.

use similar::ChangeTag;

/// The result of diffing two versions of a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextDiff {
    pub hunks: Vec<DiffHunk>,
    /// Total number of lines in the old content.
    pub old_lines: usize,
    /// Total number of lines in the new content.
    pub new_lines: usize,
}

impl TextDiff {
    /// Returns `true` if the two versions are identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Total number of lines added across all hunks.
    pub fn additions(&self) -> usize {
        self.count(|l| matches!(l, DiffLine::Added(_)))
    }

    /// Total number of lines removed across all hunks.
    pub fn deletions(&self) -> usize {
        self.count(|l| matches!(l, DiffLine::Removed(_)))
    }

    fn count(&self, pred: impl Fn(&DiffLine) -> bool) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| pred(l))
            .count()
    }
}

/// A contiguous region of changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffHunk {
    /// 1-based start line in the old content.
    pub old_start: usize,
    pub old_count: usize,
    /// 1-based start line in the new content.
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    /// Unified-diff style header, e.g. `@@ -3,4 +3,5 @@`.
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        )
    }
}

/// A single line in a diff hunk, without its trailing newline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

/// Compute a line-by-line diff with three lines of context.
pub fn diff_text(old: &str, new: &str) -> TextDiff {
    let old_lines = old.lines().count();
    let new_lines = new.lines().count();

    if old == new {
        return TextDiff {
            hunks: Vec::new(),
            old_lines,
            new_lines,
        };
    }

    let diff = similar::TextDiff::from_lines(old, new);
    let mut hunks = Vec::new();

    for group in diff.grouped_ops(3) {
        let Some(first) = group.first() else {
            continue;
        };
        let mut hunk = DiffHunk {
            old_start: first.old_range().start + 1,
            old_count: 0,
            new_start: first.new_range().start + 1,
            new_count: 0,
            lines: Vec::new(),
        };

        for op in &group {
            for change in diff.iter_changes(op) {
                let text = change.value().trim_end_matches('\n').to_string();
                match change.tag() {
                    ChangeTag::Equal => {
                        hunk.lines.push(DiffLine::Context(text));
                        hunk.old_count += 1;
                        hunk.new_count += 1;
                    }
                    ChangeTag::Delete => {
                        hunk.lines.push(DiffLine::Removed(text));
                        hunk.old_count += 1;
                    }
                    ChangeTag::Insert => {
                        hunk.lines.push(DiffLine::Added(text));
                        hunk.new_count += 1;
                    }
                }
            }
        }

        hunks.push(hunk);
    }

    TextDiff {
        hunks,
        old_lines,
        new_lines,
    }
}
