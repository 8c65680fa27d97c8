//! Character-level edit scripts.
//!
//! [`compute_diff`] trims the longest common prefix and suffix of the two
//! texts and describes the remaining middle as at most one delete followed by
//! at most one insert. Two disjoint edits collapse into one span covering
//! both; replay is still exact. The format must stay byte-compatible with
//! existing commit and stash payloads, so this is deliberately not a general
//! diff algorithm.
//!
//! Positions and lengths count UTF-16 code units, the unit existing
//! payloads were written in. The common prefix and suffix never split a
//! surrogate pair, so recorded content is always valid text.

use dep_types::{ChangeEntry, EditOp};

/// Describe how to turn `previous` into `current`.
///
/// With no previous version the whole file is recorded as
/// [`ChangeEntry::CreateFile`]. Identical inputs yield an empty edit list.
pub fn compute_diff(previous: Option<&str>, current: &str) -> ChangeEntry {
    let Some(previous) = previous else {
        return ChangeEntry::create(current);
    };

    let old: Vec<u16> = previous.encode_utf16().collect();
    let new: Vec<u16> = current.encode_utf16().collect();
    let shared = old.len().min(new.len());

    let mut prefix = 0;
    while prefix < shared && old[prefix] == new[prefix] {
        prefix += 1;
    }
    if prefix > 0 && is_high_surrogate(old[prefix - 1]) {
        prefix -= 1;
    }

    // The suffix may not reach back into the prefix on either side.
    let mut suffix = 0;
    while suffix < shared - prefix && old[old.len() - 1 - suffix] == new[new.len() - 1 - suffix] {
        suffix += 1;
    }
    if suffix > 0 && is_low_surrogate(old[old.len() - suffix]) {
        suffix -= 1;
    }

    let mut ops = Vec::with_capacity(2);

    let removed = old.len() - prefix - suffix;
    if removed > 0 {
        ops.push(EditOp::Delete {
            position: prefix,
            length: removed,
        });
    }

    let inserted = String::from_utf16_lossy(&new[prefix..new.len() - suffix]);
    if !inserted.is_empty() {
        ops.push(EditOp::Insert {
            position: prefix,
            content: inserted,
        });
    }

    ChangeEntry::Edit(ops)
}

/// Apply a change entry to a file's prior content.
///
/// `None` on either side means "file does not exist". Edits against a missing
/// file start from the empty string.
pub fn apply_diff(content: Option<&str>, entry: &ChangeEntry) -> Option<String> {
    match entry {
        ChangeEntry::CreateFile { content } => Some(content.clone()),
        ChangeEntry::DeleteFile => None,
        ChangeEntry::Edit(ops) => Some(apply_edits(content.unwrap_or(""), ops)),
    }
}

/// Splice a list of edit operations into `content`, in order.
///
/// Positions past the end clamp to the end, and over-long deletes stop at
/// the end of the text. An edit that splits a surrogate pair leaves a
/// replacement character.
pub fn apply_edits(content: &str, ops: &[EditOp]) -> String {
    let mut units: Vec<u16> = content.encode_utf16().collect();

    for op in ops {
        match op {
            EditOp::Insert { position, content } => {
                let at = (*position).min(units.len());
                units.splice(at..at, content.encode_utf16());
            }
            EditOp::Delete { position, length } => {
                let start = (*position).min(units.len());
                let end = position.saturating_add(*length).min(units.len());
                units.drain(start..end);
            }
        }
    }

    String::from_utf16_lossy(&units)
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..0xE000).contains(&unit)
}
