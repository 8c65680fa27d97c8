//! Three-way decisions over materialized file maps.

use std::collections::BTreeSet;

use dep_types::FileMap;

/// What to do with one path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Only the target changed the file. `None` means the target deleted it.
    Take(Option<String>),
    /// Both sides changed the file differently.
    Conflict(String),
}

/// Per-path merge decisions, in path order. Paths that need no action are
/// absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergePlan {
    pub entries: Vec<(String, Resolution)>,
}

impl MergePlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|(path, r)| match r {
            Resolution::Conflict(_) => Some(path.as_str()),
            Resolution::Take(_) => None,
        })
    }

    pub fn taken(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|(path, r)| match r {
            Resolution::Take(_) => Some(path.as_str()),
            Resolution::Conflict(_) => None,
        })
    }
}

/// The text written in place of a conflicting file. A missing side
/// contributes an empty string.
pub fn conflict_block(active: Option<&str>, target: Option<&str>, target_branch: &str) -> String {
    format!(
        "<<<<<<< active\n{}\n=======\n{}\n>>>>>>> {}",
        active.unwrap_or(""),
        target.unwrap_or(""),
        target_branch
    )
}

/// Decide every path in `active ∪ target`.
///
/// - same on both sides: nothing
/// - active unchanged from base, target changed: take target
/// - both changed from base, differently: conflict
/// - only active changed: nothing
pub fn plan_merge(base: &FileMap, active: &FileMap, target: &FileMap, target_branch: &str) -> MergePlan {
    let paths: BTreeSet<&String> = active.keys().chain(target.keys()).collect();
    let mut entries = Vec::new();

    for path in paths {
        let b = base.get(path).map(String::as_str);
        let a = active.get(path).map(String::as_str);
        let t = target.get(path).map(String::as_str);

        if a == t {
            continue;
        }
        if b == a {
            entries.push((path.clone(), Resolution::Take(t.map(str::to_string))));
        } else if b != t {
            entries.push((
                path.clone(),
                Resolution::Conflict(conflict_block(a, t, target_branch)),
            ));
        }
    }

    MergePlan { entries }
}
