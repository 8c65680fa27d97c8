//! The repository pointer (`dep.json`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::object::CommitHash;

/// Branch created by `init`.
pub const DEFAULT_BRANCH: &str = "main";

/// Top-level repository state: which branch/commit the working directory
/// reflects, where the remote lives, and user configuration.
///
/// Invariant: a non-null `active.parent` appears in `active.branch`'s
/// manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoPointer {
    pub active: ActiveRef,
    #[serde(default)]
    pub remote: String,
    #[serde(default)]
    pub configuration: Configuration,
}

impl RepoPointer {
    /// Pointer for a freshly initialized repository.
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            active: ActiveRef {
                branch: branch.into(),
                parent: None,
            },
            remote: String::new(),
            configuration: Configuration::default(),
        }
    }
}

impl Default for RepoPointer {
    fn default() -> Self {
        Self::new(DEFAULT_BRANCH)
    }
}

/// The checked-out branch and the last commit applied to the working tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRef {
    pub branch: String,
    pub parent: Option<CommitHash>,
}

/// User configuration stored alongside the pointer.
///
/// `handle` and `personalAccessToken` are always present; any other key set
/// through `config` is kept in `extra` and round-trips untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub handle: String,
    #[serde(default, rename = "personalAccessToken")]
    pub personal_access_token: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Configuration {
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "handle" => Some(self.handle.as_str()),
            "personalAccessToken" => Some(self.personal_access_token.as_str()),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            "handle" => self.handle = value,
            "personalAccessToken" => self.personal_access_token = value,
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
    }

    /// The access token, when one is configured.
    pub fn token(&self) -> Option<&str> {
        Some(self.personal_access_token.as_str()).filter(|t| !t.is_empty())
    }

    /// Every key/value pair, fixed keys first.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = vec![
            ("handle".to_string(), self.handle.clone()),
            (
                "personalAccessToken".to_string(),
                self.personal_access_token.clone(),
            ),
        ];
        out.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        out
    }
}
