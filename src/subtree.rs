//! Containment and validation rules for paths inside the managed subtree.

use crate::error::{TreeError, TreeResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subtree {
    root: String,
}

impl Subtree {
    pub fn new(root: &str) -> TreeResult<Self> {
        let root = root.trim_matches('/');
        if root.is_empty() {
            return Err(TreeError::invalid_path(root, "subtree root must not be empty"));
        }
        if root.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
            return Err(TreeError::invalid_path(root, "malformed subtree root"));
        }
        Ok(Self {
            root: root.to_string(),
        })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Exact prefix containment: the root itself or anything under `root/`.
    pub fn contains(&self, path: &str) -> bool {
        path == self.root
            || path
                .strip_prefix(self.root.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// True for paths strictly below the root.
    pub fn contains_strictly(&self, path: &str) -> bool {
        path != self.root && self.contains(path)
    }

    /// Path with the `root/` prefix stripped; the root itself displays as empty.
    pub fn display_name<'a>(&self, path: &'a str) -> &'a str {
        if path == self.root {
            return "";
        }
        path.strip_prefix(self.root.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    }

    /// Validate a mutation target and return it normalized (no trailing separator).
    pub fn validate(&self, path: &str) -> TreeResult<String> {
        if path.is_empty() {
            return Err(TreeError::invalid_path(path, "empty path"));
        }
        if path.starts_with('/') {
            return Err(TreeError::invalid_path(path, "leading separator"));
        }
        let trimmed = path.strip_suffix('/').unwrap_or(path);
        for seg in trimmed.split('/') {
            match seg {
                ".." => return Err(TreeError::invalid_path(path, "parent traversal segment")),
                "" => return Err(TreeError::invalid_path(path, "empty path segment")),
                "." => return Err(TreeError::invalid_path(path, "current-directory segment")),
                _ => {}
            }
        }
        if trimmed == self.root {
            return Err(TreeError::invalid_path(
                path,
                "subtree root itself cannot be mutated",
            ));
        }
        if !self.contains_strictly(trimmed) {
            return Err(TreeError::invalid_path(
                path,
                format!("outside managed subtree {:?}", self.root),
            ));
        }
        Ok(trimmed.to_string())
    }
}

/// Parent of a slash-delimited path, or `None` for a single segment.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

/// Replace `from_prefix` with `to_prefix` on a path known to live under `from_prefix/`.
pub fn rebase(path: &str, from_prefix: &str, to_prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(from_prefix)?.strip_prefix('/')?;
    Some(format!("{}/{}", to_prefix, rest))
}

#[cfg(test)]
#[path = "tests/subtree_tests.rs"]
mod tests;
