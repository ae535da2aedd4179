use serde::{Deserialize, Serialize};

use super::{Entry, EntryKind};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMeta {
    pub full_name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub default_branch: String,

    /// Approximate repository size as reported by the remote, in KiB.
    #[serde(default)]
    pub size_kib: u64,
}

/// One immutable listing of the managed subtree. Replaced wholesale on refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub files: Vec<Entry>,
    pub directories: Vec<Entry>,
    pub branch: String,
    pub repo: RepoMeta,

    #[serde(default)]
    pub truncated: bool,
}

impl Snapshot {
    pub fn entry(&self, path: &str) -> Option<&Entry> {
        self.directories
            .iter()
            .chain(self.files.iter())
            .find(|e| e.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entry(path).is_some()
    }

    pub fn kind_of(&self, path: &str) -> Option<EntryKind> {
        self.entry(path).map(|e| e.kind)
    }

    /// A path is a directory when the listing has a tree entry for it, or when any file
    /// lives beneath it.
    pub fn is_directory(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        if self.directories.iter().any(|d| d.path == path) {
            return true;
        }
        let prefix = format!("{}/", path);
        self.files.iter().any(|f| f.path.starts_with(&prefix))
    }

    /// Files strictly beneath `dir`, in listing order.
    pub fn files_under(&self, dir: &str) -> Vec<&Entry> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        self.files
            .iter()
            .filter(|f| f.path.starts_with(&prefix))
            .collect()
    }

    pub fn total_file_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}
