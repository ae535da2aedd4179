use std::collections::BTreeSet;

use super::*;

/// Width of the base64 lines in blob payloads.
const BLOB_LINE: usize = 60;

pub(super) struct AppState {
    pub(super) owner: String,
    pub(super) repo: String,
    pub(super) default_branch: String,

    /// Bearer token accepted for authenticated routes.
    pub(super) token: String,

    pub(super) store: RwLock<RepoStore>,
}

impl AppState {
    pub(super) fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub(super) fn is_repo(&self, owner: &str, repo: &str) -> bool {
        owner.eq_ignore_ascii_case(&self.owner) && repo.eq_ignore_ascii_case(&self.repo)
    }
}

/// Files on the single branch, plus every blob ever written so old refs stay readable.
#[derive(Debug, Default)]
pub(super) struct RepoStore {
    files: BTreeMap<String, String>,
    blobs: HashMap<String, Vec<u8>>,
    commits: u64,
}

pub(super) fn blob_sha(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

impl RepoStore {
    pub(super) fn file_sha(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub(super) fn blob(&self, sha: &str) -> Option<&[u8]> {
        self.blobs.get(sha).map(Vec::as_slice)
    }

    pub(super) fn put(&mut self, path: &str, bytes: Vec<u8>) -> String {
        let sha = blob_sha(&bytes);
        self.blobs.insert(sha.clone(), bytes);
        self.files.insert(path.to_string(), sha.clone());
        self.commits += 1;
        sha
    }

    pub(super) fn remove(&mut self, path: &str) -> Option<String> {
        let sha = self.files.remove(path)?;
        self.commits += 1;
        Some(sha)
    }

    pub(super) fn commit_sha(&self) -> String {
        blob_sha(format!("commit {}", self.commits).as_bytes())
    }

    pub(super) fn size_of(&self, sha: &str) -> u64 {
        self.blobs.get(sha).map(|b| b.len() as u64).unwrap_or(0)
    }

    pub(super) fn total_bytes(&self) -> u64 {
        self.files.values().map(|sha| self.size_of(sha)).sum()
    }

    /// Files plus every implied directory, sorted by path.
    pub(super) fn tree_items(&self) -> Vec<TreeItem> {
        let mut dirs = BTreeSet::new();
        for path in self.files.keys() {
            let mut end = 0;
            while let Some(idx) = path[end..].find('/') {
                end += idx;
                dirs.insert(path[..end].to_string());
                end += 1;
            }
        }

        let mut items: Vec<TreeItem> = dirs
            .into_iter()
            .map(|path| TreeItem {
                sha: blob_sha(format!("tree {}", path).as_bytes()),
                path,
                kind: TreeItemKind::Tree,
                size: None,
                mode: Some("040000".to_string()),
            })
            .chain(self.files.iter().map(|(path, sha)| TreeItem {
                path: path.clone(),
                kind: TreeItemKind::Blob,
                size: Some(self.size_of(sha)),
                sha: sha.clone(),
                mode: Some("100644".to_string()),
            }))
            .collect();
        items.sort_by(|a, b| a.path.cmp(&b.path));
        items
    }

    /// Content-derived id of the whole listing.
    pub(super) fn tree_sha(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for (path, sha) in &self.files {
            hasher.update(path.as_bytes());
            hasher.update(b"\0");
            hasher.update(sha.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Direct children of a directory, as the contents API lists them.
    pub(super) fn dir_listing(&self, dir: &str) -> Vec<ContentMetadata> {
        let prefix = format!("{}/", dir);
        let mut out: BTreeMap<String, ContentMetadata> = BTreeMap::new();
        for (path, sha) in self.files.range(prefix.clone()..) {
            let Some(rest) = path.strip_prefix(&prefix) else {
                break;
            };
            let (name, kind, sha, size) = match rest.split_once('/') {
                Some((child, _)) => (child, "dir", String::new(), 0),
                None => (rest, "file", sha.clone(), self.size_of(sha)),
            };
            out.entry(name.to_string()).or_insert_with(|| ContentMetadata {
                name: name.to_string(),
                path: format!("{}{}", prefix, name),
                sha,
                size,
                kind: kind.to_string(),
            });
        }
        out.into_values().collect()
    }

    pub(super) fn metadata(&self, path: &str) -> Option<ContentMetadata> {
        let sha = self.files.get(path)?;
        Some(ContentMetadata {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            sha: sha.clone(),
            size: self.size_of(sha),
            kind: "file".to_string(),
        })
    }
}

/// Base64 with line breaks every [`BLOB_LINE`] characters, the way GitHub serves blobs.
pub(super) fn wrapped_base64(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / BLOB_LINE + 1);
    for (i, c) in encoded.chars().enumerate() {
        if i > 0 && i % BLOB_LINE == 0 {
            out.push('\n');
        }
        out.push(c);
    }
    out.push('\n');
    out
}

/// Load every regular file under `dir` into the store, keyed by its relative path.
pub(super) fn seed_from_dir(store: &mut RepoStore, dir: &std::path::Path) -> Result<usize> {
    let mut pending = vec![dir.to_path_buf()];
    let mut count = 0;
    while let Some(next) = pending.pop() {
        let entries =
            std::fs::read_dir(&next).with_context(|| format!("read dir {}", next.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("read dir entry in {}", next.display()))?;
            let path = entry.path();
            let ft = entry
                .file_type()
                .with_context(|| format!("stat {}", path.display()))?;
            if ft.is_dir() {
                pending.push(path);
                continue;
            }
            if !ft.is_file() {
                continue;
            }
            let rel = path
                .strip_prefix(dir)
                .with_context(|| format!("relativize {}", path.display()))?;
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
            store.put(&key, bytes);
            count += 1;
        }
    }
    Ok(count)
}
