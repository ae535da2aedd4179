//! In-process remote with GitHub's per-path concurrency rules, a call log, and injectable
//! failures. Used by the orchestrator and console tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::error::{TreeError, TreeResult};
use crate::model::{ContentRef, RepoMeta};

use super::{ContentApi, ListingApi, RemoteTree, TreeItem, TreeItemKind};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Call {
    RepoMeta,
    BranchTree(String),
    Tree(String),
    GetMetadata(String),
    Put(String),
    Delete(String),
    GetBlob(String),
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(self, Call::Put(_) | Call::Delete(_))
    }
}

#[derive(Debug, Default)]
struct Inner {
    files: BTreeMap<String, Vec<u8>>,
    blobs: HashMap<String, Vec<u8>>,
    calls: Vec<Call>,
    faults: HashMap<Call, u16>,
    version: u64,
}

#[derive(Debug)]
pub struct MemoryRemote {
    full_name: String,
    default_branch: String,
    inner: Mutex<Inner>,
}

/// Content ref used by the in-memory and mock remotes: blake3 of the blob bytes.
pub fn content_ref_for(bytes: &[u8]) -> ContentRef {
    ContentRef(blake3::hash(bytes).to_hex().to_string())
}

impl MemoryRemote {
    pub fn new(full_name: &str, default_branch: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            default_branch: default_branch.to_string(),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_files<'a>(self, files: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> Self {
        for (path, bytes) in files {
            self.insert(path, bytes);
        }
        self
    }

    /// Seed a file without recording a call.
    pub fn insert(&self, path: &str, bytes: &[u8]) {
        let mut inner = self.lock();
        let r = content_ref_for(bytes);
        inner.blobs.insert(r.0, bytes.to_vec());
        inner.files.insert(path.to_string(), bytes.to_vec());
        inner.version += 1;
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().files.get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.lock().files.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn write_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Make every future occurrence of `call` answer with `status`.
    pub fn fail_on(&self, call: Call, status: u16) {
        self.lock().faults.insert(call, status);
    }

    pub fn clear_faults(&self) {
        self.lock().faults.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Log the call, then apply any injected failure for it.
    fn record(&self, call: Call) -> TreeResult<MutexGuard<'_, Inner>> {
        let mut inner = self.lock();
        inner.calls.push(call.clone());
        if let Some(status) = inner.faults.get(&call).copied() {
            return Err(TreeError::RemoteError {
                status,
                body: format!("injected failure for {:?}", call),
            });
        }
        Ok(inner)
    }
}

impl ListingApi for MemoryRemote {
    fn repo_meta(&self) -> TreeResult<RepoMeta> {
        let inner = self.record(Call::RepoMeta)?;
        let bytes: u64 = inner.files.values().map(|b| b.len() as u64).sum();
        Ok(RepoMeta {
            full_name: self.full_name.clone(),
            description: None,
            default_branch: self.default_branch.clone(),
            size_kib: bytes / 1024,
        })
    }

    fn branch_tree_id(&self, branch: &str) -> TreeResult<String> {
        let inner = self.record(Call::BranchTree(branch.to_string()))?;
        if branch != self.default_branch {
            return Err(TreeError::NotFound(format!("branch {}", branch)));
        }
        Ok(format!("tree-{}", inner.version))
    }

    fn tree(&self, tree_id: &str) -> TreeResult<RemoteTree> {
        let inner = self.record(Call::Tree(tree_id.to_string()))?;

        let mut dirs = BTreeSet::new();
        for path in inner.files.keys() {
            let mut cur = path.as_str();
            while let Some((parent, _)) = cur.rsplit_once('/') {
                dirs.insert(parent.to_string());
                cur = parent;
            }
        }

        let mut entries: Vec<TreeItem> = dirs
            .into_iter()
            .map(|d| TreeItem {
                sha: blake3::hash(d.as_bytes()).to_hex().to_string(),
                path: d,
                kind: TreeItemKind::Tree,
                size: None,
                mode: Some("040000".to_string()),
            })
            .chain(inner.files.iter().map(|(p, b)| TreeItem {
                path: p.clone(),
                kind: TreeItemKind::Blob,
                size: Some(b.len() as u64),
                sha: content_ref_for(b).0,
                mode: Some("100644".to_string()),
            }))
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(RemoteTree {
            sha: tree_id.to_string(),
            entries,
            truncated: false,
        })
    }
}

impl ContentApi for MemoryRemote {
    fn get_metadata(&self, path: &str, _branch: &str) -> TreeResult<Option<ContentRef>> {
        let inner = self.record(Call::GetMetadata(path.to_string()))?;
        Ok(inner.files.get(path).map(|b| content_ref_for(b)))
    }

    fn put_content(
        &self,
        path: &str,
        bytes: &[u8],
        existing: Option<&ContentRef>,
        _message: &str,
        _branch: &str,
    ) -> TreeResult<ContentRef> {
        let mut inner = self.record(Call::Put(path.to_string()))?;
        let current = inner.files.get(path).map(|b| content_ref_for(b));
        match (current, existing) {
            (Some(_), None) => {
                return Err(TreeError::RemoteError {
                    status: 422,
                    body: "\"sha\" wasn't supplied.".to_string(),
                });
            }
            (Some(cur), Some(given)) if &cur != given => {
                return Err(TreeError::RemoteError {
                    status: 409,
                    body: format!("{} does not match {}", path, given.as_str()),
                });
            }
            _ => {}
        }
        let r = content_ref_for(bytes);
        inner.blobs.insert(r.0.clone(), bytes.to_vec());
        inner.files.insert(path.to_string(), bytes.to_vec());
        inner.version += 1;
        Ok(r)
    }

    fn delete_content(
        &self,
        path: &str,
        content_ref: &ContentRef,
        _message: &str,
        _branch: &str,
    ) -> TreeResult<()> {
        let mut inner = self.record(Call::Delete(path.to_string()))?;
        let Some(current) = inner.files.get(path).map(|b| content_ref_for(b)) else {
            return Err(TreeError::RemoteError {
                status: 404,
                body: format!("{} not found", path),
            });
        };
        if &current != content_ref {
            return Err(TreeError::RemoteError {
                status: 409,
                body: format!("{} does not match {}", path, content_ref.as_str()),
            });
        }
        inner.files.remove(path);
        inner.version += 1;
        Ok(())
    }

    fn get_blob(&self, content_ref: &ContentRef) -> TreeResult<Vec<u8>> {
        let inner = self.record(Call::GetBlob(content_ref.as_str().to_string()))?;
        inner
            .blobs
            .get(content_ref.as_str())
            .cloned()
            .ok_or_else(|| TreeError::NotFound(format!("blob {}", content_ref.as_str())))
    }
}
