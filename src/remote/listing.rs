//! Builds a [`Snapshot`] of the managed subtree from one recursive tree listing.

use std::collections::HashSet;

use crate::error::{TreeError, TreeResult};
use crate::model::{ContentRef, Entry, RepoMeta, Snapshot};
use crate::subtree::Subtree;

use super::{ListingApi, RemoteTree, TreeItemKind};

const FALLBACK_BRANCH: &str = "main";

/// Resolve the branch, its tree, and the full recursive listing, then scope it to `subtree`.
/// No retries: the first failing call aborts the refresh.
pub fn fetch_snapshot<A: ListingApi + ?Sized>(
    api: &A,
    subtree: &Subtree,
    branch_hint: Option<&str>,
) -> TreeResult<Snapshot> {
    let repo = api.repo_meta()?;
    let branch = branch_hint
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .or_else(|| Some(repo.default_branch.clone()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| FALLBACK_BRANCH.to_string());

    let tree_id = api.branch_tree_id(&branch)?;
    if tree_id.is_empty() {
        return Err(TreeError::ResolutionError(format!("tree of branch {}", branch)));
    }
    let tree = api.tree(&tree_id)?;
    let snapshot = scope_listing(tree, subtree, branch, repo);

    tracing::debug!(
        files = snapshot.files.len(),
        directories = snapshot.directories.len(),
        branch = %snapshot.branch,
        "fetched snapshot"
    );
    Ok(snapshot)
}

/// Keep only entries strictly inside the subtree; the subtree root itself is implicit.
pub fn scope_listing(tree: RemoteTree, subtree: &Subtree, branch: String, repo: RepoMeta) -> Snapshot {
    if tree.truncated {
        tracing::warn!(tree = %tree.sha, "remote listing was truncated; snapshot is partial");
    }

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut directories = Vec::new();
    for item in tree.entries {
        let path = item.path.trim_end_matches('/').to_string();
        if !subtree.contains_strictly(&path) || !seen.insert(path.clone()) {
            continue;
        }
        match item.kind {
            TreeItemKind::Blob => files.push(Entry::file(
                path,
                item.size.unwrap_or(0),
                Some(ContentRef(item.sha)),
            )),
            TreeItemKind::Tree => directories.push(Entry::directory(path)),
            TreeItemKind::Commit => {}
        }
    }

    Snapshot {
        files,
        directories,
        branch,
        repo,
        truncated: tree.truncated,
    }
}

#[cfg(test)]
#[path = "../tests/remote/listing_tests.rs"]
mod tests;
