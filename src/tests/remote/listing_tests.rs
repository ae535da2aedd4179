use super::*;
use crate::remote::TreeItem;
use crate::remote::memory::{Call, MemoryRemote};

fn cs() -> Subtree {
    Subtree::new("cstrike").unwrap()
}

fn item(path: &str, kind: TreeItemKind, size: Option<u64>) -> TreeItem {
    TreeItem {
        path: path.to_string(),
        kind,
        size,
        sha: format!("sha-{}", path),
        mode: None,
    }
}

#[test]
fn scope_listing_keeps_only_subtree_entries() {
    let tree = RemoteTree {
        sha: "t".to_string(),
        entries: vec![
            item("README.md", TreeItemKind::Blob, Some(10)),
            item("cstrike", TreeItemKind::Tree, None),
            item("cstrike/maps", TreeItemKind::Tree, None),
            item("cstrike/maps/de_dust2.bsp", TreeItemKind::Blob, Some(5)),
            item("cstrikex", TreeItemKind::Tree, None),
            item("cstrikex/foo", TreeItemKind::Blob, Some(1)),
            item("cstrike/addons/sub", TreeItemKind::Commit, None),
        ],
        truncated: false,
    };
    let snap = scope_listing(tree, &cs(), "main".to_string(), RepoMeta::default());

    let files: Vec<_> = snap.files.iter().map(|e| e.path.as_str()).collect();
    let dirs: Vec<_> = snap.directories.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(files, vec!["cstrike/maps/de_dust2.bsp"]);
    assert_eq!(dirs, vec!["cstrike/maps"]);
    assert_eq!(snap.files[0].size, 5);
    assert_eq!(
        snap.files[0].content_ref,
        Some(ContentRef("sha-cstrike/maps/de_dust2.bsp".to_string()))
    );
}

#[test]
fn scope_listing_drops_duplicate_paths() {
    let tree = RemoteTree {
        sha: "t".to_string(),
        entries: vec![
            item("cstrike/a", TreeItemKind::Tree, None),
            item("cstrike/a", TreeItemKind::Blob, Some(3)),
        ],
        truncated: true,
    };
    let snap = scope_listing(tree, &cs(), "main".to_string(), RepoMeta::default());
    assert_eq!(snap.directories.len(), 1);
    assert!(snap.files.is_empty());
    assert!(snap.truncated);
}

#[test]
fn fetch_snapshot_uses_default_branch_when_no_hint() {
    let remote = MemoryRemote::new("octo/servers", "trunk")
        .with_files([("cstrike/server.cfg", b"hostname x".as_slice())]);
    let snap = fetch_snapshot(&remote, &cs(), None).unwrap();
    assert_eq!(snap.branch, "trunk");
    assert_eq!(snap.files.len(), 1);
    assert_eq!(
        remote.calls()[..2],
        [Call::RepoMeta, Call::BranchTree("trunk".to_string())]
    );
}

#[test]
fn fetch_snapshot_unknown_branch_is_not_found() {
    let remote = MemoryRemote::new("octo/servers", "main");
    let err = fetch_snapshot(&remote, &cs(), Some("nope")).unwrap_err();
    assert!(matches!(err, TreeError::NotFound(_)));
}

#[test]
fn fetch_snapshot_surfaces_listing_failure_without_retry() {
    let remote = MemoryRemote::new("octo/servers", "main");
    remote.fail_on(Call::RepoMeta, 503);
    let err = fetch_snapshot(&remote, &cs(), None).unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(remote.calls(), vec![Call::RepoMeta]);
}
