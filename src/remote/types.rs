//! DTOs for the GitHub REST payloads, shared with the mock server.

use serde::{Deserialize, Serialize};

/// Normalized result of a recursive tree listing call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteTree {
    pub sha: String,
    pub entries: Vec<TreeItem>,
    pub truncated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeItem {
    pub path: String,

    #[serde(rename = "type")]
    pub kind: TreeItemKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    pub sha: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeItemKind {
    Blob,
    Tree,
    /// Submodule pointer; never part of a snapshot.
    Commit,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RepoResponse {
    pub full_name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub default_branch: Option<String>,

    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BranchResponse {
    pub name: String,
    pub commit: BranchCommit,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BranchCommit {
    pub sha: String,

    #[serde(default)]
    pub commit: Option<CommitDetail>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub tree: Option<ObjectRef>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ObjectRef {
    pub sha: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TreeResponse {
    pub sha: String,

    #[serde(default)]
    pub tree: Vec<TreeItem>,

    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub name: String,
    pub path: String,
    pub sha: String,

    #[serde(default)]
    pub size: u64,

    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PutContentRequest {
    pub message: String,
    pub content: String,
    pub branch: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PutContentResponse {
    pub content: ContentMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteContentRequest {
    pub message: String,
    pub sha: String,
    pub branch: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlobResponse {
    pub sha: String,

    #[serde(default)]
    pub size: u64,

    pub content: String,

    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    "base64".to_string()
}
