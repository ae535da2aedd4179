use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use url::Url;

use crate::error::{TreeError, TreeResult};
use crate::model::{ContentRef, RepoMeta};
use crate::session::Session;

use super::http_client::decode_err;
use super::{
    BlobResponse, BranchResponse, ContentApi, DeleteContentRequest, ListingApi,
    PutContentRequest, PutContentResponse, RemoteTree, RepoResponse, TreeResponse,
};

/// Blocking client for the GitHub REST, Contents and Git Data APIs of one repository.
pub struct GitHubClient {
    pub(super) base_url: Url,
    pub(super) owner: String,
    pub(super) repo: String,
    pub(super) session: Session,
    pub(super) client: reqwest::blocking::Client,
}

impl GitHubClient {
    pub fn new(api_base: &str, owner: &str, repo: &str, session: Session) -> anyhow::Result<Self> {
        let base_url = Url::parse(api_base.trim())
            .with_context(|| format!("parse api base url {:?}", api_base))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("api base url {} cannot carry a path", base_url);
        }
        if owner.trim().is_empty() || repo.trim().is_empty() {
            anyhow::bail!("owner and repo are required");
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        let client = reqwest::blocking::Client::builder()
            .user_agent("treeward")
            .default_headers(headers)
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            base_url,
            owner: owner.trim().to_string(),
            repo: repo.trim().to_string(),
            session,
            client,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl ListingApi for GitHubClient {
    fn repo_meta(&self) -> TreeResult<RepoMeta> {
        let url = self.endpoint(&[])?;
        let resp = self.send(self.client.get(url), "get repo")?;
        let repo: RepoResponse = self
            .ensure_ok(resp, "get repo")?
            .json()
            .map_err(decode_err("parse repo"))?;
        Ok(RepoMeta {
            full_name: repo.full_name,
            description: repo.description,
            default_branch: repo.default_branch.unwrap_or_default(),
            size_kib: repo.size.unwrap_or(0),
        })
    }

    fn branch_tree_id(&self, branch: &str) -> TreeResult<String> {
        let mut url = self.endpoint(&["branches"])?;
        // Branch names may contain '/', which must stay inside one segment.
        url.path_segments_mut()
            .map_err(|_| TreeError::Transport("api base cannot carry a path".to_string()))?
            .push(branch);
        let resp = self.send(self.client.get(url), "get branch")?;
        let info: BranchResponse = self
            .ensure_ok(resp, "get branch")?
            .json()
            .map_err(decode_err("parse branch"))?;
        info.commit
            .commit
            .and_then(|c| c.tree)
            .map(|t| t.sha)
            .filter(|sha| !sha.is_empty())
            .ok_or_else(|| TreeError::ResolutionError(format!("tree of branch {}", branch)))
    }

    fn tree(&self, tree_id: &str) -> TreeResult<RemoteTree> {
        let mut url = self.endpoint(&["git", "trees", tree_id])?;
        url.query_pairs_mut().append_pair("recursive", "1");
        let resp = self.send(self.client.get(url), "get tree")?;
        let tree: TreeResponse = self
            .ensure_ok(resp, "get tree")?
            .json()
            .map_err(decode_err("parse tree"))?;
        Ok(RemoteTree {
            sha: tree.sha,
            entries: tree.tree,
            truncated: tree.truncated,
        })
    }
}

impl ContentApi for GitHubClient {
    fn get_metadata(&self, path: &str, branch: &str) -> TreeResult<Option<ContentRef>> {
        let mut url = self.endpoint(&["contents", path])?;
        url.query_pairs_mut().append_pair("ref", branch);
        let resp = self.send(self.client.get(url), "get content metadata")?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let v: serde_json::Value = self
            .ensure_ok(resp, "get content metadata")?
            .json()
            .map_err(decode_err("parse content metadata"))?;

        // A directory answers with an array listing; only files carry a usable ref.
        let is_file = v.get("type").and_then(|t| t.as_str()) == Some("file");
        Ok(v.get("sha")
            .and_then(|s| s.as_str())
            .filter(|_| is_file)
            .map(|s| ContentRef(s.to_string())))
    }

    fn put_content(
        &self,
        path: &str,
        bytes: &[u8],
        existing: Option<&ContentRef>,
        message: &str,
        branch: &str,
    ) -> TreeResult<ContentRef> {
        let url = self.endpoint(&["contents", path])?;
        let body = PutContentRequest {
            message: message.to_string(),
            content: STANDARD.encode(bytes),
            branch: branch.to_string(),
            sha: existing.map(|r| r.as_str().to_string()),
        };
        let resp = self.send(self.client.put(url).json(&body), "put content")?;
        let out: PutContentResponse = self
            .ensure_written(resp, "put content")?
            .json()
            .map_err(decode_err("parse put content response"))?;
        Ok(ContentRef(out.content.sha))
    }

    fn delete_content(
        &self,
        path: &str,
        content_ref: &ContentRef,
        message: &str,
        branch: &str,
    ) -> TreeResult<()> {
        let url = self.endpoint(&["contents", path])?;
        let body = DeleteContentRequest {
            message: message.to_string(),
            sha: content_ref.as_str().to_string(),
            branch: branch.to_string(),
        };
        let resp = self.send(self.client.delete(url).json(&body), "delete content")?;
        self.ensure_written(resp, "delete content")?;
        Ok(())
    }

    fn get_blob(&self, content_ref: &ContentRef) -> TreeResult<Vec<u8>> {
        let url = self.endpoint(&["git", "blobs", content_ref.as_str()])?;
        let resp = self.send(self.client.get(url), "get blob")?;
        let blob: BlobResponse = self
            .ensure_ok(resp, "get blob")?
            .json()
            .map_err(decode_err("parse blob"))?;
        decode_blob(&blob)
    }
}

/// Blob payloads come base64-encoded with embedded line breaks.
pub(super) fn decode_blob(blob: &BlobResponse) -> TreeResult<Vec<u8>> {
    match blob.encoding.as_str() {
        "base64" => {
            let cleaned: String = blob
                .content
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            STANDARD
                .decode(cleaned)
                .map_err(|e| TreeError::Decode(format!("blob {}: {}", blob.sha, e)))
        }
        "utf-8" | "utf8" => Ok(blob.content.as_bytes().to_vec()),
        other => Err(TreeError::Decode(format!(
            "blob {}: unsupported encoding {}",
            blob.sha, other
        ))),
    }
}

#[cfg(test)]
#[path = "../tests/remote/github_tests.rs"]
mod tests;
