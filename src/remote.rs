//! Gateways to the GitHub-shaped remote: the recursive listing used to build snapshots and
//! the authenticated content primitives used by the mutation orchestrator.

use crate::error::TreeResult;
use crate::model::{ContentRef, RepoMeta};

mod github;
mod http_client;
pub mod listing;
pub mod memory;
mod types;

pub use self::github::GitHubClient;
pub use self::listing::fetch_snapshot;
pub use self::types::*;

/// Read-only calls needed to produce a listing snapshot.
pub trait ListingApi {
    fn repo_meta(&self) -> TreeResult<RepoMeta>;

    /// Tree id reachable from the head commit of `branch`.
    fn branch_tree_id(&self, branch: &str) -> TreeResult<String>;

    /// Full recursive listing of a tree object.
    fn tree(&self, tree_id: &str) -> TreeResult<RemoteTree>;
}

/// Authenticated per-path content primitives.
pub trait ContentApi {
    /// Current content ref for `path`; a missing resource is `Ok(None)`, not an error.
    fn get_metadata(&self, path: &str, branch: &str) -> TreeResult<Option<ContentRef>>;

    /// Create (`existing == None`) or update content at `path`, returning the new ref.
    fn put_content(
        &self,
        path: &str,
        bytes: &[u8],
        existing: Option<&ContentRef>,
        message: &str,
        branch: &str,
    ) -> TreeResult<ContentRef>;

    fn delete_content(
        &self,
        path: &str,
        content_ref: &ContentRef,
        message: &str,
        branch: &str,
    ) -> TreeResult<()>;

    /// Raw (decoded) bytes of a blob.
    fn get_blob(&self, content_ref: &ContentRef) -> TreeResult<Vec<u8>>;
}

/// Everything the console needs from a remote.
pub trait Remote: ListingApi + ContentApi {}

impl<T: ListingApi + ContentApi + ?Sized> Remote for T {}
