//! Mutation orchestrator: structural edits expressed as strictly ordered sequences of
//! content-gateway calls.
//!
//! The backing store has no directories, no move, and no multi-file transaction. Directories
//! are placeholder markers or implied by file paths, a move is copy-then-delete per file, and
//! a multi-call operation that fails part-way reports [`TreeError::Interrupted`] with the
//! items already completed. Nothing is rolled back.

use serde::Serialize;

use crate::error::{TreeError, TreeResult};
use crate::model::ContentRef;
use crate::remote::ContentApi;
use crate::session::Session;
use crate::subtree::Subtree;

mod bulk;
mod directories;
mod files;
mod rename;

pub use self::bulk::BulkOutcome;

/// Zero-content file that keeps an otherwise-empty directory visible.
pub const MARKER: &str = ".gitkeep";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Paths whose remote call sequence finished, in execution order.
    pub completed: Vec<String>,
    /// Paths that were deliberately not acted on (already gone, markers, covered items).
    pub skipped: Vec<String>,
}

impl BatchReport {
    fn absorb(&mut self, other: BatchReport) {
        self.completed.extend(other.completed);
        self.skipped.extend(other.skipped);
    }
}

pub struct Mutator<'a, C: ContentApi + ?Sized> {
    api: &'a C,
    subtree: &'a Subtree,
    session: &'a Session,
    branch: &'a str,
}

impl<'a, C: ContentApi + ?Sized> Mutator<'a, C> {
    pub fn new(api: &'a C, subtree: &'a Subtree, session: &'a Session, branch: &'a str) -> Self {
        Self {
            api,
            subtree,
            session,
            branch,
        }
    }

    pub fn branch(&self) -> &str {
        self.branch
    }

    // Each remote call re-reads the session so a sign-out mid-sequence stops the next call.

    fn authorize(&self) -> TreeResult<()> {
        self.session.require().map(|_| ())
    }

    fn metadata(&self, path: &str) -> TreeResult<Option<ContentRef>> {
        self.authorize()?;
        self.api.get_metadata(path, self.branch)
    }

    fn put(
        &self,
        path: &str,
        bytes: &[u8],
        existing: Option<&ContentRef>,
        message: &str,
    ) -> TreeResult<ContentRef> {
        self.authorize()?;
        self.api
            .put_content(path, bytes, existing, message, self.branch)
    }

    fn remove(&self, path: &str, content_ref: &ContentRef, message: &str) -> TreeResult<()> {
        self.authorize()?;
        self.api
            .delete_content(path, content_ref, message, self.branch)
    }

    fn blob(&self, content_ref: &ContentRef) -> TreeResult<Vec<u8>> {
        self.authorize()?;
        self.api.get_blob(content_ref)
    }
}

/// Wrap `err` as an interruption at `path`, flattening nested interruptions so the innermost
/// failing path and the full list of completed items survive.
fn interrupted(path: &str, mut completed: Vec<String>, err: TreeError) -> TreeError {
    match err {
        TreeError::Interrupted {
            path: inner_path,
            completed: inner,
            source,
        } => {
            completed.extend(inner);
            TreeError::Interrupted {
                path: inner_path,
                completed,
                source,
            }
        }
        other => TreeError::Interrupted {
            path: path.to_string(),
            completed,
            source: Box::new(other),
        },
    }
}

fn is_marker(path: &str) -> bool {
    path.rsplit('/').next() == Some(MARKER)
}

#[cfg(test)]
#[path = "tests/mutate_tests.rs"]
mod tests;
