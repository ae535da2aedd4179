//! Command dispatcher tying the gateways, the materializer, the view state and the
//! orchestrator together.
//!
//! Every mutation is exactly one orchestrator call followed by a full refresh from the listing
//! gateway when it succeeds. A failed mutation leaves the current snapshot untouched. When that
//! refresh fails the mutation still reports its outcome; the error is kept for
//! [`Console::take_refresh_error`] and the next mutation refreshes first.

use anyhow::Context;

use crate::capacity::CapacityMeter;
use crate::error::{TreeError, TreeResult};
use crate::model::{ConsoleConfig, ContentRef, ONE_GIB, Snapshot};
use crate::mutate::{BatchReport, BulkOutcome, Mutator};
use crate::remote::{GitHubClient, Remote, fetch_snapshot};
use crate::session::Session;
use crate::subtree::Subtree;
use crate::tree::{Tree, materialize};
use crate::view::{ViewState, VisibleEntry, visible_entries};

/// Structural edits. Each maps onto one [`Mutator`] operation.
#[derive(Clone, PartialEq, Eq)]
pub enum Mutation {
    WriteFile { path: String, bytes: Vec<u8> },
    /// Ordered batch upload; one refresh at the end.
    WriteFiles { files: Vec<(String, Vec<u8>)> },
    CreateDirectory { path: String },
    /// File or directory, classified by the current snapshot.
    Delete { path: String },
    Rename { from: String, to: String },
    /// Bulk delete of the current selection. When `confirmed` is false nothing is sent and the
    /// outcome carries the item count for a confirmation prompt.
    DeleteSelected { confirmed: bool },
}

impl Mutation {
    pub fn label(&self) -> String {
        match self {
            Mutation::WriteFile { path, bytes } => format!("write {} ({} bytes)", path, bytes.len()),
            Mutation::WriteFiles { files } => format!("write {} files", files.len()),
            Mutation::CreateDirectory { path } => format!("mkdir {}", path),
            Mutation::Delete { path } => format!("delete {}", path),
            Mutation::Rename { from, to } => format!("move {} -> {}", from, to),
            Mutation::DeleteSelected { confirmed } => {
                format!("delete selection (confirmed={})", confirmed)
            }
        }
    }
}

impl std::fmt::Debug for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Mutate(Mutation),
    ToggleExpanded(String),
    ExpandAll,
    CollapseAll,
    ToggleSelected(String),
    ClearSelection,
    Search(String),
    Extension(String),
    SetFlat(bool),
    ShowFolders(bool),
    SignIn(String),
    SignOut,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Mutate(m) => write!(f, "Mutate({})", m.label()),
            Command::SignIn(_) => f.write_str("SignIn(<redacted>)"),
            Command::Refresh => f.write_str("Refresh"),
            Command::ToggleExpanded(p) => write!(f, "ToggleExpanded({})", p),
            Command::ExpandAll => f.write_str("ExpandAll"),
            Command::CollapseAll => f.write_str("CollapseAll"),
            Command::ToggleSelected(p) => write!(f, "ToggleSelected({})", p),
            Command::ClearSelection => f.write_str("ClearSelection"),
            Command::Search(q) => write!(f, "Search({:?})", q),
            Command::Extension(e) => write!(f, "Extension({:?})", e),
            Command::SetFlat(b) => write!(f, "SetFlat({})", b),
            Command::ShowFolders(b) => write!(f, "ShowFolders({})", b),
            Command::SignOut => f.write_str("SignOut"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Refreshed,
    ViewChanged,
    SessionChanged,
    Wrote(ContentRef),
    Batch(BatchReport),
    /// Bulk delete awaiting confirmation for this many items.
    NeedsConfirmation { items: usize },
}

struct Loaded {
    snapshot: Snapshot,
    tree: Tree,
}

pub struct Console<R: Remote> {
    remote: R,
    subtree: Subtree,
    session: Session,
    branch_hint: Option<String>,
    budget_bytes: u64,
    view: ViewState,
    loaded: Option<Loaded>,

    /// Set when the refresh after a successful mutation failed; the snapshot is out of date.
    stale: bool,
    refresh_error: Option<TreeError>,
}

impl<R: Remote> Console<R> {
    pub fn new(remote: R, subtree: Subtree, session: Session) -> Self {
        Self {
            remote,
            subtree,
            session,
            branch_hint: None,
            budget_bytes: ONE_GIB,
            view: ViewState::default(),
            loaded: None,
            stale: false,
            refresh_error: None,
        }
    }

    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch_hint = branch.filter(|b| !b.trim().is_empty());
        self
    }

    pub fn with_budget(mut self, budget_bytes: u64) -> Self {
        self.budget_bytes = budget_bytes;
        self
    }

    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn subtree(&self) -> &Subtree {
        &self.subtree
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.loaded.as_ref().map(|l| &l.snapshot)
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.loaded.as_ref().map(|l| &l.tree)
    }

    pub fn visible(&self) -> Vec<VisibleEntry> {
        self.loaded
            .as_ref()
            .map(|l| visible_entries(&l.tree, &self.view))
            .unwrap_or_default()
    }

    pub fn meter(&self) -> Option<CapacityMeter> {
        self.snapshot()
            .map(|s| CapacityMeter::from_snapshot(s, self.budget_bytes))
    }

    /// Replace the snapshot and tree from a fresh listing. Stale view paths are dropped.
    pub fn refresh(&mut self) -> TreeResult<()> {
        let snapshot = fetch_snapshot(&self.remote, &self.subtree, self.branch_hint.as_deref())?;
        let tree = materialize(&snapshot, &self.subtree);
        self.view.retain_known(&tree);
        self.loaded = Some(Loaded { snapshot, tree });
        self.stale = false;
        self.refresh_error = None;
        Ok(())
    }

    /// True when the shown snapshot predates the last applied mutation.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Failure of the refresh that followed the last successful mutation. The mutation itself
    /// went through; only the listing is out of date.
    pub fn take_refresh_error(&mut self) -> Option<TreeError> {
        self.refresh_error.take()
    }

    /// Raw bytes of a file in the current branch.
    pub fn read_file(&mut self, path: &str) -> TreeResult<Vec<u8>> {
        let path = self.subtree.validate(path)?;
        let branch = self.branch()?;
        let Some(content_ref) = self.remote.get_metadata(&path, &branch)? else {
            return Err(TreeError::NotFound(path));
        };
        self.remote.get_blob(&content_ref)
    }

    pub fn dispatch(&mut self, command: Command) -> TreeResult<Outcome> {
        tracing::debug!(?command, "dispatch");
        match command {
            Command::Refresh => {
                self.refresh()?;
                Ok(Outcome::Refreshed)
            }
            Command::Mutate(mutation) => self.apply(mutation),
            Command::ToggleExpanded(path) => {
                self.view.toggle_expanded(&path);
                Ok(Outcome::ViewChanged)
            }
            Command::ExpandAll => {
                if let Some(loaded) = &self.loaded {
                    self.view.expand_all(&loaded.tree);
                }
                Ok(Outcome::ViewChanged)
            }
            Command::CollapseAll => {
                self.view.expanded.clear();
                Ok(Outcome::ViewChanged)
            }
            Command::ToggleSelected(path) => {
                self.view.toggle_selected(&path);
                Ok(Outcome::ViewChanged)
            }
            Command::ClearSelection => {
                self.view.clear_selection();
                Ok(Outcome::ViewChanged)
            }
            Command::Search(query) => {
                self.view.set_search(&query);
                Ok(Outcome::ViewChanged)
            }
            Command::Extension(ext) => {
                self.view.set_extension(&ext);
                Ok(Outcome::ViewChanged)
            }
            Command::SetFlat(flat) => {
                self.view.flat = flat;
                Ok(Outcome::ViewChanged)
            }
            Command::ShowFolders(show) => {
                self.view.show_folders = show;
                Ok(Outcome::ViewChanged)
            }
            Command::SignIn(token) => {
                self.session.sign_in(&token);
                Ok(Outcome::SessionChanged)
            }
            Command::SignOut => {
                self.session.sign_out();
                Ok(Outcome::SessionChanged)
            }
        }
    }

    fn branch(&mut self) -> TreeResult<String> {
        if self.loaded.is_none() || self.stale {
            self.refresh()?;
        }
        self.snapshot()
            .map(|s| s.branch.clone())
            .ok_or_else(|| TreeError::ResolutionError("branch of unloaded snapshot".to_string()))
    }

    fn apply(&mut self, mutation: Mutation) -> TreeResult<Outcome> {
        // Fail fast on sign-out before the implicit first refresh too.
        self.session.require()?;
        let branch = self.branch()?;
        let Some(loaded) = self.loaded.as_ref() else {
            return Err(TreeError::ResolutionError("no snapshot loaded".to_string()));
        };
        let snapshot = &loaded.snapshot;
        let mutator = Mutator::new(&self.remote, &self.subtree, &self.session, &branch);

        tracing::debug!(mutation = %mutation.label(), "apply");
        let outcome = match mutation {
            Mutation::WriteFile { path, bytes } => {
                mutator.write_file(&path, &bytes).map(Outcome::Wrote)
            }
            Mutation::WriteFiles { files } => mutator.write_files(&files).map(Outcome::Batch),
            Mutation::CreateDirectory { path } => {
                mutator.create_directory(&path).map(Outcome::Wrote)
            }
            Mutation::Delete { path } => {
                if path.ends_with('/') || snapshot.is_directory(&path) {
                    mutator.delete_directory(&path, snapshot).map(Outcome::Batch)
                } else {
                    mutator.delete_file(&path).map(|()| {
                        Outcome::Batch(BatchReport {
                            completed: vec![path],
                            skipped: Vec::new(),
                        })
                    })
                }
            }
            Mutation::Rename { from, to } => mutator.rename(&from, &to, snapshot).map(Outcome::Batch),
            Mutation::DeleteSelected { confirmed } => {
                let paths: Vec<String> = self.view.selected.iter().cloned().collect();
                let result =
                    mutator.bulk_delete(paths.iter().map(String::as_str), snapshot, |_| confirmed);
                // Cleared once deletion actually started; a rejected or unconfirmed batch keeps it.
                if matches!(
                    result,
                    Ok(BulkOutcome::Completed(_)) | Err(TreeError::Interrupted { .. })
                ) {
                    self.view.clear_selection();
                }
                result.map(|outcome| match outcome {
                    BulkOutcome::Declined { items } => Outcome::NeedsConfirmation { items },
                    BulkOutcome::Completed(report) => Outcome::Batch(report),
                })
            }
        }?;

        if !matches!(outcome, Outcome::NeedsConfirmation { .. }) {
            if let Err(err) = self.refresh() {
                tracing::warn!(error = %err, "mutation applied but refresh failed");
                self.stale = true;
                self.refresh_error = Some(err);
            }
        }
        Ok(outcome)
    }
}

/// Console over the GitHub remote named by `cfg`. Nothing is fetched yet.
pub fn connect(cfg: &ConsoleConfig, session: Session) -> anyhow::Result<Console<GitHubClient>> {
    let (owner, repo) = cfg
        .target()
        .context("no repository configured (run `treeward config set --owner ... --repo ...`)")?;
    let subtree = Subtree::new(&cfg.subtree).context("invalid subtree root")?;
    let client = GitHubClient::new(&cfg.api_base, owner, repo, session.clone())?;
    Ok(Console::new(client, subtree, session)
        .with_branch(cfg.branch.clone())
        .with_budget(cfg.budget_bytes))
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
