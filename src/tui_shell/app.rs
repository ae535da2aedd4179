use std::path::Path;

use crate::console::{Command, Console, Mutation, Outcome};
use crate::model::EntryKind;
use crate::remote::Remote;
use crate::store::ConsoleStore;
use crate::subtree::parent_path;
use crate::view::VisibleEntry;

use super::input::Input;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum PromptKind {
    Search,
    Extension,
    NewDirectory,
    /// Local file to upload into `dir`.
    Upload { dir: String },
    Rename { from: String },
    Login,
}

impl PromptKind {
    pub(super) fn label(&self) -> &'static str {
        match self {
            PromptKind::Search => "search",
            PromptKind::Extension => "extension",
            PromptKind::NewDirectory => "new directory",
            PromptKind::Upload { .. } => "upload local file",
            PromptKind::Rename { .. } => "move to",
            PromptKind::Login => "token",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Confirm {
    Delete { path: String, directory: bool },
    DeleteSelected { items: usize },
}

impl Confirm {
    pub(super) fn question(&self) -> String {
        match self {
            Confirm::Delete {
                path,
                directory: true,
            } => format!("Delete directory {} and everything under it?", path),
            Confirm::Delete { path, .. } => format!("Delete {}?", path),
            Confirm::DeleteSelected { items } => format!("Delete {} selected item(s)?", items),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum StatusKind {
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub(super) struct StatusLine {
    pub(super) kind: StatusKind,
    pub(super) text: String,
}

pub(super) struct App<R: Remote> {
    pub(super) console: Console<R>,
    store: Option<ConsoleStore>,
    pub(super) rows: Vec<VisibleEntry>,
    pub(super) cursor: usize,
    pub(super) prompt: Option<PromptKind>,
    pub(super) input: Input,
    /// Search text typed since the last applied filter.
    pub(super) search_dirty: bool,
    pub(super) confirm: Option<Confirm>,
    pub(super) status: Option<StatusLine>,
    /// Refresh failure after the last applied change, appended to its confirmation.
    stale_note: Option<String>,
    pub(super) quit: bool,
}

impl<R: Remote> App<R> {
    pub(super) fn new(console: Console<R>, store: Option<ConsoleStore>) -> Self {
        Self {
            console,
            store,
            rows: Vec::new(),
            cursor: 0,
            prompt: None,
            input: Input::default(),
            search_dirty: false,
            confirm: None,
            status: None,
            stale_note: None,
            quit: false,
        }
    }

    pub(super) fn info(&mut self, text: impl Into<String>) {
        let text = text.into();
        if let Some(note) = self.stale_note.take() {
            self.error(format!("{}; {}", text, note));
            return;
        }
        self.status = Some(StatusLine {
            kind: StatusKind::Info,
            text,
        });
    }

    pub(super) fn error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            kind: StatusKind::Error,
            text: text.into(),
        });
    }

    fn recompute(&mut self) {
        self.rows = self.console.visible();
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    }

    /// Dispatch one command, surface its failure on the status line, and re-derive the rows.
    pub(super) fn run(&mut self, command: Command) -> Option<Outcome> {
        self.stale_note = None;
        let result = self.console.dispatch(command);
        self.recompute();
        match result {
            Ok(outcome) => {
                if let Some(err) = self.console.take_refresh_error() {
                    let note = format!("listing may be stale (refresh failed: {})", err);
                    self.error(note.clone());
                    self.stale_note = Some(note);
                }
                Some(outcome)
            }
            Err(err) => {
                tracing::warn!(error = %err, "command failed");
                self.error(err.to_string());
                None
            }
        }
    }

    pub(super) fn refresh(&mut self) {
        if self.run(Command::Refresh).is_some() {
            let files = self.console.snapshot().map(|s| s.files.len()).unwrap_or(0);
            self.info(format!("refreshed ({} files)", files));
        }
    }

    pub(super) fn current(&self) -> Option<&VisibleEntry> {
        self.rows.get(self.cursor)
    }

    fn current_is_root(&self) -> bool {
        self.current()
            .is_some_and(|r| r.path == self.console.subtree().root())
    }

    /// Directory that new entries go into: the row under the cursor when it is a directory,
    /// else its parent.
    pub(super) fn current_dir(&self) -> String {
        let root = self.console.subtree().root().to_string();
        match self.current() {
            Some(row) if row.kind == EntryKind::Directory => row.path.clone(),
            Some(row) => parent_path(&row.path)
                .map(str::to_string)
                .unwrap_or(root),
            None => root,
        }
    }

    pub(super) fn move_by(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub(super) fn move_to(&mut self, idx: usize) {
        self.cursor = idx.min(self.rows.len().saturating_sub(1));
    }

    pub(super) fn toggle_expand(&mut self) {
        let Some(row) = self.current() else {
            return;
        };
        if row.kind != EntryKind::Directory || self.current_is_root() {
            return;
        }
        let path = row.path.clone();
        self.run(Command::ToggleExpanded(path));
    }

    /// Collapse the directory under the cursor, or jump to the parent row.
    pub(super) fn collapse_or_parent(&mut self) {
        let Some(row) = self.current() else {
            return;
        };
        if row.kind == EntryKind::Directory && row.expanded && !self.current_is_root() {
            let path = row.path.clone();
            self.run(Command::ToggleExpanded(path));
            return;
        }
        let parent = parent_path(&row.path).map(str::to_string);
        if let Some(idx) = parent.and_then(|p| self.rows.iter().position(|r| r.path == p)) {
            self.cursor = idx;
        }
    }

    pub(super) fn toggle_select(&mut self) {
        if self.current_is_root() {
            return;
        }
        if let Some(path) = self.current().map(|r| r.path.clone()) {
            self.run(Command::ToggleSelected(path));
            self.move_by(1);
        }
    }

    pub(super) fn open_prompt(&mut self, kind: PromptKind) {
        let prefill = match &kind {
            PromptKind::Search => self.console.view().search.clone(),
            PromptKind::Extension => self.console.view().extension.clone(),
            PromptKind::NewDirectory => format!("{}/", self.current_dir()),
            PromptKind::Rename { from } => from.clone(),
            PromptKind::Upload { .. } | PromptKind::Login => String::new(),
        };
        self.input.set(&prefill);
        self.search_dirty = false;
        self.prompt = Some(kind);
    }

    pub(super) fn open_rename(&mut self) {
        if self.current_is_root() {
            return;
        }
        if let Some(from) = self.current().map(|r| r.path.clone()) {
            self.open_prompt(PromptKind::Rename { from });
        }
    }

    pub(super) fn open_upload(&mut self) {
        let dir = self.current_dir();
        self.open_prompt(PromptKind::Upload { dir });
    }

    pub(super) fn cancel_prompt(&mut self) {
        if self.prompt == Some(PromptKind::Search) && self.search_dirty {
            self.flush_search();
        }
        self.prompt = None;
        self.input.clear();
    }

    /// Apply the search text typed so far. Called when input goes quiet.
    pub(super) fn flush_search(&mut self) {
        if self.prompt == Some(PromptKind::Search) && self.search_dirty {
            self.search_dirty = false;
            let q = self.input.buf.clone();
            self.run(Command::Search(q));
            self.cursor = 0;
        }
    }

    pub(super) fn submit_prompt(&mut self) {
        let Some(kind) = self.prompt.take() else {
            return;
        };
        let text = self.input.take();
        self.search_dirty = false;

        match kind {
            PromptKind::Search => {
                self.run(Command::Search(text));
                self.cursor = 0;
            }
            PromptKind::Extension => {
                self.run(Command::Extension(text));
                self.cursor = 0;
            }
            PromptKind::NewDirectory => {
                let path = text.trim().to_string();
                if self
                    .run(Command::Mutate(Mutation::CreateDirectory { path: path.clone() }))
                    .is_some()
                {
                    self.info(format!("created {}", path.trim_end_matches('/')));
                }
            }
            PromptKind::Upload { dir } => self.upload(&dir, text.trim()),
            PromptKind::Rename { from } => {
                let to = text.trim().to_string();
                if let Some(Outcome::Batch(report)) = self.run(Command::Mutate(Mutation::Rename {
                    from: from.clone(),
                    to: to.clone(),
                })) {
                    self.info(format!(
                        "moved {} -> {} ({} file(s))",
                        from,
                        to,
                        report.completed.len()
                    ));
                }
            }
            PromptKind::Login => self.sign_in(text.trim()),
        }
    }

    fn upload(&mut self, dir: &str, local: &str) {
        let local = Path::new(local);
        let Some(name) = local.file_name().map(|n| n.to_string_lossy().to_string()) else {
            self.error("upload: no file name");
            return;
        };
        let bytes = match std::fs::read(local) {
            Ok(b) => b,
            Err(err) => {
                self.error(format!("upload: read {}: {}", local.display(), err));
                return;
            }
        };
        let path = format!("{}/{}", dir, name);
        let size = bytes.len();
        if self
            .run(Command::Mutate(Mutation::WriteFile {
                path: path.clone(),
                bytes,
            }))
            .is_some()
        {
            self.info(format!("uploaded {} ({} bytes)", path, size));
        }
    }

    fn sign_in(&mut self, token: &str) {
        if token.is_empty() {
            self.error("token must not be empty");
            return;
        }
        let stored = self.store.as_ref().map(|s| s.set_token(token)).transpose();
        if let Err(err) = stored {
            self.error(format!("{:#}", err));
            return;
        }
        self.run(Command::SignIn(token.to_string()));
        self.info("signed in");
    }

    pub(super) fn sign_out(&mut self) {
        let cleared = self.store.as_ref().map(|s| s.clear_token()).transpose();
        if let Err(err) = cleared {
            self.error(format!("{:#}", err));
            return;
        }
        self.run(Command::SignOut);
        self.info("signed out");
    }

    /// Delete the selection when there is one, else the row under the cursor. Both ask first.
    pub(super) fn request_delete(&mut self) {
        if !self.console.view().selected.is_empty() {
            if let Some(Outcome::NeedsConfirmation { items }) =
                self.run(Command::Mutate(Mutation::DeleteSelected { confirmed: false }))
            {
                self.confirm = Some(Confirm::DeleteSelected { items });
            }
            return;
        }
        if self.current_is_root() {
            return;
        }
        let confirm = self.current().map(|row| Confirm::Delete {
            path: row.path.clone(),
            directory: row.kind == EntryKind::Directory,
        });
        if confirm.is_some() {
            self.confirm = confirm;
        }
    }

    pub(super) fn answer_confirm(&mut self, yes: bool) {
        let Some(confirm) = self.confirm.take() else {
            return;
        };
        if !yes {
            self.info("cancelled");
            return;
        }
        let mutation = match &confirm {
            Confirm::Delete { path, .. } => Mutation::Delete { path: path.clone() },
            Confirm::DeleteSelected { .. } => Mutation::DeleteSelected { confirmed: true },
        };
        if let Some(Outcome::Batch(report)) = self.run(Command::Mutate(mutation)) {
            let mut msg = format!("deleted {} file(s)", report.completed.len());
            if !report.skipped.is_empty() {
                msg.push_str(&format!(", skipped {}", report.skipped.len()));
            }
            self.info(msg);
        }
    }

    pub(super) fn toggle_flat(&mut self) {
        let flat = !self.console.view().flat;
        self.run(Command::SetFlat(flat));
        self.cursor = 0;
    }

    pub(super) fn toggle_folders(&mut self) {
        let show = !self.console.view().show_folders;
        self.run(Command::ShowFolders(show));
    }
}
