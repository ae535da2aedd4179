//! View-state controller: expansion, selection and search/extension filters over a
//! materialized [`Tree`]. Recomputing the visible rows is pure; callers may do it on every
//! keystroke.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::EntryKind;
use crate::tree::{NodeId, Tree, TreeNode};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub expanded: BTreeSet<String>,

    #[serde(default)]
    pub selected: BTreeSet<String>,

    #[serde(default)]
    pub search: String,

    /// Lowercase suffix such as `.bsp`; empty disables the filter.
    #[serde(default)]
    pub extension: String,

    /// List every matching entry without hierarchy.
    #[serde(default)]
    pub flat: bool,

    #[serde(default = "default_true")]
    pub show_folders: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            expanded: BTreeSet::new(),
            selected: BTreeSet::new(),
            search: String::new(),
            extension: String::new(),
            flat: false,
            show_folders: true,
        }
    }
}

impl ViewState {
    /// Returns whether `path` is expanded afterwards.
    pub fn toggle_expanded(&mut self, path: &str) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_string());
            true
        }
    }

    pub fn expand(&mut self, path: &str) {
        self.expanded.insert(path.to_string());
    }

    pub fn collapse(&mut self, path: &str) {
        self.expanded.remove(path);
    }

    pub fn expand_all(&mut self, tree: &Tree) {
        for id in tree.preorder() {
            let node = tree.node(id);
            if node.is_dir() && id != Tree::ROOT {
                self.expanded.insert(node.path.clone());
            }
        }
    }

    /// Returns whether `path` is selected afterwards. Descendants are not touched.
    pub fn toggle_selected(&mut self, path: &str) -> bool {
        if self.selected.remove(path) {
            false
        } else {
            self.selected.insert(path.to_string());
            true
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_string();
    }

    pub fn set_extension(&mut self, ext: &str) {
        let ext = ext.trim().to_lowercase();
        self.extension = match ext.as_str() {
            "" => ext,
            e if e.starts_with('.') => ext,
            _ => format!(".{}", ext),
        };
    }

    /// Drop expanded/selected paths that no longer exist after a refresh.
    pub fn retain_known(&mut self, tree: &Tree) {
        self.expanded.retain(|p| tree.contains_path(p));
        self.selected.retain(|p| tree.contains_path(p));
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VisibleEntry {
    pub path: String,
    pub display_name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub depth: usize,
    pub expanded: bool,
    pub selected: bool,
}

struct Filters {
    query: String,
    extension: String,
}

impl Filters {
    fn new(view: &ViewState) -> Self {
        Self {
            query: view.search.trim().to_lowercase(),
            extension: view.extension.trim().to_lowercase(),
        }
    }

    fn name_matches(&self, tree: &Tree, node: &TreeNode) -> bool {
        self.query.is_empty()
            || tree
                .subtree()
                .display_name(&node.path)
                .to_lowercase()
                .starts_with(&self.query)
    }

    fn file_matches(&self, tree: &Tree, node: &TreeNode) -> bool {
        let ext_ok =
            self.extension.is_empty() || node.path.to_lowercase().ends_with(&self.extension);
        ext_ok && self.name_matches(tree, node)
    }

    fn includes(&self, tree: &Tree, id: NodeId) -> bool {
        let node = tree.node(id);
        if node.is_dir() {
            // A folder kept only for its contents needs a file that passes both filters.
            self.query.is_empty()
                || self.name_matches(tree, node)
                || tree.any_descendant(id, |d| {
                    if d.is_dir() {
                        self.name_matches(tree, d)
                    } else {
                        self.file_matches(tree, d)
                    }
                })
        } else {
            self.file_matches(tree, node)
        }
    }
}

fn row(tree: &Tree, view: &ViewState, node: &TreeNode, depth: usize) -> VisibleEntry {
    VisibleEntry {
        path: node.path.clone(),
        display_name: tree.subtree().display_name(&node.path).to_string(),
        kind: node.kind,
        size: node.size,
        depth,
        expanded: view.expanded.contains(&node.path),
        selected: view.selected.contains(&node.path),
    }
}

/// Rows to display for `(tree, view)`, in order, with their indentation depth.
///
/// The root row comes first and its children always render. Other directories render their
/// children only when expanded. A directory is kept under a search when its own name or any
/// descendant's name matches, so a match in a collapsed branch stays discoverable.
pub fn visible_entries(tree: &Tree, view: &ViewState) -> Vec<VisibleEntry> {
    let filters = Filters::new(view);
    if view.flat {
        return flat_entries(tree, view, &filters);
    }

    let mut out = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![Tree::ROOT];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        if id != Tree::ROOT && !filters.includes(tree, id) {
            continue;
        }
        let node = tree.node(id);
        out.push(row(tree, view, node, node.depth));

        let open = id == Tree::ROOT || view.expanded.contains(&node.path);
        if node.is_dir() && open {
            stack.extend(node.children.iter().rev().copied());
        }
    }
    out
}

fn flat_entries(tree: &Tree, view: &ViewState, filters: &Filters) -> Vec<VisibleEntry> {
    let mut ids: Vec<NodeId> = tree
        .preorder()
        .into_iter()
        .filter(|&id| id != Tree::ROOT)
        .filter(|&id| view.show_folders || !tree.node(id).is_dir())
        .filter(|&id| filters.includes(tree, id))
        .collect();
    ids.sort_by(|&a, &b| {
        let (na, nb) = (tree.node(a), tree.node(b));
        nb.is_dir()
            .cmp(&na.is_dir())
            .then_with(|| na.path.cmp(&nb.path))
    });
    ids.into_iter()
        .map(|id| {
            let node = tree.node(id);
            let depth = tree.subtree().display_name(&node.path).matches('/').count();
            row(tree, view, node, depth)
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
