//! Materializes the parent→children hierarchy of a snapshot.
//!
//! Nodes live in an arena addressed by [`NodeId`]; the subtree root is always node 0 and is
//! synthesized even when the snapshot is empty.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::model::{EntryKind, Snapshot};
use crate::subtree::{Subtree, parent_path};

pub type NodeId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub path: String,
    pub kind: EntryKind,
    pub size: u64,
    pub depth: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

#[derive(Clone, Debug)]
pub struct Tree {
    subtree: Subtree,
    nodes: Vec<TreeNode>,
    index: HashMap<String, NodeId>,
}

impl Tree {
    pub const ROOT: NodeId = 0;

    pub fn subtree(&self) -> &Subtree {
        &self.subtree
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.index.get(path.trim_end_matches('/')).copied()
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Pre-order walk from the root. A node reached twice contributes no further children.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut visited = HashSet::new();
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            out.push(id);
            for &child in self.nodes[id].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// True when any node strictly below `id` satisfies `pred`.
    pub fn any_descendant(&self, id: NodeId, mut pred: impl FnMut(&TreeNode) -> bool) -> bool {
        let mut visited = HashSet::from([id]);
        let mut stack: Vec<NodeId> = self.nodes[id].children.clone();
        while let Some(next) = stack.pop() {
            if !visited.insert(next) {
                continue;
            }
            let node = &self.nodes[next];
            if pred(node) {
                return true;
            }
            stack.extend(node.children.iter().copied());
        }
        false
    }

    /// Ancestor chain of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut cur = self.nodes[id].parent;
        while let Some(p) = cur {
            if !seen.insert(p) {
                break;
            }
            out.push(p);
            cur = self.nodes[p].parent;
        }
        out
    }
}

pub fn materialize(snapshot: &Snapshot, subtree: &Subtree) -> Tree {
    let mut nodes = vec![TreeNode {
        path: subtree.root().to_string(),
        kind: EntryKind::Directory,
        size: 0,
        depth: 0,
        parent: None,
        children: Vec::new(),
    }];
    let mut index = HashMap::from([(subtree.root().to_string(), Tree::ROOT)]);

    // Directories first so a path listed as both keeps its directory node.
    for entry in snapshot.directories.iter().chain(snapshot.files.iter()) {
        if index.contains_key(&entry.path) {
            continue;
        }
        index.insert(entry.path.clone(), nodes.len());
        nodes.push(TreeNode {
            path: entry.path.clone(),
            kind: entry.kind,
            size: if entry.is_dir() { 0 } else { entry.size },
            depth: 0,
            parent: None,
            children: Vec::new(),
        });
    }

    for id in 1..nodes.len() {
        let parent = parent_path(&nodes[id].path)
            .and_then(|p| index.get(p).copied())
            .filter(|&p| p != id && nodes[p].is_dir())
            .unwrap_or(Tree::ROOT);
        nodes[id].parent = Some(parent);
        nodes[parent].children.push(id);
    }

    for id in 0..nodes.len() {
        let mut children = std::mem::take(&mut nodes[id].children);
        children.sort_by(|&a, &b| {
            let (na, nb) = (&nodes[a], &nodes[b]);
            nb.is_dir()
                .cmp(&na.is_dir())
                .then_with(|| na.path.cmp(&nb.path))
        });
        nodes[id].children = children;
    }

    let mut visited = HashSet::from([Tree::ROOT]);
    let mut queue = VecDeque::from([Tree::ROOT]);
    while let Some(id) = queue.pop_front() {
        let depth = nodes[id].depth;
        for child in nodes[id].children.clone() {
            if visited.insert(child) {
                nodes[child].depth = depth + 1;
                queue.push_back(child);
            }
        }
    }

    Tree {
        subtree: subtree.clone(),
        nodes,
        index,
    }
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
