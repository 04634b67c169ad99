//! Index arena holding the installer tree
//!
//! Nodes are stored in a flat vector; parent and child links are indices
//! into it. A [`NodeId`] handed out by [`InstallerTree::insert`] stays
//! valid for the life of the tree: removing a node from its parent only
//! detaches it, the slot is never reused.

use super::Installable;
use super::hooks::{HookFn, HookPoint, Hooks};
use crate::error::{Result, bad_parent};

/// Identifies a node within one [`InstallerTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

pub(crate) struct Node {
    pub(crate) payload: Box<dyn Installable>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) hooks: Hooks,
}

/// Ordered tree of installable nodes
#[derive(Default)]
pub struct InstallerTree {
    nodes: Vec<Node>,
}

impl InstallerTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached node and returns its id
    pub fn insert(&mut self, payload: Box<dyn Installable>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            payload,
            parent: None,
            children: Vec::new(),
            hooks: Hooks::default(),
        });
        id
    }

    /// Appends `child` to `parent`'s child list, unlinking it from any
    /// previous parent first. Fails if the link would make a node its own
    /// ancestor.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.set_parent(child, Some(parent))
    }

    /// Moves a node under a new parent (or detaches it), atomically:
    /// either the node ends up unlinked from the old parent and linked to
    /// the new one, or the tree is unchanged.
    ///
    /// Fails if `parent` is the node itself, or if `parent` sits anywhere
    /// in the node's own subtree.
    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<()> {
        if parent == Some(node) {
            return Err(bad_parent(self.name(node), "a node cannot be its own parent"));
        }
        if self.nodes[node.0].parent == parent {
            return Ok(());
        }
        if let Some(new_parent) = parent {
            if self.subtree_contains(node, new_parent) {
                return Err(bad_parent(
                    self.name(node),
                    "the new parent is a descendant of the node",
                ));
            }
        }
        if let Some(old_parent) = self.nodes[node.0].parent {
            self.nodes[old_parent.0].children.retain(|&c| c != node);
        }
        self.nodes[node.0].parent = parent;
        if let Some(new_parent) = parent {
            if !self.nodes[new_parent.0].children.contains(&node) {
                self.nodes[new_parent.0].children.push(node);
            }
        }
        Ok(())
    }

    /// Detaches `child` from `parent`; false when it was not a child
    #[allow(dead_code)] // used in tests
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.nodes[child.0].parent != Some(parent) {
            return false;
        }
        self.nodes[parent.0].children.retain(|&c| c != child);
        self.nodes[child.0].parent = None;
        true
    }

    #[allow(dead_code)] // used in tests
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, parent: NodeId) -> &[NodeId] {
        &self.nodes[parent.0].children
    }

    pub fn child_count(&self, parent: NodeId) -> usize {
        self.nodes[parent.0].children.len()
    }

    /// Position of `child` in `parent`'s ordered child list
    #[allow(dead_code)] // used in tests
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes[parent.0].children.iter().position(|&c| c == child)
    }

    /// Whether `child` is a direct child of `parent`
    #[allow(dead_code)] // used in tests
    pub fn contains(&self, parent: NodeId, child: NodeId) -> bool {
        self.nodes[parent.0].children.contains(&child)
    }

    /// Whether `target` sits anywhere below `root` (not counting `root`)
    pub fn subtree_contains(&self, root: NodeId, target: NodeId) -> bool {
        self.children(root)
            .iter()
            .any(|&child| child == target || self.subtree_contains(child, target))
    }

    /// The node's display name
    pub fn name(&self, node: NodeId) -> &str {
        self.nodes[node.0].payload.name()
    }

    pub fn payload_mut(&mut self, node: NodeId) -> &mut dyn Installable {
        self.nodes[node.0].payload.as_mut()
    }

    /// Registers a callback on one of the node's hook points
    #[allow(dead_code)] // used in tests
    pub fn add_hook(
        &mut self,
        node: NodeId,
        point: HookPoint,
        hook: impl FnMut(Option<&mut crate::state::NodeState>) -> Result<()> + 'static,
    ) {
        self.nodes[node.0].hooks.add(point, Box::new(hook) as HookFn);
    }

    /// Concatenates the help text of every node below `node`, depth-first
    /// in child order, skipping empty entries
    pub fn help_text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_help(node, &mut out);
        out
    }

    fn collect_help(&self, node: NodeId, out: &mut String) {
        for &child in self.children(node) {
            let text = self.nodes[child.0].payload.help_text();
            if !text.is_empty() {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(text);
            }
            self.collect_help(child, out);
        }
    }

    pub(crate) fn node_mut(&mut self, node: NodeId) -> &mut Node {
        &mut self.nodes[node.0]
    }
}
