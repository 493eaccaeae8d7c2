//! Arena-based directory tree.
//!
//! Nodes live in a generational arena owned by [`DirectoryTree`]. A node owns
//! its children through the `children` index list; `parent` is a plain index
//! used for upward traversal and never keeps anything alive.

use std::collections::VecDeque;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Folder glyph used when a directory declares no icon.
pub const DEFAULT_ICON: &str = "📁";

/// Handle of a node inside one [`DirectoryTree`].
pub type NodeId = Index;

/// Values applied to directories that do not declare their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDefaults {
    pub icon: String,
}

impl Default for NodeDefaults {
    fn default() -> Self {
        Self {
            icon: DEFAULT_ICON.to_string(),
        }
    }
}

/// Data payload of a tree node: one directory.
///
/// The name is only changeable through [`DirectoryTree::rename`] so sibling
/// uniqueness cannot be bypassed. Description, icon and tags carry no
/// invariants and are public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    name: String,
    pub description: Option<String>,
    pub icon: String,
    pub tags: Vec<String>,
}

impl Directory {
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        Self::with_defaults(name, &NodeDefaults::default())
    }

    pub fn with_defaults(name: impl Into<String>, defaults: &NodeDefaults) -> DomainResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            description: None,
            icon: defaults.icon.clone(),
            tags: Vec::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.icon.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.icon, self.name)
        }
    }
}

/// Names become single path components when materialized.
pub fn validate_name(name: &str) -> DomainResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(DomainError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Tree node in the arena-based hierarchy.
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    /// Directory metadata for this node
    pub data: Directory,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl DirectoryNode {
    /// Index of the parent node, None for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child indices, sorted by name
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A complete directory hierarchy with exactly one root.
#[derive(Debug, Clone)]
pub struct DirectoryTree {
    arena: Arena<DirectoryNode>,
    root: NodeId,
}

impl DirectoryTree {
    /// Creates a single-node tree.
    pub fn new(root: Directory) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(DirectoryNode {
            data: root,
            parent: None,
            children: Vec::new(),
        });
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> DomainResult<&DirectoryNode> {
        self.arena.get(id).ok_or(DomainError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomainResult<&mut DirectoryNode> {
        self.arena.get_mut(id).ok_or(DomainError::UnknownNode(id))
    }

    pub fn directory(&self, id: NodeId) -> DomainResult<&Directory> {
        self.node(id).map(|node| &node.data)
    }

    pub fn directory_mut(&mut self, id: NodeId) -> DomainResult<&mut Directory> {
        self.node_mut(id).map(|node| &mut node.data)
    }

    pub fn name(&self, id: NodeId) -> DomainResult<&str> {
        self.directory(id).map(Directory::name)
    }

    pub fn children(&self, id: NodeId) -> DomainResult<&[NodeId]> {
        self.node(id).map(DirectoryNode::children)
    }

    pub fn parent(&self, id: NodeId) -> DomainResult<Option<NodeId>> {
        self.node(id).map(DirectoryNode::parent)
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Inserts one directory below `parent`.
    pub fn add_child(&mut self, parent: NodeId, directory: Directory) -> DomainResult<NodeId> {
        self.ensure_unique(parent, directory.name(), None)?;
        let id = self.arena.insert(DirectoryNode {
            data: directory,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.node_mut(parent)?.children.push(id);
        self.sort_children(parent)?;
        Ok(id)
    }

    /// Moves detached trees below `parent`, in order.
    ///
    /// Each item is consumed; its root becomes a child of `parent` and keeps
    /// its whole sub-tree. The first item whose root name collides with an
    /// existing child aborts the call with [`DomainError::DuplicateName`].
    /// Items accepted before the collision stay inserted. Children are
    /// re-sorted once per call, including on the error path.
    #[instrument(level = "trace", skip(self, items))]
    pub fn add_children<I>(&mut self, parent: NodeId, items: I) -> DomainResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = DirectoryTree>,
    {
        self.node(parent)?;
        let mut inserted = Vec::new();
        let mut outcome = Ok(());

        for item in items {
            if let Err(e) = self.ensure_unique(parent, item.root_directory().name(), None) {
                outcome = Err(e);
                break;
            }
            if let Some(id) = self.transplant(parent, item) {
                inserted.push(id);
            }
        }

        self.sort_children(parent)?;
        outcome.map(|()| inserted)
    }

    /// Renames a node, keeping sibling names unique and siblings sorted.
    #[instrument(level = "trace", skip(self, new_name))]
    pub fn rename(&mut self, id: NodeId, new_name: impl Into<String>) -> DomainResult<()> {
        let new_name = new_name.into();
        validate_name(&new_name)?;

        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            self.ensure_unique(parent, &new_name, Some(id))?;
        }

        trace!("rename {:?} -> {:?}", self.name(id)?, new_name);
        self.node_mut(id)?.data.name = new_name;

        if let Some(parent) = parent {
            self.sort_children(parent)?;
        }
        Ok(())
    }

    /// Finds the direct child of `id` called `name`.
    pub fn lookup(&self, id: NodeId, name: &str) -> DomainResult<NodeId> {
        match self.child_named(id, name, None)? {
            Some(child) => Ok(child),
            None => Err(DomainError::ChildNotFound {
                parent: self.name(id)?.to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Follows a chain of child names starting at the root.
    pub fn find_path<I, S>(&self, segments: I) -> DomainResult<NodeId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        segments
            .into_iter()
            .try_fold(self.root, |current, segment| self.lookup(current, segment.as_ref()))
    }

    /// Number of edges between the root and `id`.
    pub fn level(&self, id: NodeId) -> DomainResult<usize> {
        let mut level = 0;
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            level += 1;
            current = self.node(parent)?.parent;
        }
        Ok(level)
    }

    /// Path from the root down to `id`, both inclusive.
    pub fn ancestors(&self, id: NodeId) -> DomainResult<Vec<NodeId>> {
        let mut chain = vec![id];
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.node(parent)?.parent;
        }
        chain.reverse();
        Ok(chain)
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root
    }

    /// Whether `id` is the final entry of its parent's children, None for the root.
    pub fn is_last_child(&self, id: NodeId) -> DomainResult<Option<bool>> {
        match self.node(id)?.parent {
            Some(parent) => Ok(Some(self.node(parent)?.children.last() == Some(&id))),
            None => Ok(None),
        }
    }

    /// Restores ascending name order of the children of `id`.
    pub fn sort_children(&mut self, id: NodeId) -> DomainResult<()> {
        let mut children = std::mem::take(&mut self.node_mut(id)?.children);
        children.sort_by(|a, b| self.sort_key(*a).cmp(self.sort_key(*b)));
        self.node_mut(id)?.children = children;
        Ok(())
    }

    /// Number of levels in the tree, a lone root has depth 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, id: NodeId) -> usize {
        if let Some(node) = self.arena.get(id) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Pre-order traversal, children left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Deep copy of the sub-tree below `id` as a tree of its own.
    #[instrument(level = "debug", skip(self))]
    pub fn subtree(&self, id: NodeId) -> DomainResult<DirectoryTree> {
        let mut copy = DirectoryTree::new(self.directory(id)?.clone());
        let mut queue = VecDeque::from([(id, copy.root)]);

        while let Some((source_id, target_parent)) = queue.pop_front() {
            for &child in self.children(source_id)? {
                let new_id = copy.arena.insert(DirectoryNode {
                    data: self.directory(child)?.clone(),
                    parent: Some(target_parent),
                    children: Vec::new(),
                });
                copy.node_mut(target_parent)?.children.push(new_id);
                queue.push_back((child, new_id));
            }
        }

        Ok(copy)
    }

    fn root_directory(&self) -> &Directory {
        // the root is inserted on construction and never removed
        &self.arena[self.root].data
    }

    fn sort_key(&self, id: NodeId) -> &str {
        self.arena.get(id).map_or("", |node| node.data.name())
    }

    fn child_named(
        &self,
        parent: NodeId,
        name: &str,
        except: Option<NodeId>,
    ) -> DomainResult<Option<NodeId>> {
        Ok(self
            .node(parent)?
            .children
            .iter()
            .copied()
            .filter(|&child| Some(child) != except)
            .find(|&child| self.sort_key(child) == name))
    }

    fn ensure_unique(&self, parent: NodeId, name: &str, except: Option<NodeId>) -> DomainResult<()> {
        if self.child_named(parent, name, except)?.is_some() {
            return Err(DomainError::DuplicateName {
                parent: self.name(parent)?.to_string(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Moves every node of `source` into this arena below `parent`.
    fn transplant(&mut self, parent: NodeId, mut source: DirectoryTree) -> Option<NodeId> {
        let mut grafted_root = None;
        let mut queue = VecDeque::from([(source.root, parent)]);

        while let Some((source_id, new_parent)) = queue.pop_front() {
            let Some(node) = source.arena.remove(source_id) else {
                continue;
            };
            let id = self.arena.insert(DirectoryNode {
                data: node.data,
                parent: Some(new_parent),
                children: Vec::with_capacity(node.children.len()),
            });
            if let Some(target) = self.arena.get_mut(new_parent) {
                target.children.push(id);
            }
            grafted_root.get_or_insert(id);
            queue.extend(node.children.into_iter().map(|child| (child, id)));
        }

        grafted_root
    }
}

pub struct TreeIterator<'a> {
    tree: &'a DirectoryTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a DirectoryTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a DirectoryNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.arena.get(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current, node));
            }
        }
        None
    }
}
