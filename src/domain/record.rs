//! Structured directory records: the document shape of a tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::domain::arena::{Directory, DirectoryTree, NodeDefaults, NodeId};
use crate::domain::error::{DomainError, DomainResult};

/// One directory as it appears in a JSON/YAML document.
///
/// Missing optional keys take node defaults, unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub children: Vec<DirectoryRecord>,
}

impl DirectoryRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            description: None,
            tags: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Reads a record out of a generic document value.
    pub fn from_value(value: Value) -> DomainResult<Self> {
        serde_json::from_value(value).map_err(|e| DomainError::MalformedRecord {
            reason: e.to_string(),
        })
    }

    pub fn to_value(&self) -> DomainResult<Value> {
        serde_json::to_value(self).map_err(|e| DomainError::MalformedRecord {
            reason: e.to_string(),
        })
    }
}

impl DirectoryTree {
    /// Builds a tree from a record, children first.
    ///
    /// Every child record becomes a detached tree which is then attached to
    /// the freshly created parent, so sibling collisions in the record fail
    /// with [`DomainError::DuplicateName`].
    #[instrument(level = "trace", skip_all, fields(name = %record.name))]
    pub fn from_record(record: &DirectoryRecord, defaults: &NodeDefaults) -> DomainResult<Self> {
        let children = record
            .children
            .iter()
            .map(|child| Self::from_record(child, defaults))
            .collect::<DomainResult<Vec<_>>>()?;

        let mut directory =
            Directory::with_defaults(record.name.as_str(), defaults)?.with_tags(record.tags.iter().cloned());
        if let Some(icon) = &record.icon {
            directory.icon = icon.clone();
        }
        directory.description = record.description.clone();

        let mut tree = DirectoryTree::new(directory);
        let root = tree.root();
        tree.add_children(root, children)?;
        Ok(tree)
    }

    /// Mirrors the sub-tree below `id` as a record, children in stored order.
    pub fn to_record(&self, id: NodeId) -> DomainResult<DirectoryRecord> {
        let directory = self.directory(id)?;
        let children = self
            .children(id)?
            .iter()
            .map(|&child| self.to_record(child))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(DirectoryRecord {
            name: directory.name().to_string(),
            icon: Some(directory.icon.clone()),
            description: directory.description.clone(),
            tags: directory.tags.clone(),
            children,
        })
    }
}
