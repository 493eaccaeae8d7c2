//! Document exporter
//!
//! Serializes trees into JSON/YAML documents under a named root key.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::application::document::{parse_top_level, DocumentFormat};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{DirectoryTree, NodeId};
use crate::infrastructure::traits::FileSystem;

/// What to do when the export target already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Add the root to the existing document; the root key must be new.
    Merge,
    /// Replace the whole file.
    Overwrite,
    /// Refuse to touch an existing file.
    #[default]
    Error,
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Merge => "merge",
            Self::Overwrite => "overwrite",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "overwrite" => Ok(Self::Overwrite),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown conflict policy {other:?} (expected merge, overwrite or error)"
            )),
        }
    }
}

/// Service for serializing trees into documents.
pub struct DocumentService {
    fs: Arc<dyn FileSystem>,
}

impl DocumentService {
    /// Create a new document service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Nested mapping mirroring the sub-tree below `id`.
    pub fn to_document(tree: &DirectoryTree, id: NodeId) -> ApplicationResult<Value> {
        Ok(tree.to_record(id)?.to_value()?)
    }

    /// Writes `{root_name: document}` to `path` according to `policy`.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn export_document(
        &self,
        tree: &DirectoryTree,
        id: NodeId,
        path: &Path,
        root_name: &str,
        policy: ConflictPolicy,
    ) -> ApplicationResult<()> {
        let format = DocumentFormat::from_path(path)?;
        let exists = self.fs.exists(path);

        let mut document = match (policy, exists) {
            (ConflictPolicy::Error, true) => {
                return Err(ApplicationError::FileConflict(path.to_path_buf()));
            }
            (ConflictPolicy::Merge, true) => {
                let content = self
                    .fs
                    .read_to_string(path)
                    .with_path_context("read document", path)?;
                let existing = parse_top_level(path, &content)?;
                if existing.contains_key(root_name) {
                    return Err(ApplicationError::DuplicateRootKey {
                        path: path.to_path_buf(),
                        root: root_name.to_string(),
                    });
                }
                debug!("export: merging into {} existing roots", existing.len());
                existing
            }
            _ => Map::new(),
        };

        document.insert(root_name.to_string(), Self::to_document(tree, id)?);
        let content = format.emit(&Value::Object(document))?;
        self.fs
            .write(path, &content)
            .with_path_context("write document", path)?;

        info!("Exported {:?} to {} ({})", root_name, path.display(), policy);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("merge", ConflictPolicy::Merge)]
    #[case("Overwrite", ConflictPolicy::Overwrite)]
    #[case("ERROR", ConflictPolicy::Error)]
    fn given_policy_name_when_parsing_then_case_insensitive(
        #[case] input: &str,
        #[case] expected: ConflictPolicy,
    ) {
        assert_eq!(input.parse::<ConflictPolicy>().unwrap(), expected);
    }

    #[test]
    fn given_unknown_policy_when_parsing_then_error() {
        assert!("replace".parse::<ConflictPolicy>().is_err());
    }

    #[test]
    fn given_policy_when_displaying_then_round_trips_through_from_str() {
        for policy in [ConflictPolicy::Merge, ConflictPolicy::Overwrite, ConflictPolicy::Error] {
            assert_eq!(policy.to_string().parse::<ConflictPolicy>().unwrap(), policy);
        }
    }
}
