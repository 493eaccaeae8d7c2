//! README templates with literal `[PLACEHOLDER]` substitution.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use itertools::Itertools;
use regex::Regex;

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{DirectoryTree, DomainResult, NodeId};
use crate::infrastructure::traits::FileSystem;

pub const DIRECTORY_NAME: &str = "[DIRECTORY_NAME]";
pub const DIRECTORY_ICON: &str = "[DIRECTORY_ICON]";
pub const DIRECTORY_DESCRIPTION: &str = "[DIRECTORY_DESCRIPTION]";
pub const DIRECTORY_TAGS: &str = "[DIRECTORY_TAGS]";
pub const DIRECTORY_BREADCRUMBS: &str = "[DIRECTORY_BREADCRUMBS]";
pub const DIRECTORY_CHILDREN: &str = "[DIRECTORY_CHILDREN]";
pub const CURRENT_DATE: &str = "[CURRENT_DATE]";
pub const CURRENT_TIME: &str = "[CURRENT_TIME]";
pub const CURRENT_DATETIME: &str = "[CURRENT_DATETIME]";
pub const CURRENT_YEAR: &str = "[CURRENT_YEAR]";
pub const CURRENT_TIMESTAMP: &str = "[CURRENT_TIMESTAMP]";

pub const README_FILE: &str = "README.md";

const BUILTIN_TEMPLATE: &str = include_str!("../../templates/README.md");

static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line regex"));

/// Placeholder text mapped to its replacement; None substitutes as empty.
pub type Placeholders = BTreeMap<String, Option<String>>;

/// A README template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Default for Template {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The template shipped with dirtree.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_TEMPLATE)
    }

    pub fn load(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<Self> {
        let source = fs.read_to_string(path).with_path_context("read template", path)?;
        Ok(Self::new(source))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replaces every known placeholder in one pass.
    ///
    /// Replacement text is never scanned again, unknown bracketed text is
    /// kept verbatim. Runs of three or more newlines collapse to two.
    pub fn render(&self, values: &Placeholders) -> String {
        let substituted = if values.is_empty() {
            self.source.clone()
        } else {
            // longest first so overlapping keys prefer the most specific one
            let pattern = values
                .keys()
                .sorted_by_key(|key| std::cmp::Reverse(key.len()))
                .map(|key| regex::escape(key))
                .join("|");
            match Regex::new(&pattern) {
                Ok(re) => re
                    .replace_all(&self.source, |caps: &regex::Captures<'_>| {
                        values
                            .get(&caps[0])
                            .and_then(|value| value.clone())
                            .unwrap_or_default()
                    })
                    .into_owned(),
                Err(_) => self.source.clone(),
            }
        };
        BLANK_RUNS.replace_all(&substituted, "\n\n").into_owned()
    }
}

/// `AUTHOR` becomes `[AUTHOR]`, already bracketed keys are kept.
pub fn placeholder_key(key: &str) -> String {
    if key.starts_with('[') && key.ends_with(']') {
        key.to_string()
    } else {
        format!("[{key}]")
    }
}

/// Built-in placeholder values for the node `id`.
pub fn builtin_placeholders(
    tree: &DirectoryTree,
    id: NodeId,
    now: &DateTime<Local>,
) -> DomainResult<Placeholders> {
    let directory = tree.directory(id)?;

    let tags = directory.tags.iter().map(|tag| format!("`{tag}`")).join(" ");

    let mut values = Placeholders::new();
    values.insert(DIRECTORY_NAME.into(), Some(directory.name().to_string()));
    values.insert(DIRECTORY_ICON.into(), Some(directory.icon.clone()));
    values.insert(DIRECTORY_DESCRIPTION.into(), directory.description.clone());
    values.insert(DIRECTORY_TAGS.into(), Some(tags));
    values.insert(DIRECTORY_BREADCRUMBS.into(), Some(breadcrumbs(tree, id)?));
    values.insert(DIRECTORY_CHILDREN.into(), Some(child_list(tree, id)?));
    values.insert(CURRENT_DATE.into(), Some(now.format("%Y-%m-%d").to_string()));
    values.insert(CURRENT_TIME.into(), Some(now.format("%H:%M:%S").to_string()));
    values.insert(
        CURRENT_DATETIME.into(),
        Some(now.format("%Y-%m-%d %H:%M:%S").to_string()),
    );
    values.insert(CURRENT_YEAR.into(), Some(now.format("%Y").to_string()));
    values.insert(CURRENT_TIMESTAMP.into(), Some(now.to_rfc3339()));
    Ok(values)
}

/// Links from the root down to `id`, each relative to the README of `id`.
pub fn breadcrumbs(tree: &DirectoryTree, id: NodeId) -> DomainResult<String> {
    let chain = tree.ancestors(id)?;
    let last = chain.len() - 1;
    let links = chain
        .iter()
        .enumerate()
        .map(|(i, &ancestor)| -> DomainResult<String> {
            let target = match last - i {
                0 => format!("./{README_FILE}"),
                up => format!("{}{README_FILE}", "../".repeat(up)),
            };
            Ok(format!("[{}]({target})", tree.directory(ancestor)?))
        })
        .collect::<DomainResult<Vec<_>>>()?;
    Ok(links.join(" / "))
}

/// Bullet list of the direct children of `id`.
pub fn child_list(tree: &DirectoryTree, id: NodeId) -> DomainResult<String> {
    let lines = tree
        .children(id)?
        .iter()
        .map(|&child| -> DomainResult<String> {
            let directory = tree.directory(child)?;
            let mut line = format!(
                "- {} [{}](./{}/{README_FILE})",
                directory.icon,
                directory.name(),
                link_path(directory.name())
            );
            if let Some(description) = directory.description.as_deref().filter(|d| !d.is_empty()) {
                line.push_str(" - ");
                line.push_str(description);
            }
            Ok(line)
        })
        .collect::<DomainResult<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

fn link_path(name: &str) -> String {
    name.replace('%', "%25").replace(' ', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Directory;
    use chrono::TimeZone;

    fn sample_tree() -> (DirectoryTree, NodeId, NodeId) {
        let mut tree = DirectoryTree::new(Directory::new("root").unwrap());
        let root = tree.root();
        let docs = tree
            .add_child(root, Directory::new("docs").unwrap().with_description("Documentation"))
            .unwrap();
        let api = tree
            .add_child(docs, Directory::new("api").unwrap().with_tags(["rest", "v2"]))
            .unwrap();
        tree.add_child(root, Directory::new("my notes").unwrap()).unwrap();
        (tree, docs, api)
    }

    fn values(pairs: &[(&str, Option<&str>)]) -> Placeholders {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn given_known_and_unknown_placeholders_when_rendering_then_only_known_replaced() {
        let template = Template::new("# [DIRECTORY_NAME]\n[UNKNOWN] [DIRECTORY_DESCRIPTION]|");

        let out = template.render(&values(&[
            (DIRECTORY_NAME, Some("docs")),
            (DIRECTORY_DESCRIPTION, None),
        ]));

        assert_eq!(out, "# docs\n[UNKNOWN] |");
    }

    #[test]
    fn given_value_containing_placeholder_when_rendering_then_not_rescanned() {
        let template = Template::new("[DIRECTORY_DESCRIPTION] [DIRECTORY_NAME]");

        let out = template.render(&values(&[
            (DIRECTORY_NAME, Some("docs")),
            (DIRECTORY_DESCRIPTION, Some("see [DIRECTORY_NAME]")),
        ]));

        assert_eq!(out, "see [DIRECTORY_NAME] docs");
    }

    #[test]
    fn given_many_blank_lines_when_rendering_then_collapsed_to_two_newlines() {
        let template = Template::new("a\n\n\n\nb\n[DIRECTORY_TAGS]\n\nc");

        let out = template.render(&values(&[(DIRECTORY_TAGS, Some(""))]));

        assert_eq!(out, "a\n\nb\n\nc");
    }

    #[test]
    fn given_nested_node_when_building_breadcrumbs_then_relative_links() {
        let (tree, _, api) = sample_tree();

        let crumbs = breadcrumbs(&tree, api).unwrap();

        assert_eq!(
            crumbs,
            "[📁 root](../../README.md) / [📁 docs](../README.md) / [📁 api](./README.md)"
        );
    }

    #[test]
    fn given_children_when_listing_then_one_bullet_each() {
        let (tree, _, _) = sample_tree();

        let list = child_list(&tree, tree.root()).unwrap();

        assert_eq!(
            list,
            "- 📁 [docs](./docs/README.md) - Documentation\n- 📁 [my notes](./my%20notes/README.md)"
        );
    }

    #[test]
    fn given_fixed_time_when_building_placeholders_then_formats_dates() {
        let (tree, _, api) = sample_tree();
        let now = Local.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();

        let values = builtin_placeholders(&tree, api, &now).unwrap();

        assert_eq!(values[CURRENT_DATE].as_deref(), Some("2024-03-05"));
        assert_eq!(values[CURRENT_TIME].as_deref(), Some("07:08:09"));
        assert_eq!(values[CURRENT_DATETIME].as_deref(), Some("2024-03-05 07:08:09"));
        assert_eq!(values[CURRENT_YEAR].as_deref(), Some("2024"));
        assert_eq!(values[DIRECTORY_TAGS].as_deref(), Some("`rest` `v2`"));
        assert_eq!(values[DIRECTORY_CHILDREN].as_deref(), Some(""));
    }

    #[test]
    fn given_builtin_template_when_rendering_leaf_then_no_placeholders_left() {
        let (tree, docs, _) = sample_tree();
        let now = Local::now();

        let out = Template::builtin().render(&builtin_placeholders(&tree, docs, &now).unwrap());

        assert!(out.contains("docs"));
        assert!(!out.contains("[DIRECTORY_"));
        assert!(!out.contains("\n\n\n"));
    }
}
