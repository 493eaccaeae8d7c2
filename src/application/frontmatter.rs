//! README front matter: the YAML block between two `---` lines at the top of a file.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;
use yaml_rust2::{Yaml, YamlLoader};

use crate::application::document::yaml_scalar_to_string;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Directory;

pub const ICON_KEY: &str = "directory_icon";
pub const DESCRIPTION_KEY: &str = "directory_description";
pub const TAGS_KEY: &str = "directory_tags";

static FRONT_MATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?sm)\A\x{FEFF}?---[ \t]*\r?\n(.*?)^---[ \t]*\r?$").expect("front matter regex")
});

/// Directory metadata declared in a README.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub icon: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl FrontMatter {
    /// Extracts directory metadata from README content.
    ///
    /// Returns None when the content has no front matter block or the block
    /// is not a mapping. Invalid YAML inside the block is an error.
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Option<Self>> {
        let Some(caps) = FRONT_MATTER.captures(content) else {
            return Ok(None);
        };
        let body = caps.get(1).map_or("", |m| m.as_str());

        let docs = YamlLoader::load_from_str(body).map_err(|e| ApplicationError::DocumentParse {
            path: path.to_path_buf(),
            message: format!("front matter: {e}"),
        })?;

        let hash = match docs.into_iter().next() {
            Some(Yaml::Hash(hash)) => hash,
            None | Some(Yaml::Null) => return Ok(None),
            Some(_) => {
                warn!("Ignoring front matter that is not a mapping: {}", path.display());
                return Ok(None);
            }
        };

        let get = |key: &str| hash.get(&Yaml::String(key.to_string()));
        Ok(Some(Self {
            icon: get(ICON_KEY).and_then(yaml_scalar_to_string),
            description: get(DESCRIPTION_KEY).and_then(yaml_scalar_to_string),
            tags: get(TAGS_KEY).and_then(tag_list),
        }))
    }

    /// Copies every declared value onto `directory`.
    pub fn apply(self, directory: &mut Directory) {
        if let Some(icon) = self.icon {
            directory.icon = icon;
        }
        if let Some(description) = self.description {
            directory.description = Some(description);
        }
        if let Some(tags) = self.tags {
            directory.tags = tags;
        }
    }
}

fn tag_list(yaml: &Yaml) -> Option<Vec<String>> {
    match yaml {
        Yaml::Array(items) => Some(items.iter().filter_map(yaml_scalar_to_string).collect()),
        Yaml::Null => None,
        scalar => yaml_scalar_to_string(scalar).map(|tag| vec![tag]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Option<FrontMatter> {
        FrontMatter::parse(content, Path::new("README.md")).unwrap()
    }

    #[test]
    fn given_full_front_matter_when_parsing_then_reads_all_keys() {
        let content = "---\ndirectory_icon: fa-book\ndirectory_description: Notes\ndirectory_tags: [a, b]\n---\n# Title\n";

        let front = parse(content).unwrap();

        assert_eq!(front.icon.as_deref(), Some("fa-book"));
        assert_eq!(front.description.as_deref(), Some("Notes"));
        assert_eq!(front.tags, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn given_single_tag_scalar_when_parsing_then_one_tag() {
        let front = parse("---\ndirectory_tags: solo\n---\n").unwrap();

        assert_eq!(front.tags, Some(vec!["solo".to_string()]));
    }

    #[test]
    fn given_crlf_line_endings_when_parsing_then_block_found() {
        let front = parse("---\r\ndirectory_icon: x\r\n---\r\nbody\r\n").unwrap();

        assert_eq!(front.icon.as_deref(), Some("x"));
    }

    #[test]
    fn given_no_front_matter_when_parsing_then_none() {
        assert_eq!(parse("# Just a readme\n---\nnot: front matter\n---\n"), None);
    }

    #[test]
    fn given_empty_block_when_parsing_then_none() {
        assert_eq!(parse("---\n---\n"), None);
    }

    #[test]
    fn given_invalid_yaml_when_parsing_then_document_parse_error() {
        let result = FrontMatter::parse("---\ndirectory_tags: [a, b\n---\n", Path::new("README.md"));

        assert!(matches!(result, Err(ApplicationError::DocumentParse { .. })));
    }

    #[test]
    fn given_partial_front_matter_when_applying_then_keeps_other_fields() {
        let mut directory = Directory::new("docs").unwrap().with_description("old");
        let front = parse("---\ndirectory_icon: fa-book\n---\n").unwrap();

        front.apply(&mut directory);

        assert_eq!(directory.icon, "fa-book");
        assert_eq!(directory.description.as_deref(), Some("old"));
    }
}
