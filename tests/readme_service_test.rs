//! Tests for ReadmeService: materializing trees as directories with READMEs.

use std::fs;
use std::sync::Arc;

use chrono::{Local, TimeZone};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use dirtree::application::services::ReadmeService;
use dirtree::application::{ApplicationError, Placeholders, Template};
use dirtree::domain::{Directory, DirectoryTree};
use dirtree::infrastructure::traits::RealFileSystem;

fn service() -> ReadmeService {
    ReadmeService::new(Arc::new(RealFileSystem))
}

fn project_tree() -> DirectoryTree {
    let mut tree = DirectoryTree::new(Directory::new("project").unwrap().with_description("Main"));
    let root = tree.root();
    tree.add_child(
        root,
        Directory::new("docs")
            .unwrap()
            .with_description("Guides")
            .with_tags(["md"]),
    )
    .unwrap();
    tree
}

#[test]
fn given_two_node_tree_when_materializing_then_directories_and_readmes_created() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let tree = project_tree();
    let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

    // Act
    let created = service()
        .materialize_at(
            &tree,
            tree.root(),
            temp.path(),
            &Template::builtin(),
            &Placeholders::new(),
            &now,
        )
        .unwrap();

    // Assert
    assert_eq!(created, temp.path().join("project"));
    let root_readme = fs::read_to_string(temp.path().join("project/README.md")).unwrap();
    let docs_readme = fs::read_to_string(temp.path().join("project/docs/README.md")).unwrap();

    assert_eq!(
        root_readme,
        "[📁 project](./README.md)\n\n# 📁 project\n\nMain\n\n## Contents\n\n\
         - 📁 [docs](./docs/README.md) - Guides\n\n---\n\
         _Generated on 2024-01-02 at 03:04:05._\n"
    );
    assert!(docs_readme.starts_with("[📁 project](../README.md) / [📁 docs](./README.md)\n"));
    assert!(docs_readme.contains("# 📁 docs\n\nGuides\n\n`md`\n"));
}

#[test]
fn given_existing_target_when_materializing_then_path_conflict() {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("project")).unwrap();
    let tree = project_tree();

    // Act
    let result = service().materialize(
        &tree,
        tree.root(),
        temp.path(),
        &Template::builtin(),
        &Placeholders::new(),
    );

    // Assert
    assert!(matches!(result, Err(ApplicationError::PathConflict(p)) if p == temp.path().join("project")));
    assert!(!temp.path().join("project/docs").exists());
}

#[test]
fn given_extra_placeholders_when_materializing_then_they_override_builtins() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let tree = DirectoryTree::new(Directory::new("solo").unwrap());
    let template = Template::new("[DIRECTORY_NAME] by [AUTHOR] [UNSET]");
    let extra = Placeholders::from([
        ("[AUTHOR]".to_string(), Some("me".to_string())),
        ("[DIRECTORY_NAME]".to_string(), Some("custom".to_string())),
    ]);

    // Act
    service()
        .materialize(&tree, tree.root(), temp.path(), &template, &extra)
        .unwrap();

    // Assert
    let readme = fs::read_to_string(temp.path().join("solo/README.md")).unwrap();
    assert_eq!(readme, "custom by me [UNSET]");
}

#[test]
fn given_inner_node_when_materializing_then_only_its_subtree_written() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let tree = project_tree();
    let docs = tree.find_path(["docs"]).unwrap();

    // Act
    let created = service()
        .materialize(&tree, docs, temp.path(), &Template::builtin(), &Placeholders::new())
        .unwrap();

    // Assert
    assert_eq!(created, temp.path().join("docs"));
    assert!(temp.path().join("docs/README.md").is_file());
    assert!(!temp.path().join("project").exists());
}
