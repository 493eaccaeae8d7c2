//! End-to-end tests through the command dispatcher.

use std::fs;

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use dirtree::cli::args::Cli;
use dirtree::cli::commands::execute_command;
use dirtree::cli::CliError;
use dirtree::exitcode;
use dirtree::util::testing::init_test_setup;

const DOC: &str = r#"
project:
  name: project
  children:
    - name: docs
      description: Guides
      children:
        - name: api
"#;

fn run(args: &[&str]) -> Result<(), CliError> {
    init_test_setup();
    let cli = Cli::parse_from(std::iter::once("dirtree").chain(args.iter().copied()));
    execute_command(&cli)
}

#[test]
fn given_document_when_build_then_output_created_with_custom_placeholders() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let doc = temp.path().join("tree.yaml");
    fs::write(&doc, DOC).unwrap();
    let template = temp.path().join("tpl.md");
    fs::write(&template, "[DIRECTORY_NAME] by [AUTHOR]").unwrap();
    let out = temp.path().join("out/nested");

    // Act
    run(&[
        "build",
        doc.to_str().unwrap(),
        "--root",
        "project",
        "--output",
        out.to_str().unwrap(),
        "--template",
        template.to_str().unwrap(),
        "--set",
        "AUTHOR=me",
    ])
    .unwrap();

    // Assert
    assert_eq!(
        fs::read_to_string(out.join("project/docs/api/README.md")).unwrap(),
        "api by me"
    );
}

#[test]
fn given_node_path_when_export_then_only_subtree_written() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let doc = temp.path().join("tree.yaml");
    fs::write(&doc, DOC).unwrap();
    let target = temp.path().join("docs.json");

    // Act
    run(&[
        "export",
        doc.to_str().unwrap(),
        "--root",
        "project",
        "--node",
        "docs",
        "--output",
        target.to_str().unwrap(),
    ])
    .unwrap();

    // Assert
    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(written["docs"]["description"], "Guides");
    assert_eq!(written["docs"]["children"][0]["name"], "api");
}

#[test]
fn given_directory_source_when_show_then_succeeds_without_root() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("project/src")).unwrap();

    let result = run(&["show", temp.path().join("project").to_str().unwrap(), "-L", "2"]);

    assert!(result.is_ok());
}

#[rstest]
#[case(&["show", "tree.yaml"], exitcode::USAGE)]
#[case(&["show", "absent.yaml", "--root", "project"], exitcode::USAGE)]
#[case(&["show", "tree.yaml", "--root", "nope"], exitcode::DATAERR)]
#[case(&["show", "tree.yaml", "--root", "project", "--node", "docs/nope"], exitcode::DATAERR)]
#[case(&["export", "tree.yaml", "--root", "project", "-o", "tree.yaml"], exitcode::CANTCREAT)]
fn given_bad_invocation_when_executing_then_exit_code(#[case] args: &[&str], #[case] expected: i32) {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tree.yaml"), DOC).unwrap();
    let args: Vec<String> = args
        .iter()
        .map(|arg| {
            if arg.ends_with(".yaml") {
                temp.path().join(arg).display().to_string()
            } else {
                arg.to_string()
            }
        })
        .collect();

    // Act
    let err = run(&args.iter().map(String::as_str).collect::<Vec<_>>()).unwrap_err();

    // Assert
    assert_eq!(err.exit_code(), expected);
}
