//! Tests for ASCII tree rendering.

use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

use dirtree::domain::{Directory, DirectoryTree, TreeRender};

#[fixture]
fn abcd() -> DirectoryTree {
    let mut tree = DirectoryTree::new(Directory::new("A").unwrap());
    let root = tree.root();
    let b = tree.add_child(root, Directory::new("B").unwrap()).unwrap();
    tree.add_child(root, Directory::new("C").unwrap()).unwrap();
    tree.add_child(b, Directory::new("D").unwrap()).unwrap();
    tree
}

#[rstest]
fn given_four_node_tree_when_rendering_root_then_box_drawing_lines(abcd: DirectoryTree) {
    // Act
    let out = abcd.render(abcd.root(), None).unwrap();

    // Assert
    assert_eq!(out, "📁 A\n├─ 📁 B\n│  └─ 📁 D\n└─ 📁 C");
}

#[rstest]
#[case(Some(1), "📁 A")]
#[case(Some(2), "📁 A\n├─ 📁 B\n└─ 📁 C")]
#[case(Some(3), "📁 A\n├─ 📁 B\n│  └─ 📁 D\n└─ 📁 C")]
#[case(Some(10), "📁 A\n├─ 📁 B\n│  └─ 📁 D\n└─ 📁 C")]
fn given_depth_limit_when_rendering_then_truncated(
    abcd: DirectoryTree,
    #[case] max_depth: Option<usize>,
    #[case] expected: &str,
) {
    assert_eq!(abcd.render(abcd.root(), max_depth).unwrap(), expected);
}

#[rstest]
fn given_inner_node_when_rendering_then_lines_match_full_rendering(abcd: DirectoryTree) {
    // Arrange
    let b = abcd.find_path(["B"]).unwrap();
    let d = abcd.find_path(["B", "D"]).unwrap();

    // Act
    let rendered_b = abcd.render(b, None).unwrap();
    let rendered_d = abcd.render(d, None).unwrap();

    // Assert
    assert_eq!(rendered_b, "├─ 📁 B\n│  └─ 📁 D");
    assert_eq!(rendered_d, "│  └─ 📁 D");
}

#[test]
fn given_empty_icon_when_rendering_then_name_only() {
    // Arrange
    let mut tree = DirectoryTree::new(Directory::new("root").unwrap().with_icon(""));
    let root = tree.root();
    tree.add_child(root, Directory::new("docs").unwrap().with_icon("fa-book"))
        .unwrap();

    // Act
    let out = tree.render(root, None).unwrap();

    // Assert
    assert_eq!(out, "root\n└─ fa-book docs");
}
