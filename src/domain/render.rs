//! ASCII tree rendering.
//!
//! The sub-tree below a node is laid out by `termtree`; the node's own
//! position in the full tree is then prepended, so rendering a deep node
//! yields exactly the lines it would have inside a rendering of the root.

use termtree::{GlyphPalette, Tree};
use tracing::instrument;

use crate::domain::arena::{DirectoryTree, NodeId};
use crate::domain::error::DomainResult;

const LAST_SKIP: &str = "   ";
const MIDDLE_SKIP: &str = "│  ";
const LAST_ITEM: &str = "└─ ";
const MIDDLE_ITEM: &str = "├─ ";

fn glyphs() -> GlyphPalette {
    let mut glyphs = GlyphPalette::new();
    glyphs.middle_item = "├";
    glyphs.last_item = "└";
    glyphs.item_indent = "─ ";
    glyphs.middle_skip = "│";
    glyphs.last_skip = " ";
    glyphs.skip_indent = "  ";
    glyphs
}

pub trait TreeRender {
    /// Renders `id` and its descendants, one line per node.
    ///
    /// `max_depth` counts the node itself: `Some(1)` renders one line,
    /// `None` renders everything.
    fn render(&self, id: NodeId, max_depth: Option<usize>) -> DomainResult<String>;
}

impl TreeRender for DirectoryTree {
    #[instrument(level = "debug", skip(self))]
    fn render(&self, id: NodeId, max_depth: Option<usize>) -> DomainResult<String> {
        let subtree = to_termtree(self, id, max_depth)?.to_string();
        let (head, tail) = ancestry_prefix(self, id)?;

        let lines: Vec<String> = subtree
            .lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    format!("{head}{line}")
                } else {
                    format!("{tail}{line}")
                }
            })
            .collect();
        Ok(lines.join("\n"))
    }
}

fn to_termtree(tree: &DirectoryTree, id: NodeId, depth: Option<usize>) -> DomainResult<Tree<String>> {
    let label = tree.directory(id)?.to_string();
    let mut node = Tree::new(label).with_glyphs(glyphs());

    if depth.map_or(true, |d| d > 1) {
        for &child in tree.children(id)? {
            node.push(to_termtree(tree, child, depth.map(|d| d - 1))?);
        }
    }
    Ok(node)
}

/// Prefix of the node's own line and of every line below it.
fn ancestry_prefix(tree: &DirectoryTree, id: NodeId) -> DomainResult<(String, String)> {
    let Some(is_last) = tree.is_last_child(id)? else {
        return Ok((String::new(), String::new()));
    };

    let ancestors = tree.ancestors(id)?;
    let mut columns = String::new();
    // skip the root and the node itself
    for &ancestor in &ancestors[1..ancestors.len() - 1] {
        let column = match tree.is_last_child(ancestor)? {
            Some(true) => LAST_SKIP,
            _ => MIDDLE_SKIP,
        };
        columns.push_str(column);
    }

    let (item, skip) = if is_last {
        (LAST_ITEM, LAST_SKIP)
    } else {
        (MIDDLE_ITEM, MIDDLE_SKIP)
    };
    Ok((format!("{columns}{item}"), format!("{columns}{skip}")))
}
