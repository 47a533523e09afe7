//! Systems tree service
//!
//! Builds the inheritance forest of a document and renders it as text.

use std::path::Path;
use std::sync::Arc;

use generational_arena::Index;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::DocumentLoader;
use crate::application::ApplicationResult;
use crate::domain::{DomainError, Forest, SiblingOrder, TreeArena, TreeBuilder};
use crate::infrastructure::traits::FileSystem;

/// How the forest is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeStyle {
    /// Indented markdown-style list
    #[default]
    List,
    /// Box-drawing tree
    Tree,
}

/// Options for a tree run.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub order: SiblingOrder,
    /// Fail on systems that cannot be attached instead of dropping them
    pub strict: bool,
    pub style: TreeStyle,
    /// Indent unit per level for the list style
    pub indent: String,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            order: SiblingOrder::default(),
            strict: false,
            style: TreeStyle::default(),
            indent: "  ".to_string(),
        }
    }
}

/// Rendered forest plus its node count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOutput {
    pub text: String,
    pub count: usize,
}

/// Service for reconstructing and printing the systems hierarchy.
pub struct SystemsService {
    loader: DocumentLoader,
}

impl SystemsService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            loader: DocumentLoader::new(fs),
        }
    }

    /// Load `path` and build its forest.
    ///
    /// In strict mode any unresolved system is an error; otherwise such
    /// systems are left out of the forest.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&self, path: &Path, order: SiblingOrder, strict: bool) -> ApplicationResult<Forest> {
        let document = self.loader.load(path)?;
        let forest = TreeBuilder::with_order(order).build(&document.systems);
        debug!(
            "build: {} attached, {} unresolved",
            forest.count(),
            forest.unresolved.len()
        );
        if strict && !forest.unresolved.is_empty() {
            return Err(DomainError::UnresolvedSystems(forest.unresolved).into());
        }
        Ok(forest)
    }

    /// Build and render in one go.
    pub fn tree(&self, path: &Path, options: &TreeOptions) -> ApplicationResult<TreeOutput> {
        let forest = self.build(path, options.order, options.strict)?;
        let text = match options.style {
            TreeStyle::List => render_list(&forest.tree, &options.indent),
            TreeStyle::Tree => render_tree(&forest.tree),
        };
        Ok(TreeOutput {
            text,
            count: forest.count(),
        })
    }
}

/// One line per system, indented by `indent` × (depth + 1), pre-order.
pub fn render_list(tree: &TreeArena, indent: &str) -> String {
    let mut out = String::new();
    for (_, depth, node) in tree.iter() {
        out.push_str(&indent.repeat(depth + 1));
        out.push_str("- ");
        out.push_str(&node.data.to_string());
        out.push('\n');
    }
    out
}

/// Box-drawing rendering under a `systems` label.
pub fn render_tree(tree: &TreeArena) -> String {
    let mut root = Tree::new("systems".to_string());
    for &idx in tree.top_level() {
        root.push(subtree(tree, idx));
    }
    root.to_string()
}

fn subtree(tree: &TreeArena, idx: Index) -> Tree<String> {
    match tree.get_node(idx) {
        Some(node) => {
            let leaves = node.children.iter().map(|&c| subtree(tree, c));
            Tree::new(node.data.to_string()).with_leaves(leaves)
        }
        None => Tree::new(String::new()),
    }
}

/// Summary line printed after the tree.
pub fn count_line(count: usize) -> String {
    format!("System Count: {count}")
}
