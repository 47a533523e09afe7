use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Data payload for tree nodes representing measurement systems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// System key
    pub key: String,
    /// Display name
    pub name: String,
    pub historical: bool,
    /// Position of the record in the source document
    pub ordinal: usize,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key, self.name)?;
        if self.historical {
            write!(f, " *(H)*")?;
        }
        Ok(())
    }
}

/// How children of the same parent are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiblingOrder {
    /// Source document order
    #[default]
    Declaration,
    /// Order in which the builder attached the nodes
    Attachment,
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for top-level systems
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
}

/// Arena-based forest of measurement systems.
///
/// The arena itself plays the synthetic root: `top_level` holds the
/// systems that inherit from nothing.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    top_level: Vec<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            top_level: Vec::new(),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(
        &mut self,
        data: NodeData,
        parent: Option<Index>,
        order: SiblingOrder,
    ) -> Index {
        let ordinal = data.ordinal;
        let node_idx = self.arena.insert(TreeNode {
            data,
            parent,
            children: Vec::new(),
        });

        let pos = {
            let siblings: &[Index] = match parent {
                Some(parent_idx) => match self.arena.get(parent_idx) {
                    Some(parent) => &parent.children,
                    None => return node_idx,
                },
                None => &self.top_level,
            };
            match order {
                SiblingOrder::Attachment => siblings.len(),
                SiblingOrder::Declaration => siblings.partition_point(|&s| {
                    self.arena
                        .get(s)
                        .map(|n| n.data.ordinal < ordinal)
                        .unwrap_or(true)
                }),
            }
        };

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.insert(pos, node_idx),
            None => self.top_level.insert(pos, node_idx),
        }
        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Children of the synthetic root.
    pub fn top_level(&self) -> &[Index] {
        &self.top_level
    }

    /// Number of system nodes; the synthetic root is not counted.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Depth-first pre-order traversal yielding each node with its depth
    /// (top-level systems have depth 0).
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Keys of the direct children of `key`, or of the root for `None`.
    pub fn child_keys(&self, key: Option<&str>) -> Vec<&str> {
        let children = match key {
            None => &self.top_level,
            Some(key) => match self.iter().find(|(_, _, n)| n.data.key == key) {
                Some((_, _, node)) => &node.children,
                None => return Vec::new(),
            },
        };
        children
            .iter()
            .filter_map(|&c| self.get_node(c))
            .map(|n| n.data.key.as_str())
            .collect()
    }

    /// Number of levels below the synthetic root.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter().map(|(_, depth, _)| depth + 1).max().unwrap_or(0)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, usize)>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        // Reverse so the first top-level system is popped first
        let stack = arena.top_level.iter().rev().map(|&idx| (idx, 0)).collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((current_idx, depth, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(key: &str, ordinal: usize) -> NodeData {
        NodeData {
            key: key.to_string(),
            name: key.to_uppercase(),
            historical: false,
            ordinal,
        }
    }

    #[test]
    fn given_declaration_order_when_inserting_out_of_order_then_children_sorted_by_ordinal() {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(data("a", 1), None, SiblingOrder::Declaration);
        tree.insert_node(data("c", 2), Some(root), SiblingOrder::Declaration);
        tree.insert_node(data("b", 0), Some(root), SiblingOrder::Declaration);

        assert_eq!(tree.child_keys(Some("a")), vec!["b", "c"]);
    }

    #[test]
    fn given_attachment_order_when_inserting_out_of_order_then_children_in_insert_order() {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(data("a", 1), None, SiblingOrder::Attachment);
        tree.insert_node(data("c", 2), Some(root), SiblingOrder::Attachment);
        tree.insert_node(data("b", 0), Some(root), SiblingOrder::Attachment);

        assert_eq!(tree.child_keys(Some("a")), vec!["c", "b"]);
    }

    #[test]
    fn given_forest_when_iterating_then_preorder_with_depths() {
        let mut tree = TreeArena::new();
        let a = tree.insert_node(data("a", 0), None, SiblingOrder::Declaration);
        let b = tree.insert_node(data("b", 1), Some(a), SiblingOrder::Declaration);
        tree.insert_node(data("c", 2), Some(b), SiblingOrder::Declaration);
        tree.insert_node(data("d", 3), None, SiblingOrder::Declaration);

        let visited: Vec<(String, usize)> = tree
            .iter()
            .map(|(_, depth, n)| (n.data.key.clone(), depth))
            .collect();

        assert_eq!(
            visited,
            vec![
                ("a".to_string(), 0),
                ("b".to_string(), 1),
                ("c".to_string(), 2),
                ("d".to_string(), 0)
            ]
        );
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn given_historical_node_when_displaying_then_appends_marker() {
        let mut node = data("old", 0);
        node.historical = true;
        assert_eq!(node.to_string(), "old (OLD) *(H)*");
    }
}
