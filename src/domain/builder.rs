//! Tree builder turning the flat systems mapping into an inheritance forest.

use std::collections::{HashMap, HashSet};
use std::fmt;

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{NodeData, SiblingOrder, TreeArena};
use crate::domain::entities::{Catalog, SystemRecord};

/// Why a system could not be placed in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// `inherits` names a key that does not exist
    MissingParent,
    /// An ancestor further up the chain does not exist
    MissingAncestor(String),
    /// The chain of `inherits` loops back onto itself
    Cycle,
    /// The chain runs into a cycle entered at the named system
    LeadsToCycle(String),
}

/// A system left out of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub key: String,
    pub inherits: String,
    pub reason: UnresolvedReason,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            UnresolvedReason::MissingParent => {
                write!(f, "'{}' inherits from missing system '{}'", self.key, self.inherits)
            }
            UnresolvedReason::MissingAncestor(ancestor) => write!(
                f,
                "'{}' inherits from '{}' whose ancestor '{}' is missing",
                self.key, self.inherits, ancestor
            ),
            UnresolvedReason::Cycle => {
                write!(f, "'{}' is part of an inheritance cycle via '{}'", self.key, self.inherits)
            }
            UnresolvedReason::LeadsToCycle(entry) => write!(
                f,
                "'{}' inherits from '{}' which leads into the inheritance cycle at '{}'",
                self.key, self.inherits, entry
            ),
        }
    }
}

/// Result of a build: the forest plus whatever could not be attached.
#[derive(Debug)]
pub struct Forest {
    pub tree: TreeArena,
    /// Systems dropped from the tree, in document order
    pub unresolved: Vec<Unresolved>,
}

impl Forest {
    /// Total number of systems in the tree (the synthetic root excluded).
    pub fn count(&self) -> usize {
        self.tree.len()
    }
}

/// Constructs the inheritance forest from system records.
///
/// Works in passes over the records that are still pending, in document
/// order. A record is attached once its parent is in the key index; the
/// build stops when a pass attaches nothing. No state is kept on the
/// records, so building twice yields the same forest.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    order: SiblingOrder,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(order: SiblingOrder) -> Self {
        Self { order }
    }

    #[instrument(level = "debug", skip_all, fields(systems = systems.len(), order = ?self.order))]
    pub fn build(&self, systems: &Catalog<SystemRecord>) -> Forest {
        let mut tree = TreeArena::new();
        let mut index: HashMap<&str, Index> = HashMap::with_capacity(systems.len());
        let mut pending: Vec<(usize, &str, &SystemRecord)> = systems
            .iter()
            .enumerate()
            .map(|(ordinal, (key, system))| (ordinal, key, system))
            .collect();

        let mut pass = 0;
        while !pending.is_empty() {
            pass += 1;
            let before = pending.len();
            let mut waiting = Vec::new();

            for (ordinal, key, system) in pending {
                let parent = match system.parent() {
                    None => None,
                    Some(parent_key) => match index.get(parent_key) {
                        Some(&parent_idx) => Some(parent_idx),
                        None => {
                            waiting.push((ordinal, key, system));
                            continue;
                        }
                    },
                };
                let data = NodeData {
                    key: key.to_string(),
                    name: system.name.clone(),
                    historical: system.historical,
                    ordinal,
                };
                let idx = tree.insert_node(data, parent, self.order);
                index.insert(key, idx);
            }

            trace!(pass, attached = before - waiting.len(), "builder pass");
            let stalled = waiting.len() == before;
            pending = waiting;
            if stalled {
                break;
            }
        }

        let unresolved: Vec<Unresolved> = pending
            .into_iter()
            .map(|(_, key, system)| Unresolved {
                key: key.to_string(),
                inherits: system.parent().unwrap_or_default().to_string(),
                reason: diagnose(systems, key),
            })
            .collect();
        if !unresolved.is_empty() {
            debug!(count = unresolved.len(), "dropping unresolved systems");
        }

        Forest { tree, unresolved }
    }
}

/// Follow the `inherits` chain of an unattached system to find what breaks it.
fn diagnose(systems: &Catalog<SystemRecord>, key: &str) -> UnresolvedReason {
    let mut seen = HashSet::new();
    let mut current = key;
    while seen.insert(current) {
        let Some(parent) = systems.get(current).and_then(SystemRecord::parent) else {
            break;
        };
        if !systems.contains_key(parent) {
            return if current == key {
                UnresolvedReason::MissingParent
            } else {
                UnresolvedReason::MissingAncestor(parent.to_string())
            };
        }
        current = parent;
    }
    // `current` is the first system seen twice
    if current == key {
        UnresolvedReason::Cycle
    } else {
        UnresolvedReason::LeadsToCycle(current.to_string())
    }
}
