//! Parsed graph spec: ordered nodes, their guarded edges, and destinations.
//!
//! Node order is declaration order and drives emission order downstream, so
//! nodes live in a Vec with a BTreeMap name index beside it.

use serde::Serialize;
use std::collections::BTreeMap;

/// Name of the terminal destination as written in spec text.
pub const END: &str = "END";

/// State type that selects the untyped message-sequence graph.
pub const MESSAGE_GRAPH: &str = "MessageGraph";

#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphSpec {
    nodes: Vec<NodeDecl>,
    #[serde(skip)]
    index: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDecl {
    pub name: String,
    /// Only recorded for `name(Type)` declarations.
    pub state_type: Option<String>,
    pub edges: Vec<EdgeDecl>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeDecl {
    pub guard: Guard,
    pub target: Destination,
    /// Trimmed destination text; used verbatim as the dispatch-table key.
    pub target_text: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "predicate", rename_all = "snake_case")]
pub enum Guard {
    Conditional(String),
    Unconditional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
    Terminal,
    Single {
        name: String,
    },
    Parallel {
        names: Vec<String>,
    },
    DynamicFanOut {
        function: String,
        var: String,
        field: String,
    },
}

impl GraphSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. Returns false (and changes nothing) if the name exists.
    pub fn insert(&mut self, node: NodeDecl) -> bool {
        if self.index.contains_key(&node.name) {
            return false;
        }
        self.index.insert(node.name.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub fn get(&self, name: &str) -> Option<&NodeDecl> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub(crate) fn node_mut(&mut self, idx: usize) -> Option<&mut NodeDecl> {
        self.nodes.get_mut(idx)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeDecl> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }
}

impl NodeDecl {
    pub fn new(name: impl Into<String>, state_type: Option<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            state_type,
            edges: Vec::new(),
            line,
        }
    }

    /// True when no edge carries a predicate (vacuously true with no edges).
    pub fn all_unconditional(&self) -> bool {
        self.edges.iter().all(|e| e.guard.is_unconditional())
    }
}

impl Guard {
    pub fn is_unconditional(&self) -> bool {
        matches!(self, Guard::Unconditional)
    }
}
