//! Graph plan: the structured, renderer-independent result of compilation.
//!
//! `build_plan` turns a parsed `GraphSpec` into explicit node registrations,
//! routers, and wires in emission order. Renderers only print the plan; they
//! never look at spec text again.

pub mod router;
pub mod wiring;

use crate::Result;
use crate::error::Error;
use crate::spec::{Grammar, GraphSpec, MESSAGE_GRAPH};

use serde::Serialize;
use tracing::{debug, info};

pub use router::build_router;
pub use wiring::build_wires;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphPlan {
    /// Variable the emitted graph is bound to.
    pub name: String,
    pub declaration: Declaration,
    /// Node registrations, in declaration order.
    pub nodes: Vec<String>,
    pub entry: String,
    /// Per-node router and wiring, in declaration order.
    pub steps: Vec<NodeStep>,
    /// Caller-supplied persistence handle expression, passed through as-is.
    pub checkpointer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Typed { state_type: String },
    Messages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStep {
    pub node: String,
    pub router: Option<Router>,
    pub wires: Vec<Wire>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Router {
    pub name: String,
    /// Node whose outgoing edges this router chooses between.
    pub node: String,
    pub arms: Vec<Arm>,
    pub fallback: Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arm {
    pub predicate: String,
    pub route: Route,
}

/// What a router returns: END, one node, or a list of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "to", rename_all = "snake_case")]
pub enum Route {
    End,
    Node(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "route", rename_all = "snake_case")]
pub enum Fallback {
    /// First unconditional edge.
    CatchAll(Route),
    /// Lone guarded edge: stop when the predicate fails.
    End,
    /// Two or more guarded edges: fail at run time.
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Wire {
    Direct {
        to: Target,
    },
    FanOut(FanOut),
    Conditional {
        router: String,
        table_name: String,
        table: Vec<TableEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Target {
    End,
    Node(String),
}

/// One `Send(function, {var: element})` per element of `state[field]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FanOut {
    pub dispatcher: String,
    pub function: String,
    pub var: String,
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableEntry {
    pub key: TableKey,
    pub value: Route,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum TableKey {
    End,
    Text(String),
}

impl Declaration {
    pub fn from_state_type(state_type: &str) -> Self {
        if state_type == MESSAGE_GRAPH {
            Declaration::Messages
        } else {
            Declaration::Typed {
                state_type: state_type.to_string(),
            }
        }
    }

    /// Annotation for router/dispatcher state parameters.
    pub fn state_type(&self) -> Option<&str> {
        match self {
            Declaration::Typed { state_type } => Some(state_type),
            Declaration::Messages => None,
        }
    }
}

impl GraphPlan {
    pub fn has_fan_out(&self) -> bool {
        self.steps
            .iter()
            .flat_map(|s| &s.wires)
            .any(|w| matches!(w, Wire::FanOut(_)))
    }
}

/// Build the emission plan for a parsed graph.
///
/// Performs:
/// - graph name and start node checks
/// - declaration choice (typed state graph vs message graph)
/// - one router (if any guarded edge) and wiring per node, in order
pub fn build_plan(
    name: &str,
    graph: &GraphSpec,
    start: &str,
    checkpointer: Option<&str>,
) -> Result<GraphPlan> {
    build_plan_with(&Grammar::new()?, name, graph, start, checkpointer)
}

/// `build_plan` with the patterns already compiled for parsing.
pub fn build_plan_with(
    grammar: &Grammar,
    name: &str,
    graph: &GraphSpec,
    start: &str,
    checkpointer: Option<&str>,
) -> Result<GraphPlan> {
    if !grammar.is_identifier(name) {
        return Err(Error::format(0, name, "graph name must be an identifier"));
    }

    let start_node = graph
        .get(start)
        .ok_or_else(|| Error::parse(0, start, "start node is not declared"))?;
    let state_type = start_node.state_type.as_deref().ok_or_else(|| {
        Error::parse(start_node.line, start, "start node has no state type")
    })?;

    let mut steps = Vec::with_capacity(graph.len());
    for node in graph.nodes() {
        let router = build_router(node)?;
        let wires = build_wires(node, router.as_ref())?;
        if wires.is_empty() {
            debug!(node = %node.name, "node has no outgoing edges");
        }
        steps.push(NodeStep {
            node: node.name.clone(),
            router,
            wires,
        });
    }

    let checkpointer = checkpointer
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    info!(
        graph = name,
        nodes = graph.len(),
        edges = graph.edge_count(),
        "built graph plan"
    );

    Ok(GraphPlan {
        name: name.to_string(),
        declaration: Declaration::from_state_type(state_type),
        nodes: graph.nodes().map(|n| n.name.clone()).collect(),
        entry: start.to_string(),
        steps,
        checkpointer,
    })
}
