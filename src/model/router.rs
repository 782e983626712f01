//! Branching functions for nodes with at least one guarded edge.

use crate::error::{Error, Result};
use crate::model::{Arm, Fallback, Route, Router};
use crate::spec::{Destination, Guard, NodeDecl};
use tracing::warn;

pub fn router_name(node: &str) -> String {
    format!("after_{}", node)
}

impl Route {
    /// Route value for a destination; dynamic fan-out has none.
    pub fn from_destination(dest: &Destination) -> Option<Route> {
        match dest {
            Destination::Terminal => Some(Route::End),
            Destination::Single { name } => Some(Route::Node(name.clone())),
            Destination::Parallel { names } => Some(Route::Many(names.clone())),
            Destination::DynamicFanOut { .. } => None,
        }
    }
}

/// Build the router for `node`, or None when every edge is unconditional.
///
/// Predicates are tried in declaration order and the first match wins. The
/// first unconditional edge becomes the catch-all and ends the scan; edges
/// declared after it never reach the router.
pub fn build_router(node: &NodeDecl) -> Result<Option<Router>> {
    if node.all_unconditional() {
        return Ok(None);
    }

    let mut arms = Vec::new();
    let mut catch_all = None;

    for (i, edge) in node.edges.iter().enumerate() {
        let route = Route::from_destination(&edge.target).ok_or_else(|| {
            Error::format(
                edge.line,
                &edge.target_text,
                "dynamic fan-out cannot share a node with guarded edges",
            )
        })?;

        match &edge.guard {
            Guard::Conditional(predicate) => arms.push(Arm {
                predicate: predicate.clone(),
                route,
            }),
            Guard::Unconditional => {
                let dropped: Vec<&str> = node.edges[i + 1..]
                    .iter()
                    .map(|e| e.target_text.as_str())
                    .collect();
                if !dropped.is_empty() {
                    warn!(
                        node = %node.name,
                        line = edge.line,
                        ?dropped,
                        "unconditional edge is not last; later edges are unreachable"
                    );
                }
                catch_all = Some(route);
                break;
            }
        }
    }

    let fallback = match catch_all {
        Some(route) => Fallback::CatchAll(route),
        None if node.edges.len() > 1 => Fallback::NoMatch,
        None => Fallback::End,
    };

    Ok(Some(Router {
        name: router_name(&node.name),
        node: node.name.clone(),
        arms,
        fallback,
    }))
}
