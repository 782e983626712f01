//! Spec layer: DSL text in, ordered graph model out.
//!
//! This module is intentionally separate from plan building and rendering.
//! It owns:
//! - Normalization of inline shorthand (`a => b` on one line)
//! - Destination expressions (END, parallel sets, dynamic fan-out)
//! - The line scanner producing `GraphSpec` plus the start node

pub mod dest;
pub mod graph;
pub mod normalize;
pub mod parse;

pub use dest::DestParser;
pub use graph::{Destination, EdgeDecl, END, GraphSpec, Guard, MESSAGE_GRAPH, NodeDecl};
pub use normalize::normalize;
pub use parse::{Grammar, parse, parse_with};
