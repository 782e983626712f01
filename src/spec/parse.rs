use crate::error::{Error, Result};
use crate::spec::dest::DestParser;
use crate::spec::graph::{EdgeDecl, Guard, GraphSpec, NodeDecl};
use crate::spec::normalize::{ARROW, normalize_line};
use regex::Regex;
use tracing::debug;

const TYPED_NODE_RE: &str = r"^([A-Za-z_][A-Za-z0-9_]*)\s*\(\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\)$";
const BARE_NODE_RE: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";
const PREDICATE_RE: &str = r"^[A-Za-z_][A-Za-z0-9_.]*$";

/// Scanner state. Edges attach to the node opened most recently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    AwaitingNode,
    InNode(usize),
}

/// One classified line of normalized spec text.
#[derive(Debug)]
enum Line<'a> {
    Node {
        name: &'a str,
        state_type: Option<&'a str>,
    },
    Edge {
        guard: Guard,
        target: &'a str,
    },
}

/// Compiled line patterns. Build once and reuse across parses and plans.
#[derive(Debug, Clone)]
pub struct Grammar {
    typed_node: Regex,
    bare_node: Regex,
    predicate: Regex,
    dest: DestParser,
}

impl Grammar {
    pub fn new() -> Result<Self> {
        Ok(Self {
            typed_node: Regex::new(TYPED_NODE_RE)?,
            bare_node: Regex::new(BARE_NODE_RE)?,
            predicate: Regex::new(PREDICATE_RE)?,
            dest: DestParser::new()?,
        })
    }

    /// True for a plain identifier (node and graph names).
    pub fn is_identifier(&self, text: &str) -> bool {
        self.bare_node.is_match(text)
    }

    /// Classify a trimmed, non-blank line. Errors carry line 0.
    fn classify<'a>(&self, line: &'a str) -> Result<Line<'a>> {
        if let Some((lhs, rhs)) = line.split_once(ARROW) {
            if rhs.contains(ARROW) {
                return Err(Error::parse(0, line, "more than one arrow on a line"));
            }
            let lhs = lhs.trim();
            let guard = if lhs.is_empty() {
                Guard::Unconditional
            } else if self.predicate.is_match(lhs) {
                Guard::Conditional(lhs.to_string())
            } else {
                return Err(Error::parse(0, line, "guard must be a predicate name"));
            };
            return Ok(Line::Edge {
                guard,
                target: rhs.trim(),
            });
        }

        if line.contains('(') || line.contains(')') {
            let caps = self.typed_node.captures(line).ok_or_else(|| {
                Error::format(0, line, "expected node declaration of the form name(StateType)")
            })?;
            let (Some(name), Some(state_type)) = (caps.get(1), caps.get(2)) else {
                return Err(Error::format(0, line, "malformed node declaration"));
            };
            return Ok(Line::Node {
                name: name.as_str(),
                state_type: Some(state_type.as_str()),
            });
        }

        if self.bare_node.is_match(line) {
            return Ok(Line::Node {
                name: line,
                state_type: None,
            });
        }

        Err(Error::parse(0, line, "unrecognized line shape"))
    }
}

/// Parse spec text into an ordered graph model and its start node.
///
/// Inline shorthand is normalized line by line so reported line numbers
/// refer to the text the author wrote. Blank lines and `#` comments are
/// skipped. The start node is the first node declared with a state type.
pub fn parse(text: &str) -> Result<(GraphSpec, String)> {
    parse_with(&Grammar::new()?, text)
}

/// `parse` with caller-owned patterns.
pub fn parse_with(grammar: &Grammar, text: &str) -> Result<(GraphSpec, String)> {
    let mut graph = GraphSpec::new();
    let mut state = ScanState::AwaitingNode;
    let mut start: Option<String> = None;

    for (lineno, raw) in text.lines().enumerate() {
        let lno = lineno + 1;

        for normalized in normalize_line(raw) {
            let line = normalized.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match grammar.classify(line).map_err(|e| e.at_line(lno))? {
                Line::Node { name, state_type } => {
                    let node = NodeDecl::new(name, state_type.map(str::to_string), lno);
                    if !graph.insert(node) {
                        return Err(Error::parse(lno, line, "duplicate node declaration"));
                    }
                    if state_type.is_some() && start.is_none() {
                        start = Some(name.to_string());
                    }
                    debug!(node = name, state_type, line = lno, "parsed node");
                    state = ScanState::InNode(graph.len() - 1);
                }
                Line::Edge { guard, target } => {
                    let ScanState::InNode(idx) = state else {
                        return Err(Error::parse(lno, line, "edge before node"));
                    };
                    let dest = grammar.dest.parse(target).map_err(|e| e.at_line(lno))?;
                    let node = graph
                        .node_mut(idx)
                        .ok_or_else(|| Error::parse(lno, line, "edge refers to unknown node"))?;
                    debug!(node = %node.name, ?guard, target, line = lno, "parsed edge");
                    node.edges.push(EdgeDecl {
                        guard,
                        target: dest,
                        target_text: target.to_string(),
                        line: lno,
                    });
                }
            }
        }
    }

    let start = start.ok_or_else(|| {
        Error::parse(0, "", "no start node: declare the entry node as name(StateType)")
    })?;

    Ok((graph, start))
}
