//! Edge wiring per node: direct edges, fan-out dispatchers, dispatch tables.

use crate::error::{Error, Result};
use crate::model::{FanOut, Route, Router, TableEntry, TableKey, Target, Wire};
use crate::spec::{Destination, NodeDecl};

pub fn table_name(node: &str) -> String {
    format!("{}_dict", node)
}

/// Dispatcher name for the `nth` (1-based) fan-out edge of `node`.
pub fn dispatcher_name(node: &str, nth: usize) -> String {
    if nth <= 1 {
        format!("fan_out_{}", node)
    } else {
        format!("fan_out_{}_{}", node, nth)
    }
}

/// Build the wires for `node`. `router` must be the result of
/// `build_router` for the same node.
pub fn build_wires(node: &NodeDecl, router: Option<&Router>) -> Result<Vec<Wire>> {
    match router {
        None => Ok(direct_wires(node)),
        Some(router) => Ok(vec![conditional_wire(node, router)?]),
    }
}

fn direct_wires(node: &NodeDecl) -> Vec<Wire> {
    let mut wires = Vec::new();
    let mut fan_outs = 0usize;

    for edge in &node.edges {
        match &edge.target {
            Destination::Terminal => wires.push(Wire::Direct { to: Target::End }),
            Destination::Single { name } => wires.push(Wire::Direct {
                to: Target::Node(name.clone()),
            }),
            Destination::Parallel { names } => {
                wires.extend(names.iter().map(|n| Wire::Direct {
                    to: Target::Node(n.clone()),
                }));
            }
            Destination::DynamicFanOut {
                function,
                var,
                field,
            } => {
                fan_outs += 1;
                wires.push(Wire::FanOut(FanOut {
                    dispatcher: dispatcher_name(&node.name, fan_outs),
                    function: function.clone(),
                    var: var.clone(),
                    field: field.clone(),
                }));
            }
        }
    }

    wires
}

fn conditional_wire(node: &NodeDecl, router: &Router) -> Result<Wire> {
    let mut table: Vec<TableEntry> = Vec::new();

    for edge in &node.edges {
        let value = Route::from_destination(&edge.target).ok_or_else(|| {
            Error::format(
                edge.line,
                &edge.target_text,
                "dynamic fan-out cannot share a node with guarded edges",
            )
        })?;
        let key = match value {
            Route::End => TableKey::End,
            _ => TableKey::Text(edge.target_text.clone()),
        };
        push_unique(&mut table, TableEntry { key, value });
    }

    // The router's default-to-END fallback needs a registered END entry.
    if let [only] = node.edges.as_slice() {
        if !only.guard.is_unconditional() {
            push_unique(
                &mut table,
                TableEntry {
                    key: TableKey::End,
                    value: Route::End,
                },
            );
        }
    }

    Ok(Wire::Conditional {
        router: router.name.clone(),
        table_name: table_name(&node.name),
        table,
    })
}

fn push_unique(table: &mut Vec<TableEntry>, entry: TableEntry) {
    if !table.iter().any(|e| e.key == entry.key) {
        table.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::router::build_router;
    use crate::spec::parse;
    use pretty_assertions::assert_eq;

    fn wires_for(text: &str, node: &str) -> Vec<Wire> {
        let (graph, _) = parse(text).unwrap();
        let decl = graph.get(node).unwrap();
        let router = build_router(decl).unwrap();
        build_wires(decl, router.as_ref()).unwrap()
    }

    fn direct(name: &str) -> Wire {
        Wire::Direct {
            to: Target::Node(name.to_string()),
        }
    }

    fn text(key: &str, value: Route) -> TableEntry {
        TableEntry {
            key: TableKey::Text(key.to_string()),
            value,
        }
    }

    const END_ENTRY: TableEntry = TableEntry {
        key: TableKey::End,
        value: Route::End,
    };

    #[test]
    fn direct_edges_keep_declaration_order() {
        let wires = wires_for("a(S)\n  => c\n  => b, d\n  => END", "a");
        assert_eq!(
            wires,
            vec![
                direct("c"),
                direct("b"),
                direct("d"),
                Wire::Direct { to: Target::End }
            ]
        );
    }

    #[test]
    fn fan_out_gets_a_dispatcher_per_edge() {
        let wires = wires_for("split(S)\n  => [worker(item in queue)]\n  => [audit(x in log)]", "split");
        assert_eq!(
            wires,
            vec![
                Wire::FanOut(FanOut {
                    dispatcher: "fan_out_split".into(),
                    function: "worker".into(),
                    var: "item".into(),
                    field: "queue".into(),
                }),
                Wire::FanOut(FanOut {
                    dispatcher: "fan_out_split_2".into(),
                    function: "audit".into(),
                    var: "x".into(),
                    field: "log".into(),
                }),
            ]
        );
    }

    #[test]
    fn conditional_table_follows_declaration_order() {
        let wires = wires_for("a(S)\n  x => b\n  y => c, d\n  => END", "a");
        assert_eq!(
            wires,
            vec![Wire::Conditional {
                router: "after_a".into(),
                table_name: "a_dict".into(),
                table: vec![
                    text("b", Route::Node("b".into())),
                    text("c, d", Route::Many(vec!["c".into(), "d".into()])),
                    END_ENTRY,
                ],
            }]
        );
    }

    #[test]
    fn single_guarded_edge_registers_end() {
        let wires = wires_for("a(S)\n  x => b", "a");
        let Wire::Conditional { table, .. } = &wires[0] else {
            panic!("expected conditional wiring, got {wires:?}");
        };
        assert_eq!(table, &vec![text("b", Route::Node("b".into())), END_ENTRY]);
    }

    #[test]
    fn single_guarded_edge_to_end_is_not_duplicated() {
        let wires = wires_for("a(S)\n  x => END", "a");
        let Wire::Conditional { table, .. } = &wires[0] else {
            panic!("expected conditional wiring, got {wires:?}");
        };
        assert_eq!(table, &vec![END_ENTRY]);
    }

    #[test]
    fn repeated_destination_keeps_first_key() {
        let wires = wires_for("a(S)\n  x => b\n  y => c\n  z => b", "a");
        let Wire::Conditional { table, .. } = &wires[0] else {
            panic!("expected conditional wiring, got {wires:?}");
        };
        assert_eq!(
            table,
            &vec![
                text("b", Route::Node("b".into())),
                text("c", Route::Node("c".into()))
            ]
        );
    }

    #[test]
    fn node_without_edges_has_no_wires() {
        assert!(wires_for("a(S)\nb", "b").is_empty());
    }
}
