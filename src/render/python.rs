//! Python back-end: LangGraph-style graph construction source.
//!
//! Layout, in this order:
//! 1) declaration (`StateGraph(T)` or `MessageGraph()`)
//! 2) `add_node` for every node
//! 3) `set_entry_point`
//! 4) per node: router function, then its edges
//! 5) `compile()`, with `checkpointer=` when one was supplied
//!
//! Handlers, predicates, `END`, and `Send` are expected to be in scope
//! where the output runs.

use crate::Result;
use crate::model::{
    Declaration, Fallback, FanOut, GraphPlan, NodeStep, Route, Router, TableEntry, TableKey,
    Target, Wire,
};
use crate::render::Renderer;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct PythonRenderer {
    /// Prepend the `langgraph` imports the output relies on.
    pub imports: bool,
}

impl Renderer for PythonRenderer {
    fn render(&self, plan: &GraphPlan) -> Result<String> {
        let g = &plan.name;
        let mut sections: Vec<Vec<String>> = Vec::new();

        if self.imports {
            sections.push(prelude(plan));
        }

        let mut setup = vec![match &plan.declaration {
            Declaration::Typed { state_type } => format!("{g} = StateGraph({state_type})"),
            Declaration::Messages => format!("{g} = MessageGraph()"),
        }];
        for node in &plan.nodes {
            setup.push(format!("{g}.add_node({}, {node})", py_str(node)));
        }
        sections.push(setup);
        sections.push(vec![format!("{g}.set_entry_point({})", py_str(&plan.entry))]);

        for step in &plan.steps {
            let block = node_block(g, &plan.declaration, step);
            if !block.is_empty() {
                sections.push(block);
            }
        }

        sections.push(vec![match &plan.checkpointer {
            Some(expr) => format!("{g} = {g}.compile(checkpointer={expr})"),
            None => format!("{g} = {g}.compile()"),
        }]);

        let mut out = sections
            .into_iter()
            .map(|lines| lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n");
        out.push('\n');
        Ok(out)
    }
}

fn prelude(plan: &GraphPlan) -> Vec<String> {
    let ctor = match plan.declaration {
        Declaration::Typed { .. } => "StateGraph",
        Declaration::Messages => "MessageGraph",
    };
    let mut lines = vec![format!("from langgraph.graph import END, {ctor}")];
    if plan.has_fan_out() {
        lines.push("from langgraph.types import Send".to_string());
    }
    lines
}

fn node_block(g: &str, decl: &Declaration, step: &NodeStep) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(router) = &step.router {
        lines.extend(router_fn(decl, router));
        lines.push(String::new());
    }

    let node = py_str(&step.node);
    for wire in &step.wires {
        match wire {
            Wire::Direct { to } => {
                let to = match to {
                    Target::End => "END".to_string(),
                    Target::Node(name) => py_str(name),
                };
                lines.push(format!("{g}.add_edge({node}, {to})"));
            }
            Wire::FanOut(fan_out) => {
                lines.extend(dispatcher_fn(decl, fan_out));
                lines.push(String::new());
                lines.push(format!(
                    "{g}.add_conditional_edges({node}, {}, [{}])",
                    fan_out.dispatcher,
                    py_str(&fan_out.function)
                ));
            }
            Wire::Conditional {
                router,
                table_name,
                table,
            } => {
                lines.push(format!("{table_name} = {{{}}}", table_entries(table)));
                lines.push(format!(
                    "{g}.add_conditional_edges({node}, {router}, {table_name})"
                ));
            }
        }
    }

    lines
}

fn router_fn(decl: &Declaration, router: &Router) -> Vec<String> {
    let mut lines = vec![format!("def {}({}):", router.name, state_param(decl))];

    for (i, arm) in router.arms.iter().enumerate() {
        let kw = if i == 0 { "if" } else { "elif" };
        lines.push(format!("{INDENT}{kw} {}(state):", arm.predicate));
        lines.push(format!("{INDENT}{INDENT}return {}", route(&arm.route)));
    }

    match &router.fallback {
        Fallback::CatchAll(r) => lines.push(format!("{INDENT}return {}", route(r))),
        Fallback::End => lines.push(format!("{INDENT}return END")),
        Fallback::NoMatch => {
            lines.push(format!("{INDENT}else:"));
            lines.push(format!(
                "{INDENT}{INDENT}raise ValueError(\"No destination\")"
            ));
        }
    }

    lines
}

fn dispatcher_fn(decl: &Declaration, fan_out: &FanOut) -> Vec<String> {
    let FanOut {
        dispatcher,
        function,
        var,
        field,
    } = fan_out;
    vec![
        format!("def {dispatcher}({}):", state_param(decl)),
        format!(
            "{INDENT}return [Send({}, {{{}: {var}}}) for {var} in state[{}]]",
            py_str(function),
            py_str(var),
            py_str(field)
        ),
    ]
}

fn state_param(decl: &Declaration) -> String {
    match decl.state_type() {
        Some(t) => format!("state: {t}"),
        None => "state".to_string(),
    }
}

fn route(r: &Route) -> String {
    match r {
        Route::End => "END".to_string(),
        Route::Node(name) => py_str(name),
        Route::Many(names) => format!(
            "[{}]",
            names.iter().map(|n| py_str(n)).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn table_entries(table: &[TableEntry]) -> String {
    table
        .iter()
        .map(|e| {
            let key = match &e.key {
                TableKey::End => "END".to_string(),
                TableKey::Text(text) => py_str(text),
            };
            format!("{key}: {}", route(&e.value))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Single-quoted Python string literal.
fn py_str(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
