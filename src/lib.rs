//! # graphspec
//!
//! Compiler for a terse graph DSL into graph-construction code for a host
//! graph-execution engine.
//!
//!   spec text ──► normalize ──► parse ──► GraphSpec ──► build_plan ──► GraphPlan ──► Renderer
//!
//! ```text
//! start(StateA)
//!   cond1 => nodeB
//!   => END
//! nodeB
//!   => start
//! ```
//!
//! Destinations are `END`, a node name, a comma-separated parallel set, or a
//! dynamic fan-out `[func(var in field)]`.

pub mod error;
pub mod model;
pub mod render;
pub mod spec;

pub use error::{Error, Result};
pub use model::{GraphPlan, build_plan, build_plan_with};
pub use render::{Format, JsonRenderer, PythonRenderer, Renderer};
pub use spec::{Grammar, GraphSpec, parse, parse_with};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub graph_name: String,
    /// Persistence handle expression threaded into `compile(checkpointer=...)`.
    pub checkpointer: Option<String>,
    pub format: Format,
    /// Emit the import prelude (Python only).
    pub imports: bool,
}

impl CompileOptions {
    pub fn new(graph_name: impl Into<String>) -> Self {
        Self {
            graph_name: graph_name.into(),
            checkpointer: None,
            format: Format::Python,
            imports: false,
        }
    }
}

/// Compile spec text into Python graph-construction source.
pub fn compile(graph_name: &str, spec_text: &str, checkpointer: Option<&str>) -> Result<String> {
    let mut opts = CompileOptions::new(graph_name);
    opts.checkpointer = checkpointer.map(str::to_string);
    compile_with(spec_text, &opts)
}

pub fn compile_with(spec_text: &str, opts: &CompileOptions) -> Result<String> {
    let grammar = Grammar::new()?;
    let (graph, start) = parse_with(&grammar, spec_text)?;
    let plan = build_plan_with(
        &grammar,
        &opts.graph_name,
        &graph,
        &start,
        opts.checkpointer.as_deref(),
    )?;
    opts.format.renderer(opts.imports).render(&plan)
}
