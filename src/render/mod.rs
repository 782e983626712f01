//! Back-ends that turn a `GraphPlan` into text.

pub mod json;
pub mod python;

use crate::Result;
use crate::model::GraphPlan;

pub use json::JsonRenderer;
pub use python::PythonRenderer;

pub trait Renderer {
    fn render(&self, plan: &GraphPlan) -> Result<String>;
}

/// Output format selectable from the CLI and `CompileOptions`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Graph-construction source for the host engine.
    #[default]
    Python,
    /// The plan itself, as pretty-printed JSON.
    Json,
}

impl Format {
    pub fn renderer(self, imports: bool) -> Box<dyn Renderer> {
        match self {
            Format::Python => Box::new(PythonRenderer { imports }),
            Format::Json => Box::new(JsonRenderer),
        }
    }
}
