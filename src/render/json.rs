use crate::Result;
use crate::error::Error;
use crate::model::GraphPlan;
use crate::render::Renderer;

/// Render the plan as pretty JSON, for tools that drive an engine directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, plan: &GraphPlan) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(plan).map_err(|e| Error::Render(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }
}
