//! Figure assembly: traces, layout with responsive sizing, and plot config.

use crate::client::GenerationResult;
use crate::config::{ExportConfig, RenderConfig};
use crate::error::RenderError;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Input contract of the plotting surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Map<String, Value>,
    pub config: Value,
}

impl Figure {
    pub fn from_result(result: &GenerationResult, options: &RenderConfig) -> Self {
        Self {
            data: result.data.clone(),
            layout: merge_layout(&result.layout, options.height),
            config: plot_config(&options.export),
        }
    }

    /// JSON safe to embed inside a `<script>` element.
    pub fn to_script_json(&self) -> Result<String, RenderError> {
        let json = serde_json::to_string(self)?;
        Ok(json.replace("</", "<\\/"))
    }
}

/// Add `autosize` and `height` unless the service layout already sets them.
pub fn merge_layout(layout: &Map<String, Value>, height: u32) -> Map<String, Value> {
    let mut merged = layout.clone();
    merged
        .entry("autosize")
        .or_insert_with(|| Value::Bool(true));
    merged.entry("height").or_insert_with(|| json!(height));
    merged
}

pub fn plot_config(export: &ExportConfig) -> Value {
    json!({
        "responsive": true,
        "displayModeBar": true,
        "displaylogo": false,
        "modeBarButtonsToRemove": ["lasso2d", "select2d"],
        "toImageButtonOptions": {
            "format": export.format.as_str(),
            "filename": export.toolbar_filename,
            "height": export.height,
            "width": export.width,
            "scale": export.scale,
        },
    })
}
