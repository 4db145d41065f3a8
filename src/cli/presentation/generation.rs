//! Generate command presentation: final state, render target and export.

use super::format_section_heading;
use crate::controller::GenerationState;
use crate::error::ExportError;
use crate::params::PotentialType;
use crate::render::{ExportedImage, MountedTarget};
use owo_colors::OwoColorize;
use serde_json::json;

/// Everything the generate command reports.
pub struct GenerationReport<'a> {
    pub plot_type: PotentialType,
    pub endpoint: &'a str,
    pub state: &'a GenerationState,
    pub target: Option<&'a MountedTarget>,
    pub export: Option<&'a Result<ExportedImage, ExportError>>,
}

pub fn format_generation_text(report: &GenerationReport<'_>) -> String {
    let mut out = format!("{}\n", format_section_heading("Plot generation"));
    out.push_str(&format!("  Type: {}\n", report.plot_type.label()));
    out.push_str(&format!("  Service: {}\n", report.endpoint));

    match report.state {
        GenerationState::Success { result } => {
            out.push_str(&format!("  State: {}\n", "success".green()));
            out.push_str(&format!("  Traces: {}\n", result.data.len()));
            if let Some(status) = &result.status {
                out.push_str(&format!("  Service status: {}\n", status));
            }
            match report.target {
                Some(target) => out.push_str(&format!(
                    "  Rendered: {}\n",
                    target.location.display()
                )),
                None => out.push_str(&format!("  Rendered: {}\n", "no (export disabled)".yellow())),
            }
        }
        GenerationState::Failed { failure } => {
            out.push_str(&format!("  State: {}\n", "error".red()));
            out.push_str(&format!("  {}\n", failure.message));
            if !failure.error.is_validation() {
                out.push_str(&format!("  Detail: {}\n", failure.detail()));
            }
        }
        other => out.push_str(&format!("  State: {}\n", other.as_str())),
    }

    match report.export {
        Some(Ok(image)) => out.push_str(&format!(
            "  Export: {} {}x{} -> {}\n",
            image.options.format,
            image.options.width,
            image.options.height,
            image.path.display()
        )),
        Some(Err(e)) => out.push_str(&format!("  Export: {}\n", e.to_string().yellow())),
        None => {}
    }
    out
}

pub fn format_generation_json(report: &GenerationReport<'_>) -> String {
    let mut out = json!({
        "plot_type": report.plot_type.wire_name(),
        "endpoint": report.endpoint,
        "state": report.state.as_str(),
    });
    match report.state {
        GenerationState::Success { result } => {
            out["traces"] = json!(result.data.len());
            out["status"] = json!(result.status);
            out["rendered"] = json!(report.target.map(|t| t.location.display().to_string()));
        }
        GenerationState::Failed { failure } => {
            out["message"] = json!(failure.message);
            out["detail"] = json!(failure.detail());
            out["http_status"] = json!(failure.error.status());
        }
        _ => {}
    }
    if let Some(export) = report.export {
        out["export"] = match export {
            Ok(image) => json!({
                "path": image.path.display().to_string(),
                "options": image.options,
            }),
            Err(e) => json!({ "error": e.to_string() }),
        };
    }
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
