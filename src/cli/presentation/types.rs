//! Types command presentation: potential types and their parameter fields.

use super::format_section_heading;
use crate::params::PotentialType;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;

pub fn format_types_text() -> String {
    let mut out = format!("{}\n\n", format_section_heading("Potential types"));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Type", "Label", "Fields"]);
    for plot_type in PotentialType::ALL {
        let fields: Vec<String> = plot_type
            .fields()
            .iter()
            .map(|f| {
                if f.positive {
                    format!("{} (> 0)", f.key)
                } else {
                    f.key.to_string()
                }
            })
            .collect();
        table.add_row(vec![
            plot_type.wire_name().to_string(),
            plot_type.label().to_string(),
            fields.join(", "),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_types_json() -> String {
    let types: Vec<_> = PotentialType::ALL
        .iter()
        .map(|plot_type| {
            let fields: Vec<_> = plot_type
                .fields()
                .iter()
                .map(|f| {
                    json!({
                        "key": f.key,
                        "wire_key": f.wire_key,
                        "label": f.label,
                        "positive": f.positive,
                    })
                })
                .collect();
            json!({
                "plot_type": plot_type.wire_name(),
                "label": plot_type.label(),
                "fields": fields,
            })
        })
        .collect();
    let out = json!({ "types": types, "total": PotentialType::ALL.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
