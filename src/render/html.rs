//! Standalone HTML surface backed by Plotly.js.

use super::{Figure, ImageOptions, MountedTarget, RenderSurface};
use crate::error::RenderError;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

const ELEMENT_ID: &str = "quantum-plot";
const PAGE_NAME: &str = "plot.html";

/// Writes the mounted figure to `<output_dir>/plot.html`. Export writes a
/// page that draws the figure and triggers `Plotly.downloadImage`.
pub struct HtmlSurface {
    output_dir: PathBuf,
    plotly_src: String,
}

impl HtmlSurface {
    pub fn new(output_dir: impl Into<PathBuf>, plotly_src: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            plotly_src: plotly_src.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn page(&self, figure_json: &str, script: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Potential Plot</title>
<script src="{plotly_src}"></script>
</head>
<body style="margin:0;background:#0f172a">
<div id="{element}" style="width:100%;height:600px"></div>
<script>
const figure = {figure};
{script}
</script>
</body>
</html>
"#,
            plotly_src = escape_attr(&self.plotly_src),
            element = ELEMENT_ID,
            figure = figure_json,
            script = script,
        )
    }

    fn write(&self, name: &str, contents: &str) -> Result<PathBuf, RenderError> {
        // Pages are always direct children of the output directory.
        if Path::new(name).file_name().and_then(|n| n.to_str()) != Some(name) {
            return Err(RenderError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("'{}' is not a plain file name", name),
            )));
        }
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

impl RenderSurface for HtmlSurface {
    fn mount(&mut self, figure: &Figure) -> Result<MountedTarget, RenderError> {
        let script = format!(
            "Plotly.newPlot('{}', figure.data, figure.layout, figure.config);",
            ELEMENT_ID
        );
        let html = self.page(&figure.to_script_json()?, &script);
        let location = self.write(PAGE_NAME, &html)?;
        Ok(MountedTarget {
            element_id: ELEMENT_ID.to_string(),
            location,
        })
    }

    fn is_mounted(&self, target: &MountedTarget) -> bool {
        target.location.is_file()
    }

    fn download_image(
        &self,
        target: &MountedTarget,
        figure: &Figure,
        options: &ImageOptions,
    ) -> Result<PathBuf, RenderError> {
        if !target.location.exists() {
            return Err(RenderError::TargetUnavailable(format!(
                "{} no longer exists",
                target.location.display()
            )));
        }
        let download = json!({
            "format": options.format.as_str(),
            "width": options.width,
            "height": options.height,
            "scale": options.scale,
            "filename": options.filename,
        });
        let script = format!(
            "Plotly.newPlot('{id}', figure.data, figure.layout, figure.config)\n  .then((el) => Plotly.downloadImage(el, {download}));",
            id = target.element_id,
            download = download,
        );
        let html = self.page(&figure.to_script_json()?, &script);
        self.write(&format!("{}.export.html", options.filename), &html)
    }
}
