//! Render Adapter
//!
//! Turns a successful generation result into the figure a rendering surface
//! consumes, and exposes image export once a figure is mounted.

mod figure;
mod html;

pub use figure::{merge_layout, plot_config, Figure};
pub use html::HtmlSurface;

use crate::client::GenerationResult;
use crate::config::RenderConfig;
use crate::error::{ExportError, RenderError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

/// Image formats the plotting surface can export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
    Svg,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Webp => "webp",
            ImageFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "webp" => Ok(ImageFormat::Webp),
            "svg" => Ok(ImageFormat::Svg),
            _ => Err(format!(
                "Unknown image format '{}' (expected png, jpeg, webp or svg)",
                s
            )),
        }
    }
}

/// Options handed to the surface's image download
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageOptions {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub filename: String,
}

/// Element a figure has been mounted into
#[derive(Debug, Clone, PartialEq)]
pub struct MountedTarget {
    pub element_id: String,
    pub location: PathBuf,
}

/// Result of a successful export request
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub path: PathBuf,
    pub options: ImageOptions,
}

/// Rendering surface (the plotting library boundary)
pub trait RenderSurface: Send {
    /// Mount a figure and return the element it was drawn into
    fn mount(&mut self, figure: &Figure) -> Result<MountedTarget, RenderError>;

    /// Whether `target` still holds the mounted figure
    fn is_mounted(&self, _target: &MountedTarget) -> bool {
        true
    }

    /// Export the mounted figure as an image
    fn download_image(
        &self,
        target: &MountedTarget,
        figure: &Figure,
        options: &ImageOptions,
    ) -> Result<PathBuf, RenderError>;
}

pub struct RenderAdapter {
    surface: Box<dyn RenderSurface>,
    options: RenderConfig,
    figure: Option<Figure>,
    target: Option<MountedTarget>,
}

impl RenderAdapter {
    pub fn new(surface: Box<dyn RenderSurface>, options: RenderConfig) -> Self {
        Self {
            surface,
            options,
            figure: None,
            target: None,
        }
    }

    pub fn figure(&self) -> Option<&Figure> {
        self.figure.as_ref()
    }

    pub fn target(&self) -> Option<&MountedTarget> {
        self.target.as_ref()
    }

    /// Export is offered only with a figure mounted on the surface.
    pub fn can_export(&self) -> bool {
        self.figure.is_some()
            && self
                .target
                .as_ref()
                .is_some_and(|target| self.surface.is_mounted(target))
    }

    /// Build the figure for `result` and mount it on the surface.
    ///
    /// The figure is kept even when mounting fails; export then stays
    /// unavailable until a later mount succeeds.
    pub fn present(&mut self, result: &GenerationResult) -> Result<&MountedTarget, RenderError> {
        let figure = Figure::from_result(result, &self.options);
        self.target = None;
        let mounted = self.surface.mount(&figure);
        self.figure = Some(figure);

        let target = mounted?;
        info!(location = %target.location.display(), "Plot rendered");
        Ok(self.target.insert(target))
    }

    pub fn export_image(
        &self,
        format: ImageFormat,
        width: u32,
        height: u32,
    ) -> Result<ExportedImage, ExportError> {
        let figure = self.figure.as_ref().ok_or_else(|| {
            ExportError::Unavailable("no plot has been generated yet".to_string())
        })?;
        let target = self.target.as_ref().ok_or_else(|| {
            ExportError::Unavailable("the rendering surface has no mounted plot".to_string())
        })?;
        if !self.surface.is_mounted(target) {
            return Err(ExportError::Unavailable(format!(
                "the rendered plot at {} is gone",
                target.location.display()
            )));
        }

        let options = ImageOptions {
            format,
            width,
            height,
            scale: self.options.export.scale,
            filename: export_filename(&self.options.export.filename_prefix),
        };
        debug!(format = %format, width, height, "Exporting plot image");
        let path = self
            .surface
            .download_image(target, figure, &options)
            .map_err(|e| match e {
                RenderError::TargetUnavailable(reason) => ExportError::Unavailable(reason),
                other => ExportError::Failed(other),
            })?;
        Ok(ExportedImage { path, options })
    }

    /// Export with the configured format and size.
    pub fn export_default(&self) -> Result<ExportedImage, ExportError> {
        let export = &self.options.export;
        self.export_image(export.format, export.width, export.height)
    }
}

fn export_filename(prefix: &str) -> String {
    format!("{}_{}", prefix, chrono::Utc::now().timestamp_millis())
}
