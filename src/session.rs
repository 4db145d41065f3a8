//! Plot session: the UI-layer owner of the parameter model, wired to a
//! generation controller and a render adapter.

use crate::client::{HttpPlotClient, PlotClient};
use crate::config::PlotConfig;
use crate::controller::{GenerationController, GenerationState};
use crate::error::{ApiError, ExportError, ValidationError};
use crate::params::{Container, ParameterModel, PotentialType};
use crate::render::{ExportedImage, HtmlSurface, ImageFormat, RenderAdapter, RenderSurface};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

pub struct PlotSession {
    model: ParameterModel,
    controller: GenerationController,
    adapter: RenderAdapter,
}

impl PlotSession {
    pub fn new(
        model: ParameterModel,
        client: Arc<dyn PlotClient>,
        adapter: RenderAdapter,
    ) -> Self {
        Self {
            model,
            controller: GenerationController::new(client),
            adapter,
        }
    }

    /// HTTP client and HTML surface from configuration. `output_dir`
    /// overrides `render.output_dir`.
    pub fn from_config(config: &PlotConfig, output_dir: Option<PathBuf>) -> Result<Self, ApiError> {
        let client = HttpPlotClient::new(&config.service)?;
        let output_dir = output_dir.unwrap_or_else(|| config.render.output_dir.clone());
        let surface: Box<dyn RenderSurface> =
            Box::new(HtmlSurface::new(output_dir, config.render.plotly_src.clone()));
        Ok(Self::new(
            ParameterModel::from_defaults(&config.defaults),
            Arc::new(client),
            RenderAdapter::new(surface, config.render.clone()),
        ))
    }

    pub fn model(&self) -> &ParameterModel {
        &self.model
    }

    pub fn controller(&self) -> &GenerationController {
        &self.controller
    }

    pub fn adapter(&self) -> &RenderAdapter {
        &self.adapter
    }

    pub fn select_type(&mut self, plot_type: PotentialType) {
        self.model.select_type(plot_type);
    }

    pub fn set_field_text(
        &mut self,
        container: Container,
        key: &str,
        text: &str,
    ) -> Result<(), ValidationError> {
        self.model.set_field_text(container, key, text)
    }

    /// Run one explicit generation and render the result on success.
    ///
    /// A rendering failure is logged and leaves export disabled; the
    /// generation state itself stays `Success`.
    pub async fn generate(&mut self) -> GenerationState {
        self.controller.generate(&self.model).await;
        let state = self.controller.state();
        if let GenerationState::Success { result } = &state {
            if let Err(e) = self.adapter.present(result) {
                warn!(error = %e, "Failed to render plot; export disabled");
            }
        }
        state
    }

    pub fn can_export(&self) -> bool {
        self.adapter.can_export()
    }

    pub fn export_image(
        &self,
        format: ImageFormat,
        width: u32,
        height: u32,
    ) -> Result<ExportedImage, ExportError> {
        self.adapter.export_image(format, width, height)
    }

    pub fn export_default(&self) -> Result<ExportedImage, ExportError> {
        self.adapter.export_default()
    }
}
