//! Plot session: validation before the network, rendering and export

use super::test_utils::{plot_result, CountingClient};
use potplot::config::RenderConfig;
use potplot::controller::GenerationState;
use potplot::error::ExportError;
use potplot::params::{Container, ParameterModel, PotentialType};
use potplot::render::{HtmlSurface, ImageFormat, RenderAdapter};
use potplot::session::PlotSession;
use std::sync::Arc;
use tempfile::TempDir;

fn session_with(client: Arc<CountingClient>, output_dir: &TempDir) -> PlotSession {
    let surface = HtmlSurface::new(output_dir.path(), "plotly.min.js");
    PlotSession::new(
        ParameterModel::default(),
        client,
        RenderAdapter::new(Box::new(surface), RenderConfig::default()),
    )
}

#[tokio::test]
async fn test_inverted_range_fails_without_network_call() {
    let temp = TempDir::new().unwrap();
    let client = Arc::new(CountingClient::new(plot_result("unused")));
    let mut session = session_with(client.clone(), &temp);

    session.set_field_text(Container::Grid, "rMin", "5").unwrap();
    session.set_field_text(Container::Grid, "rMax", "2").unwrap();
    let state = session.generate().await;

    match state {
        GenerationState::Failed { failure } => {
            assert!(failure.error.is_validation());
            assert!(failure.message.contains("rMin/rMax"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(client.call_count(), 0);
    assert!(!session.can_export());
}

#[tokio::test]
async fn test_unparsable_parameter_names_field() {
    let temp = TempDir::new().unwrap();
    let client = Arc::new(CountingClient::new(plot_result("unused")));
    let mut session = session_with(client.clone(), &temp);

    session.set_field_text(Container::Potential, "a", "wide").unwrap();
    match session.generate().await {
        GenerationState::Failed { failure } => {
            assert!(failure.message.starts_with("a:"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_export_before_any_success_is_unavailable() {
    let temp = TempDir::new().unwrap();
    let client = Arc::new(CountingClient::new(plot_result("unused")));
    let session = session_with(client, &temp);

    assert!(!session.can_export());
    assert!(matches!(
        session.export_default(),
        Err(ExportError::Unavailable(_))
    ));
    assert!(matches!(
        session.export_image(ImageFormat::Svg, 800, 600),
        Err(ExportError::Unavailable(_))
    ));
}

#[tokio::test]
async fn test_success_renders_page_and_enables_export() {
    let temp = TempDir::new().unwrap();
    let client = Arc::new(CountingClient::new(plot_result("rendered")));
    let mut session = session_with(client.clone(), &temp);

    let state = session.generate().await;
    assert!(matches!(state, GenerationState::Success { .. }));
    assert_eq!(client.call_count(), 1);

    let target = session.adapter().target().unwrap();
    let page = std::fs::read_to_string(&target.location).unwrap();
    assert!(page.contains("\"rendered\""));
    assert!(page.contains("\"autosize\":true"));
    assert!(session.can_export());

    let image = session.export_image(ImageFormat::Jpeg, 1024, 768).unwrap();
    assert_eq!(image.options.width, 1024);
    assert_eq!(image.options.height, 768);
    assert!(image.options.filename.starts_with("plot_"));
    let export_page = std::fs::read_to_string(&image.path).unwrap();
    assert!(export_page.contains("Plotly.downloadImage"));
    assert!(export_page.contains("\"format\":\"jpeg\""));
}

#[tokio::test]
async fn test_export_after_rendered_page_is_removed_is_unavailable() {
    let temp = TempDir::new().unwrap();
    let client = Arc::new(CountingClient::new(plot_result("removed")));
    let mut session = session_with(client, &temp);

    assert!(matches!(
        session.generate().await,
        GenerationState::Success { .. }
    ));
    let page = session.adapter().target().unwrap().location.clone();
    std::fs::remove_file(&page).unwrap();

    assert!(!session.can_export());
    assert!(matches!(
        session.export_image(ImageFormat::Png, 10, 10),
        Err(ExportError::Unavailable(_))
    ));
}

#[tokio::test]
async fn test_failed_attempt_keeps_previous_plot_exportable() {
    let temp = TempDir::new().unwrap();
    let client = Arc::new(CountingClient::new(plot_result("first")));
    let mut session = session_with(client.clone(), &temp);

    assert!(matches!(
        session.generate().await,
        GenerationState::Success { .. }
    ));

    session.set_field_text(Container::Grid, "nGrid", "1").unwrap();
    assert!(matches!(
        session.generate().await,
        GenerationState::Failed { .. }
    ));
    assert_eq!(client.call_count(), 1);
    assert!(session.can_export());
    assert!(session.export_default().is_ok());
}

#[tokio::test]
async fn test_type_switch_changes_active_fields_only() {
    let temp = TempDir::new().unwrap();
    let client = Arc::new(CountingClient::new(plot_result("unused")));
    let mut session = session_with(client, &temp);

    session.set_field_text(Container::Potential, "D", "80").unwrap();
    session.select_type(PotentialType::Softcore);
    assert_eq!(session.model().values().strength, 80.0);
    assert!(session
        .set_field_text(Container::Potential, "D", "1")
        .is_err());
    session.set_field_text(Container::Potential, "Charge", "-1").unwrap();
    assert_eq!(session.model().values().strength, -1.0);
}
