//! HTTP client against a stub plot service

use super::test_utils::StubService;
use potplot::client::{HttpPlotClient, PlotClient};
use potplot::config::ServiceConfig;
use potplot::controller::{GenerationController, GenerationState, GENERIC_FAILURE_MESSAGE};
use potplot::error::GenerationError;
use potplot::params::{Container, ParameterModel, PotentialType};
use serde_json::json;
use std::sync::Arc;

fn client_for(stub: &StubService) -> HttpPlotClient {
    HttpPlotClient::new(&ServiceConfig {
        base_url: stub.base_url().to_string(),
        ..ServiceConfig::default()
    })
    .unwrap()
}

const PLOT_BODY: &str = r#"{
  "data": [{"x": [0.0, 5.0, 10.0], "y": [100.0, 2.5, 99.0], "type": "scatter", "name": "V(r)"}],
  "layout": {"title": "Morse potential", "xaxis": {"title": "r"}},
  "status": "ok"
}"#;

#[tokio::test(flavor = "multi_thread")]
async fn test_default_morse_request_succeeds() {
    let stub = StubService::start(200, PLOT_BODY).await;
    let controller = GenerationController::new(Arc::new(client_for(&stub)));

    controller.generate(&ParameterModel::default()).await;

    match controller.state() {
        GenerationState::Success { result } => {
            assert_eq!(result.data.len(), 1);
            assert_eq!(result.data[0]["name"], "V(r)");
            assert_eq!(result.layout["title"], "Morse potential");
            assert_eq!(result.status.as_deref(), Some("ok"));
        }
        other => panic!("expected success, got {:?}", other),
    }

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        json!({
            "grid": { "rMin": -0.0, "rMax": 10.0, "nGrid": 100 },
            "plot_type": "Morse",
            "parameters": { "D": 100.0, "a": 1.5, "r0": 2.0 },
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_softcore_request_carries_charge() {
    let stub = StubService::start(200, PLOT_BODY).await;
    let controller = GenerationController::new(Arc::new(client_for(&stub)));

    let mut model = ParameterModel::default();
    model.select_type(PotentialType::Softcore);
    model.set_field_text(Container::Potential, "q", "-2").unwrap();
    model.set_field_text(Container::Grid, "nGrid", "50").unwrap();
    controller.generate(&model).await;

    assert!(matches!(controller.state(), GenerationState::Success { .. }));
    let requests = stub.requests();
    assert_eq!(requests[0]["plot_type"], "Softcore");
    assert_eq!(requests[0]["grid"]["nGrid"], 50);
    assert_eq!(
        requests[0]["parameters"],
        json!({ "Charge": -2.0, "a": 1.5, "r0": 2.0 })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_becomes_transport_failure() {
    let stub = StubService::start(500, "internal error: solver diverged").await;
    let controller = GenerationController::new(Arc::new(client_for(&stub)));

    controller.generate(&ParameterModel::default()).await;

    match controller.state() {
        GenerationState::Failed { failure } => {
            assert_eq!(failure.message, GENERIC_FAILURE_MESSAGE);
            assert!(matches!(
                failure.error,
                GenerationError::Transport { status: Some(500), .. }
            ));
            assert!(failure.detail().contains("solver diverged"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(controller.last_success().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_layout_becomes_protocol_failure() {
    let stub = StubService::start(200, r#"{"data": [{"x": [1], "y": [2]}]}"#).await;
    let controller = GenerationController::new(Arc::new(client_for(&stub)));

    controller.generate(&ParameterModel::default()).await;

    match controller.state() {
        GenerationState::Failed { failure } => {
            assert_eq!(failure.message, GENERIC_FAILURE_MESSAGE);
            assert!(matches!(failure.error, GenerationError::Protocol(_)));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_route_reports_not_found() {
    let stub = StubService::start(200, PLOT_BODY).await;
    // Nothing is mounted under this prefix on the stub.
    let client = HttpPlotClient::new(&ServiceConfig {
        base_url: format!("{}/missing", stub.base_url()),
        ..ServiceConfig::default()
    })
    .unwrap();
    assert!(client.endpoint().ends_with("/missing/plots/data"));

    let controller = GenerationController::new(Arc::new(client));
    controller.generate(&ParameterModel::default()).await;
    match controller.state() {
        GenerationState::Failed { failure } => assert_eq!(failure.error.status(), Some(404)),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(stub.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_refused_connection_becomes_transport_failure_without_status() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = HttpPlotClient::new(&ServiceConfig {
        base_url: format!("http://127.0.0.1:{}/api", port),
        ..ServiceConfig::default()
    })
    .unwrap();
    let controller = GenerationController::new(Arc::new(client));

    controller.generate(&ParameterModel::default()).await;

    match controller.state() {
        GenerationState::Failed { failure } => {
            assert_eq!(failure.message, GENERIC_FAILURE_MESSAGE);
            assert!(matches!(
                failure.error,
                GenerationError::Transport { status: None, .. }
            ));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}
