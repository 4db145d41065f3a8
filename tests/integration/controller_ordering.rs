//! Last-request-wins ordering with responses released out of order

use super::test_utils::{marker_of, plot_result, GatedClient};
use potplot::controller::{Disposition, GenerationController, GenerationState};
use potplot::error::GenerationError;
use potplot::params::{Container, ParameterModel};
use std::sync::Arc;

fn model_with_points(n_grid: u32) -> ParameterModel {
    let mut model = ParameterModel::default();
    model
        .set_field(Container::Grid, "nGrid", n_grid as f64)
        .unwrap();
    model
}

#[tokio::test(flavor = "multi_thread")]
async fn test_late_response_from_superseded_attempt_is_discarded() {
    let client = Arc::new(GatedClient::new());
    let gate_a = client.gate(10);
    let gate_b = client.gate(20);
    let gate_c = client.gate(30);
    let controller = GenerationController::new(client.clone());

    let (id_a, task_a) = controller.spawn(&model_with_points(10)).unwrap();
    let (id_b, task_b) = controller.spawn(&model_with_points(20)).unwrap();
    let (id_c, task_c) = controller.spawn(&model_with_points(30)).unwrap();
    assert!(id_a < id_b && id_b < id_c);
    assert!(matches!(
        controller.state(),
        GenerationState::InFlight { request_id } if request_id == id_c
    ));

    // C answers first, then A, then B.
    gate_c.send(Ok(plot_result("C"))).unwrap();
    assert_eq!(task_c.await.unwrap(), Disposition::Applied);

    gate_a.send(Ok(plot_result("A"))).unwrap();
    assert_eq!(task_a.await.unwrap(), Disposition::Discarded);

    gate_b.send(Ok(plot_result("B"))).unwrap();
    assert_eq!(task_b.await.unwrap(), Disposition::Discarded);

    match controller.state() {
        GenerationState::Success { result } => assert_eq!(marker_of(&result), Some("C")),
        other => panic!("expected C's success, got {:?}", other),
    }
    assert_eq!(
        controller.last_success().as_deref().and_then(marker_of),
        Some("C")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stale_success_never_replaces_latest_failure() {
    let client = Arc::new(GatedClient::new());
    let gate_a = client.gate(10);
    let gate_b = client.gate(20);
    let controller = GenerationController::new(client.clone());

    let (_, task_a) = controller.spawn(&model_with_points(10)).unwrap();
    let (_, task_b) = controller.spawn(&model_with_points(20)).unwrap();

    gate_b
        .send(Err(GenerationError::Transport {
            status: Some(503),
            detail: "service unavailable".to_string(),
        }))
        .unwrap();
    assert_eq!(task_b.await.unwrap(), Disposition::Applied);

    gate_a.send(Ok(plot_result("A"))).unwrap();
    assert_eq!(task_a.await.unwrap(), Disposition::Discarded);

    match controller.state() {
        GenerationState::Failed { failure } => assert_eq!(failure.error.status(), Some(503)),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(controller.last_success().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_validation_failure_supersedes_outstanding_attempt() {
    let client = Arc::new(GatedClient::new());
    let gate_a = client.gate(10);
    let controller = GenerationController::new(client.clone());

    let (_, task_a) = controller.spawn(&model_with_points(10)).unwrap();

    let mut invalid = model_with_points(10);
    invalid.set_field(Container::Grid, "rMin", 20.0).unwrap();
    assert!(controller.spawn(&invalid).is_none());
    assert!(matches!(controller.state(), GenerationState::Failed { .. }));

    gate_a.send(Ok(plot_result("A"))).unwrap();
    assert_eq!(task_a.await.unwrap(), Disposition::Discarded);

    match controller.state() {
        GenerationState::Failed { failure } => {
            assert!(failure.error.is_validation());
            assert!(failure.message.starts_with("rMin/rMax"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_attempts_apply_exactly_one_outcome() {
    let client = Arc::new(GatedClient::new());
    let controller = GenerationController::new(client.clone());

    let mut gates = Vec::new();
    let mut tasks = Vec::new();
    for n_grid in 2..12u32 {
        gates.push((n_grid, client.gate(n_grid)));
        let (_, task) = controller.spawn(&model_with_points(n_grid)).unwrap();
        tasks.push(task);
    }
    // Release newest first.
    for (n_grid, gate) in gates.into_iter().rev() {
        gate.send(Ok(plot_result(&n_grid.to_string()))).unwrap();
    }

    let dispositions: Vec<Disposition> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(
        dispositions
            .iter()
            .filter(|d| **d == Disposition::Applied)
            .count(),
        1
    );
    assert_eq!(*dispositions.last().unwrap(), Disposition::Applied);
    match controller.state() {
        GenerationState::Success { result } => assert_eq!(marker_of(&result), Some("11")),
        other => panic!("expected success, got {:?}", other),
    }
}
