//! Generation Controller
//!
//! Owns the observable generation state and sequences build → send → apply.
//! Every attempt gets a monotonically increasing request id; only the
//! outcome of the most recently issued attempt may change the state.

use crate::client::{GenerationResult, PlotClient};
use crate::error::GenerationError;
use crate::params::ParameterModel;
use crate::request::{self, GenerationRequest};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// User-facing message for transport and protocol failures
pub const GENERIC_FAILURE_MESSAGE: &str = "Plot generation failed. Please try again.";

/// A failed attempt as shown to the user
#[derive(Debug, Clone)]
pub struct Failure {
    pub message: String,
    pub error: GenerationError,
}

impl Failure {
    fn from_error(error: GenerationError) -> Self {
        let message = match &error {
            GenerationError::Validation(err) => err.to_string(),
            GenerationError::Transport { .. } | GenerationError::Protocol(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        };
        Self { message, error }
    }

    /// Technical detail for diagnostics.
    pub fn detail(&self) -> String {
        self.error.to_string()
    }
}

#[derive(Debug, Clone)]
pub enum GenerationState {
    Idle,
    InFlight { request_id: u64 },
    Success { result: Arc<GenerationResult> },
    Failed { failure: Failure },
}

impl GenerationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationState::Idle => "idle",
            GenerationState::InFlight { .. } => "generating",
            GenerationState::Success { .. } => "success",
            GenerationState::Failed { .. } => "error",
        }
    }
}

/// Last resolved outcome. Stays visible while a newer attempt is in flight.
#[derive(Debug, Clone)]
pub enum Settled {
    Success(Arc<GenerationResult>),
    Failed(Failure),
}

/// Whether a completed attempt changed the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Applied,
    Discarded,
}

/// An accepted attempt whose request is ready to send
#[derive(Debug)]
pub struct Attempt {
    request_id: u64,
    request: GenerationRequest,
}

impl Attempt {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

struct Shared {
    latest_id: u64,
    state: GenerationState,
    displayed: Option<Settled>,
    last_success: Option<Arc<GenerationResult>>,
}

/// Cloneable handle; clones share one state.
#[derive(Clone)]
pub struct GenerationController {
    client: Arc<dyn PlotClient>,
    shared: Arc<Mutex<Shared>>,
}

impl GenerationController {
    pub fn new(client: Arc<dyn PlotClient>) -> Self {
        Self {
            client,
            shared: Arc::new(Mutex::new(Shared {
                latest_id: 0,
                state: GenerationState::Idle,
                displayed: None,
                last_success: None,
            })),
        }
    }

    pub fn state(&self) -> GenerationState {
        self.shared.lock().state.clone()
    }

    pub fn displayed(&self) -> Option<Settled> {
        self.shared.lock().displayed.clone()
    }

    pub fn last_success(&self) -> Option<Arc<GenerationResult>> {
        self.shared.lock().last_success.clone()
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    pub fn latest_request_id(&self) -> u64 {
        self.shared.lock().latest_id
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.shared.lock().state, GenerationState::InFlight { .. })
    }

    /// Start a new attempt from the current model.
    ///
    /// The model is read only here. A validation failure settles the attempt
    /// immediately as `Failed` without touching the network; it still takes
    /// a fresh id so that older outstanding attempts become stale.
    pub fn begin(&self, model: &ParameterModel) -> Result<Attempt, GenerationError> {
        let built = request::build(model.grid(), model.plot_type(), model.values());

        let mut shared = self.shared.lock();
        shared.latest_id += 1;
        let request_id = shared.latest_id;

        match built {
            Ok(request) => {
                info!(
                    request_id,
                    plot_type = %request.plot_type(),
                    "Plot generation started"
                );
                shared.state = GenerationState::InFlight { request_id };
                Ok(Attempt {
                    request_id,
                    request,
                })
            }
            Err(err) => {
                warn!(request_id, field = err.field(), error = %err, "Plot request rejected");
                let error = GenerationError::from(err);
                let failure = Failure::from_error(error.clone());
                shared.displayed = Some(Settled::Failed(failure.clone()));
                shared.state = GenerationState::Failed { failure };
                Err(error)
            }
        }
    }

    /// Send an accepted attempt and apply its outcome.
    pub async fn run(&self, attempt: Attempt) -> Disposition {
        let outcome = self.client.send(&attempt.request).await;
        self.complete(attempt.request_id, outcome)
    }

    /// Apply the outcome of attempt `request_id` if it is still the latest.
    pub fn complete(
        &self,
        request_id: u64,
        outcome: Result<GenerationResult, GenerationError>,
    ) -> Disposition {
        let mut shared = self.shared.lock();
        if request_id != shared.latest_id {
            debug!(
                request_id,
                latest_id = shared.latest_id,
                "Discarding stale plot response"
            );
            return Disposition::Discarded;
        }

        match outcome {
            Ok(result) => {
                info!(request_id, traces = result.data.len(), "Plot generation succeeded");
                let result = Arc::new(result);
                shared.last_success = Some(Arc::clone(&result));
                shared.displayed = Some(Settled::Success(Arc::clone(&result)));
                shared.state = GenerationState::Success { result };
            }
            Err(error) => {
                warn!(request_id, error = %error, "Plot generation failed");
                let failure = Failure::from_error(error);
                shared.displayed = Some(Settled::Failed(failure.clone()));
                shared.state = GenerationState::Failed { failure };
            }
        }
        Disposition::Applied
    }

    /// Begin and run one attempt to completion.
    pub async fn generate(&self, model: &ParameterModel) -> Disposition {
        match self.begin(model) {
            Ok(attempt) => self.run(attempt).await,
            Err(_) => Disposition::Applied,
        }
    }

    /// Begin an attempt and run it on the tokio runtime, returning at once.
    ///
    /// Returns `None` when the attempt was rejected by validation; the state
    /// is already `Failed` in that case.
    pub fn spawn(&self, model: &ParameterModel) -> Option<(u64, JoinHandle<Disposition>)> {
        let attempt = self.begin(model).ok()?;
        let request_id = attempt.request_id;
        let controller = self.clone();
        let handle = tokio::spawn(async move { controller.run(attempt).await });
        Some((request_id, handle))
    }
}
