//! Order submission as an explicit state machine.
//!
//! `Idle -> Submitting -> (Succeeded | Failed)`, then back to `Idle` once the
//! outcome has been shown. The network call itself happens outside the
//! controller (on a worker thread in the app), between [`SubmissionController::begin`]
//! and [`SubmissionController::complete`].

use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, OrderBackend, SubmitResponse};
use crate::barcode::BarcodeList;
use crate::config::{AfterSuccess, Config, ConfigError};
use crate::order::{OrderForm, OrderPayload};
use crate::validation::{ValidationError, validate};

pub const SAVED_MESSAGE: &str = "Order has been saved to sheet";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to save order. Please try again.";
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    NotConfigured(#[from] ConfigError),

    #[error("An order is already being saved.")]
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Saved { message: String },
    Rejected { message: String },
}

impl SubmissionOutcome {
    pub fn message(&self) -> &str {
        match self {
            SubmissionOutcome::Saved { message } | SubmissionOutcome::Rejected { message } => {
                message
            }
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SubmissionOutcome::Saved { .. })
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionController {
    config: Config,
    phase: SubmissionPhase,
    reentry: bool,
}

impl SubmissionController {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            phase: SubmissionPhase::Idle,
            reentry: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    /// True after a save in `Reentry` deployments, until "Add Another Order".
    pub fn in_reentry_mode(&self) -> bool {
        self.reentry
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_submitting() {
            "Saving…"
        } else if self.reentry {
            "Add Another Order"
        } else {
            "Save"
        }
    }

    /// Runs the guards and, if they pass, moves to `Submitting`.
    pub fn begin(
        &mut self,
        form: &OrderForm,
        barcodes: &BarcodeList,
    ) -> Result<OrderPayload, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::InFlight);
        }
        self.phase = SubmissionPhase::Idle;

        validate(form, self.config.validation)?;
        self.config.ensure_configured()?;

        self.phase = SubmissionPhase::Submitting;
        Ok(form.to_payload(barcodes, &self.config.api_token))
    }

    /// Interprets the backend reply (or transport failure) for the request in flight.
    pub fn complete(&mut self, result: Result<SubmitResponse, ApiError>) -> SubmissionOutcome {
        if !self.is_submitting() {
            warn!(phase = ?self.phase, "Submission result arrived with no request in flight");
        }
        let outcome = match result {
            Ok(resp) if resp.success => {
                info!("Order saved");
                SubmissionOutcome::Saved {
                    message: SAVED_MESSAGE.to_string(),
                }
            }
            Ok(resp) => {
                let message = resp
                    .error
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
                warn!("Order rejected: {message}");
                SubmissionOutcome::Rejected { message }
            }
            Err(e) => {
                warn!("Order submission failed: {e}");
                SubmissionOutcome::Rejected {
                    message: NETWORK_FAILURE_MESSAGE.to_string(),
                }
            }
        };

        if outcome.is_saved() {
            self.phase = SubmissionPhase::Succeeded;
            self.reentry = self.config.after_success == AfterSuccess::Reentry;
        } else {
            self.phase = SubmissionPhase::Failed;
        }
        outcome
    }

    /// Back to `Idle` once the outcome is on screen.
    pub fn settle(&mut self) {
        if self.phase != SubmissionPhase::Submitting {
            self.phase = SubmissionPhase::Idle;
        }
    }

    /// Leaves "Add Another Order" mode.
    pub fn start_new_order(&mut self) {
        self.reentry = false;
        self.settle();
    }

    /// Synchronous round trip: guards, request, interpretation, settle.
    pub fn submit<B: OrderBackend + ?Sized>(
        &mut self,
        form: &OrderForm,
        barcodes: &BarcodeList,
        backend: &B,
    ) -> Result<SubmissionOutcome, SubmitError> {
        let payload = self.begin(form, barcodes)?;
        let outcome = self.complete(backend.submit_order(&payload));
        self.settle();
        Ok(outcome)
    }
}
