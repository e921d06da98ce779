//! Conformance runner for the booking service.
//!
//! The runner performs setup, then executes every [`Step`] strictly in
//! order against one [`SuiteContext`]. Steps that need a booking id are
//! recorded as blocked, not run, when no id is available, so a broken
//! create does not cascade into confusing secondary failures.

use std::time::{Duration, Instant};

use booker_client::{BookerClient, BookingApi, Credentials};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::SuiteConfig;
use crate::context::SuiteContext;
use crate::errors::{StepFailure, SuiteError};
use crate::fixtures::BookingFixtures;
use crate::steps;

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

/// The checks performed after setup, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// `POST /booking`
    CreateBooking,
    /// `GET /booking`
    ListBookingIds,
    /// `GET /booking/{id}`
    GetBookingById,
    /// `PUT /booking/{id}`
    UpdateBooking,
    /// `PATCH /booking/{id}`
    PartialUpdateBooking,
    /// `DELETE /booking/{id}`
    DeleteBooking,
    /// `GET /booking/{id}` after the delete
    ConfirmDeletion,
    /// `GET /ping`
    PingHealthCheck,
}

impl Step {
    pub const ALL: [Step; 8] = [
        Step::CreateBooking,
        Step::ListBookingIds,
        Step::GetBookingById,
        Step::UpdateBooking,
        Step::PartialUpdateBooking,
        Step::DeleteBooking,
        Step::ConfirmDeletion,
        Step::PingHealthCheck,
    ];

    /// Short identifier used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Step::CreateBooking => "create-booking",
            Step::ListBookingIds => "list-booking-ids",
            Step::GetBookingById => "get-booking-by-id",
            Step::UpdateBooking => "update-booking",
            Step::PartialUpdateBooking => "partial-update-booking",
            Step::DeleteBooking => "delete-booking",
            Step::ConfirmDeletion => "confirm-deletion",
            Step::PingHealthCheck => "ping-health-check",
        }
    }

    /// Human readable title used in reports.
    pub fn title(&self) -> &'static str {
        match self {
            Step::CreateBooking => "Create Booking",
            Step::ListBookingIds => "List Booking Ids",
            Step::GetBookingById => "Get Booking By Id",
            Step::UpdateBooking => "Full Update",
            Step::PartialUpdateBooking => "Partial Update",
            Step::DeleteBooking => "Delete Booking",
            Step::ConfirmDeletion => "Confirm Deletion",
            Step::PingHealthCheck => "Health Check",
        }
    }

    /// Whether the step needs the booking id produced by [`Step::CreateBooking`].
    pub fn requires_booking(&self) -> bool {
        !matches!(self, Step::CreateBooking | Step::PingHealthCheck)
    }
}

/// How a step ended.
#[derive(Debug)]
pub enum StepOutcome {
    Passed,
    Failed(StepFailure),
    /// Not executed because a prerequisite step did not succeed.
    Blocked(String),
}

impl StepOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            StepOutcome::Passed => "PASS",
            StepOutcome::Failed(_) => "FAIL",
            StepOutcome::Blocked(_) => "BLOCKED",
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, StepOutcome::Passed)
    }
}

/// Result of running a single step.
#[derive(Debug)]
pub struct StepResult {
    pub step: Step,
    pub outcome: StepOutcome,
    pub duration: Duration,
}

/// Results of one complete run.
#[derive(Debug)]
pub struct SuiteReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub base_url: String,
    pub results: Vec<StepResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, StepOutcome::Failed(_)))
            .count()
    }

    pub fn blocked(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, StepOutcome::Blocked(_)))
            .count()
    }

    /// True when every step passed.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_passed())
    }

    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    pub fn result(&self, step: Step) -> Option<&StepResult> {
        self.results.iter().find(|r| r.step == step)
    }
}

/// Drives the booking service through the conformance steps.
pub struct SuiteRunner<A> {
    api: A,
    credentials: Credentials,
    ping_ceiling: Duration,
    base_url: String,
    fixtures: BookingFixtures,
}

impl SuiteRunner<BookerClient> {
    /// Creates a runner backed by an HTTP client built from `config`.
    pub fn from_config(config: &SuiteConfig) -> Result<Self, SuiteError> {
        let client = BookerClient::new(&config.client_settings()).map_err(SuiteError::Client)?;
        Ok(Self::new(client, config))
    }
}

impl<A: BookingApi> SuiteRunner<A> {
    pub fn new(api: A, config: &SuiteConfig) -> Self {
        Self {
            api,
            credentials: config.credentials(),
            ping_ceiling: config.ping_ceiling(),
            base_url: config.base_url.clone(),
            fixtures: BookingFixtures::default(),
        }
    }

    /// Replaces the default booking payloads.
    pub fn with_fixtures(mut self, fixtures: BookingFixtures) -> Self {
        self.fixtures = fixtures;
        self
    }

    /// Runs setup and then every step in order.
    ///
    /// # Errors
    ///
    /// Returns `SuiteError::Setup` when no auth token could be obtained; no
    /// step is executed in that case.
    pub async fn run_all(&self) -> Result<SuiteReport, SuiteError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(run_id = %run_id, base_url = self.base_url, "Starting booking conformance suite");

        let mut context = steps::setup(&self.api, &self.credentials)
            .await
            .map_err(|failure| {
                error!(error = %failure, "Suite setup failed; aborting run");
                SuiteError::Setup(failure)
            })?;

        let mut results = Vec::with_capacity(Step::ALL.len());
        for step in Step::ALL {
            let result = self.run_step(step, &mut context).await;
            results.push(result);
        }

        let report = SuiteReport {
            run_id,
            started_at,
            base_url: self.base_url.clone(),
            results,
        };

        info!(
            total = report.results.len(),
            passed = report.passed(),
            failed = report.failed(),
            blocked = report.blocked(),
            "Booking conformance suite completed"
        );

        Ok(report)
    }

    async fn run_step(&self, step: Step, context: &mut SuiteContext) -> StepResult {
        let start_time = Instant::now();

        if let Some(reason) = blocked_reason(step, context) {
            warn!(step = step.name(), reason = %reason, "Step blocked");
            return StepResult {
                step,
                outcome: StepOutcome::Blocked(reason),
                duration: start_time.elapsed(),
            };
        }

        info!(step = step.name(), "Running step");
        let outcome = match self.execute_step(step, context).await {
            Ok(()) => {
                info!(step = step.name(), "Step passed");
                StepOutcome::Passed
            }
            Err(failure) => {
                if failure.is_infrastructure() {
                    error!(
                        step = step.name(),
                        error = %failure,
                        "Step failed with infrastructure error"
                    );
                } else {
                    error!(step = step.name(), error = %failure, "Step failed");
                }
                StepOutcome::Failed(failure)
            }
        };

        StepResult {
            step,
            outcome,
            duration: start_time.elapsed(),
        }
    }

    async fn execute_step(
        &self,
        step: Step,
        context: &mut SuiteContext,
    ) -> Result<(), StepFailure> {
        let api: &dyn BookingApi = &self.api;
        match step {
            Step::CreateBooking => steps::create_booking(api, context, &self.fixtures.original)
                .await
                .map(|_| ()),
            Step::ListBookingIds => steps::list_booking_ids(api, context).await,
            Step::GetBookingById => steps::get_booking_by_id(api, context).await,
            Step::UpdateBooking => {
                steps::update_booking(api, context, &self.fixtures.replacement).await
            }
            Step::PartialUpdateBooking => {
                steps::partial_update_booking(api, context, &self.fixtures.patch).await
            }
            Step::DeleteBooking => steps::delete_booking(api, context).await,
            Step::ConfirmDeletion => steps::confirm_deletion(api, context).await,
            Step::PingHealthCheck => steps::ping_health_check(api, self.ping_ceiling).await,
        }
    }
}

/// Why `step` cannot run with the current context, if it cannot.
fn blocked_reason(step: Step, context: &SuiteContext) -> Option<String> {
    if !step.requires_booking() {
        return None;
    }

    match context.booking() {
        None => Some(format!(
            "{} did not produce a booking id",
            Step::CreateBooking.name()
        )),
        Some(booking) if step == Step::ConfirmDeletion && !booking.deleted => Some(format!(
            "{} did not succeed for booking {}",
            Step::DeleteBooking.name(),
            booking.id
        )),
        _ => None,
    }
}
