//! Conformance suite for the restful-booker hotel booking API.
//!
//! The suite authenticates, then drives one booking through its whole
//! lifecycle (create, list, read, replace, patch, delete, confirm the
//! delete) and finally checks the health endpoint. Every step asserts on
//! status codes and response bodies and reports a [`StepOutcome`].
//!
//! ```no_run
//! use conformance_suite::{SuiteConfig, SuiteRunner};
//!
//! # async fn run() -> Result<(), conformance_suite::SuiteError> {
//! let config = SuiteConfig::resolve(None, Some("http://localhost:3001"))?;
//! let report = SuiteRunner::from_config(&config)?.run_all().await?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod config;
pub mod context;
pub mod errors;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod steps;

pub use config::SuiteConfig;
pub use context::{SuiteContext, TrackedBooking};
pub use errors::{ConfigError, StepFailure, SuiteError};
pub use fixtures::BookingFixtures;
pub use report::{get_workflow_context, render_markdown, write_report};
pub use runner::{Step, StepOutcome, StepResult, SuiteReport, SuiteRunner};
