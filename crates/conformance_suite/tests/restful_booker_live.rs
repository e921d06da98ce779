//! Conformance run against the public restful-booker instance.
//!
//! Needs network access. Run with:
//!
//! ```bash
//! cargo test -p conformance_suite --test restful_booker_live -- --ignored
//! ```
//!
//! `BOOKER_BASE_URL` and the other `BOOKER_*` variables select a different
//! deployment.

use anyhow::Result;
use conformance_suite::{StepOutcome, SuiteConfig, SuiteRunner};
use test_utils::init_test_logging;

#[tokio::test]
#[ignore = "Requires network access to the public booking service"]
async fn test_public_service_conforms() -> Result<()> {
    init_test_logging();
    let config = SuiteConfig::resolve(None, None)?;

    let report = SuiteRunner::from_config(&config)?.run_all().await?;

    for result in &report.results {
        if let StepOutcome::Failed(failure) = &result.outcome {
            tracing::error!(step = result.step.name(), error = %failure, "Step failed");
        }
    }
    assert!(report.is_success(), "{} step(s) failed", report.failed());

    Ok(())
}
