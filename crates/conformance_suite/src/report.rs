//! Markdown reporting for CI systems.

use std::env;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::errors::SuiteError;
use crate::runner::{StepOutcome, SuiteReport};

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

/// Describes where the suite is running.
///
/// Returns `pr{number}` for pull request workflows, `main` for the main or
/// master branch, the sanitized branch name for other branches, and
/// `local` outside GitHub Actions.
pub fn get_workflow_context() -> String {
    if let Ok(github_ref) = env::var("GITHUB_REF") {
        if let Some(rest) = github_ref.strip_prefix("refs/pull/") {
            if let Some(pr_num) = rest.split('/').next() {
                return format!("pr{}", pr_num);
            }
        } else if let Some(branch) = github_ref.strip_prefix("refs/heads/") {
            if branch == "main" || branch == "master" {
                return "main".to_string();
            }
            return branch.replace('/', "-");
        }
    }

    "local".to_string()
}

/// Renders the report as markdown.
pub fn render_markdown(report: &SuiteReport) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();

    writeln!(out, "# Booking Service Conformance Report")?;
    writeln!(out)?;
    writeln!(out, "- **Run**: {}", report.run_id)?;
    writeln!(
        out,
        "- **Started**: {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out, "- **Service**: {}", report.base_url)?;
    writeln!(out, "- **Context**: {}", get_workflow_context())?;
    writeln!(out)?;

    writeln!(out, "## Summary")?;
    writeln!(out)?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "|--------|-------|")?;
    writeln!(out, "| Total Steps | {} |", report.results.len())?;
    writeln!(out, "| Passed | {} |", report.passed())?;
    writeln!(out, "| Failed | {} |", report.failed())?;
    writeln!(out, "| Blocked | {} |", report.blocked())?;
    writeln!(
        out,
        "| Total Duration | {:.2}s |",
        report.total_duration().as_secs_f64()
    )?;
    writeln!(out)?;

    writeln!(out, "## Step Results")?;
    writeln!(out)?;

    for result in &report.results {
        let status_emoji = match result.outcome {
            StepOutcome::Passed => "✅",
            StepOutcome::Failed(_) => "❌",
            StepOutcome::Blocked(_) => "⏭️",
        };

        writeln!(out, "### {} {}", status_emoji, result.step.title())?;
        writeln!(out)?;
        writeln!(out, "- **Status**: {}", result.outcome.label())?;
        writeln!(out, "- **Duration**: {:.2}s", result.duration.as_secs_f64())?;

        match &result.outcome {
            StepOutcome::Passed => {}
            StepOutcome::Failed(failure) => writeln!(out, "- **Error**: {}", failure)?,
            StepOutcome::Blocked(reason) => writeln!(out, "- **Reason**: {}", reason)?,
        }
        writeln!(out)?;
    }

    Ok(out)
}

/// Renders the report and writes it to `path`.
pub fn write_report(report: &SuiteReport, path: &Path) -> Result<(), SuiteError> {
    let contents = render_markdown(report).map_err(SuiteError::Report)?;
    std::fs::write(path, contents).map_err(SuiteError::Report)?;

    info!(path = %path.display(), "Conformance report written");
    Ok(())
}
