//! ---
//! shelf_section: "03-scenario-runner"
//! shelf_subsection: "module"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "Aggregate run reporting and exit-code mapping."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
use std::time::Duration;

use crate::step::StepResult;

/// Ordered step outcomes for one scenario run.
#[derive(Debug, Clone)]
pub struct RunReport {
    results: Vec<StepResult>,
    duration: Duration,
}

impl RunReport {
    pub fn new(results: Vec<StepResult>, duration: Duration) -> Self {
        Self { results, duration }
    }

    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|result| result.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Process exit code: zero only when every step passed.
    pub fn exit_code(&self) -> u8 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    /// Operator-facing summary, one line per step plus a totals line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            match &result.detail {
                Some(detail) => out.push_str(&format!("FAIL {}: {}\n", result.name, detail)),
                None => out.push_str(&format!("PASS {}\n", result.name)),
            }
        }
        out.push_str(&format!(
            "scenario result: {}/{} steps passed in {:.2}s",
            self.passed_count(),
            self.results.len(),
            self.duration.as_secs_f64()
        ));
        out
    }
}
