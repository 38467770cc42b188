//! ---
//! shelf_section: "03-scenario-runner"
//! shelf_subsection: "module"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "Per-step outcome records."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
use serde_json::Value;

/// Outcome of one request/response exchange plus its assertion.
///
/// Immutable once produced. `body` is the raw parsed response when one
/// was obtained; harness-side failures (transport, timeout, non-JSON
/// body) carry no body at all.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub name: &'static str,
    pub body: Option<Value>,
    pub passed: bool,
    /// Failure cause; `None` exactly when the step passed.
    pub detail: Option<String>,
}

impl StepResult {
    /// A step whose assertion held.
    pub fn pass(name: &'static str, body: Value) -> Self {
        Self {
            name,
            body: Some(body),
            passed: true,
            detail: None,
        }
    }

    /// A response was parsed but the assertion on it failed.
    pub fn assertion_failure(name: &'static str, body: Value, detail: impl Into<String>) -> Self {
        Self {
            name,
            body: Some(body),
            passed: false,
            detail: Some(detail.into()),
        }
    }

    /// The exchange itself failed before any assertion could run.
    pub fn harness_failure(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            body: None,
            passed: false,
            detail: Some(detail.into()),
        }
    }
}
