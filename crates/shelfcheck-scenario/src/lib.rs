//! ---
//! shelf_section: "03-scenario-runner"
//! shelf_subsection: "module"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "Scenario runner module exports."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
//! The ordered smoke scenario against the book-library backend.
//!
//! One account is registered, logged in, loaded with two books, emptied
//! again, and deleted. Each exchange is recorded as a [`step::StepResult`]
//! and the whole run is summarized by a [`report::RunReport`].

pub mod context;
pub mod report;
pub mod runner;
pub mod step;

pub use context::SessionContext;
pub use report::RunReport;
pub use runner::ScenarioRunner;
pub use step::StepResult;
