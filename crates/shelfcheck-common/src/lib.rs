//! ---
//! shelf_section: "01-harness-core"
//! shelf_subsection: "module"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "Shared primitives for the Shelfcheck harness."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
//! Shared primitives for the Shelfcheck smoke harness.
//! This crate exposes configuration loading and the tracing bootstrap
//! consumed by the scenario runner and the CLI.

pub mod config;
pub mod logging;

pub use config::{AccountConfig, BookFixture, HarnessConfig};
pub use logging::{init_tracing, LogFormat};
