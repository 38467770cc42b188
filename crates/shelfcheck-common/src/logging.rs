//! ---
//! shelf_section: "01-harness-core"
//! shelf_subsection: "module"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "Tracing bootstrap for the Shelfcheck harness."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV: &str = "SHELFCHECK_LOG";

/// Available console log formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Human-oriented output for interactive runs.
    #[default]
    Pretty,
    /// One JSON document per event, for CI log collectors.
    StructuredJson,
}

/// Initialize the tracing subscriber for a harness run.
///
/// `SHELFCHECK_LOG` overrides the log filter (e.g. `info`,
/// `debug,shelfcheck_client=trace`). When unset the standard `RUST_LOG`
/// variable is honoured, finally defaulting to `info` so every step's
/// request and response lines are visible to the operator.
pub fn init_tracing(format: LogFormat) {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(directive).unwrap_or_else(|err| {
            eprintln!(
                "invalid {} directive ({}); defaulting to info logging",
                LOG_ENV, err
            );
            EnvFilter::new("info")
        }),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let fmt_layer = match format {
        LogFormat::StructuredJson => fmt::layer().with_target(false).json().boxed(),
        LogFormat::Pretty => fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .ok();
}
