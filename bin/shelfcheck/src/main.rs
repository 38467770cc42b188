//! ---
//! shelf_section: "04-operator-cli"
//! shelf_subsection: "binary"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "Binary entrypoint for the Shelfcheck smoke harness."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use shelfcheck_client::rest::ApiClient;
use shelfcheck_common::config::HarnessConfig;
use shelfcheck_common::logging::{init_tracing, LogFormat};
use shelfcheck_scenario::runner::ScenarioRunner;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Book-library backend smoke harness",
    long_about = None
)]
struct Cli {
    /// Base address of the backend; endpoint paths are appended verbatim,
    /// so it must end with '/'.
    #[arg(long, env = "HOST", value_name = "URL")]
    host: Option<String>,

    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "SECONDS", help = "Per-request timeout override")]
    timeout: Option<u64>,

    #[arg(long, help = "Stop at the first failed step")]
    fail_fast: bool,

    #[arg(long, help = "Skip the post-deletion login probe")]
    no_verify_deletion: bool,

    #[arg(long, help = "Append a random suffix to the account username")]
    randomize_username: bool,

    #[arg(long, value_enum, help = "Console log format")]
    log_format: Option<CliLogFormat>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogFormat {
    Pretty,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(value: CliLogFormat) -> Self {
        match value {
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::Json => LogFormat::StructuredJson,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/shelfcheck.toml"));
    let mut config = HarnessConfig::load_or_default(&candidates)?;

    if let Some(host) = cli.host {
        config.base_url = Some(host);
    }
    if let Some(seconds) = cli.timeout {
        config.request_timeout = Duration::from_secs(seconds);
    }
    if cli.fail_fast {
        config.fail_fast = true;
    }
    if cli.no_verify_deletion {
        config.verify_deletion = false;
    }
    if cli.randomize_username {
        config.randomize_username = true;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format.into();
    }

    config.validate()?;
    init_tracing(config.log_format);

    let client = ApiClient::new(config.parsed_base_url()?, config.request_timeout)?;
    let runner = ScenarioRunner::new(client, &config)?;
    let report = runner.run().await;

    println!("{}", report.render());
    Ok(ExitCode::from(report.exit_code()))
}
