//! ---
//! shelf_section: "01-harness-core"
//! shelf_subsection: "module"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "Shared primitives for the Shelfcheck harness."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use tracing::debug;
use url::Url;

use crate::logging::LogFormat;

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_verify_deletion() -> bool {
    true
}

fn default_username() -> String {
    "s".to_owned()
}

fn default_password() -> String {
    "a".to_owned()
}

fn default_books() -> Vec<BookFixture> {
    vec![
        BookFixture {
            cover_i: 11,
            first_year_publish: 2004,
            key: "/works/OL8065988M".to_owned(),
            language: vec!["jpn".to_owned(), "krn".to_owned()],
            title: "the lord of the rings".to_owned(),
        },
        BookFixture {
            cover_i: 11,
            first_year_publish: 2004,
            key: "/works/OL8066000M".to_owned(),
            language: vec!["jpn".to_owned(), "krn".to_owned()],
            title: "the lord of the rings".to_owned(),
        },
    ]
}

/// Primary configuration object for a harness run.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Base address all endpoint paths are appended to. Paths are joined
    /// verbatim, so the address must already end with `/`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_request_timeout")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub request_timeout: Duration,
    #[serde(default)]
    pub fail_fast: bool,
    #[serde(default = "default_verify_deletion")]
    pub verify_deletion: bool,
    #[serde(default)]
    pub randomize_username: bool,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default = "default_books")]
    pub books: Vec<BookFixture>,
}

/// Credentials used to register and authenticate the throwaway account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

/// One book added to and later removed from the library under test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookFixture {
    pub cover_i: u32,
    pub first_year_publish: i32,
    /// Works identifier; doubles as the handle for removal and for the
    /// listing containment checks.
    pub key: String,
    pub language: Vec<String>,
    pub title: String,
}

impl HarnessConfig {
    pub const ENV_CONFIG_PATH: &str = "SHELFCHECK_CONFIG";

    /// Load configuration from disk, respecting the `SHELFCHECK_CONFIG`
    /// override. Unlike the address itself, a configuration file is
    /// optional; built-in defaults reproduce the historical smoke run.
    pub fn load_or_default<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                return Self::from_path(PathBuf::from(env_path));
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                return Self::from_path(candidate.as_ref().to_path_buf());
            }
        }

        debug!("no configuration file found; using built-in defaults");
        Ok(Self::default())
    }

    fn from_path(path: PathBuf) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        toml::from_str::<HarnessConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Validate structural invariants. Called once the CLI and environment
    /// overlays have been applied, before any request is sent.
    pub fn validate(&self) -> Result<()> {
        let Some(base) = self.base_url.as_deref() else {
            return Err(anyhow!(
                "no base address configured; set HOST, pass --host, or add base_url to the config file"
            ));
        };
        if !base.ends_with('/') {
            return Err(anyhow!(
                "base address '{}' must end with '/' because endpoint paths are appended verbatim",
                base
            ));
        }
        let parsed =
            Url::parse(base).with_context(|| format!("invalid base address '{}'", base))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(anyhow!(
                "unsupported scheme '{}' in base address '{}'",
                parsed.scheme(),
                base
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(anyhow!("request_timeout must be greater than zero"));
        }
        if self.account.username.is_empty() || self.account.password.is_empty() {
            return Err(anyhow!("account credentials must not be empty"));
        }
        if self.books.len() != 2 {
            return Err(anyhow!(
                "the scenario requires exactly two book fixtures, found {}",
                self.books.len()
            ));
        }
        if self.books[0].key == self.books[1].key {
            return Err(anyhow!("book fixtures must use distinct keys"));
        }
        Ok(())
    }

    /// The validated base address as a [`Url`].
    pub fn parsed_base_url(&self) -> Result<Url> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| anyhow!("no base address configured"))?;
        Url::parse(base).with_context(|| format!("invalid base address '{}'", base))
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout: default_request_timeout(),
            fail_fast: false,
            verify_deletion: default_verify_deletion(),
            randomize_username: false,
            log_format: LogFormat::default(),
            account: AccountConfig::default(),
            books: default_books(),
        }
    }
}

impl std::str::FromStr for HarnessConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        toml::from_str(content).with_context(|| "failed to parse configuration")
    }
}
