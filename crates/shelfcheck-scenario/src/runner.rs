//! ---
//! shelf_section: "03-scenario-runner"
//! shelf_subsection: "module"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "Ordered scenario execution against the backend."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
use std::time::Instant;

use anyhow::{Context, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use shelfcheck_client::models::{
    success_flag, AddBookRequest, DeleteUserRequest, ListRequest, LoginRequest, RegisterRequest,
    RemoveBookRequest,
};
use shelfcheck_client::rest::ApiClient;
use shelfcheck_common::config::{AccountConfig, BookFixture, HarnessConfig};
use tracing::{info, warn};

use crate::context::SessionContext;
use crate::report::RunReport;
use crate::step::StepResult;

/// Drives the fixed ordered sequence of backend calls and collects one
/// [`StepResult`] per exchange.
///
/// The sequence is ordered by data dependency (every call after login
/// replays identifiers captured from the login body), so steps run
/// strictly one at a time; no two requests are ever in flight together.
#[derive(Debug)]
pub struct ScenarioRunner {
    client: ApiClient,
    account: AccountConfig,
    book_a: BookFixture,
    book_b: BookFixture,
    fail_fast: bool,
    verify_deletion: bool,
}

impl ScenarioRunner {
    /// Build a runner from a validated configuration.
    pub fn new(client: ApiClient, config: &HarnessConfig) -> Result<Self> {
        let mut fixtures = config.books.iter().cloned();
        let book_a = fixtures
            .next()
            .context("the scenario requires a first book fixture")?;
        let book_b = fixtures
            .next()
            .context("the scenario requires a second book fixture")?;

        let mut account = config.account.clone();
        if config.randomize_username {
            let suffix: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(8)
                .map(char::from)
                .collect();
            account.username = format!("{}-{}", account.username, suffix);
            info!(username = %account.username, "randomized scenario username");
        }

        Ok(Self {
            client,
            account,
            book_a,
            book_b,
            fail_fast: config.fail_fast,
            verify_deletion: config.verify_deletion,
        })
    }

    /// Execute the whole scenario and report every step outcome.
    ///
    /// Failed assertions do not halt the run unless `fail_fast` was
    /// configured; the completion line is logged either way.
    pub async fn run(&self) -> RunReport {
        let started = Instant::now();
        info!(
            base_url = %self.client.base_url(),
            username = %self.account.username,
            "starting scenario"
        );

        let mut results = Vec::new();
        self.run_steps(&mut results).await;

        let failed = results.iter().filter(|result| !result.passed).count();
        info!(steps = results.len(), failed, "scenario completed");
        RunReport::new(results, started.elapsed())
    }

    async fn run_steps(&self, results: &mut Vec<StepResult>) {
        let register = self
            .execute(
                "register",
                "register",
                &RegisterRequest {
                    username: self.account.username.clone(),
                    password: self.account.password.clone(),
                },
            )
            .await;
        if !self.record(results, register) {
            return;
        }

        let login = self
            .execute(
                "login",
                "login",
                &LoginRequest {
                    username: self.account.username.clone(),
                    password: self.account.password.clone(),
                },
            )
            .await;
        let session = login
            .body
            .as_ref()
            .map(SessionContext::from_login_body)
            .unwrap_or_default();
        if !session.is_captured() {
            warn!("login yielded no user id; dependent steps will fail their assertions");
        }
        if !self.record(results, login) {
            return;
        }

        let add_a = self
            .execute(
                "addbook",
                "lib/addbook",
                &self.add_book_request(&session, &self.book_a),
            )
            .await;
        if !self.record(results, add_a) {
            return;
        }

        let add_b = self
            .execute(
                "addbook2",
                "lib/addbook",
                &self.add_book_request(&session, &self.book_b),
            )
            .await;
        if !self.record(results, add_b) {
            return;
        }

        let list_full = self
            .execute_listing(
                "lib",
                &session,
                &[self.book_a.key.as_str(), self.book_b.key.as_str()],
                &[],
            )
            .await;
        if !self.record(results, list_full) {
            return;
        }

        let remove_a = self
            .execute(
                "removebook",
                "lib/removebook",
                &RemoveBookRequest {
                    userid: session.userid.clone(),
                    password: session.password.clone(),
                    key: self.book_a.key.clone(),
                },
            )
            .await;
        if !self.record(results, remove_a) {
            return;
        }

        let list_reduced = self
            .execute_listing(
                "lib2",
                &session,
                &[self.book_b.key.as_str()],
                &[self.book_a.key.as_str()],
            )
            .await;
        if !self.record(results, list_reduced) {
            return;
        }

        let remove_b = self
            .execute(
                "removebook2",
                "lib/removebook",
                &RemoveBookRequest {
                    userid: session.userid.clone(),
                    password: session.password.clone(),
                    key: self.book_b.key.clone(),
                },
            )
            .await;
        if !self.record(results, remove_b) {
            return;
        }

        let delete = self
            .execute(
                "deleteuser",
                "deleteuser",
                &DeleteUserRequest {
                    userid: session.userid.clone(),
                    username: session.username.clone(),
                    password: session.password.clone(),
                },
            )
            .await;
        if !self.record(results, delete) {
            return;
        }

        if self.verify_deletion {
            let probe = self
                .execute_refusal(
                    "login-after-delete",
                    "login",
                    &LoginRequest {
                        username: self.account.username.clone(),
                        password: self.account.password.clone(),
                    },
                )
                .await;
            self.record(results, probe);
        }
    }

    /// Push a result and decide whether the sequence continues.
    fn record(&self, results: &mut Vec<StepResult>, result: StepResult) -> bool {
        let proceed = result.passed || !self.fail_fast;
        results.push(result);
        proceed
    }

    /// One exchange: log the step, send, parse, assert the success flag.
    async fn execute<B: Serialize>(&self, name: &'static str, path: &str, body: &B) -> StepResult {
        info!(step = name, path, "sending request");
        match self.client.post_json(path, body).await {
            Ok(parsed) => {
                info!(step = name, response = %parsed, "response received");
                if success_flag(&parsed) {
                    StepResult::pass(name, parsed)
                } else {
                    warn!(step = name, "success flag was falsy");
                    StepResult::assertion_failure(name, parsed, "success flag was falsy")
                }
            }
            Err(err) => {
                warn!(step = name, error = %err, "request failed");
                StepResult::harness_failure(name, err.to_string())
            }
        }
    }

    /// Listing step: beyond the success flag, the body must mention every
    /// expected key and none of the removed ones.
    async fn execute_listing(
        &self,
        name: &'static str,
        session: &SessionContext,
        expect_present: &[&str],
        expect_absent: &[&str],
    ) -> StepResult {
        let request = ListRequest {
            userid: session.userid.clone(),
            password: session.password.clone(),
            query: String::new(),
        };
        let result = self.execute(name, "lib", &request).await;
        if !result.passed {
            return result;
        }
        let body = match result.body {
            Some(body) => body,
            None => return StepResult::harness_failure(name, "listing response body missing"),
        };

        for key in expect_present {
            if !value_mentions(&body, key) {
                warn!(step = name, key, "listing does not mention expected key");
                return StepResult::assertion_failure(
                    name,
                    body,
                    format!("listing does not mention {key}"),
                );
            }
        }
        for key in expect_absent {
            if value_mentions(&body, key) {
                warn!(step = name, key, "listing still mentions removed key");
                return StepResult::assertion_failure(
                    name,
                    body,
                    format!("listing still mentions {key}"),
                );
            }
        }
        StepResult::pass(name, body)
    }

    /// Inverted step: passes only when the backend refuses the request,
    /// used to confirm the account really was deleted.
    async fn execute_refusal<B: Serialize>(
        &self,
        name: &'static str,
        path: &str,
        body: &B,
    ) -> StepResult {
        info!(step = name, path, "sending request");
        match self.client.post_json(path, body).await {
            Ok(parsed) => {
                info!(step = name, response = %parsed, "response received");
                if success_flag(&parsed) {
                    warn!(step = name, "backend accepted credentials for a deleted account");
                    StepResult::assertion_failure(name, parsed, "deleted account can still log in")
                } else {
                    StepResult::pass(name, parsed)
                }
            }
            Err(err) => {
                warn!(step = name, error = %err, "request failed");
                StepResult::harness_failure(name, err.to_string())
            }
        }
    }

    fn add_book_request(&self, session: &SessionContext, book: &BookFixture) -> AddBookRequest {
        AddBookRequest {
            userid: session.userid.clone(),
            password: session.password.clone(),
            cover_i: book.cover_i,
            first_year_publish: book.first_year_publish,
            key: book.key.clone(),
            language: book.language.clone(),
            title: book.title.clone(),
        }
    }
}

/// Deep-search a parsed body for a string equal to `needle`.
///
/// The listing shape beyond the success flag is not part of the backend
/// contract, so containment is checked anywhere in the JSON tree rather
/// than against a named field.
pub fn value_mentions(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(text) => text == needle,
        Value::Array(items) => items.iter().any(|item| value_mentions(item, needle)),
        Value::Object(map) => map.values().any(|item| value_mentions(item, needle)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use url::Url;

    fn test_client() -> ApiClient {
        ApiClient::new(
            Url::parse("http://127.0.0.1:9/").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn value_mentions_searches_the_whole_tree() {
        let body = json!({
            "success": true,
            "books": [
                { "key": "/works/OL8065988M", "title": "the lord of the rings" },
                { "nested": { "key": "/works/OL8066000M" } }
            ]
        });
        assert!(value_mentions(&body, "/works/OL8065988M"));
        assert!(value_mentions(&body, "/works/OL8066000M"));
        assert!(!value_mentions(&body, "/works/OL0000000M"));
        // Only exact string values count, not substrings or field names.
        assert!(!value_mentions(&body, "/works"));
        assert!(!value_mentions(&body, "books"));
    }

    #[test]
    fn construction_requires_two_fixtures() {
        let mut config = HarnessConfig::default();
        config.books.truncate(1);
        let err = ScenarioRunner::new(test_client(), &config).unwrap_err();
        assert!(err.to_string().contains("second book fixture"));
    }

    #[test]
    fn randomized_usernames_keep_the_configured_prefix() {
        let mut config = HarnessConfig::default();
        config.randomize_username = true;
        let runner = ScenarioRunner::new(test_client(), &config).unwrap();
        assert!(runner.account.username.starts_with("s-"));
        assert_eq!(runner.account.username.len(), "s-".len() + 8);
        assert_eq!(runner.account.password, "a");
    }
}
