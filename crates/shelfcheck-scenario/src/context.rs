//! ---
//! shelf_section: "03-scenario-runner"
//! shelf_subsection: "module"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "Session identifiers captured from the login step."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
use serde_json::Value;

/// Identifiers captured from the login response and replayed as
/// credentials on every subsequent call.
///
/// Written once after the login exchange and read-only afterwards. When
/// the login body carried no usable identifiers the context stays empty,
/// which makes every dependent step fail its assertion instead of
/// aborting the run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub userid: String,
    pub username: String,
    pub password: String,
}

impl SessionContext {
    /// Capture the echoed identifiers from a parsed login body.
    ///
    /// The backend echoes `userid`, `username` and `password` (the
    /// plaintext echo is the backend's contract, not this harness's
    /// choice). Numeric identifiers are stringified; anything else is
    /// treated as absent.
    pub fn from_login_body(body: &Value) -> Self {
        Self {
            userid: string_field(body, "userid"),
            username: string_field(body, "username"),
            password: string_field(body, "password"),
        }
    }

    /// True when the login yielded a usable user id.
    pub fn is_captured(&self) -> bool {
        !self.userid.is_empty()
    }
}

fn string_field(body: &Value, name: &str) -> String {
    match body.get(name) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn captures_echoed_identifiers() {
        let body = json!({
            "success": true,
            "userid": "u42",
            "username": "s",
            "password": "a"
        });
        let session = SessionContext::from_login_body(&body);
        assert!(session.is_captured());
        assert_eq!(session.userid, "u42");
        assert_eq!(session.username, "s");
        assert_eq!(session.password, "a");
    }

    #[test]
    fn numeric_user_ids_are_stringified() {
        let body = json!({ "success": true, "userid": 42 });
        let session = SessionContext::from_login_body(&body);
        assert_eq!(session.userid, "42");
    }

    #[test]
    fn missing_identifiers_leave_the_context_empty() {
        let session = SessionContext::from_login_body(&json!({ "success": false }));
        assert!(!session.is_captured());
        assert_eq!(session, SessionContext::default());
    }
}
