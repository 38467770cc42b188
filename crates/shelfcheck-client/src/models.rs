//! ---
//! shelf_section: "02-backend-client"
//! shelf_subsection: "module"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "Wire models for the book-library backend API."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body accepted by `register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Body accepted by `login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body accepted by `lib/addbook`.
///
/// The identifiers come from the login response; the remaining fields
/// describe the book being shelved. Field names are the literal wire
/// contract and must not be renamed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddBookRequest {
    pub userid: String,
    pub password: String,
    pub cover_i: u32,
    pub first_year_publish: i32,
    pub key: String,
    pub language: Vec<String>,
    pub title: String,
}

/// Body accepted by `lib` (library listing).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListRequest {
    pub userid: String,
    pub password: String,
    /// Free-text filter; the smoke scenario always sends an empty query.
    pub query: String,
}

/// Body accepted by `lib/removebook`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoveBookRequest {
    pub userid: String,
    pub password: String,
    pub key: String,
}

/// Body accepted by `deleteuser`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteUserRequest {
    pub userid: String,
    pub username: String,
    pub password: String,
}

/// Whether a parsed response body reports success.
///
/// The backend predates any strict typing of this field, so the flag is
/// evaluated with source-language truthiness: `true`, nonzero numbers,
/// nonempty strings, arrays and objects count as truthy; `false`, `0`,
/// `""`, `null` and an absent field count as falsy.
pub fn success_flag(body: &Value) -> bool {
    body.get("success").map(is_truthy).unwrap_or(false)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
