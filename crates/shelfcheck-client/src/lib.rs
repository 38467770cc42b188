//! ---
//! shelf_section: "02-backend-client"
//! shelf_subsection: "module"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "Backend API client exports."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
//! Wire models and the HTTP client consumed by the scenario runner.
//! Every backend operation is a `POST` carrying a JSON document and
//! answering with a JSON document whose `success` field reports the
//! outcome; this crate owns that contract.

pub mod models;
pub mod rest;

pub use models::{
    success_flag, AddBookRequest, DeleteUserRequest, ListRequest, LoginRequest, RegisterRequest,
    RemoveBookRequest,
};
pub use rest::{ApiClient, ClientError};
