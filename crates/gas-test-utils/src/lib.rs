//! Shared test fixtures for the Apps Script Sync workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`remote`]: [`FakeScriptApi`], an in-memory remote service that records
//!   every call and can be told to fail
//! - [`auth`]: [`FakeAuthorizer`] with scripted outcomes
//! - [`project`]: [`TestProject`], a temporary project root with helpers

pub mod auth;
pub mod project;
pub mod remote;

pub use auth::FakeAuthorizer;
pub use project::TestProject;
pub use remote::{ApiCall, ApiOp, FakeConnector, FakeScriptApi};
