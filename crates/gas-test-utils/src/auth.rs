//! Scripted [`Authorizer`] for tests.

use async_trait::async_trait;
use gas_api::{Authorizer, Credential, Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
enum Behavior {
    Grant(Credential),
    Deny,
    Hang,
    Fail(String),
}

/// Authorizer with a fixed outcome that counts how often it was asked.
#[derive(Debug)]
pub struct FakeAuthorizer {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl FakeAuthorizer {
    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Grants a credential carrying `token` and the requested scopes.
    pub fn granting(token: &str) -> Self {
        Self::with(Behavior::Grant(Credential::new(token)))
    }

    /// Finishes without a credential.
    pub fn denying() -> Self {
        Self::with(Behavior::Deny)
    }

    /// Never finishes.
    pub fn hanging() -> Self {
        Self::with(Behavior::Hang)
    }

    /// Fails with an unexpected error.
    pub fn failing(message: &str) -> Self {
        Self::with(Behavior::Fail(message.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authorizer for FakeAuthorizer {
    async fn authorize(&self, scopes: &[String]) -> Result<Option<Credential>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Grant(credential) => Ok(Some(credential.clone().with_scopes(scopes))),
            Behavior::Deny => Ok(None),
            Behavior::Hang => std::future::pending().await,
            Behavior::Fail(message) => Err(Error::Unauthorized(message.clone())),
        }
    }
}
