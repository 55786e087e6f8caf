//! Identity backend collaborator contract.
//!
//! SYSTEM CONTEXT
//! ==============
//! The real implementation talks to the commerce platform's customer API and
//! keeps the access token in browser storage. The session store only sees
//! this trait, so the HTTP layer can change without touching orchestration.
//!
//! All methods run on the UI thread, hence `?Send`.

use async_trait::async_trait;

use super::types::{Credentials, Identity, Registration};
use crate::error::IdentityError;

#[async_trait(?Send)]
pub trait IdentityBackend {
    /// Exchange credentials for a session and return the customer.
    async fn login(&self, credentials: &Credentials) -> Result<Identity, IdentityError>;

    /// Create an account and sign it in.
    async fn register(&self, registration: &Registration) -> Result<Identity, IdentityError>;

    /// Invalidate any persisted session artifacts (tokens, cached customer).
    async fn logout(&self) -> Result<(), IdentityError>;

    /// Resolve the persisted session, if one is still valid.
    async fn current_identity(&self) -> Result<Option<Identity>, IdentityError>;

    /// Cheap local check for persisted session artifacts; no network.
    fn is_logged_in(&self) -> bool;
}
