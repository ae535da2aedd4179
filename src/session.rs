//! Process-wide auth session shared by every gateway call.

use std::sync::{Arc, RwLock};

use crate::error::{TreeError, TreeResult};

#[derive(Clone, Debug, Default)]
pub struct AuthSession {
    pub token: Option<String>,
}

/// Cloneable handle to the shared [`AuthSession`]. Sign-in and sign-out take effect for the
/// next call made through any clone, including calls in the middle of a sequence.
#[derive(Clone, Debug, Default)]
pub struct Session {
    inner: Arc<RwLock<AuthSession>>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        let session = Self::default();
        if let Some(token) = token {
            session.sign_in(&token);
        }
        session
    }

    pub fn sign_in(&self, token: &str) {
        let token = token.trim();
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.token = (!token.is_empty()).then(|| token.to_string());
    }

    pub fn sign_out(&self) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.token = None;
    }

    pub fn token(&self) -> Option<String> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Fail fast with `Unauthenticated` when no token is held.
    pub fn require(&self) -> TreeResult<String> {
        self.token().ok_or(TreeError::Unauthenticated)
    }
}
