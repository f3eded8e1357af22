//! Server-side session table and signed session cookies.
//!
//! A session is a random token issued at login. The browser carries it in
//! a cookie of the form `<token>.<hex HMAC-SHA256(token)>`; a request is
//! authenticated only when the signature verifies and the token is still
//! present and unexpired in the [`SessionStore`].

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::SiteError;

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Keyed HMAC-SHA256 over `data`.
///
/// # Errors
///
/// Returns [`SiteError::Internal`] if the key is rejected (HMAC accepts
/// any key length, so this does not happen in practice).
pub(crate) fn keyed_mac(key: &[u8], data: &[u8]) -> Result<HmacSha256, SiteError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| SiteError::Internal(format!("hmac key rejected: {e}")))?;
    mac.update(data);
    Ok(mac)
}

/// Signs and verifies session cookie values.
#[derive(Clone)]
pub struct CookieSigner {
    key: Vec<u8>,
}

impl std::fmt::Debug for CookieSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieSigner").finish_non_exhaustive()
    }
}

impl CookieSigner {
    /// Creates a signer from the session secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: secret.to_vec(),
        }
    }

    /// Key material, shared with the credential check.
    pub(crate) fn key(&self) -> &[u8] {
        &self.key
    }

    /// Returns the cookie value for `token`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Internal`] if the HMAC cannot be computed.
    pub fn sign(&self, token: Uuid) -> Result<String, SiteError> {
        let token = token.to_string();
        let tag = keyed_mac(&self.key, token.as_bytes())?.finalize().into_bytes();
        Ok(format!("{token}.{}", hex::encode(tag)))
    }

    /// Extracts the token from a cookie value if its signature verifies.
    #[must_use]
    pub fn verify(&self, value: &str) -> Option<Uuid> {
        let (token, tag) = value.split_once('.')?;
        let tag = hex::decode(tag).ok()?;
        keyed_mac(&self.key, token.as_bytes())
            .ok()?
            .verify_slice(&tag)
            .ok()?;
        Uuid::parse_str(token).ok()
    }
}

/// Table of live admin sessions with their expiry times.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, DateTime<Utc>>>,
    ttl: TimeDelta,
}

impl SessionStore {
    /// Creates an empty store whose sessions live for `ttl_secs` seconds.
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Issues a new session token, purging expired sessions first.
    pub async fn issue(&self) -> Uuid {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let token = Uuid::new_v4();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, expiry| *expiry > now);
        sessions.insert(token, expires_at);
        token
    }

    /// Returns `true` when `token` names a live session.
    pub async fn is_active(&self, token: Uuid) -> bool {
        self.sessions
            .read()
            .await
            .get(&token)
            .is_some_and(|expiry| *expiry > Utc::now())
    }

    /// Ends a session. Unknown tokens are ignored.
    pub async fn revoke(&self, token: Uuid) -> bool {
        self.sessions.write().await.remove(&token).is_some()
    }

    /// Number of sessions currently stored, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no session is stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
