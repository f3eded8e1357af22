//! Admin authentication gate.
//!
//! Two states per browser: anonymous, or authenticated through a live
//! session. [`AdminGate::login`] moves to authenticated when the submitted
//! credentials match the configured admin; [`AdminGate::logout`] and session
//! expiry move back.

use axum_extra::extract::cookie::{Cookie, SameSite};
use hmac::Mac;
use uuid::Uuid;

use super::session::{CookieSigner, SessionStore, keyed_mac};
use crate::config::AdminConfig;
use crate::error::SiteError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "vitrine_session";

/// Configured admin credentials, kept only as HMAC tags keyed by the
/// session secret so the comparison runs in constant time and the plain
/// password is not retained.
#[derive(Clone)]
struct AdminCredentials {
    username_tag: Vec<u8>,
    password_tag: Vec<u8>,
}

impl AdminCredentials {
    fn new(key: &[u8], username: &str, password: &str) -> Result<Self, SiteError> {
        Ok(Self {
            username_tag: keyed_mac(key, username.as_bytes())?.finalize().into_bytes().to_vec(),
            password_tag: keyed_mac(key, password.as_bytes())?.finalize().into_bytes().to_vec(),
        })
    }

    fn matches(&self, key: &[u8], username: &str, password: &str) -> Result<bool, SiteError> {
        let username_ok = keyed_mac(key, username.as_bytes())?
            .verify_slice(&self.username_tag)
            .is_ok();
        let password_ok = keyed_mac(key, password.as_bytes())?
            .verify_slice(&self.password_tag)
            .is_ok();
        Ok(username_ok & password_ok)
    }
}

/// Authenticated admin principal, proven by a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminPrincipal {
    /// Session token backing this principal.
    pub session: Uuid,
}

/// Issues, validates and revokes admin sessions.
pub struct AdminGate {
    credentials: Option<AdminCredentials>,
    signer: CookieSigner,
    sessions: SessionStore,
    cookie_secure: bool,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("login_enabled", &self.credentials.is_some())
            .field("sessions", &self.sessions)
            .field("cookie_secure", &self.cookie_secure)
            .finish_non_exhaustive()
    }
}

impl AdminGate {
    /// Builds the gate from configuration.
    ///
    /// Without `SESSION_SECRET` a random per-process secret is used, so
    /// sessions do not survive restarts. Without admin credentials every
    /// login attempt is refused.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Internal`] if the credential tags cannot be
    /// computed.
    pub fn new(config: &AdminConfig) -> Result<Self, SiteError> {
        let secret = match config.session_secret.as_deref() {
            Some(secret) => secret.to_string(),
            None => {
                tracing::warn!("SESSION_SECRET not set; sessions will not survive a restart");
                format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
            }
        };
        let signer = CookieSigner::new(secret.as_bytes());

        let credentials = match (config.username.as_deref(), config.password.as_deref()) {
            (Some(username), Some(password)) => {
                Some(AdminCredentials::new(signer.key(), username, password)?)
            }
            _ => {
                tracing::warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set; admin login is disabled");
                None
            }
        };

        Ok(Self {
            credentials,
            signer,
            sessions: SessionStore::new(config.session_ttl_secs),
            cookie_secure: config.cookie_secure,
        })
    }

    /// Checks credentials and opens a session, returning the signed cookie
    /// value that proves it.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidCredentials`] when the credentials do not
    /// match or login is disabled.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, SiteError> {
        let Some(credentials) = &self.credentials else {
            return Err(SiteError::InvalidCredentials);
        };
        if !credentials.matches(self.signer.key(), username, password)? {
            tracing::warn!("admin login rejected");
            return Err(SiteError::InvalidCredentials);
        }

        let token = self.sessions.issue().await;
        tracing::info!("admin logged in");
        self.signer.sign(token)
    }

    /// Resolves a cookie value to the admin principal it proves, if any.
    pub async fn authenticate(&self, cookie_value: &str) -> Option<AdminPrincipal> {
        let token = self.signer.verify(cookie_value)?;
        self.sessions
            .is_active(token)
            .await
            .then_some(AdminPrincipal { session: token })
    }

    /// Ends the session behind a cookie value. Invalid values are ignored.
    pub async fn logout(&self, cookie_value: &str) {
        if let Some(token) = self.signer.verify(cookie_value)
            && self.sessions.revoke(token).await
        {
            tracing::info!("admin logged out");
        }
    }

    /// Cookie carrying a freshly issued session.
    #[must_use]
    pub fn session_cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
            .build()
    }

    /// Cookie that clears the session cookie in the browser.
    #[must_use]
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE).path("/").build()
    }
}
