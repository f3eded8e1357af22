//! Admin authentication: credential check, sessions, request guard.

pub mod extractor;
pub mod gate;
pub mod session;

pub use extractor::AdminSession;
pub use gate::{AdminGate, AdminPrincipal, SESSION_COOKIE};
pub use session::{CookieSigner, SessionStore};
