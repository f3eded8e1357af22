//! Contact-form mail relay.
//!
//! [`Mailer`] validates a [`crate::domain::ContactMessage`], renders the
//! fixed template and hands it to a [`MailTransport`] exactly once.

pub mod mailer;
pub mod template;

pub use mailer::{MailTransport, Mailer, SmtpRelay};
pub use template::{RenderedMail, render};
