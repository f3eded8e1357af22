//! Contact-message template.

use crate::domain::ContactMessage;

/// A contact message rendered for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    /// Visitor name, used as the sender display name.
    pub sender_name: String,
    /// Visitor address, used as `Reply-To`.
    pub reply_to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
    /// HTML body.
    pub html: String,
}

/// Escapes text for inclusion in HTML element content or attributes.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Renders the fixed quote-request template for `msg`.
///
/// Optional fields that were left empty show as "-".
#[must_use]
pub fn render(msg: &ContactMessage) -> RenderedMail {
    let rows = [
        ("Phone", msg.phone.as_deref()),
        ("Site address", msg.address.as_deref()),
        ("Property type", msg.property_type.as_deref()),
        ("Project type", msg.project_type.as_deref()),
    ];

    let mut text = format!("New quote request from {}\n\nEmail: {}\n", msg.name, msg.email);
    for (label, value) in rows {
        text.push_str(&format!("{label}: {}\n", value.unwrap_or("-")));
    }
    text.push_str(&format!("\nMessage:\n{}\n", msg.message));

    let name = escape_html(&msg.name);
    let email = escape_html(&msg.email);
    let mut html = format!(
        "<h2>New quote request from {name}</h2>\n\
         <p><strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></p>\n"
    );
    for (label, value) in rows {
        html.push_str(&format!(
            "<p><strong>{label}:</strong> {}</p>\n",
            escape_html(value.unwrap_or("-"))
        ));
    }
    html.push_str(&format!(
        "<hr>\n<h3>Message:</h3>\n<p style=\"white-space: pre-wrap;\">{}</p>\n",
        escape_html(&msg.message)
    ));

    RenderedMail {
        sender_name: msg.name.clone(),
        reply_to: msg.email.clone(),
        subject: format!("New message from {} via the website", msg.name),
        text,
        html,
    }
}
