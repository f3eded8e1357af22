//! Contact-form submissions.

use crate::error::SiteError;

/// Fields submitted through the public contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactMessage {
    /// Visitor name.
    pub name: String,
    /// Visitor email address, used as `Reply-To`.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional site/work address.
    pub address: Option<String>,
    /// Optional kind of property (house, flat, shop...).
    pub property_type: Option<String>,
    /// Optional kind of project.
    pub project_type: Option<String>,
    /// Free-text message.
    pub message: String,
}

impl ContactMessage {
    /// Trims every field, drops blank optional fields and checks that the
    /// required ones are present.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when `name`, `email` or `message`
    /// is blank, or when `email` has no `@`.
    pub fn normalized(self) -> Result<Self, SiteError> {
        let required = |value: String, field: &str| {
            let value = value.trim().to_string();
            if value.is_empty() {
                Err(SiteError::Validation(format!("{field} is required")))
            } else {
                Ok(value)
            }
        };
        let optional = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let email = required(self.email, "email")?;
        if !email.contains('@') {
            return Err(SiteError::Validation(format!("invalid email address: {email}")));
        }

        Ok(Self {
            name: required(self.name, "name")?,
            email,
            phone: optional(self.phone),
            address: optional(self.address),
            property_type: optional(self.property_type),
            project_type: optional(self.project_type),
            message: required(self.message, "message")?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn message() -> ContactMessage {
        ContactMessage {
            name: " Ada ".to_string(),
            email: "ada@example.com".to_string(),
            phone: Some("   ".to_string()),
            address: Some("12 rue des Lilas".to_string()),
            property_type: None,
            project_type: Some("Kitchen".to_string()),
            message: "Hello".to_string(),
        }
    }

    #[test]
    fn trims_and_drops_blank_optionals() {
        let Ok(msg) = message().normalized() else {
            panic!("expected valid message");
        };
        assert_eq!(msg.name, "Ada");
        assert_eq!(msg.phone, None);
        assert_eq!(msg.address.as_deref(), Some("12 rue des Lilas"));
    }

    #[test]
    fn required_fields_are_enforced() {
        let mut msg = message();
        msg.message = "  ".to_string();
        assert!(matches!(msg.normalized(), Err(SiteError::Validation(_))));

        let mut msg = message();
        msg.email = "not-an-address".to_string();
        assert!(matches!(msg.normalized(), Err(SiteError::Validation(_))));
    }
}
