use serde::Deserialize;
use std::collections::BTreeMap;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Account registration form as submitted by the dashboard
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

/// Field name -> messages, the same shape upstream uses for its `errors` map
pub type FieldErrors = BTreeMap<&'static str, Vec<&'static str>>;

impl RegistrationRequest {
    /// Shape checks only; uniqueness and the rest are decided upstream
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.entry("name").or_default().push("Name is required.");
        }
        if self.email.trim().is_empty() {
            errors.entry("email").or_default().push("Email is required.");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors
                .entry("password")
                .or_default()
                .push("Password must be at least 8 characters.");
        }
        if self.password != self.password_confirmation {
            errors
                .entry("password_confirmation")
                .or_default()
                .push("Passwords do not match.");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
