use crate::domain::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MAX_NAME_LEN: usize = 100;
const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public-safe view of a user. The password hash never leaves the domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("Name is required".to_string()));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::Validation(format!(
                "Name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        if !is_well_formed_email(&self.email) {
            return Err(DomainError::Validation(
                "Email address is not valid".to_string(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.password.chars().count() > MAX_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at most {} characters",
                MAX_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Exactly one '@' with non-empty sides and no whitespace.
fn is_well_formed_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut req = valid_request();
        req.name = "   ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_overlong_name_rejected() {
        let mut req = valid_request();
        req.name = "a".repeat(101);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut req = valid_request();
        req.password = "12345".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_six_character_password_accepted() {
        let mut req = valid_request();
        req.password = "123456".to_string();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_malformed_emails_rejected() {
        for email in ["", "no-at-sign", "@example.com", "alice@", "a b@x.com", "a@b@c"] {
            let mut req = valid_request();
            req.email = email.to_string();
            assert!(req.validate().is_err(), "expected {email:?} to be rejected");
        }
    }

    #[test]
    fn test_summary_excludes_password_hash() {
        let user = User {
            id: "user-1".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            created_at: Utc::now(),
        };

        let summary = UserSummary::from(&user);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("alice@example.com"));
    }
}
