//! Users: identity of everyone who owns, books or comments.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Validated signup data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
}

impl NewUser {
    pub fn new(email: Option<String>, name: Option<String>) -> DomainResult<Self> {
        let email = require_non_blank(email, "user email must be set")?;
        validate_email(&email)?;
        let name = require_non_blank(name, "user name must be set")?;
        Ok(Self { email, name })
    }
}

/// Partial update: `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl UserPatch {
    pub fn new(email: Option<String>, name: Option<String>) -> DomainResult<Self> {
        if let Some(email) = &email {
            if email.trim().is_empty() {
                return Err(DomainError::validation("user email must not be blank"));
            }
            validate_email(email)?;
        }
        if let Some(name) = &name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("user name must not be blank"));
            }
        }
        Ok(Self { email, name })
    }

    pub fn apply(&self, user: &User) -> User {
        User {
            id: user.id,
            email: self.email.clone().unwrap_or_else(|| user.email.clone()),
            name: self.name.clone().unwrap_or_else(|| user.name.clone()),
        }
    }
}

/// Minimal structural email check: `local@domain.tld`, no whitespace.
pub fn validate_email(email: &str) -> DomainResult<()> {
    let invalid = || DomainError::validation(format!("'{email}' is not a valid email address"));

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

pub(crate) fn require_non_blank(value: Option<String>, msg: &str) -> DomainResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::validation(msg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn new_user_requires_email_and_name() {
        assert!(NewUser::new(some("a@b.io"), some("Ann")).is_ok());
        assert!(matches!(NewUser::new(None, some("Ann")), Err(DomainError::Validation(_))));
        assert!(matches!(NewUser::new(some("a@b.io"), some("  ")), Err(DomainError::Validation(_))));
    }

    #[test]
    fn email_format_is_checked() {
        for bad in ["plain", "@b.io", "a@", "a@b", "a@@b.io", "a b@c.io", "a@b..io"] {
            assert!(validate_email(bad).is_err(), "{bad} should be rejected");
        }
        assert!(validate_email("first.last@mail.example.com").is_ok());
    }

    #[test]
    fn patch_keeps_unset_fields() {
        let user = User {
            id: UserId::from_raw(1),
            email: "old@mail.io".into(),
            name: "Old".into(),
        };
        let patched = UserPatch::new(None, some("New")).unwrap().apply(&user);
        assert_eq!(patched.email, "old@mail.io");
        assert_eq!(patched.name, "New");
    }

    #[test]
    fn patch_rejects_blank_values() {
        assert!(UserPatch::new(some(""), None).is_err());
        assert!(UserPatch::new(None, some(" ")).is_err());
        assert!(UserPatch::new(some("not-an-email"), None).is_err());
    }
}
