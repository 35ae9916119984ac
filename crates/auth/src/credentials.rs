//! Field-level rules for registration and profile updates.
//!
//! Every rule is checked independently so a request learns about all of its
//! problems at once.

use invoicehub_core::{DomainError, DomainResult, Username};

use crate::user::{RegisterUser, UpdateUser};

pub const MIN_USERNAME_LEN: usize = 5;

pub const USERNAME_TOO_SHORT: &str = "username must be at least 5 characters long";
pub const USERNAME_NOT_ALPHANUMERIC: &str = "username contains non alphanumeric characters - not allowed";
pub const PASSWORD_REQUIRED: &str = "password is required";
pub const EMAIL_INVALID: &str = "email does not appear to be valid";

/// Registration that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: Username,
    pub password: String,
    pub email: String,
}

/// Profile changes that passed the rules for the fields they carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub username: Option<Username>,
    pub password: Option<String>,
    pub email: Option<String>,
}

fn check_username(username: &str, violations: &mut Vec<String>) {
    if username.chars().count() < MIN_USERNAME_LEN {
        violations.push(USERNAME_TOO_SHORT.to_string());
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        violations.push(USERNAME_NOT_ALPHANUMERIC.to_string());
    }
}

fn check_password(password: &str, violations: &mut Vec<String>) {
    if password.is_empty() {
        violations.push(PASSWORD_REQUIRED.to_string());
    }
}

fn check_email(email: &str, violations: &mut Vec<String>) {
    if !is_valid_email(email) {
        violations.push(EMAIL_INVALID.to_string());
    }
}

/// Basic shape check: one `@`, a non-empty local part, and a dotted domain
/// without leading/trailing dots or whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

pub fn validate_registration(req: RegisterUser) -> DomainResult<Registration> {
    let mut violations = Vec::new();
    check_username(&req.username, &mut violations);
    check_password(&req.password, &mut violations);
    check_email(req.email.trim(), &mut violations);

    if !violations.is_empty() {
        return Err(DomainError::Violations(violations));
    }

    Ok(Registration {
        username: Username::new(req.username),
        password: req.password,
        email: req.email.trim().to_string(),
    })
}

/// Apply the registration rules to the supplied fields only.
pub fn validate_update(req: UpdateUser) -> DomainResult<ProfileChanges> {
    let mut violations = Vec::new();
    if let Some(username) = &req.username {
        check_username(username, &mut violations);
    }
    if let Some(password) = &req.password {
        check_password(password, &mut violations);
    }
    if let Some(email) = &req.email {
        check_email(email.trim(), &mut violations);
    }

    if !violations.is_empty() {
        return Err(DomainError::Violations(violations));
    }

    Ok(ProfileChanges {
        username: req.username.map(Username::new),
        password: req.password,
        email: req.email.map(|e| e.trim().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str, email: &str) -> DomainResult<Registration> {
        validate_registration(RegisterUser {
            username: username.into(),
            password: password.into(),
            email: email.into(),
        })
    }

    fn violations(result: DomainResult<impl core::fmt::Debug>) -> Vec<String> {
        match result {
            Err(DomainError::Violations(v)) => v,
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn valid_registration_passes() {
        let reg = register("janedoe", "pw", " jane@example.com ").unwrap();
        assert_eq!(reg.username.as_str(), "janedoe");
        assert_eq!(reg.email, "jane@example.com");
    }

    #[test]
    fn each_rule_reports_independently() {
        assert_eq!(violations(register("jane", "pw", "jane@example.com")), vec![USERNAME_TOO_SHORT]);
        assert_eq!(violations(register("jane_doe", "pw", "jane@example.com")), vec![USERNAME_NOT_ALPHANUMERIC]);
        assert_eq!(violations(register("janedoe", "", "jane@example.com")), vec![PASSWORD_REQUIRED]);
        assert_eq!(violations(register("janedoe", "pw", "jane.example.com")), vec![EMAIL_INVALID]);
    }

    #[test]
    fn all_violations_are_collected() {
        assert_eq!(
            violations(register("j!", "", "nope")),
            vec![USERNAME_TOO_SHORT, USERNAME_NOT_ALPHANUMERIC, PASSWORD_REQUIRED, EMAIL_INVALID]
        );
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b.co."));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@b..co"));
    }

    #[test]
    fn update_checks_only_supplied_fields() {
        let changes = validate_update(UpdateUser {
            email: Some("new@example.com".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.email.as_deref(), Some("new@example.com"));
        assert!(changes.username.is_none());

        let err = validate_update(UpdateUser {
            username: Some("abc".into()),
            password: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(violations(err), vec![USERNAME_TOO_SHORT, PASSWORD_REQUIRED]);
    }
}
