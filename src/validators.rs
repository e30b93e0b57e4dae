/// Field validation for account data.
///
/// The rules the original data model enforced as persistence hooks run here
/// as explicit functions, invoked by the account service before every write.

use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, ValidationError};

const FULL_NAME_MIN_LENGTH: usize = 3;
const FULL_NAME_MAX_LENGTH: usize = 100;

lazy_static! {
    // local@domain.tld; whitespace and extra @ are excluded by the classes
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Trims and lowercases an email address, then checks the shape.
///
/// Normalization happens before validation and before any uniqueness
/// comparison, so `" A@B.COM "` and `"a@b.com"` are the same address.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();

    if email.is_empty() {
        return Err(ValidationError::Required("Email").into());
    }

    if !EMAIL_PATTERN.is_match(&email) {
        return Err(ValidationError::InvalidEmail.into());
    }

    Ok(email)
}

/// Trims a full name and bounds its length to [3, 100] characters.
pub fn validate_full_name(raw: &str) -> Result<String, AppError> {
    let full_name = raw.trim().to_string();

    if full_name.is_empty() {
        return Err(ValidationError::Required("Full name").into());
    }

    let length = full_name.chars().count();
    if length < FULL_NAME_MIN_LENGTH {
        return Err(ValidationError::FullNameTooShort.into());
    }
    if length > FULL_NAME_MAX_LENGTH {
        return Err(ValidationError::FullNameTooLong.into());
    }

    Ok(full_name)
}

/// Rejects any birth date that is not strictly in the past.
pub fn validate_birth_date(birth_date: NaiveDate) -> Result<NaiveDate, AppError> {
    let today = Utc::now().date_naive();

    if birth_date >= today {
        return Err(ValidationError::BirthDateNotInPast.into());
    }

    Ok(birth_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email(" X@Y.com ").unwrap(), "x@y.com");
        assert_eq!(normalize_email(" A@B.COM ").unwrap(), "a@b.com");
    }

    #[test]
    fn normalized_variants_collide() {
        assert_eq!(
            normalize_email(" A@B.COM ").unwrap(),
            normalize_email("a@b.com").unwrap()
        );
    }

    #[test]
    fn email_shape_is_enforced() {
        for bad in ["plainaddress", "user@", "@domain.tld", "user@domain", "a b@c.de", "a@b@c.de"] {
            assert!(normalize_email(bad).is_err(), "should reject {:?}", bad);
        }
        assert!(normalize_email("user@domain.tld").is_ok());
        assert!(normalize_email("first.last@sub.domain.co").is_ok());
    }

    #[test]
    fn empty_email_is_required_not_invalid() {
        let err = normalize_email("   ").unwrap_err();
        assert_eq!(err.to_string(), "Email is required");
    }

    #[test]
    fn full_name_is_trimmed_and_bounded() {
        assert_eq!(validate_full_name("  Ada Lovelace  ").unwrap(), "Ada Lovelace");
        assert!(validate_full_name("Al").is_err());
        assert!(validate_full_name("Ada").is_ok());
        assert!(validate_full_name(&"a".repeat(100)).is_ok());
        assert!(validate_full_name(&"a".repeat(101)).is_err());
        assert!(validate_full_name("   ").is_err());
    }

    #[test]
    fn birth_date_must_be_strictly_past() {
        let today = Utc::now().date_naive();

        assert!(validate_birth_date(today).is_err());
        assert!(validate_birth_date(today + Duration::days(1)).is_err());
        assert!(validate_birth_date(today - Duration::days(1)).is_ok());
        assert!(validate_birth_date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()).is_ok());
    }
}
