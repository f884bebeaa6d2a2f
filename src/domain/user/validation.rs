//! User field validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user field validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Phone number cannot be empty")]
    EmptyPhone,

    #[error("Phone number '{0}' is not a valid mobile number")]
    InvalidPhone(String),

    #[error("Username cannot be empty")]
    EmptyName,

    #[error("Username is too short. Minimum length is {0} characters")]
    NameTooShort(usize),

    #[error("Username exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Username must start with a letter or underscore, found '{0}'")]
    InvalidNameStart(char),

    #[error("Username contains invalid character: '{0}'. Only letters, digits and underscores are allowed")]
    InvalidNameCharacter(char),
}

pub const DEFAULT_MIN_NAME_LENGTH: usize = 4;
pub const DEFAULT_MAX_NAME_LENGTH: usize = 48;

/// Mainland mobile numbers, optionally prefixed with the +86 country code
static MOBILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\+?86)?1[3-9][0-9]{9}$").expect("valid mobile pattern"));

const NATIONAL_MOBILE_DIGITS: usize = 11;

/// Username length bounds, counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameLengthRule {
    pub min: usize,
    pub max: usize,
}

impl Default for NameLengthRule {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_NAME_LENGTH,
            max: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

/// Validate a phone number
///
/// Rules:
/// - Cannot be empty
/// - Must be an 11 digit mobile number starting with 13-19,
///   optionally prefixed with `86` or `+86`
pub fn validate_phone(phone: &str) -> Result<(), UserValidationError> {
    if phone.is_empty() {
        return Err(UserValidationError::EmptyPhone);
    }

    if !MOBILE_PATTERN.is_match(phone) {
        return Err(UserValidationError::InvalidPhone(phone.to_string()));
    }

    Ok(())
}

/// National 11 digit form of a mobile number
///
/// Strips a `+86` or `86` country prefix so all spellings of one number
/// compare equal. Input that does not match the mobile pattern is returned
/// unchanged.
pub fn normalize_phone(phone: &str) -> String {
    if !MOBILE_PATTERN.is_match(phone) {
        return phone.to_string();
    }

    let national_start = phone.len() - NATIONAL_MOBILE_DIGITS;
    phone[national_start..].to_string()
}

/// Validate the length of a username
pub fn validate_name_length(name: &str, rule: NameLengthRule) -> Result<(), UserValidationError> {
    let len = name.chars().count();

    if len == 0 {
        return Err(UserValidationError::EmptyName);
    }

    if len < rule.min {
        return Err(UserValidationError::NameTooShort(rule.min));
    }

    if len > rule.max {
        return Err(UserValidationError::NameTooLong(rule.max));
    }

    Ok(())
}

/// Validate the characters of a username
///
/// Rules:
/// - First character is a letter (ASCII or CJK) or an underscore
/// - Remaining characters are letters, ASCII digits or underscores
pub fn validate_name_charset(name: &str) -> Result<(), UserValidationError> {
    let mut chars = name.chars();

    let first = chars.next().ok_or(UserValidationError::EmptyName)?;

    if !is_name_letter(first) && first != '_' {
        return Err(UserValidationError::InvalidNameStart(first));
    }

    for c in chars {
        if !is_name_letter(c) && !c.is_ascii_digit() && c != '_' {
            return Err(UserValidationError::InvalidNameCharacter(c));
        }
    }

    Ok(())
}

fn is_name_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || is_han(c)
}

fn is_han(c: char) -> bool {
    matches!(c, '\u{4e00}'..='\u{9fff}' | '\u{3400}'..='\u{4dbf}')
}
