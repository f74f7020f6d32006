//! Input checks shared by services. Each returns the normalized value on success and a
//! 400 validation error naming the field otherwise.

use crate::server::error::Error;

/// Maximum length of a job message body, in characters
pub const MAX_MESSAGE_LEN: usize = 4000;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Trims `value`, rejecting it when nothing is left
pub fn required_text(field: &str, value: &str) -> Result<String, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(format!("{} is required", field)));
    }

    Ok(value.to_string())
}

/// Checks the overall shape `local@domain.tld` and lowercases the address
pub fn email(value: &str) -> Result<String, Error> {
    let value = value.trim().to_lowercase();

    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(Error::validation(format!("Invalid email address: {}", value)));
    }

    Ok(value)
}

/// Validates an optional email, treating blank input as absent
pub fn optional_email(value: Option<&str>) -> Result<Option<String>, Error> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => email(value).map(Some),
        None => Ok(None),
    }
}

pub fn positive_cents(field: &str, value: i64) -> Result<i64, Error> {
    if value <= 0 {
        return Err(Error::validation(format!("{} must be greater than zero", field)));
    }

    Ok(value)
}

pub fn non_negative_cents(field: &str, value: i64) -> Result<i64, Error> {
    if value < 0 {
        return Err(Error::validation(format!("{} must not be negative", field)));
    }

    Ok(value)
}
