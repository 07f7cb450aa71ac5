use regex::Regex;
use std::sync::OnceLock;

use super::ApiError;
use crate::domain::LocaleSet;

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?\d{7,15}$").expect("Invalid regex"))
}

fn telegram_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{2,32}$").expect("Invalid regex"))
}

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {resource} ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_required<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}

pub fn validate_locale(locales: &LocaleSet, locale: &str) -> Result<(), ApiError> {
    if !locales.contains(locale) {
        return Err(ApiError::validation(format!(
            "Unknown locale '{locale}', expected one of: {locales}"
        )));
    }
    Ok(())
}

/// Applicant names are trimmed and must be 2 to 255 characters.
pub fn validate_applicant_name(name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if !(2..=255).contains(&len) {
        return Err(ApiError::validation(
            "Name must be between 2 and 255 characters",
        ));
    }
    Ok(trimmed.to_string())
}

/// Strips spaces, dashes and parentheses, then expects an optional `+` and 7-15 digits.
pub fn normalize_phone(phone: &str) -> Result<String, ApiError> {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    if !phone_regex().is_match(&cleaned) {
        return Err(ApiError::validation(
            "Phone must contain 7 to 15 digits, optionally prefixed with +",
        ));
    }
    Ok(cleaned)
}

/// Returns the username with exactly one leading `@`.
pub fn normalize_telegram_username(username: &str) -> Result<String, ApiError> {
    let bare = username.trim().trim_start_matches('@');

    if !telegram_regex().is_match(bare) {
        return Err(ApiError::validation(
            "Telegram username must be 2-32 letters, digits or underscores",
        ));
    }
    Ok(format!("@{bare}"))
}
