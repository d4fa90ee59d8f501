//! Field validation applied before a record is staged

/// Reject empty or whitespace-only values
pub fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    Ok(())
}

/// Codes (SKU, coupon code) are short and limited to `[A-Za-z0-9_.-]`,
/// starting with an alphanumeric character.
pub fn validate_code(field: &str, value: &str) -> Result<(), String> {
    require_non_empty(field, value)?;

    if value.len() > 64 {
        return Err(format!("{} '{}' is longer than 64 characters", field, value));
    }

    let starts_alphanumeric = value
        .chars()
        .next()
        .map(|c| c.is_ascii_alphanumeric())
        .unwrap_or(false);
    if !starts_alphanumeric {
        return Err(format!(
            "{} '{}' must start with an alphanumeric character",
            field, value
        ));
    }

    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-');
    if !valid {
        return Err(format!(
            "{} '{}' contains invalid characters. Only alphanumeric, '_', '.', and '-' are allowed",
            field, value
        ));
    }

    Ok(())
}

/// ISO 4217 shape: three uppercase ASCII letters
pub fn validate_currency(value: &str) -> Result<(), String> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(format!("currency '{}' is not a three-letter ISO code", value))
    }
}

pub fn validate_email(value: &str) -> Result<(), String> {
    require_non_empty("email", value)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(format!("email '{}' is malformed", value)),
    }
}

pub fn require_non_negative(field: &str, value: i64) -> Result<(), String> {
    if value < 0 {
        return Err(format!("{} cannot be negative (got {})", field, value));
    }
    Ok(())
}
