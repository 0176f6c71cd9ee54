//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Longest service name accepted on the command line.
pub const MAX_SERVICE_NAME_LENGTH: usize = 255;

/// Validate a service name argument.
///
/// Compose service names are made of ASCII alphanumerics, `.`, `_` and `-`,
/// and must start with an alphanumeric.
///
/// Examples: `api`, `db-primary`, `worker_2`, `web.v2`
pub fn validate_service_name(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Service name cannot be empty".to_string());
    }

    if s.len() > MAX_SERVICE_NAME_LENGTH {
        return Err(format!(
            "Service name cannot exceed {MAX_SERVICE_NAME_LENGTH} characters, got {}",
            s.len()
        ));
    }

    if !s.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(format!(
            "Invalid service name '{s}': must start with a letter or digit"
        ));
    }

    if let Some(bad) = s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(format!(
            "Invalid service name '{s}': character '{bad}' is not allowed"
        ));
    }

    Ok(s.to_string())
}
