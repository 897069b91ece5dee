//! Sensitive-field detection and redaction utilities.
//!
//! Service configuration carries operator email addresses and, elsewhere in the
//! same files, SMTP credentials. Structured logs must never echo those values.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Checks if a field name likely refers to personal or secret data.
///
/// # Examples
///
/// ```
/// use kuma_find_shared::is_sensitive_key;
///
/// assert!(is_sensitive_key("email"));
/// assert!(is_sensitive_key("SMTP_PASSWORD"));
/// assert!(is_sensitive_key("apiKey"));
/// assert!(!is_sensitive_key("directory"));
/// ```
pub fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    key.contains("EMAIL")
        || key.contains("MAIL_TO")
        || key.contains("KEY")
        || key.contains("TOKEN")
        || key.contains("SECRET")
        || key.contains("PASSWORD")
}

/// Redacts a value if the field name is sensitive.
///
/// # Examples
///
/// ```
/// use kuma_find_shared::redact_if_sensitive;
///
/// assert_eq!(redact_if_sensitive("email", "ops@example.com"), "[REDACTED]");
/// assert_eq!(redact_if_sensitive("kind", "name"), "name");
/// ```
pub fn redact_if_sensitive(key: &str, value: &str) -> String {
    if is_sensitive_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}
