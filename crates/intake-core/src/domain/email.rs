use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// Anchored, and the regex crate matches in linear time.
static EMAIL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Trim and Unicode-lowercase; the result is the store key.
pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_SHAPE_RE.is_match(value)
}

pub fn email_domain(value: &str) -> Option<&str> {
    value
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
}

/// An email address that passed the shape check.
///
/// Keeps the value as the caller submitted it (trimmed) for echoing back, and
/// the normalized form used as the store key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailAddress {
    submitted: String,
    normalized: String,
}

impl EmailAddress {
    pub fn parse(value: &str) -> Option<Self> {
        let submitted = value.trim();
        if !is_valid_email(submitted) {
            return None;
        }
        let normalized = normalize_email(submitted)?;
        Some(Self {
            submitted: submitted.to_string(),
            normalized,
        })
    }

    pub fn as_submitted(&self) -> &str {
        &self.submitted
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn domain(&self) -> &str {
        email_domain(&self.normalized).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{email_domain, is_valid_email, normalize_email, EmailAddress};

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let value = normalize_email("  Ada@Example.com ");
        assert_eq!(value.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn normalize_email_lowercases_non_ascii_letters() {
        assert_eq!(normalize_email("ÄDA@x.com"), normalize_email("äda@x.com"));
        assert_eq!(normalize_email(" ÉLODIE@Exämple.COM").as_deref(), Some("élodie@exämple.com"));
        let email = EmailAddress::parse("ÄDA@X.com").expect("valid email");
        assert_eq!(email.as_submitted(), "ÄDA@X.com");
        assert_eq!(email.normalized(), "äda@x.com");
    }

    #[test]
    fn normalize_email_rejects_blank() {
        assert!(normalize_email("   ").is_none());
    }

    #[test]
    fn email_shape_requires_single_at_and_dotted_domain() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@dept.example.co.in"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada@exa@mple.com"));
        assert!(!is_valid_email("ada lovelace@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@.com."));
    }

    #[test]
    fn email_shape_handles_adversarial_input_quickly() {
        let hostile = format!("{}@{}", "a".repeat(10_000), "b.".repeat(10_000));
        assert!(!is_valid_email(&format!("{hostile} ")));
    }

    #[test]
    fn email_domain_takes_text_after_at() {
        assert_eq!(email_domain("ada@example.com"), Some("example.com"));
        assert_eq!(email_domain("ada@"), None);
        assert_eq!(email_domain("ada"), None);
    }

    #[test]
    fn email_address_keeps_submitted_and_normalized_forms() {
        let email = EmailAddress::parse(" Asha.Rao@Sreenidhi.edu.in ").expect("valid email");
        assert_eq!(email.as_submitted(), "Asha.Rao@Sreenidhi.edu.in");
        assert_eq!(email.normalized(), "asha.rao@sreenidhi.edu.in");
        assert_eq!(email.domain(), "sreenidhi.edu.in");
    }
}
