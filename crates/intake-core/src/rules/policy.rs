use crate::domain::EmailAddress;
use crate::error::CoreError;

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_MOBILE_LEN: usize = 50;
pub const MAX_ROLL_NUMBER_LEN: usize = 50;
pub const MAX_SHORT_TEXT_LEN: usize = 50;
pub const MAX_LONG_TEXT_LEN: usize = 2000;
pub const MAX_INTEREST_LEN: usize = 100;
pub const MAX_INTERESTS: usize = 20;

/// Upper bounds, in characters, for submitted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLimits {
    pub email: usize,
    pub name: usize,
    pub mobile: usize,
    pub roll_number: usize,
    /// department, year, passing-out year
    pub short_text: usize,
    /// experience, expectations, referral
    pub long_text: usize,
    pub interest: usize,
    pub max_interests: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            email: MAX_EMAIL_LEN,
            name: MAX_NAME_LEN,
            mobile: MAX_MOBILE_LEN,
            roll_number: MAX_ROLL_NUMBER_LEN,
            short_text: MAX_SHORT_TEXT_LEN,
            long_text: MAX_LONG_TEXT_LEN,
            interest: MAX_INTEREST_LEN,
            max_interests: MAX_INTERESTS,
        }
    }
}

impl FieldLimits {
    pub fn validate(&self) -> Result<(), CoreError> {
        let limits = [
            ("email", self.email),
            ("name", self.name),
            ("mobile", self.mobile),
            ("roll_number", self.roll_number),
            ("short_text", self.short_text),
            ("long_text", self.long_text),
            ("interest", self.interest),
            ("max_interests", self.max_interests),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(CoreError::InvalidFieldLimit(name));
            }
        }
        Ok(())
    }
}

/// Per-kind acceptance rules that sit on top of field validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPolicy {
    allowed_domains: Vec<String>,
}

impl SubmissionPolicy {
    pub fn any_domain() -> Self {
        Self::default()
    }

    pub fn allow_domains<I, S>(domains: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed_domains = Vec::new();
        for domain in domains {
            let raw = domain.as_ref();
            let normalized = raw.trim().trim_start_matches('.').to_lowercase();
            if normalized.is_empty() || normalized.contains('@') || normalized.contains(' ') {
                return Err(CoreError::InvalidAllowedDomain(raw.to_string()));
            }
            if !allowed_domains.contains(&normalized) {
                allowed_domains.push(normalized);
            }
        }
        Ok(Self { allowed_domains })
    }

    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }

    pub fn restricts_domains(&self) -> bool {
        !self.allowed_domains.is_empty()
    }

    /// The domain must equal an allowed suffix or be a subdomain of one.
    pub fn permits(&self, email: &EmailAddress) -> bool {
        if !self.restricts_domains() {
            return true;
        }
        let domain = email.domain();
        self.allowed_domains.iter().any(|suffix| {
            domain == suffix
                || domain
                    .strip_suffix(suffix.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}
