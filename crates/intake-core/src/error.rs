use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid submission kind: {0}")]
    InvalidSubmissionKind(String),
    #[error("invalid field limit for {0}: must be positive")]
    InvalidFieldLimit(&'static str),
    #[error("invalid allowed domain: {0:?}")]
    InvalidAllowedDomain(String),
}

/// Why a submission was rejected. The display text is the client-facing reason.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("missing required field: {0}")]
    Missing(&'static str),
    #[error("field must be text: {0}")]
    InvalidType(&'static str),
    #[error("field must be a list of text: {0}")]
    InvalidList(&'static str),
    #[error("field exceeds maximum length: {0}")]
    TooLong(&'static str),
    #[error("too many items: {0}")]
    TooManyItems(&'static str),
    #[error("invalid email format")]
    InvalidEmail,
    #[error("email domain is not accepted")]
    DomainNotAllowed,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::NotAnObject => "invalid_payload",
            ValidationError::Missing(_) => "missing_field",
            ValidationError::InvalidType(_) | ValidationError::InvalidList(_) => "invalid_type",
            ValidationError::TooLong(_) => "too_long",
            ValidationError::TooManyItems(_) => "too_many_items",
            ValidationError::InvalidEmail => "invalid_email",
            ValidationError::DomainNotAllowed => "domain_not_allowed",
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::Missing(field)
            | ValidationError::InvalidType(field)
            | ValidationError::InvalidList(field)
            | ValidationError::TooLong(field)
            | ValidationError::TooManyItems(field) => Some(field),
            ValidationError::NotAnObject
            | ValidationError::InvalidEmail
            | ValidationError::DomainNotAllowed => None,
        }
    }
}
