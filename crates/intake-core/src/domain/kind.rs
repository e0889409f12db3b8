use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Recruitment,
    Registration,
}

impl SubmissionKind {
    pub const ALL: [SubmissionKind; 2] = [SubmissionKind::Recruitment, SubmissionKind::Registration];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Recruitment => "recruitment",
            SubmissionKind::Registration => "registration",
        }
    }

    pub fn default_source(&self) -> &'static str {
        match self {
            SubmissionKind::Recruitment => "Recruitment Page",
            SubmissionKind::Registration => "Registration Form",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recruitment" => Ok(SubmissionKind::Recruitment),
            "registration" => Ok(SubmissionKind::Registration),
            other => Err(CoreError::InvalidSubmissionKind(other.to_string())),
        }
    }
}
