use crate::domain::{RecruitmentSubmission, RegistrationSubmission};
use serde::{Deserialize, Serialize};

/// Identity fields echoed back after a recruitment unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitmentAck {
    pub name: String,
    pub email: String,
    pub unlocked: bool,
}

impl From<&RecruitmentSubmission> for RecruitmentAck {
    fn from(submission: &RecruitmentSubmission) -> Self {
        Self {
            name: submission.fields.name.clone(),
            email: submission.email.as_submitted().to_string(),
            unlocked: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationAck {
    pub name: String,
    pub email: String,
    pub department: String,
    pub year: String,
}

impl From<&RegistrationSubmission> for RegistrationAck {
    fn from(submission: &RegistrationSubmission) -> Self {
        Self {
            name: submission.fields.name.clone(),
            email: submission.email.as_submitted().to_string(),
            department: submission.fields.department.clone(),
            year: submission.fields.year.clone(),
        }
    }
}
