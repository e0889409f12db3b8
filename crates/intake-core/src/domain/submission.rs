use crate::domain::email::EmailAddress;
use serde::{Deserialize, Serialize};

/// Wire names of submitted fields.
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const MOBILE: &str = "mobile";
    pub const PASSING_OUT_YEAR: &str = "passingOutYear";
    pub const ROLL_NUMBER: &str = "rollNumber";
    pub const DEPARTMENT: &str = "department";
    pub const YEAR: &str = "year";
    pub const INTERESTS: &str = "interests";
    pub const EXPERIENCE: &str = "experience";
    pub const EXPECTATIONS: &str = "expectations";
    pub const REFERRAL: &str = "referral";
}

/// A submission that passed validation. Only the validator builds these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission<F> {
    pub email: EmailAddress,
    pub fields: F,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitmentFields {
    pub name: String,
    pub mobile: String,
    pub passing_out_year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFields {
    pub name: String,
    pub mobile: String,
    pub roll_number: String,
    pub department: String,
    pub year: String,
    pub interests: Vec<String>,
    pub experience: String,
    pub expectations: String,
    pub referral: String,
}

pub type RecruitmentSubmission = Submission<RecruitmentFields>;
pub type RegistrationSubmission = Submission<RegistrationFields>;
