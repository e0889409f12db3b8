pub mod email;
pub mod ids;
pub mod kind;
pub mod record;
pub mod submission;

pub use email::{email_domain, is_valid_email, normalize_email, EmailAddress};
pub use ids::RecordId;
pub use kind::SubmissionKind;
pub use record::StoredRecord;
pub use submission::{
    fields, RecruitmentFields, RecruitmentSubmission, RegistrationFields, RegistrationSubmission,
    Submission,
};
