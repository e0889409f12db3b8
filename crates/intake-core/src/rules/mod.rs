pub mod policy;
pub mod validation;

pub use policy::{FieldLimits, SubmissionPolicy};
pub use validation::{validate_recruitment, validate_registration};
