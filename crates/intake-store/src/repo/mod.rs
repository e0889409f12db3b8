pub mod recruitment;
pub mod registrations;

pub use recruitment::{RecruitmentRecord, RecruitmentRepo};
pub use registrations::{RegistrationRecord, RegistrationsRepo};

use crate::error::{Result, StoreError};
use intake_core::RecordId;
use std::str::FromStr;

pub(crate) fn parse_record_id(value: String) -> Result<RecordId> {
    RecordId::from_str(&value).map_err(|_| StoreError::InvalidId(value))
}
