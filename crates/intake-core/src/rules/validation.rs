//! Boundary validation for raw JSON submissions.
//!
//! Every field is read from the untyped payload and must already have the
//! expected JSON type: a text field holding an object or array is rejected,
//! never coerced. This keeps operator-shaped values (`{"$gt": ""}`) away from
//! anything that builds a lookup. Checks run in a fixed order (presence and
//! type per field, then lengths, then email format, then the domain policy) so
//! a given payload always yields the same reason.

use crate::domain::{
    fields, EmailAddress, RecruitmentFields, RecruitmentSubmission, RegistrationFields,
    RegistrationSubmission, Submission,
};
use crate::error::ValidationError;
use crate::rules::policy::{FieldLimits, SubmissionPolicy};
use serde_json::{Map, Value};

struct Payload<'a>(&'a Map<String, Value>);

impl<'a> Payload<'a> {
    fn from_value(value: &'a Value) -> Result<Self, ValidationError> {
        value
            .as_object()
            .map(Payload)
            .ok_or(ValidationError::NotAnObject)
    }

    fn text(&self, field: &'static str) -> Result<&'a str, ValidationError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Err(ValidationError::Missing(field)),
            Some(Value::String(value)) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    Err(ValidationError::Missing(field))
                } else {
                    Ok(trimmed)
                }
            }
            Some(_) => Err(ValidationError::InvalidType(field)),
        }
    }

    fn text_list(&self, field: &'static str) -> Result<Vec<&'a str>, ValidationError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Err(ValidationError::Missing(field)),
            Some(Value::Array(items)) if items.is_empty() => Err(ValidationError::Missing(field)),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(value) if !value.trim().is_empty() => Ok(value.trim()),
                    _ => Err(ValidationError::InvalidList(field)),
                })
                .collect(),
            Some(_) => Err(ValidationError::InvalidList(field)),
        }
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong(field));
    }
    Ok(())
}

fn parse_email(value: &str, policy: &SubmissionPolicy) -> Result<EmailAddress, ValidationError> {
    let email = EmailAddress::parse(value).ok_or(ValidationError::InvalidEmail)?;
    if !policy.permits(&email) {
        return Err(ValidationError::DomainNotAllowed);
    }
    Ok(email)
}

pub fn validate_recruitment(
    payload: &Value,
    limits: &FieldLimits,
    policy: &SubmissionPolicy,
) -> Result<RecruitmentSubmission, ValidationError> {
    let payload = Payload::from_value(payload)?;
    let name = payload.text(fields::NAME)?;
    let email = payload.text(fields::EMAIL)?;
    let mobile = payload.text(fields::MOBILE)?;
    let passing_out_year = payload.text(fields::PASSING_OUT_YEAR)?;

    check_len(fields::EMAIL, email, limits.email)?;
    check_len(fields::NAME, name, limits.name)?;
    check_len(fields::MOBILE, mobile, limits.mobile)?;
    check_len(fields::PASSING_OUT_YEAR, passing_out_year, limits.short_text)?;

    let email = parse_email(email, policy)?;

    Ok(Submission {
        email,
        fields: RecruitmentFields {
            name: name.to_string(),
            mobile: mobile.to_string(),
            passing_out_year: passing_out_year.to_string(),
        },
    })
}

pub fn validate_registration(
    payload: &Value,
    limits: &FieldLimits,
    policy: &SubmissionPolicy,
) -> Result<RegistrationSubmission, ValidationError> {
    let payload = Payload::from_value(payload)?;
    let name = payload.text(fields::NAME)?;
    let email = payload.text(fields::EMAIL)?;
    let mobile = payload.text(fields::MOBILE)?;
    let roll_number = payload.text(fields::ROLL_NUMBER)?;
    let department = payload.text(fields::DEPARTMENT)?;
    let year = payload.text(fields::YEAR)?;
    let interests = payload.text_list(fields::INTERESTS)?;
    let experience = payload.text(fields::EXPERIENCE)?;
    let expectations = payload.text(fields::EXPECTATIONS)?;
    let referral = payload.text(fields::REFERRAL)?;

    check_len(fields::EMAIL, email, limits.email)?;
    check_len(fields::NAME, name, limits.name)?;
    check_len(fields::MOBILE, mobile, limits.mobile)?;
    check_len(fields::ROLL_NUMBER, roll_number, limits.roll_number)?;
    check_len(fields::DEPARTMENT, department, limits.short_text)?;
    check_len(fields::YEAR, year, limits.short_text)?;
    if interests.len() > limits.max_interests {
        return Err(ValidationError::TooManyItems(fields::INTERESTS));
    }
    for interest in &interests {
        check_len(fields::INTERESTS, interest, limits.interest)?;
    }
    check_len(fields::EXPERIENCE, experience, limits.long_text)?;
    check_len(fields::EXPECTATIONS, expectations, limits.long_text)?;
    check_len(fields::REFERRAL, referral, limits.long_text)?;

    let email = parse_email(email, policy)?;

    Ok(Submission {
        email,
        fields: RegistrationFields {
            name: name.to_string(),
            mobile: mobile.to_string(),
            roll_number: roll_number.to_string(),
            department: department.to_string(),
            year: year.to_string(),
            interests: interests.into_iter().map(str::to_string).collect(),
            experience: experience.to_string(),
            expectations: expectations.to_string(),
            referral: referral.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::{validate_recruitment, validate_registration};
    use crate::error::ValidationError;
    use crate::rules::policy::{FieldLimits, SubmissionPolicy};
    use serde_json::{json, Value};

    fn recruitment_policy() -> SubmissionPolicy {
        SubmissionPolicy::allow_domains(["sreenidhi.edu.in", "shu.edu.in"]).expect("policy")
    }

    fn recruitment_payload() -> Value {
        json!({
            "name": "Asha Rao",
            "email": "Asha.Rao@Sreenidhi.edu.in",
            "mobile": "9999999999",
            "passingOutYear": "2026"
        })
    }

    fn registration_payload() -> Value {
        json!({
            "name": "Ada Lovelace",
            "email": "Ada@Example.com",
            "mobile": "9876543210",
            "rollNumber": "22311a0501",
            "department": "CSE",
            "year": "2",
            "interests": ["Cloud", "DevOps"],
            "experience": "Beginner",
            "expectations": "Hands-on workshops",
            "referral": "Friend"
        })
    }

    fn recruitment(payload: &Value) -> Result<crate::RecruitmentSubmission, ValidationError> {
        validate_recruitment(payload, &FieldLimits::default(), &recruitment_policy())
    }

    fn registration(payload: &Value) -> Result<crate::RegistrationSubmission, ValidationError> {
        validate_registration(
            payload,
            &FieldLimits::default(),
            &SubmissionPolicy::any_domain(),
        )
    }

    fn email_of_len(len: usize) -> String {
        let domain = "@example.com";
        format!("{}{}", "a".repeat(len - domain.len()), domain)
    }

    #[test]
    fn recruitment_accepts_valid_payload_and_normalizes_email() {
        let submission = recruitment(&recruitment_payload()).expect("accepted");
        assert_eq!(submission.email.as_submitted(), "Asha.Rao@Sreenidhi.edu.in");
        assert_eq!(submission.email.normalized(), "asha.rao@sreenidhi.edu.in");
        assert_eq!(submission.fields.name, "Asha Rao");
        assert_eq!(submission.fields.passing_out_year, "2026");
    }

    #[test]
    fn recruitment_rejects_operator_object_in_email() {
        let mut payload = recruitment_payload();
        payload["email"] = json!({ "$gt": "" });
        assert_eq!(
            recruitment(&payload).unwrap_err(),
            ValidationError::InvalidType("email")
        );
    }

    #[test]
    fn recruitment_rejects_non_text_values_without_coercion() {
        for value in [json!(["a@b.in"]), json!(2026), json!(true), json!({})] {
            let mut payload = recruitment_payload();
            payload["passingOutYear"] = value;
            assert_eq!(
                recruitment(&payload).unwrap_err(),
                ValidationError::InvalidType("passingOutYear")
            );
        }
    }

    #[test]
    fn recruitment_rejects_missing_null_and_blank_fields() {
        let mut payload = recruitment_payload();
        payload.as_object_mut().unwrap().remove("mobile");
        assert_eq!(
            recruitment(&payload).unwrap_err(),
            ValidationError::Missing("mobile")
        );

        let mut payload = recruitment_payload();
        payload["name"] = Value::Null;
        assert_eq!(
            recruitment(&payload).unwrap_err(),
            ValidationError::Missing("name")
        );

        let mut payload = recruitment_payload();
        payload["name"] = json!("   ");
        assert_eq!(
            recruitment(&payload).unwrap_err(),
            ValidationError::Missing("name")
        );
    }

    #[test]
    fn recruitment_reports_first_failing_field_in_order() {
        let payload = json!({ "email": { "$ne": null } });
        assert_eq!(
            recruitment(&payload).unwrap_err(),
            ValidationError::Missing("name")
        );
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert_eq!(
            recruitment(&json!(["name"])).unwrap_err(),
            ValidationError::NotAnObject
        );
        assert_eq!(
            registration(&json!("text")).unwrap_err(),
            ValidationError::NotAnObject
        );
    }

    #[test]
    fn email_length_boundary_is_254() {
        let mut payload = registration_payload();
        payload["email"] = json!(email_of_len(254));
        assert!(registration(&payload).is_ok());

        payload["email"] = json!(email_of_len(255));
        assert_eq!(
            registration(&payload).unwrap_err(),
            ValidationError::TooLong("email")
        );
    }

    #[test]
    fn length_is_checked_before_format() {
        let mut payload = recruitment_payload();
        payload["email"] = json!("x".repeat(300));
        assert_eq!(
            recruitment(&payload).unwrap_err(),
            ValidationError::TooLong("email")
        );
    }

    #[test]
    fn name_and_mobile_limits_apply() {
        let mut payload = recruitment_payload();
        payload["name"] = json!("n".repeat(201));
        assert_eq!(
            recruitment(&payload).unwrap_err(),
            ValidationError::TooLong("name")
        );

        let mut payload = recruitment_payload();
        payload["mobile"] = json!("9".repeat(51));
        assert_eq!(
            recruitment(&payload).unwrap_err(),
            ValidationError::TooLong("mobile")
        );
    }

    #[test]
    fn recruitment_rejects_malformed_email() {
        let mut payload = recruitment_payload();
        payload["email"] = json!("asha.rao@sreenidhi");
        assert_eq!(
            recruitment(&payload).unwrap_err(),
            ValidationError::InvalidEmail
        );
    }

    #[test]
    fn recruitment_applies_domain_allow_list() {
        let mut payload = recruitment_payload();
        payload["email"] = json!("a.student@dept.sreenidhi.edu.in");
        assert!(recruitment(&payload).is_ok());

        payload["email"] = json!("a@sreenidhi.edu.in.evil.com");
        assert_eq!(
            recruitment(&payload).unwrap_err(),
            ValidationError::DomainNotAllowed
        );

        payload["email"] = json!("a@gmail.com");
        assert_eq!(
            recruitment(&payload).unwrap_err(),
            ValidationError::DomainNotAllowed
        );
    }

    #[test]
    fn registration_accepts_any_domain_by_default() {
        let submission = registration(&registration_payload()).expect("accepted");
        assert_eq!(submission.email.normalized(), "ada@example.com");
        assert_eq!(submission.fields.interests, vec!["Cloud", "DevOps"]);
        assert_eq!(submission.fields.roll_number, "22311a0501");
    }

    #[test]
    fn registration_can_be_restricted_by_policy() {
        let err = validate_registration(
            &registration_payload(),
            &FieldLimits::default(),
            &recruitment_policy(),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::DomainNotAllowed);
    }

    #[test]
    fn registration_requires_non_empty_interests() {
        let mut payload = registration_payload();
        payload["interests"] = json!([]);
        assert_eq!(
            registration(&payload).unwrap_err(),
            ValidationError::Missing("interests")
        );
    }

    #[test]
    fn registration_rejects_non_text_interests() {
        let mut payload = registration_payload();
        payload["interests"] = json!("Cloud");
        assert_eq!(
            registration(&payload).unwrap_err(),
            ValidationError::InvalidList("interests")
        );

        payload["interests"] = json!(["Cloud", { "$where": "1" }]);
        assert_eq!(
            registration(&payload).unwrap_err(),
            ValidationError::InvalidList("interests")
        );
    }

    #[test]
    fn registration_bounds_interest_count() {
        let mut payload = registration_payload();
        let many: Vec<String> = (0..21).map(|i| format!("topic-{i}")).collect();
        payload["interests"] = json!(many);
        assert_eq!(
            registration(&payload).unwrap_err(),
            ValidationError::TooManyItems("interests")
        );
    }

    #[test]
    fn registration_checks_roll_number_length() {
        let mut payload = registration_payload();
        payload["rollNumber"] = json!("r".repeat(51));
        assert_eq!(
            registration(&payload).unwrap_err(),
            ValidationError::TooLong("rollNumber")
        );
    }

    #[test]
    fn registration_type_checks_every_text_field() {
        for field in ["department", "year", "experience", "expectations", "referral"] {
            let mut payload = registration_payload();
            payload[field] = json!({ "$ne": "" });
            assert_eq!(
                registration(&payload).unwrap_err(),
                ValidationError::InvalidType(field),
                "field {field}"
            );
        }
    }

    #[test]
    fn validation_error_codes_are_stable() {
        assert_eq!(ValidationError::Missing("email").code(), "missing_field");
        assert_eq!(ValidationError::InvalidList("interests").code(), "invalid_type");
        assert_eq!(ValidationError::DomainNotAllowed.code(), "domain_not_allowed");
        assert_eq!(
            ValidationError::TooLong("email").to_string(),
            "field exceeds maximum length: email"
        );
    }
}
