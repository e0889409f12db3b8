mod support;

use intake_server::{IntakeError, NotifyOutcome};
use intake_core::ValidationError;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use support::{
    intake, notifier, open_recruitment, BrokenStore, CountingStore, FailingMailer,
    RecordingMailer,
};

fn registration_payload(email: &str, department: &str) -> Value {
    json!({
        "name": "Meera Iyer",
        "email": email,
        "mobile": "9876543210",
        "rollNumber": "22311a0571",
        "department": department,
        "year": "3",
        "interests": ["Cloud", "DevOps"],
        "experience": "AWS workshop",
        "expectations": "Hands-on projects",
        "referral": "Friend"
    })
}

#[tokio::test]
async fn registration_survives_a_failing_mailer() {
    let store = CountingStore::in_memory();
    let mailer = FailingMailer::new();
    let intake = intake(store.clone(), Some(notifier(mailer.clone())));

    let accepted = intake
        .submit_registration(&registration_payload("Meera@Example.com", "CSE"))
        .await
        .expect("accepted");

    assert_eq!(accepted.notify, NotifyOutcome::Failed);
    assert_eq!(mailer.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(accepted.ack.email, "Meera@Example.com");
    assert_eq!(accepted.ack.department, "CSE");

    let stored = store.registration("meera@example.com").expect("stored");
    assert_eq!(stored.fields.name, "Meera Iyer");
    assert_eq!(stored.fields.interests, vec!["Cloud", "DevOps"]);
    assert_eq!(stored.source, "Registration Form");
}

#[tokio::test]
async fn failing_and_working_mailers_store_identical_records() {
    let failing_store = CountingStore::in_memory();
    let working_store = CountingStore::in_memory();
    let payload = registration_payload("same@example.com", "IT");

    intake(failing_store.clone(), Some(notifier(FailingMailer::new())))
        .submit_registration(&payload)
        .await
        .expect("accepted with failing mailer");
    intake(
        working_store.clone(),
        Some(notifier(Arc::new(RecordingMailer::default()))),
    )
    .submit_registration(&payload)
    .await
    .expect("accepted with working mailer");

    let a = failing_store.registration("same@example.com").expect("stored");
    let b = working_store.registration("same@example.com").expect("stored");
    assert_eq!(a.email, b.email);
    assert_eq!(a.source, b.source);
    assert_eq!(a.fields, b.fields);
}

#[tokio::test]
async fn resubmission_replaces_the_record_and_resends() {
    let store = CountingStore::in_memory();
    let mailer = Arc::new(RecordingMailer::default());
    let intake = intake(store.clone(), Some(notifier(mailer.clone())));

    let first = intake
        .submit_registration(&registration_payload("ravi@example.com", "ECE"))
        .await
        .expect("first");
    let second = intake
        .submit_registration(&registration_payload(" RAVI@example.com ", "EEE"))
        .await
        .expect("second");

    assert_eq!(first.notify, NotifyOutcome::Sent);
    assert_eq!(second.notify, NotifyOutcome::Sent);
    assert_eq!(store.registration_count(), 1);
    assert_eq!(
        store.registration("ravi@example.com").expect("stored").fields.department,
        "EEE"
    );

    let sent = mailer.sent.lock();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].to.email.to_string(), "ravi@example.com");
    assert_eq!(sent[1].subject, "Welcome");
}

#[tokio::test]
async fn rejected_payloads_never_reach_the_store() {
    let store = CountingStore::in_memory();
    let mailer = Arc::new(RecordingMailer::default());
    let intake = intake(store.clone(), Some(notifier(mailer.clone())));

    let mut empty_interests = registration_payload("x@example.com", "CSE");
    empty_interests["interests"] = json!([]);
    let mut injected = registration_payload("x@example.com", "CSE");
    injected["email"] = json!({ "$gt": "" });

    let cases = [
        (empty_interests, ValidationError::Missing("interests")),
        (injected, ValidationError::InvalidType("email")),
        (json!(["not", "an", "object"]), ValidationError::NotAnObject),
    ];
    for (payload, expected) in cases {
        match intake.submit_registration(&payload).await {
            Err(IntakeError::Rejected(reason)) => assert_eq!(reason, expected),
            other => panic!("expected rejection, got {:?}", other.map(|a| a.ack)),
        }
    }

    assert_eq!(store.calls(), 0);
    assert_eq!(store.registration_count(), 0);
    assert!(mailer.sent.lock().is_empty());
}

#[tokio::test]
async fn storage_failure_skips_notification() {
    let mailer = Arc::new(RecordingMailer::default());
    let intake = intake(Arc::new(BrokenStore), Some(notifier(mailer.clone())));

    let err = intake
        .submit_registration(&registration_payload("x@example.com", "CSE"))
        .await
        .expect_err("storage failure");
    assert!(matches!(err, IntakeError::Storage { .. }));
    assert_eq!(err.public_message(), "An error occurred during registration");
    assert!(mailer.sent.lock().is_empty());

    let err = intake
        .submit_recruitment(&json!({
            "name": "Asha Rao",
            "email": "asha@sreenidhi.edu.in",
            "mobile": "1",
            "passingOutYear": "2026"
        }))
        .await
        .expect_err("storage failure");
    assert_eq!(
        err.public_message(),
        "An error occurred while processing your request"
    );
}

#[tokio::test]
async fn recruitment_unlock_normalizes_and_skips_mail_by_default() {
    let store = CountingStore::in_memory();
    let mailer = Arc::new(RecordingMailer::default());
    let intake = intake(store.clone(), Some(notifier(mailer.clone())));

    let accepted = intake
        .submit_recruitment(&json!({
            "name": "Asha Rao",
            "email": "Asha.Rao@Sreenidhi.edu.in",
            "mobile": "9999999999",
            "passingOutYear": "2026"
        }))
        .await
        .expect("accepted");

    assert_eq!(accepted.notify, NotifyOutcome::Skipped);
    assert_eq!(accepted.ack.email, "Asha.Rao@Sreenidhi.edu.in");
    assert!(accepted.ack.unlocked);
    let stored = store.recruitment("asha.rao@sreenidhi.edu.in").expect("stored");
    assert_eq!(stored.email, "asha.rao@sreenidhi.edu.in");
    assert_eq!(stored.fields.passing_out_year, "2026");
    assert!(mailer.sent.lock().is_empty());
}

#[tokio::test]
async fn recruitment_domain_allow_list_is_enforced() {
    let store = CountingStore::in_memory();
    let intake = intake(store.clone(), None);

    let accepted = intake
        .submit_recruitment(&json!({
            "name": "A Student",
            "email": "a.student@dept.sreenidhi.edu.in",
            "mobile": "1",
            "passingOutYear": "2027"
        }))
        .await
        .expect("subdomain accepted");
    assert_eq!(accepted.notify, NotifyOutcome::Skipped);

    let err = intake
        .submit_recruitment(&json!({
            "name": "Mallory",
            "email": "a@sreenidhi.edu.in.evil.com",
            "mobile": "1",
            "passingOutYear": "2027"
        }))
        .await
        .expect_err("look-alike rejected");
    assert!(matches!(
        err,
        IntakeError::Rejected(ValidationError::DomainNotAllowed)
    ));
    assert_eq!(store.recruitment_count(), 1);
}

#[tokio::test]
async fn recruitment_mail_is_sent_when_enabled() {
    let store = CountingStore::in_memory();
    let mailer = Arc::new(RecordingMailer::default());
    let mut recruitment = open_recruitment();
    recruitment.welcome_email = true;
    let defaults = intake_config::AppConfig::default();
    let intake = intake_server::Intake::new(
        store.clone(),
        Some(notifier(mailer.clone())),
        defaults.limits,
        recruitment,
        defaults.registration,
    );

    let accepted = intake
        .submit_recruitment(&json!({
            "name": "Dev",
            "email": "dev@gmail.com",
            "mobile": "1",
            "passingOutYear": "2025"
        }))
        .await
        .expect("accepted");
    assert_eq!(accepted.notify, NotifyOutcome::Sent);
    let sent = mailer.sent.lock();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.contains("unlocked"));
}
