use intake_core::domain::{EmailAddress, RecruitmentFields, RecruitmentSubmission, Submission};
use intake_store::Store;

const SOURCE: &str = "Recruitment Page";

fn candidate(email: &str, name: &str, mobile: &str) -> RecruitmentSubmission {
    Submission {
        email: EmailAddress::parse(email).expect("valid email"),
        fields: RecruitmentFields {
            name: name.to_string(),
            mobile: mobile.to_string(),
            passing_out_year: "2026".to_string(),
        },
    }
}

fn open_store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

#[test]
fn upsert_stores_normalized_email() {
    let store = open_store();
    let now = 1_700_000_000;

    let record = store
        .recruitment()
        .upsert(
            now,
            SOURCE,
            &candidate("Asha.Rao@Sreenidhi.edu.in", "Asha Rao", "9999999999"),
        )
        .expect("upsert");

    assert_eq!(record.email, "asha.rao@sreenidhi.edu.in");
    assert_eq!(record.source, SOURCE);
    assert_eq!(record.created_at, now);
    assert_eq!(record.updated_at, now);

    let found = store
        .recruitment()
        .get_by_email("  ASHA.RAO@sreenidhi.edu.in ")
        .expect("get")
        .expect("record");
    assert_eq!(found, record);
}

#[test]
fn resubmission_updates_in_place() {
    let store = open_store();
    let now = 1_700_000_000;

    let first = store
        .recruitment()
        .upsert(
            now,
            SOURCE,
            &candidate("asha.rao@sreenidhi.edu.in", "Asha", "1111111111"),
        )
        .expect("first upsert");
    let second = store
        .recruitment()
        .upsert(
            now + 60,
            SOURCE,
            &candidate("Asha.Rao@SREENIDHI.edu.in", "Asha Rao", "2222222222"),
        )
        .expect("second upsert");

    assert_eq!(store.recruitment().count().expect("count"), 1);
    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, now);
    assert_eq!(second.updated_at, now + 60);

    let stored = store
        .recruitment()
        .get_by_email("asha.rao@sreenidhi.edu.in")
        .expect("get")
        .expect("record");
    assert_eq!(stored.fields.name, "Asha Rao");
    assert_eq!(stored.fields.mobile, "2222222222");
    assert_eq!(stored.updated_at, now + 60);
}

#[test]
fn operator_shaped_lookup_matches_nothing() {
    let store = open_store();
    store
        .recruitment()
        .upsert(
            1_700_000_000,
            SOURCE,
            &candidate("a@shu.edu.in", "A", "1"),
        )
        .expect("upsert");

    assert!(store
        .recruitment()
        .get_by_email("%")
        .expect("get")
        .is_none());
    assert!(store
        .recruitment()
        .get_by_email("' OR 1=1 --")
        .expect("get")
        .is_none());
}

#[test]
fn list_returns_most_recent_first() {
    let store = open_store();
    let repo = store.recruitment();
    repo.upsert(100, SOURCE, &candidate("a@shu.edu.in", "A", "1"))
        .expect("upsert a");
    repo.upsert(200, SOURCE, &candidate("b@shu.edu.in", "B", "2"))
        .expect("upsert b");

    let records = repo.list().expect("list");
    let emails: Vec<_> = records.iter().map(|r| r.email.as_str()).collect();
    assert_eq!(emails, vec!["b@shu.edu.in", "a@shu.edu.in"]);
}

#[test]
fn non_ascii_case_variants_share_one_record() {
    let store = open_store();
    store
        .recruitment()
        .upsert(1, SOURCE, &candidate("ÄDA@Example.com", "Ada", "1"))
        .expect("first upsert");
    let second = store
        .recruitment()
        .upsert(2, SOURCE, &candidate("äda@example.com", "Ada K", "2"))
        .expect("second upsert");

    assert_eq!(second.email, "äda@example.com");
    assert_eq!(store.recruitment().count().expect("count"), 1);
    let found = store
        .recruitment()
        .get_by_email("ÄDA@EXAMPLE.COM")
        .expect("lookup")
        .expect("record");
    assert_eq!(found.fields.name, "Ada K");
}
