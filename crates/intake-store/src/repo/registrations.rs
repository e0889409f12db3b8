use crate::error::Result;
use crate::repo::parse_record_id;
use intake_core::domain::{
    normalize_email, RecordId, RegistrationFields, RegistrationSubmission,
};
use intake_core::StoredRecord;
use rusqlite::{params, Connection, OptionalExtension, Row};

pub type RegistrationRecord = StoredRecord<RegistrationFields>;

const SELECT_COLUMNS: &str = "SELECT id, email, name, mobile, roll_number, department, year, interests,
            experience, expectations, referral, source, created_at, updated_at
     FROM registrations";

pub struct RegistrationsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> RegistrationsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a member, or fully replace the stored fields of the member with
    /// this email. Retrying a registration converges on the latest payload.
    pub fn upsert(
        &self,
        now_utc: i64,
        source: &str,
        submission: &RegistrationSubmission,
    ) -> Result<RegistrationRecord> {
        let fields = &submission.fields;
        let email = submission.email.normalized();
        // Interests keep their submitted order.
        let interests = serde_json::to_string(&fields.interests)?;
        let (id, created_at, updated_at): (String, i64, i64) = self.conn.query_row(
            "INSERT INTO registrations
             (id, email, name, mobile, roll_number, department, year, interests,
              experience, expectations, referral, source, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)
             ON CONFLICT(email) DO UPDATE SET
               name = excluded.name,
               mobile = excluded.mobile,
               roll_number = excluded.roll_number,
               department = excluded.department,
               year = excluded.year,
               interests = excluded.interests,
               experience = excluded.experience,
               expectations = excluded.expectations,
               referral = excluded.referral,
               source = excluded.source,
               updated_at = excluded.updated_at
             RETURNING id, created_at, updated_at;",
            params![
                RecordId::new().to_string(),
                email,
                fields.name,
                fields.mobile,
                fields.roll_number,
                fields.department,
                fields.year,
                interests,
                fields.experience,
                fields.expectations,
                fields.referral,
                source,
                now_utc
            ],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(StoredRecord {
            id: parse_record_id(id)?,
            email: email.to_string(),
            source: source.to_string(),
            fields: fields.clone(),
            created_at,
            updated_at,
        })
    }

    pub fn get_by_email(&self, email: &str) -> Result<Option<RegistrationRecord>> {
        let Some(email) = normalize_email(email) else {
            return Ok(None);
        };
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE email = ?1;"),
                [email],
                read_row,
            )
            .optional()?;
        row.map(into_record).transpose()
    }

    pub fn list(&self) -> Result<Vec<RegistrationRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY updated_at DESC, email ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(into_record(read_row(row)?)?);
        }
        Ok(records)
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM registrations;", [], |row| row.get(0))?;
        Ok(count)
    }
}

struct RegistrationRow {
    id: String,
    email: String,
    name: String,
    mobile: String,
    roll_number: String,
    department: String,
    year: String,
    interests: String,
    experience: String,
    expectations: String,
    referral: String,
    source: String,
    created_at: i64,
    updated_at: i64,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RegistrationRow> {
    Ok(RegistrationRow {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        mobile: row.get(3)?,
        roll_number: row.get(4)?,
        department: row.get(5)?,
        year: row.get(6)?,
        interests: row.get(7)?,
        experience: row.get(8)?,
        expectations: row.get(9)?,
        referral: row.get(10)?,
        source: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn into_record(row: RegistrationRow) -> Result<RegistrationRecord> {
    let interests: Vec<String> = serde_json::from_str(&row.interests)?;
    Ok(StoredRecord {
        id: parse_record_id(row.id)?,
        email: row.email,
        source: row.source,
        fields: RegistrationFields {
            name: row.name,
            mobile: row.mobile,
            roll_number: row.roll_number,
            department: row.department,
            year: row.year,
            interests,
            experience: row.experience,
            expectations: row.expectations,
            referral: row.referral,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
