use crate::error::Result;
use crate::repo::parse_record_id;
use intake_core::domain::{normalize_email, RecordId, RecruitmentFields, RecruitmentSubmission};
use intake_core::StoredRecord;
use rusqlite::{params, Connection, OptionalExtension, Row};

pub type RecruitmentRecord = StoredRecord<RecruitmentFields>;

const SELECT_COLUMNS: &str = "SELECT id, email, name, mobile, passing_out_year, source, created_at, updated_at
     FROM recruitment_candidates";

pub struct RecruitmentRepo<'a> {
    conn: &'a Connection,
}

impl<'a> RecruitmentRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a candidate, or replace every mutable field of the row that
    /// already holds this email. A single statement, so concurrent writers
    /// for the same email cannot both insert.
    pub fn upsert(
        &self,
        now_utc: i64,
        source: &str,
        submission: &RecruitmentSubmission,
    ) -> Result<RecruitmentRecord> {
        let fields = &submission.fields;
        let email = submission.email.normalized();
        let (id, created_at, updated_at): (String, i64, i64) = self.conn.query_row(
            "INSERT INTO recruitment_candidates
             (id, email, name, mobile, passing_out_year, source, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             ON CONFLICT(email) DO UPDATE SET
               name = excluded.name,
               mobile = excluded.mobile,
               passing_out_year = excluded.passing_out_year,
               source = excluded.source,
               updated_at = excluded.updated_at
             RETURNING id, created_at, updated_at;",
            params![
                RecordId::new().to_string(),
                email,
                fields.name,
                fields.mobile,
                fields.passing_out_year,
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

    pub fn get_by_email(&self, email: &str) -> Result<Option<RecruitmentRecord>> {
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

    pub fn list(&self) -> Result<Vec<RecruitmentRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY updated_at DESC, email ASC;"))?;
        let rows = stmt.query_map([], read_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(into_record(row?)?);
        }
        Ok(records)
    }

    pub fn count(&self) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM recruitment_candidates;",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

struct RecruitmentRow {
    id: String,
    email: String,
    name: String,
    mobile: String,
    passing_out_year: String,
    source: String,
    created_at: i64,
    updated_at: i64,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RecruitmentRow> {
    Ok(RecruitmentRow {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        mobile: row.get(3)?,
        passing_out_year: row.get(4)?,
        source: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn into_record(row: RecruitmentRow) -> Result<RecruitmentRecord> {
    Ok(StoredRecord {
        id: parse_record_id(row.id)?,
        email: row.email,
        source: row.source,
        fields: RecruitmentFields {
            name: row.name,
            mobile: row.mobile,
            passing_out_year: row.passing_out_year,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
