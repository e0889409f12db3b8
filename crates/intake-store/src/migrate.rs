use crate::error::{Result, StoreError};
use rusqlite::{Connection, OptionalExtension};

const SCHEMA_TABLE: &str = "intake_schema";

/// Embedded migrations, applied in order. The schema version is the count applied.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_init.sql",
    include_str!("../migrations/001_init.sql"),
)];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {SCHEMA_TABLE} (version INTEGER NOT NULL);"
    ))?;
    let current = match read_version(&tx)? {
        Some(version) => version,
        None => {
            tx.execute(&format!("INSERT INTO {SCHEMA_TABLE} (version) VALUES (0);"), [])?;
            0
        }
    };

    let available = MIGRATIONS.len() as i64;
    if current > available {
        return Err(StoreError::Migration(format!(
            "db version {current} newer than available migrations {available}"
        )));
    }

    for (version, (name, sql)) in (1_i64..).zip(MIGRATIONS.iter()) {
        if version <= current {
            continue;
        }
        tx.execute_batch(sql)
            .map_err(|err| StoreError::Migration(format!("{name}: {err}")))?;
        let updated = tx.execute(
            &format!("UPDATE {SCHEMA_TABLE} SET version = ?1;"),
            [version],
        )?;
        if updated != 1 {
            return Err(StoreError::Migration(format!(
                "expected single schema row, updated {updated}"
            )));
        }
    }

    tx.commit()?;
    Ok(())
}

/// Zero for a database that has never been migrated.
pub fn schema_version(conn: &Connection) -> Result<i64> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [SCHEMA_TABLE],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(0);
    }
    Ok(read_version(conn)?.unwrap_or(0))
}

fn read_version(conn: &Connection) -> Result<Option<i64>> {
    let version = conn
        .query_row(
            &format!("SELECT version FROM {SCHEMA_TABLE} LIMIT 1;"),
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(version)
}
