pub mod db;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod repo;

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let conn = db::open(path, busy_timeout)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn recruitment(&self) -> repo::RecruitmentRepo<'_> {
        repo::RecruitmentRepo::new(&self.conn)
    }

    pub fn registrations(&self) -> repo::RegistrationsRepo<'_> {
        repo::RegistrationsRepo::new(&self.conn)
    }
}
