use anyhow::{Context as _, Result};
use intake_config::AppConfig;
use intake_store::{paths, Store};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

pub mod check_config;
pub mod export;
pub mod serve;

pub struct Context<'a> {
    pub config: &'a AppConfig,
    pub config_path: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
}

impl Context<'_> {
    /// `--db-path` wins over `store.path`.
    pub fn resolve_db_path(&self) -> Result<PathBuf> {
        let custom = self
            .db_path
            .clone()
            .or_else(|| self.config.store.path.clone());
        let path = paths::resolve_db_path(custom).with_context(|| "resolve database path")?;
        debug!(path = %path.display(), "database path resolved");
        Ok(path)
    }

    pub fn open_store(&self) -> Result<Store> {
        let db_path = self.resolve_db_path()?;
        let busy_timeout = Duration::from_millis(self.config.store.busy_timeout_ms);
        let store = Store::open(&db_path, busy_timeout)
            .with_context(|| format!("open database {}", db_path.display()))?;
        store.migrate().with_context(|| "run migrations")?;
        Ok(store)
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
