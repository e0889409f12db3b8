use anyhow::{Context as _, Result};
use clap::Args;
use intake_core::{normalize_email, SubmissionKind};

use super::{print_json, Context};
use crate::exit::{invalid_input, not_found};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// recruitment or registration
    #[arg(long)]
    pub kind: SubmissionKind,
    /// Export only the record stored under this email
    #[arg(long)]
    pub email: Option<String>,
}

pub fn export(ctx: &Context<'_>, args: ExportArgs) -> Result<()> {
    let store = ctx.open_store()?;

    if let Some(email) = args.email.as_deref() {
        if normalize_email(email).is_none() {
            return Err(invalid_input("email cannot be empty"));
        }
        return match args.kind {
            SubmissionKind::Recruitment => {
                let record = store
                    .recruitment()
                    .get_by_email(email)
                    .with_context(|| "load recruitment record")?
                    .ok_or_else(|| not_found(format!("no recruitment record for {email}")))?;
                print_json(&record)
            }
            SubmissionKind::Registration => {
                let record = store
                    .registrations()
                    .get_by_email(email)
                    .with_context(|| "load registration record")?
                    .ok_or_else(|| not_found(format!("no registration record for {email}")))?;
                print_json(&record)
            }
        };
    }

    match args.kind {
        SubmissionKind::Recruitment => {
            let records = store
                .recruitment()
                .list()
                .with_context(|| "list recruitment records")?;
            print_json(&records)
        }
        SubmissionKind::Registration => {
            let records = store
                .registrations()
                .list()
                .with_context(|| "list registration records")?;
            print_json(&records)
        }
    }
}
