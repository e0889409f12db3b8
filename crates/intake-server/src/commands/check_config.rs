use anyhow::Result;
use intake_config::{resolve_config_path, KindConfig, NotificationBackend};
use intake_core::SubmissionKind;
use serde::Serialize;
use std::env;

use super::{print_json, Context};

#[derive(Debug, Serialize)]
struct ConfigSummary {
    config_path: Option<String>,
    bind: String,
    api_key_env: String,
    api_key_present: bool,
    allow_unauthenticated: bool,
    db_path: String,
    kinds: Vec<KindSummary>,
    notifications: NotificationsSummary,
}

#[derive(Debug, Serialize)]
struct KindSummary {
    kind: SubmissionKind,
    source: String,
    allowed_domains: Vec<String>,
    welcome_email: bool,
}

#[derive(Debug, Serialize)]
struct NotificationsSummary {
    enabled: bool,
    backend: &'static str,
    from: Option<String>,
}

pub fn check_config(ctx: &Context<'_>) -> Result<()> {
    let config = ctx.config;
    let config_path = resolve_config_path(ctx.config_path.clone())
        .ok()
        .filter(|path| path.exists())
        .map(|path| path.display().to_string());
    let api_key_present = env::var(&config.server.api_key_env)
        .map(|value| !value.trim().is_empty())
        .unwrap_or(false);

    let summary = ConfigSummary {
        config_path,
        bind: config.server.bind.to_string(),
        api_key_env: config.server.api_key_env.clone(),
        api_key_present,
        allow_unauthenticated: config.server.allow_unauthenticated,
        db_path: ctx.resolve_db_path()?.display().to_string(),
        kinds: SubmissionKind::ALL
            .iter()
            .map(|kind| kind_summary(*kind, config.kind(*kind)))
            .collect(),
        notifications: NotificationsSummary {
            enabled: config.notifications.enabled,
            backend: match config.notifications.backend {
                NotificationBackend::Log => "log",
                NotificationBackend::Smtp => "smtp",
                NotificationBackend::Gmail => "gmail",
            },
            from: config.notifications.from.clone(),
        },
    };
    print_json(&summary)
}

fn kind_summary(kind: SubmissionKind, config: &KindConfig) -> KindSummary {
    KindSummary {
        kind,
        source: config.source.clone(),
        allowed_domains: config.policy.allowed_domains().to_vec(),
        welcome_email: config.welcome_email,
    }
}
