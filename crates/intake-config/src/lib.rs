use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use intake_core::rules::{FieldLimits, SubmissionPolicy};
use intake_core::SubmissionKind;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "intake";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_KEY_ENV: &str = "INTAKE_API_KEY";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_STORE_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_NOTIFY_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_SENDER_NAME: &str = "Cloud Community Club (C³)";
pub const DEFAULT_WELCOME_SUBJECT: &str = "🎉 Welcome to Cloud Community Club (C³) Membership!";
pub const DEFAULT_RECRUITMENT_DOMAINS: [&str; 2] = ["sreenidhi.edu.in", "shu.edu.in"];
pub const DEFAULT_GMAIL_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_GMAIL_API_BASE: &str = "https://gmail.googleapis.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub limits: FieldLimits,
    pub recruitment: KindConfig,
    pub registration: KindConfig,
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub api_key_env: String,
    pub allow_unauthenticated: bool,
    pub request_timeout_seconds: u64,
    pub body_limit_bytes: usize,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
    pub busy_timeout_ms: u64,
    pub timeout_seconds: u64,
}

/// Acceptance and follow-up behaviour for one submission kind.
#[derive(Debug, Clone)]
pub struct KindConfig {
    pub policy: SubmissionPolicy,
    pub welcome_email: bool,
    pub source: String,
}

#[derive(Debug, Clone)]
pub struct NotificationsConfig {
    pub enabled: bool,
    pub backend: NotificationBackend,
    pub from: Option<String>,
    pub sender_name: String,
    pub subject: String,
    pub timeout_seconds: u64,
    pub smtp: Option<SmtpConfig>,
    pub gmail: Option<GmailConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationBackend {
    Log,
    Smtp,
    Gmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailTls {
    None,
    StartTls,
    Tls,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password_env: Option<String>,
    pub tls: EmailTls,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmailConfig {
    pub client_id_env: String,
    pub client_secret_env: String,
    pub refresh_token_env: String,
    pub token_url: String,
    pub api_base: String,
    pub timeout_seconds: Option<u64>,
}

impl AppConfig {
    pub fn kind(&self, kind: SubmissionKind) -> &KindConfig {
        match kind {
            SubmissionKind::Recruitment => &self.recruitment,
            SubmissionKind::Registration => &self.registration,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
                allow_unauthenticated: false,
                request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
                body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
                cors_origins: Vec::new(),
            },
            store: StoreConfig {
                path: None,
                busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
                timeout_seconds: DEFAULT_STORE_TIMEOUT_SECONDS,
            },
            limits: FieldLimits::default(),
            recruitment: KindConfig {
                policy: SubmissionPolicy::allow_domains(DEFAULT_RECRUITMENT_DOMAINS)
                    .expect("default recruitment domains"),
                welcome_email: false,
                source: SubmissionKind::Recruitment.default_source().to_string(),
            },
            registration: KindConfig {
                policy: SubmissionPolicy::any_domain(),
                welcome_email: true,
                source: SubmissionKind::Registration.default_source().to_string(),
            },
            notifications: NotificationsConfig {
                enabled: false,
                backend: NotificationBackend::Log,
                from: None,
                sender_name: DEFAULT_SENDER_NAME.to_string(),
                subject: DEFAULT_WELCOME_SUBJECT.to_string(),
                timeout_seconds: DEFAULT_NOTIFY_TIMEOUT_SECONDS,
                smtp: None,
                gmail: None,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid server.{field}: {message}")]
    InvalidServerField {
        field: &'static str,
        message: String,
    },
    #[error("invalid store.{field}: {message}")]
    InvalidStoreField {
        field: &'static str,
        message: String,
    },
    #[error("invalid limits: {0}")]
    InvalidLimits(intake_core::CoreError),
    #[error("invalid {kind}.allowed_domains: {source}")]
    InvalidAllowedDomains {
        kind: SubmissionKind,
        #[source]
        source: intake_core::CoreError,
    },
    #[error("invalid {kind}.source: must not be empty")]
    InvalidSource { kind: SubmissionKind },
    #[error("invalid notifications.{field}: {message}")]
    InvalidNotificationsField {
        field: &'static str,
        message: String,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server: Option<ServerFile>,
    store: Option<StoreFile>,
    limits: Option<LimitsFile>,
    recruitment: Option<KindFile>,
    registration: Option<KindFile>,
    notifications: Option<NotificationsFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    bind: Option<String>,
    api_key_env: Option<String>,
    allow_unauthenticated: Option<bool>,
    request_timeout_seconds: Option<u64>,
    body_limit_bytes: Option<usize>,
    cors_origins: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreFile {
    path: Option<PathBuf>,
    busy_timeout_ms: Option<u64>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LimitsFile {
    email: Option<usize>,
    name: Option<usize>,
    mobile: Option<usize>,
    roll_number: Option<usize>,
    short_text: Option<usize>,
    long_text: Option<usize>,
    interest: Option<usize>,
    max_interests: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct KindFile {
    allowed_domains: Option<Vec<String>>,
    welcome_email: Option<bool>,
    source: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NotificationsFile {
    enabled: Option<bool>,
    backend: Option<NotificationBackend>,
    from: Option<String>,
    sender_name: Option<String>,
    subject: Option<String>,
    timeout_seconds: Option<u64>,
    smtp: Option<SmtpFile>,
    gmail: Option<GmailFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SmtpFile {
    host: String,
    port: Option<u16>,
    username: Option<String>,
    password_env: Option<String>,
    tls: Option<EmailTls>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GmailFile {
    client_id_env: String,
    client_secret_env: String,
    refresh_token_env: String,
    token_url: Option<String>,
    api_base: Option<String>,
    timeout_seconds: Option<u64>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

pub fn parse_str(contents: &str, path: &Path) -> Result<AppConfig> {
    let parsed: ConfigFile = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    merge_config(parsed)
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(parse_str(&contents, path)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(server) = parsed.server {
        merge_server(&mut config.server, server)?;
    }
    if let Some(store) = parsed.store {
        merge_store(&mut config.store, store)?;
    }
    if let Some(limits) = parsed.limits {
        merge_limits(&mut config.limits, limits)?;
    }
    if let Some(kind) = parsed.recruitment {
        merge_kind(&mut config.recruitment, SubmissionKind::Recruitment, kind)?;
    }
    if let Some(kind) = parsed.registration {
        merge_kind(&mut config.registration, SubmissionKind::Registration, kind)?;
    }
    if let Some(notifications) = parsed.notifications {
        merge_notifications(&mut config.notifications, notifications)?;
    }
    validate_notifications(&config.notifications)?;
    validate_request_budget(&config)?;

    Ok(config)
}

/// The request deadline covers the store write and the notification attempt,
/// so both must finish strictly inside it.
fn validate_request_budget(config: &AppConfig) -> Result<()> {
    let inner = config
        .store
        .timeout_seconds
        .saturating_add(config.notifications.timeout_seconds);
    if inner >= config.server.request_timeout_seconds {
        return Err(ConfigError::InvalidServerField {
            field: "request_timeout_seconds",
            message: format!(
                "must exceed store.timeout_seconds + notifications.timeout_seconds ({inner})"
            ),
        });
    }
    Ok(())
}

fn merge_server(server: &mut ServerConfig, file: ServerFile) -> Result<()> {
    if let Some(bind) = file.bind {
        server.bind = bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidServerField {
                field: "bind",
                message: format!("expected host:port, got {bind:?}"),
            })?;
    }
    if let Some(api_key_env) = file.api_key_env {
        let api_key_env = api_key_env.trim();
        if api_key_env.is_empty() {
            return Err(ConfigError::InvalidServerField {
                field: "api_key_env",
                message: "must not be empty".to_string(),
            });
        }
        server.api_key_env = api_key_env.to_string();
    }
    if let Some(allow) = file.allow_unauthenticated {
        server.allow_unauthenticated = allow;
    }
    if let Some(seconds) = file.request_timeout_seconds {
        if seconds == 0 {
            return Err(ConfigError::InvalidServerField {
                field: "request_timeout_seconds",
                message: "must be positive".to_string(),
            });
        }
        server.request_timeout_seconds = seconds;
    }
    if let Some(bytes) = file.body_limit_bytes {
        if bytes == 0 {
            return Err(ConfigError::InvalidServerField {
                field: "body_limit_bytes",
                message: "must be positive".to_string(),
            });
        }
        server.body_limit_bytes = bytes;
    }
    if let Some(origins) = file.cors_origins {
        let mut cleaned = Vec::with_capacity(origins.len());
        for origin in origins {
            let origin = origin.trim();
            if origin.is_empty() {
                return Err(ConfigError::InvalidServerField {
                    field: "cors_origins",
                    message: "entries must not be empty".to_string(),
                });
            }
            cleaned.push(origin.to_string());
        }
        server.cors_origins = cleaned;
    }
    Ok(())
}

fn merge_store(store: &mut StoreConfig, file: StoreFile) -> Result<()> {
    if let Some(path) = file.path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidStoreField {
                field: "path",
                message: "must not be empty".to_string(),
            });
        }
        store.path = Some(path);
    }
    if let Some(ms) = file.busy_timeout_ms {
        store.busy_timeout_ms = ms;
    }
    if let Some(seconds) = file.timeout_seconds {
        if seconds == 0 {
            return Err(ConfigError::InvalidStoreField {
                field: "timeout_seconds",
                message: "must be positive".to_string(),
            });
        }
        store.timeout_seconds = seconds;
    }
    Ok(())
}

fn merge_limits(limits: &mut FieldLimits, file: LimitsFile) -> Result<()> {
    let overrides = [
        (&mut limits.email, file.email),
        (&mut limits.name, file.name),
        (&mut limits.mobile, file.mobile),
        (&mut limits.roll_number, file.roll_number),
        (&mut limits.short_text, file.short_text),
        (&mut limits.long_text, file.long_text),
        (&mut limits.interest, file.interest),
        (&mut limits.max_interests, file.max_interests),
    ];
    for (slot, value) in overrides {
        if let Some(value) = value {
            *slot = value;
        }
    }
    limits.validate().map_err(ConfigError::InvalidLimits)
}

fn merge_kind(config: &mut KindConfig, kind: SubmissionKind, file: KindFile) -> Result<()> {
    if let Some(domains) = file.allowed_domains {
        config.policy = SubmissionPolicy::allow_domains(&domains)
            .map_err(|source| ConfigError::InvalidAllowedDomains { kind, source })?;
    }
    if let Some(welcome_email) = file.welcome_email {
        config.welcome_email = welcome_email;
    }
    if let Some(source) = file.source {
        let source = source.trim();
        if source.is_empty() {
            return Err(ConfigError::InvalidSource { kind });
        }
        config.source = source.to_string();
    }
    Ok(())
}

fn merge_notifications(config: &mut NotificationsConfig, file: NotificationsFile) -> Result<()> {
    if let Some(enabled) = file.enabled {
        config.enabled = enabled;
    }
    if let Some(backend) = file.backend {
        config.backend = backend;
    }
    if let Some(from) = file.from {
        config.from = Some(from.trim().to_string());
    }
    if let Some(sender_name) = file.sender_name {
        config.sender_name = sender_name.trim().to_string();
    }
    if let Some(subject) = file.subject {
        if subject.trim().is_empty() {
            return Err(ConfigError::InvalidNotificationsField {
                field: "subject",
                message: "must not be empty".to_string(),
            });
        }
        config.subject = subject;
    }
    if let Some(seconds) = file.timeout_seconds {
        if seconds == 0 {
            return Err(ConfigError::InvalidNotificationsField {
                field: "timeout_seconds",
                message: "must be positive".to_string(),
            });
        }
        config.timeout_seconds = seconds;
    }
    if let Some(smtp) = file.smtp {
        config.smtp = Some(SmtpConfig {
            host: smtp.host.trim().to_string(),
            port: smtp.port,
            username: smtp.username,
            password_env: smtp.password_env,
            tls: smtp.tls.unwrap_or(EmailTls::StartTls),
            timeout_seconds: smtp.timeout_seconds,
        });
    }
    if let Some(gmail) = file.gmail {
        config.gmail = Some(GmailConfig {
            client_id_env: gmail.client_id_env,
            client_secret_env: gmail.client_secret_env,
            refresh_token_env: gmail.refresh_token_env,
            token_url: gmail
                .token_url
                .unwrap_or_else(|| DEFAULT_GMAIL_TOKEN_URL.to_string()),
            api_base: gmail
                .api_base
                .unwrap_or_else(|| DEFAULT_GMAIL_API_BASE.to_string()),
            timeout_seconds: gmail.timeout_seconds,
        });
    }
    Ok(())
}

fn validate_notifications(config: &NotificationsConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let from = config.from.as_deref().unwrap_or_default();
    if from.is_empty() {
        return Err(ConfigError::InvalidNotificationsField {
            field: "from",
            message: "required when notifications are enabled".to_string(),
        });
    }
    from.parse::<lettre::Address>()
        .map_err(|_| ConfigError::InvalidNotificationsField {
            field: "from",
            message: "must be a valid email address".to_string(),
        })?;

    match config.backend {
        NotificationBackend::Smtp => {
            let smtp = config
                .smtp
                .as_ref()
                .ok_or(ConfigError::InvalidNotificationsField {
                    field: "smtp",
                    message: "section required for the smtp backend".to_string(),
                })?;
            if smtp.host.is_empty() {
                return Err(ConfigError::InvalidNotificationsField {
                    field: "smtp.host",
                    message: "must not be empty".to_string(),
                });
            }
            if smtp.username.is_some() != smtp.password_env.is_some() {
                return Err(ConfigError::InvalidNotificationsField {
                    field: "smtp.password_env",
                    message: "username and password_env must be set together".to_string(),
                });
            }
        }
        NotificationBackend::Gmail => {
            let gmail = config
                .gmail
                .as_ref()
                .ok_or(ConfigError::InvalidNotificationsField {
                    field: "gmail",
                    message: "section required for the gmail backend".to_string(),
                })?;
            for (field, value) in [
                ("gmail.client_id_env", &gmail.client_id_env),
                ("gmail.client_secret_env", &gmail.client_secret_env),
                ("gmail.refresh_token_env", &gmail.refresh_token_env),
                ("gmail.token_url", &gmail.token_url),
                ("gmail.api_base", &gmail.api_base),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidNotificationsField {
                        field,
                        message: "must not be empty".to_string(),
                    });
                }
            }
        }
        NotificationBackend::Log => {}
    }
    Ok(())
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
