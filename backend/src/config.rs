use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite:college.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SMS_API_URL: &str = "https://www.fast2sms.com/dev/bulkV2";
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 5;

/// SMS gateway settings. The channel is only wired up when an API key is
/// present in the environment.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub api_url: String,
    pub api_key: String,
}

/// SMTP relay settings, modeled after a standard submission setup
/// (STARTTLS on 587 with username/password credentials).
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
}

/// Process configuration, read once at startup from `FEE_REGISTER_*`
/// environment variables. Everything has a sensible default except the
/// notification channels, which stay disabled until configured.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// When set, the REST boundary requires `Authorization: Bearer <token>`.
    /// The domain services themselves carry no auth state.
    pub api_token: Option<String>,
    /// PDF receipt rendering is a capability toggle, not a hard dependency;
    /// the interactive receipt view works either way.
    pub pdf_enabled: bool,
    pub institution_name: String,
    /// Bounded timeout for each outbound notification attempt, so a slow
    /// provider cannot stall anything that matters.
    pub notify_timeout_secs: u64,
    pub sms: Option<SmsConfig>,
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let sms = env::var("FEE_REGISTER_SMS_API_KEY").ok().map(|api_key| SmsConfig {
            api_url: env::var("FEE_REGISTER_SMS_API_URL")
                .unwrap_or_else(|_| DEFAULT_SMS_API_URL.to_string()),
            api_key,
        });

        let smtp = env::var("FEE_REGISTER_SMTP_SERVER").ok().map(|server| SmtpConfig {
            server,
            port: env::var("FEE_REGISTER_SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            username: env::var("FEE_REGISTER_SMTP_USERNAME").unwrap_or_default(),
            password: env::var("FEE_REGISTER_SMTP_PASSWORD").unwrap_or_default(),
            from_email: env::var("FEE_REGISTER_SMTP_FROM").unwrap_or_default(),
        });

        Self {
            database_url: env::var("FEE_REGISTER_DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            bind_addr: env::var("FEE_REGISTER_BIND")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            api_token: env::var("FEE_REGISTER_API_TOKEN").ok().filter(|t| !t.is_empty()),
            pdf_enabled: env::var("FEE_REGISTER_PDF_ENABLED")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
            institution_name: env::var("FEE_REGISTER_INSTITUTION")
                .unwrap_or_else(|_| "Fee Register".to_string()),
            notify_timeout_secs: env::var("FEE_REGISTER_NOTIFY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_NOTIFY_TIMEOUT_SECS),
            sms,
            smtp,
        }
    }
}
