use std::net::IpAddr;
use std::path::PathBuf;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub cors_origins: Vec<String>,
    pub rate_limit: u32,
    pub rate_window_secs: u64,
    pub variants_file: Option<PathBuf>,
    pub default_variant: String,
    pub log_level: String,
    pub mail: Option<MailConfig>,
}

/// Where inquiries go and how they get there.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub recipient: String,
    pub from: String,
    pub provider: MailProvider,
}

#[derive(Debug, Clone)]
pub enum MailProvider {
    Smtp(SmtpConfig),
    Resend(ResendConfig),
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub tls_mode: TlsMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TlsMode {
    StartTls,
    Tls,
    None,
}

#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: String,
    pub api_base: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("CONTACT_RELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RELAY_HOST: {e}"))?;

        let port: u16 = env_or("CONTACT_RELAY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RELAY_PORT: {e}"))?;

        let max_body_size: usize = env_or("CONTACT_RELAY_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RELAY_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = split_list(&env_or("CONTACT_RELAY_TRUSTED_PROXIES", ""))
            .into_iter()
            .map(|s| {
                s.parse()
                    .map_err(|e| format!("Invalid CONTACT_RELAY_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cors_origins = split_list(&env_or("CONTACT_RELAY_CORS_ORIGINS", ""));

        let rate_limit: u32 = env_or("CONTACT_RELAY_RATE_LIMIT", "10")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RELAY_RATE_LIMIT: {e}"))?;

        let rate_window_secs: u64 = env_or("CONTACT_RELAY_RATE_WINDOW_SECS", "60")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RELAY_RATE_WINDOW_SECS: {e}"))?;

        let variants_file = std::env::var("CONTACT_RELAY_VARIANTS_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let default_variant = env_or("CONTACT_RELAY_DEFAULT_VARIANT", "protolaunch");
        let log_level = env_or("CONTACT_RELAY_LOG_LEVEL", "info");

        let mail = mail_from_env()?;

        Ok(Config {
            host,
            port,
            max_body_size,
            trusted_proxies,
            cors_origins,
            rate_limit,
            rate_window_secs,
            variants_file,
            default_variant,
            log_level,
            mail,
        })
    }
}

/// Reads the mail section. Returns `Ok(None)` when no provider is configured at
/// all; a half-configured provider is an error.
fn mail_from_env() -> Result<Option<MailConfig>, String> {
    let resend_key = std::env::var("RESEND_API_KEY").ok().filter(|s| !s.is_empty());
    let smtp_host = std::env::var("CONTACT_RELAY_SMTP_HOST").ok().filter(|s| !s.is_empty());

    let provider = match (resend_key, smtp_host) {
        (Some(api_key), _) => MailProvider::Resend(ResendConfig {
            api_key,
            api_base: env_or("RESEND_API_BASE", "https://api.resend.com"),
        }),
        (None, Some(host)) => {
            let port = env_or("CONTACT_RELAY_SMTP_PORT", "587")
                .parse()
                .map_err(|e| format!("Invalid CONTACT_RELAY_SMTP_PORT: {e}"))?;
            let tls_mode = match env_or("CONTACT_RELAY_SMTP_TLS", "starttls").as_str() {
                "tls" => TlsMode::Tls,
                "none" => TlsMode::None,
                "starttls" => TlsMode::StartTls,
                other => return Err(format!("Invalid CONTACT_RELAY_SMTP_TLS: {other}")),
            };
            MailProvider::Smtp(SmtpConfig {
                host,
                port,
                user: env_required("CONTACT_RELAY_SMTP_USER")?,
                pass: env_required("CONTACT_RELAY_SMTP_PASS")?,
                tls_mode,
            })
        }
        (None, None) => return Ok(None),
    };

    Ok(Some(MailConfig {
        recipient: env_required("CONTACT_RELAY_RECIPIENT")?,
        from: env_required("CONTACT_RELAY_FROM")?,
        provider,
    }))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
