//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup, after the binary has merged any `.env`
//! file into the process environment. Empty variables count as unset, so
//! `EMAIL_FROM=` in a `.env` file falls back the same way a missing variable
//! does.

use std::env;
use std::time::Duration;

use lettre::message::Mailbox;
use tracing::warn;

use crate::error::ConfigError;
use crate::mail::{parse_mailbox, Secret, SmtpAuth, TransportConfig};
use crate::mail::transport::DEFAULT_SMTP_PORT;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Deployment environment name (`NODE_ENV`), only reported in logs
    pub environment: String,

    /// SMTP provider and credentials
    pub transport: TransportConfig,

    /// Sender of every outbound message
    pub email_from: Mailbox,

    /// Mailbox that receives contact submissions
    pub email_to: Mailbox,

    /// Whether to send a thank-you message back to the submitter
    pub send_confirmation: bool,

    /// Name used to sign the thank-you message
    pub owner_name: Option<String>,

    /// Maximum contact requests per client within `rate_limit_window`
    pub rate_limit_max: usize,

    /// Sliding window for the contact rate limit
    pub rate_limit_window: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let transport = transport_from_lookup(&var)?;

        let email_from = var("EMAIL_FROM")
            .or_else(|| var("EMAIL_USER"))
            .ok_or(ConfigError::Missing("EMAIL_FROM"))
            .and_then(|v| mailbox("EMAIL_FROM", &v))?;

        let email_to = var("EMAIL_TO")
            .or_else(|| var("EMAIL_USER"))
            .ok_or(ConfigError::Missing("EMAIL_TO"))
            .and_then(|v| mailbox("EMAIL_TO", &v))?;

        Ok(Config {
            port: parse_or("PORT", var("PORT"), 3000),

            environment: var("NODE_ENV").unwrap_or_else(|| "development".to_string()),

            transport,

            email_from,

            email_to,

            send_confirmation: var("SEND_CONFIRMATION").as_deref() == Some("true"),

            owner_name: var("OWNER_NAME"),

            rate_limit_max: parse_or("CONTACT_RATE_LIMIT_MAX", var("CONTACT_RATE_LIMIT_MAX"), 5),

            rate_limit_window: Duration::from_secs(parse_or(
                "CONTACT_RATE_LIMIT_WINDOW_SECS",
                var("CONTACT_RATE_LIMIT_WINDOW_SECS"),
                15 * 60,
            )),
        })
    }
}

/// Select the SMTP provider from `EMAIL_SERVICE`.
///
/// Anything other than `gmail`, `sendgrid` or `resend` means a custom SMTP
/// server described by the `SMTP_*` variables.
fn transport_from_lookup<F>(var: &F) -> Result<TransportConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let service = var("EMAIL_SERVICE");

    match service.as_deref() {
        Some("gmail") => Ok(TransportConfig::Gmail {
            auth: SmtpAuth::new(
                var("EMAIL_USER").ok_or(ConfigError::Missing("EMAIL_USER"))?,
                var("EMAIL_PASS").ok_or(ConfigError::Missing("EMAIL_PASS"))?,
            ),
        }),
        Some("sendgrid") => Ok(TransportConfig::SendGrid {
            api_key: Secret::new(
                var("SENDGRID_API_KEY").ok_or(ConfigError::Missing("SENDGRID_API_KEY"))?,
            ),
        }),
        Some("resend") => Ok(TransportConfig::Resend {
            api_key: Secret::new(
                var("RESEND_API_KEY").ok_or(ConfigError::Missing("RESEND_API_KEY"))?,
            ),
        }),
        other => {
            if let Some(name) = other {
                warn!(email_service = %name, "Unknown EMAIL_SERVICE, using custom SMTP");
            }

            let auth = match (var("EMAIL_USER"), var("EMAIL_PASS")) {
                (Some(user), Some(pass)) => Some(SmtpAuth::new(user, pass)),
                _ => None,
            };

            Ok(TransportConfig::Custom {
                host: var("SMTP_HOST").ok_or(ConfigError::Missing("SMTP_HOST"))?,
                port: parse_or("SMTP_PORT", var("SMTP_PORT"), DEFAULT_SMTP_PORT),
                secure: var("SMTP_SECURE").as_deref() == Some("true"),
                auth,
            })
        }
    }
}

/// Parse a value, warning and falling back to `default` when it is malformed.
fn parse_or<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!(env_var = name, value = %raw, "Invalid value, using default");
                default
            }
        },
    }
}

fn mailbox(name: &'static str, raw: &str) -> Result<Mailbox, ConfigError> {
    parse_mailbox(raw).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_dotenv_file_contents() {
        let contents = "# provider\nEMAIL_SERVICE=sendgrid\nSENDGRID_API_KEY=SG.key\nEMAIL_FROM=\"Site <site@example.com>\"\nEMAIL_TO=owner@example.com\nSEND_CONFIRMATION=true\nOWNER_NAME=\n";
        let map: HashMap<String, String> = dotenvy::from_read_iter(contents.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();

        let config = Config::from_lookup(|key| map.get(key).cloned()).unwrap();

        assert_eq!(config.transport.provider(), "sendgrid");
        assert_eq!(config.email_from.to_string(), "Site <site@example.com>");
        assert_eq!(config.email_to.email.to_string(), "owner@example.com");
        assert!(config.send_confirmation);
        assert_eq!(config.owner_name, None);
    }

    #[test]
    fn test_custom_defaults() {
        let config = load(&[
            ("SMTP_HOST", "mail.example.com"),
            ("EMAIL_USER", "me@example.com"),
            ("EMAIL_PASS", "pw"),
        ])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, "development");
        assert!(!config.send_confirmation);
        assert_eq!(config.rate_limit_max, 5);
        assert_eq!(config.rate_limit_window, Duration::from_secs(900));
        assert_eq!(config.email_from.email.to_string(), "me@example.com");
        assert_eq!(config.email_to.email.to_string(), "me@example.com");

        match config.transport {
            TransportConfig::Custom {
                host,
                port,
                secure,
                auth,
            } => {
                assert_eq!(host, "mail.example.com");
                assert_eq!(port, 587);
                assert!(!secure);
                assert_eq!(auth, Some(SmtpAuth::new("me@example.com", "pw")));
            }
            other => panic!("Expected custom transport, got {:?}", other),
        }
    }

    #[test]
    fn test_smtp_secure_must_be_exactly_true() {
        let base = [("SMTP_HOST", "mail.example.com"), ("EMAIL_USER", "me@example.com")];

        let config = load(&[base[0], base[1], ("SMTP_SECURE", "TRUE"), ("SMTP_PORT", "465")]).unwrap();
        assert!(matches!(
            config.transport,
            TransportConfig::Custom { secure: false, port: 465, .. }
        ));

        let config = load(&[base[0], base[1], ("SMTP_SECURE", "true")]).unwrap();
        assert!(matches!(config.transport, TransportConfig::Custom { secure: true, .. }));
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = load(&[
            ("SMTP_HOST", "mail.example.com"),
            ("EMAIL_USER", "me@example.com"),
            ("SMTP_PORT", "not-a-port"),
            ("PORT", "99999"),
        ])
        .unwrap();

        assert!(matches!(config.transport, TransportConfig::Custom { port: 587, .. }));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_provider_selection() {
        let config = load(&[
            ("EMAIL_SERVICE", "sendgrid"),
            ("SENDGRID_API_KEY", "SG.key"),
            ("EMAIL_FROM", "site@example.com"),
            ("EMAIL_TO", "owner@example.com"),
        ])
        .unwrap();
        assert_eq!(config.transport.provider(), "sendgrid");

        let config = load(&[
            ("EMAIL_SERVICE", "resend"),
            ("RESEND_API_KEY", "re_key"),
            ("EMAIL_FROM", "site@example.com"),
            ("EMAIL_TO", "owner@example.com"),
        ])
        .unwrap();
        assert_eq!(config.transport.provider(), "resend");

        let config = load(&[
            ("EMAIL_SERVICE", "gmail"),
            ("EMAIL_USER", "me@gmail.com"),
            ("EMAIL_PASS", "app-password"),
        ])
        .unwrap();
        assert_eq!(config.transport.provider(), "gmail");
        assert_eq!(config.email_to.email.to_string(), "me@gmail.com");
    }

    #[test]
    fn test_unknown_service_is_custom() {
        let config = load(&[
            ("EMAIL_SERVICE", "mailgun"),
            ("SMTP_HOST", "smtp.mailgun.org"),
            ("EMAIL_FROM", "site@example.com"),
            ("EMAIL_TO", "owner@example.com"),
        ])
        .unwrap();

        assert_eq!(config.transport.provider(), "custom");
        assert_eq!(config.transport.credentials(), None);
    }

    #[test]
    fn test_missing_provider_secret() {
        let err = load(&[("EMAIL_SERVICE", "sendgrid"), ("EMAIL_FROM", "site@example.com")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SENDGRID_API_KEY")));

        let err = load(&[("EMAIL_USER", "me@example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SMTP_HOST")));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let err = load(&[
            ("SMTP_HOST", "mail.example.com"),
            ("EMAIL_FROM", ""),
            ("EMAIL_USER", ""),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("EMAIL_FROM")));
    }

    #[test]
    fn test_invalid_address() {
        let err = load(&[
            ("SMTP_HOST", "mail.example.com"),
            ("EMAIL_FROM", "site@example.com"),
            ("EMAIL_TO", "nobody"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "EMAIL_TO", .. }));
    }

    #[test]
    fn test_confirmation_and_rate_limit_overrides() {
        let config = load(&[
            ("SMTP_HOST", "mail.example.com"),
            ("EMAIL_USER", "me@example.com"),
            ("SEND_CONFIRMATION", "true"),
            ("OWNER_NAME", "Sahanya"),
            ("CONTACT_RATE_LIMIT_MAX", "10"),
            ("CONTACT_RATE_LIMIT_WINDOW_SECS", "60"),
            ("NODE_ENV", "production"),
        ])
        .unwrap();

        assert!(config.send_confirmation);
        assert_eq!(config.owner_name.as_deref(), Some("Sahanya"));
        assert_eq!(config.rate_limit_max, 10);
        assert_eq!(config.rate_limit_window, Duration::from_secs(60));
        assert_eq!(config.environment, "production");
    }
}
