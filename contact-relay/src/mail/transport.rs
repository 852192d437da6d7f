//! SMTP provider configurations and the lettre transport built from them.

use std::fmt;

use lettre::transport::smtp::{
    authentication::Credentials,
    client::{Tls, TlsParameters},
};
use lettre::{AsyncSmtpTransport, Tokio1Executor};

use crate::error::MailError;

pub const GMAIL_HOST: &str = "smtp.gmail.com";
pub const SENDGRID_HOST: &str = "smtp.sendgrid.net";
pub const RESEND_HOST: &str = "smtp.resend.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    /// TLS from the first byte (port 465 style).
    ImplicitTls,
    /// Plain connection upgraded with STARTTLS; the upgrade is mandatory.
    StartTls,
    /// STARTTLS when the server offers it, plain otherwise.
    Opportunistic,
}

/// Username/password pair for SMTP AUTH.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpAuth {
    pub user: String,
    pub pass: String,
}

impl SmtpAuth {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }
}

impl fmt::Debug for SmtpAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpAuth")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// One variant per supported mail provider, selected by `EMAIL_SERVICE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    Gmail {
        auth: SmtpAuth,
    },
    SendGrid {
        api_key: Secret,
    },
    Resend {
        api_key: Secret,
    },
    Custom {
        host: String,
        port: u16,
        secure: bool,
        auth: Option<SmtpAuth>,
    },
}

/// A string that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl TransportConfig {
    /// Provider name as used in `EMAIL_SERVICE` and log fields.
    pub fn provider(&self) -> &'static str {
        match self {
            TransportConfig::Gmail { .. } => "gmail",
            TransportConfig::SendGrid { .. } => "sendgrid",
            TransportConfig::Resend { .. } => "resend",
            TransportConfig::Custom { .. } => "custom",
        }
    }

    pub fn host(&self) -> &str {
        match self {
            TransportConfig::Gmail { .. } => GMAIL_HOST,
            TransportConfig::SendGrid { .. } => SENDGRID_HOST,
            TransportConfig::Resend { .. } => RESEND_HOST,
            TransportConfig::Custom { host, .. } => host.as_str(),
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            TransportConfig::Gmail { .. } => 465,
            TransportConfig::SendGrid { .. } => 587,
            TransportConfig::Resend { .. } => 465,
            TransportConfig::Custom { port, .. } => *port,
        }
    }

    pub fn security(&self) -> Security {
        match self {
            TransportConfig::Gmail { .. } | TransportConfig::Resend { .. } => Security::ImplicitTls,
            TransportConfig::SendGrid { .. } => Security::StartTls,
            TransportConfig::Custom { secure: true, .. } => Security::ImplicitTls,
            TransportConfig::Custom { secure: false, .. } => Security::Opportunistic,
        }
    }

    /// SMTP AUTH username and password, if the provider uses them.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match self {
            TransportConfig::Gmail { auth } => Some((auth.user.as_str(), auth.pass.as_str())),
            TransportConfig::SendGrid { api_key } => Some(("apikey", api_key.expose())),
            TransportConfig::Resend { api_key } => Some(("resend", api_key.expose())),
            TransportConfig::Custom { auth, .. } => {
                auth.as_ref().map(|a| (a.user.as_str(), a.pass.as_str()))
            }
        }
    }

    /// Build the async lettre transport for this provider.
    ///
    /// No connection is opened here; lettre connects lazily on first send.
    pub fn build(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let host = self.host();
        let params = TlsParameters::new(host.to_string())
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let tls = match self.security() {
            Security::ImplicitTls => Tls::Wrapper(params),
            Security::StartTls => Tls::Required(params),
            Security::Opportunistic => Tls::Opportunistic(params),
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(self.port())
            .tls(tls);

        if let Some((user, pass)) = self.credentials() {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        Ok(builder.build())
    }
}
