//! Environment configuration.
//!
//! Required settings (database, Valkey, public URL) fail startup when missing. Every
//! third-party integration is optional: a provider is enabled only when its credentials
//! are present, and routes depending on a disabled provider answer 503.

use std::net::SocketAddr;

use crate::server::error::config::ConfigError;

/// Default socket address the HTTP server binds to.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

const STRIPE_API_URL: &str = "https://api.stripe.com";
const DOCUSIGN_API_URL: &str = "https://na3.docusign.net/restapi";
const PANDADOC_API_URL: &str = "https://api.pandadoc.com";
const ADOBE_SIGN_API_URL: &str = "https://api.na1.adobesign.com/api/rest/v6";
const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_API_URL: &str = "https://www.googleapis.com";
const MICROSOFT_AUTH_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/authorize";
const MICROSOFT_TOKEN_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/token";
const MICROSOFT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";
const TWILIO_API_URL: &str = "https://api.twilio.com";
const RESEND_API_URL: &str = "https://api.resend.com";

/// Application configuration loaded from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub valkey_url: String,
    /// Public base URL, used for OAuth redirects, checkout return URLs and email links
    pub app_url: String,
    pub bind_addr: SocketAddr,
    pub integrations: IntegrationConfig,
}

/// Credentials for every optional third-party integration.
#[derive(Clone, Debug, Default)]
pub struct IntegrationConfig {
    /// Recipient of operator notifications (compliance expiry, new messages)
    pub admin_email: Option<String>,
    pub stripe: Option<StripeConfig>,
    pub docusign: Option<DocusignConfig>,
    pub pandadoc: Option<PandadocConfig>,
    pub adobe_sign: Option<AdobeSignConfig>,
    pub google_drive: Option<OAuthAppConfig>,
    pub onedrive: Option<OAuthAppConfig>,
    pub twilio: Option<TwilioConfig>,
    pub resend: Option<ResendConfig>,
    pub slack_webhook_url: Option<String>,
    pub teams_webhook_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: Option<String>,
    pub api_url: String,
}

#[derive(Clone, Debug)]
pub struct DocusignConfig {
    pub access_token: String,
    pub account_id: String,
    /// HMAC key configured on the DocuSign Connect listener
    pub connect_key: Option<String>,
    pub api_url: String,
}

#[derive(Clone, Debug)]
pub struct PandadocConfig {
    pub api_key: String,
    pub webhook_key: Option<String>,
    pub api_url: String,
}

#[derive(Clone, Debug)]
pub struct AdobeSignConfig {
    pub access_token: String,
    /// Application client id Adobe Sign sends with every webhook notification
    pub client_id: String,
    pub api_url: String,
}

/// OAuth application registered with a cloud storage provider.
#[derive(Clone, Debug)]
pub struct OAuthAppConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

#[derive(Clone, Debug)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub api_url: String,
}

#[derive(Clone, Debug)]
pub struct ResendConfig {
    pub api_key: String,
    pub from: String,
    pub api_url: String,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a variable if set.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let bind_addr = env.or_default("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvValue {
                var: "BIND_ADDR".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            database_url: env.required("DATABASE_URL")?,
            valkey_url: env.required("VALKEY_URL")?,
            app_url: env.required("APP_URL")?.trim_end_matches('/').to_string(),
            bind_addr,
            integrations: IntegrationConfig::from_env(&env)?,
        })
    }
}

impl IntegrationConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let stripe = match env.optional("STRIPE_SECRET_KEY") {
            Some(secret_key) => Some(StripeConfig {
                secret_key,
                webhook_secret: env.optional("STRIPE_WEBHOOK_SECRET"),
                api_url: env.or_default("STRIPE_API_URL", STRIPE_API_URL),
            }),
            None => None,
        };

        let docusign = match env.optional("DOCUSIGN_ACCESS_TOKEN") {
            Some(access_token) => Some(DocusignConfig {
                access_token,
                account_id: env.required_by("DocuSign", "DOCUSIGN_ACCOUNT_ID")?,
                connect_key: env.optional("DOCUSIGN_CONNECT_KEY"),
                api_url: env.or_default("DOCUSIGN_API_URL", DOCUSIGN_API_URL),
            }),
            None => None,
        };

        let pandadoc = match env.optional("PANDADOC_API_KEY") {
            Some(api_key) => Some(PandadocConfig {
                api_key,
                webhook_key: env.optional("PANDADOC_WEBHOOK_KEY"),
                api_url: env.or_default("PANDADOC_API_URL", PANDADOC_API_URL),
            }),
            None => None,
        };

        let adobe_sign = match env.optional("ADOBE_SIGN_ACCESS_TOKEN") {
            Some(access_token) => Some(AdobeSignConfig {
                access_token,
                client_id: env.required_by("Adobe Sign", "ADOBE_SIGN_CLIENT_ID")?,
                api_url: env.or_default("ADOBE_SIGN_API_URL", ADOBE_SIGN_API_URL),
            }),
            None => None,
        };

        let google_drive = match env.optional("GOOGLE_CLIENT_ID") {
            Some(client_id) => Some(OAuthAppConfig {
                client_id,
                client_secret: env.required_by("Google Drive", "GOOGLE_CLIENT_SECRET")?,
                auth_url: env.or_default("GOOGLE_AUTH_URL", GOOGLE_AUTH_URL),
                token_url: env.or_default("GOOGLE_TOKEN_URL", GOOGLE_TOKEN_URL),
                api_url: env.or_default("GOOGLE_API_URL", GOOGLE_API_URL),
            }),
            None => None,
        };

        let onedrive = match env.optional("MICROSOFT_CLIENT_ID") {
            Some(client_id) => Some(OAuthAppConfig {
                client_id,
                client_secret: env.required_by("OneDrive", "MICROSOFT_CLIENT_SECRET")?,
                auth_url: env.or_default("MICROSOFT_AUTH_URL", MICROSOFT_AUTH_URL),
                token_url: env.or_default("MICROSOFT_TOKEN_URL", MICROSOFT_TOKEN_URL),
                api_url: env.or_default("MICROSOFT_GRAPH_URL", MICROSOFT_GRAPH_URL),
            }),
            None => None,
        };

        let twilio = match env.optional("TWILIO_ACCOUNT_SID") {
            Some(account_sid) => Some(TwilioConfig {
                account_sid,
                auth_token: env.required_by("Twilio", "TWILIO_AUTH_TOKEN")?,
                from_number: env.required_by("Twilio", "TWILIO_FROM_NUMBER")?,
                api_url: env.or_default("TWILIO_API_URL", TWILIO_API_URL),
            }),
            None => None,
        };

        let resend = match env.optional("RESEND_API_KEY") {
            Some(api_key) => Some(ResendConfig {
                api_key,
                from: env.required_by("Resend", "EMAIL_FROM")?,
                api_url: env.or_default("RESEND_API_URL", RESEND_API_URL),
            }),
            None => None,
        };

        Ok(Self {
            admin_email: env.optional("ADMIN_EMAIL"),
            stripe,
            docusign,
            pandadoc,
            adobe_sign,
            google_drive,
            onedrive,
            twilio,
            resend,
            slack_webhook_url: env.optional("SLACK_WEBHOOK_URL"),
            teams_webhook_url: env.optional("TEAMS_WEBHOOK_URL"),
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, var: &str) -> Option<String> {
        (self.0)(var)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, var: &str) -> Result<String, ConfigError> {
        self.optional(var)
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    }

    /// Companion variable of a provider that is being enabled
    fn required_by(&self, provider: &'static str, var: &str) -> Result<String, ConfigError> {
        self.optional(var)
            .ok_or_else(|| ConfigError::IncompleteIntegration {
                provider,
                var: var.to_string(),
            })
    }

    fn or_default(&self, var: &str, default: &str) -> String {
        self.optional(var)
            .unwrap_or_else(|| default.to_string())
            .trim_end_matches('/')
            .to_string()
    }
}
