//! Outbound notifications: email through Resend, SMS through Twilio and team chat through
//! Slack and Microsoft Teams incoming webhooks.
//!
//! The `spawn_*` methods run delivery on a background task and only log failures, so a
//! notification can never fail the request that triggered it. Channels without
//! configuration are skipped.

use std::sync::Arc;

use serde_json::json;

use crate::server::{
    config::IntegrationConfig,
    error::{integration::IntegrationError, Error},
    integration::check_status,
};

#[derive(Clone)]
pub struct Notifier {
    http: reqwest::Client,
    config: Arc<IntegrationConfig>,
}

/// A plain-text email
#[derive(Clone, Debug)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notifier {
    pub fn new(http: reqwest::Client, config: Arc<IntegrationConfig>) -> Self {
        Self { http, config }
    }

    pub fn admin_email(&self) -> Option<&str> {
        self.config.admin_email.as_deref()
    }

    pub async fn send_email(&self, email: &Email) -> Result<(), Error> {
        let resend = self
            .config
            .resend
            .as_ref()
            .ok_or(IntegrationError::NotConfigured("Resend"))?;

        let response = self
            .http
            .post(format!("{}/emails", resend.api_url))
            .bearer_auth(&resend.api_key)
            .json(&json!({
                "from": resend.from,
                "to": [email.to],
                "subject": email.subject,
                "text": email.body,
            }))
            .send()
            .await?;
        check_status("Resend", response).await?;

        Ok(())
    }

    pub async fn send_sms(&self, to: &str, body: &str) -> Result<(), Error> {
        let twilio = self
            .config
            .twilio
            .as_ref()
            .ok_or(IntegrationError::NotConfigured("Twilio"))?;

        let response = self
            .http
            .post(format!(
                "{}/2010-04-01/Accounts/{}/Messages.json",
                twilio.api_url, twilio.account_sid
            ))
            .basic_auth(&twilio.account_sid, Some(&twilio.auth_token))
            .form(&[("To", to), ("From", twilio.from_number.as_str()), ("Body", body)])
            .send()
            .await?;
        check_status("Twilio", response).await?;

        Ok(())
    }

    /// Posts a message to every configured team chat webhook.
    ///
    /// A failing webhook is logged and does not stop the others. The first failure is
    /// returned once all of them were tried.
    pub async fn post_team_chat(&self, text: &str) -> Result<(), Error> {
        let webhooks = [
            ("Slack", self.config.slack_webhook_url.as_deref()),
            ("Teams", self.config.teams_webhook_url.as_deref()),
        ];

        let mut first_error = None;
        for (provider, url) in webhooks {
            let Some(url) = url else {
                continue;
            };

            if let Err(e) = self.post_webhook(provider, url, text).await {
                tracing::warn!("Failed to post {} notification: {}", provider, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn post_webhook(
        &self,
        provider: &'static str,
        url: &str,
        text: &str,
    ) -> Result<(), Error> {
        let response = self
            .http
            .post(url)
            .json(&json!({ "text": text }))
            .send()
            .await?;
        check_status(provider, response).await?;

        Ok(())
    }

    pub fn spawn_email(&self, email: Email) {
        if self.config.resend.is_none() {
            tracing::debug!(to = %email.to, "Email not sent, Resend is not configured");
            return;
        }

        let notifier = self.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send_email(&email).await {
                tracing::warn!(to = %email.to, "Failed to send email \"{}\": {}", email.subject, e);
            }
        });
    }

    pub fn spawn_sms(&self, to: String, body: String) {
        if self.config.twilio.is_none() {
            tracing::debug!(to = %to, "SMS not sent, Twilio is not configured");
            return;
        }

        let notifier = self.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send_sms(&to, &body).await {
                tracing::warn!(to = %to, "Failed to send SMS: {}", e);
            }
        });
    }

    pub fn spawn_team_chat(&self, text: String) {
        if self.config.slack_webhook_url.is_none() && self.config.teams_webhook_url.is_none() {
            return;
        }

        let notifier = self.clone();
        tokio::spawn(async move {
            // Logged per webhook
            let _ = notifier.post_team_chat(&text).await;
        });
    }
}
