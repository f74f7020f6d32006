use serde::Deserialize;

use crate::{
    model::invoice::CheckoutDto,
    server::{
        config::StripeConfig,
        error::{integration::IntegrationError, Error},
        integration::{check_status, read_json},
    },
};

const PROVIDER: &str = "Stripe";

/// Stripe event type sent once a Checkout session has been paid
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

pub struct StripeClient<'a> {
    http: &'a reqwest::Client,
    config: &'a StripeConfig,
}

/// Line item and redirect details for a Checkout session
pub struct CheckoutRequest<'a> {
    pub invoice_id: i32,
    pub invoice_number: &'a str,
    pub amount_cents: i64,
    pub customer_email: Option<&'a str>,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Deserialize)]
struct CheckoutSession {
    id: String,
    url: String,
}

#[derive(Deserialize)]
pub struct StripeEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

/// The invoice a completed Checkout session paid for
#[derive(Debug, PartialEq)]
pub struct CompletedCheckout {
    pub invoice_id: i32,
    pub payment_intent: Option<String>,
}

impl<'a> StripeClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a StripeConfig) -> Self {
        Self { http, config }
    }

    pub fn webhook_secret(&self) -> Result<&'a str, Error> {
        self.config
            .webhook_secret
            .as_deref()
            .ok_or_else(|| IntegrationError::NotConfigured("Stripe webhook").into())
    }

    /// Creates a one-off Checkout session paying for an invoice in USD
    pub async fn create_checkout_session(
        &self,
        request: CheckoutRequest<'_>,
    ) -> Result<CheckoutDto, Error> {
        let invoice_id = request.invoice_id.to_string();
        let amount = request.amount_cents.to_string();
        let product_name = format!("Invoice {}", request.invoice_number);

        let mut form: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("success_url", &request.success_url),
            ("cancel_url", &request.cancel_url),
            ("client_reference_id", &invoice_id),
            ("metadata[invoice_id]", &invoice_id),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", "usd"),
            ("line_items[0][price_data][unit_amount]", &amount),
            ("line_items[0][price_data][product_data][name]", &product_name),
        ];
        if let Some(email) = request.customer_email {
            form.push(("customer_email", email));
        }

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.config.api_url))
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await?;
        let response = check_status(PROVIDER, response).await?;
        let session: CheckoutSession = read_json(PROVIDER, response).await?;

        Ok(CheckoutDto {
            session_id: session.id,
            url: session.url,
        })
    }
}

impl StripeEvent {
    pub fn parse(payload: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(payload).map_err(|e| {
            IntegrationError::MalformedPayload {
                provider: PROVIDER,
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Extracts the paid invoice from a `checkout.session.completed` event.
    ///
    /// Returns `None` for any other event type.
    pub fn completed_checkout(&self) -> Result<Option<CompletedCheckout>, Error> {
        if self.event_type != CHECKOUT_COMPLETED {
            return Ok(None);
        }

        let object = &self.data.object;
        let invoice_id = object["metadata"]["invoice_id"]
            .as_str()
            .and_then(|id| id.parse::<i32>().ok())
            .ok_or_else(|| IntegrationError::MalformedPayload {
                provider: PROVIDER,
                reason: "checkout session is missing metadata.invoice_id".to_string(),
            })?;
        let payment_intent = object["payment_intent"].as_str().map(str::to_string);

        Ok(Some(CompletedCheckout {
            invoice_id,
            payment_intent,
        }))
    }
}
