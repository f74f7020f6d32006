use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Acknowledgement of an e-signature delivery
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WebhookAckDto {
    /// Contracts whose status changed
    pub applied: usize,
}

#[derive(Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PandadocWebhookParams {
    /// HMAC-SHA256 of the body in hex, appended by PandaDoc to the webhook URL
    pub signature: Option<String>,
}
