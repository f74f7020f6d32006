//! Response bodies for mocked provider endpoints.

use serde_json::{json, Value};

/// Stripe Checkout session creation response
pub fn stripe_checkout_session(id: &str, url: &str) -> Value {
    json!({
        "id": id,
        "object": "checkout.session",
        "url": url,
        "payment_status": "unpaid",
    })
}

/// Stripe `checkout.session.completed` event for an invoice
pub fn stripe_checkout_completed(invoice_id: i32, payment_intent: &str) -> Value {
    json!({
        "id": "evt_test_1",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "object": "checkout.session",
                "payment_intent": payment_intent,
                "metadata": { "invoice_id": invoice_id.to_string() },
            }
        }
    })
}

/// OAuth2 token endpoint response
pub fn oauth_token(access_token: &str, refresh_token: Option<&str>) -> Value {
    let mut body = json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600,
    });

    if let Some(refresh_token) = refresh_token {
        body["refresh_token"] = json!(refresh_token);
    }

    body
}
