//! Helpers shared by the controller tests.

use axum::{
    body::to_bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hangar::server::{
    config::{IntegrationConfig, StripeConfig},
    error::Error,
    integration::Integrations,
    model::{app::AppState, session::user::SessionUserId},
};
use hangar_test_utils::{
    constant::{TEST_APP_URL, TEST_WEBHOOK_SECRET},
    TestContext,
};
use serde_json::Value;

pub trait TestContextExt {
    /// State with Stripe pointed at the mock server and every other provider unconfigured
    fn state(&self) -> AppState;

    /// State with no provider configured
    fn unconfigured_state(&self) -> AppState;

    /// Stores `user_id` in the test session as if the user had logged in
    async fn login(&self, user_id: i32);
}

impl TestContextExt for TestContext {
    fn state(&self) -> AppState {
        state_with(
            self,
            IntegrationConfig {
                stripe: Some(StripeConfig {
                    secret_key: "sk_test".to_string(),
                    webhook_secret: Some(TEST_WEBHOOK_SECRET.to_string()),
                    api_url: self.server_url(),
                }),
                ..Default::default()
            },
        )
    }

    fn unconfigured_state(&self) -> AppState {
        state_with(self, IntegrationConfig::default())
    }

    async fn login(&self, user_id: i32) {
        SessionUserId::insert(&self.session, user_id).await.unwrap();
    }
}

fn state_with(test: &TestContext, config: IntegrationConfig) -> AppState {
    AppState {
        db: test.db.clone(),
        integrations: Integrations::new(config).unwrap(),
        app_url: TEST_APP_URL.to_string(),
    }
}

/// Status code a handler result renders as
pub fn status<T: IntoResponse>(result: Result<T, Error>) -> StatusCode {
    match result {
        Ok(resp) => resp.into_response().status(),
        Err(e) => e.into_response().status(),
    }
}

/// Renders a successful handler result, panicking on an error
pub fn response<T: IntoResponse>(result: Result<T, Error>) -> Response {
    match result {
        Ok(resp) => resp.into_response(),
        Err(e) => panic!("Expected success, got {:?}", e),
    }
}

pub async fn json_body(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();

    serde_json::from_slice(&bytes).unwrap()
}
