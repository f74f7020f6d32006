//! Inbound provider webhooks.
//!
//! Every delivery is authenticated before its payload is parsed. Deliveries about unknown
//! invoices or contracts are acknowledged and logged so providers stop retrying them.

use entity::sea_orm_active_enums::{EsignProvider, InvoiceStatus};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{contract::ContractRepository, invoice::InvoiceRepository},
    error::{integration::IntegrationError, Error},
    integration::{
        esign::{adobe_sign, docusign, pandadoc, provider_name, EsignEvent},
        signature,
        stripe::StripeEvent,
        Integrations,
    },
};

pub struct WebhookService<'a> {
    db: &'a DatabaseConnection,
    integrations: &'a Integrations,
}

/// An applied Adobe Sign delivery with the client id to echo back
pub struct AdobeSignDelivery {
    pub client_id: String,
    pub applied: usize,
}

impl<'a> WebhookService<'a> {
    /// Creates a new instance of [`WebhookService`]
    pub fn new(db: &'a DatabaseConnection, integrations: &'a Integrations) -> Self {
        Self { db, integrations }
    }

    /// Handles a Stripe event, marking the invoice of a completed Checkout session paid.
    ///
    /// `now` is the current unix time, compared against the signature timestamp.
    ///
    /// # Returns
    /// - `Ok(())` - Event verified and applied, or ignored as irrelevant
    /// - `Err(Error::IntegrationError)` - Webhook secret not configured (503), missing or
    ///   invalid signature, or a malformed payload (400)
    pub async fn stripe(
        &self,
        signature_header: Option<&str>,
        payload: &[u8],
        now: i64,
    ) -> Result<(), Error> {
        let secret = self.integrations.stripe()?.webhook_secret()?;
        let header = signature_header.ok_or(IntegrationError::InvalidSignature("Stripe"))?;
        signature::verify_stripe(secret, header, payload, now)?;

        let event = StripeEvent::parse(payload)?;
        let Some(completed) = event.completed_checkout()? else {
            tracing::debug!("Ignoring Stripe event {}", event.event_type);
            return Ok(());
        };

        let invoice_repo = InvoiceRepository::new(self.db);
        let Some(invoice) = invoice_repo.get(completed.invoice_id).await? else {
            tracing::warn!(
                invoice_id = %completed.invoice_id,
                "Stripe checkout completed for an unknown invoice"
            );
            return Ok(());
        };
        if invoice.status == InvoiceStatus::Paid {
            return Ok(());
        }

        let invoice = invoice_repo
            .mark_paid(invoice, completed.payment_intent)
            .await?;

        tracing::info!(
            invoice_id = %invoice.id,
            "Invoice {} paid through Stripe Checkout",
            invoice.invoice_number
        );

        Ok(())
    }

    /// Handles a DocuSign Connect delivery signed in `X-DocuSign-Signature-1`
    pub async fn docusign(
        &self,
        signature_header: Option<&str>,
        payload: &[u8],
    ) -> Result<usize, Error> {
        let config = self
            .integrations
            .config()
            .docusign
            .as_ref()
            .ok_or(IntegrationError::NotConfigured(docusign::PROVIDER))?;
        let secret = config
            .connect_key
            .as_deref()
            .ok_or(IntegrationError::NotConfigured("DocuSign Connect"))?;
        let header =
            signature_header.ok_or(IntegrationError::InvalidSignature(docusign::PROVIDER))?;
        signature::verify_base64(docusign::PROVIDER, secret, payload, header)?;

        let events = docusign::parse_webhook(payload)?;

        self.apply_esign_events(EsignProvider::Docusign, events)
            .await
    }

    /// Handles a PandaDoc delivery signed in the `signature` query parameter
    pub async fn pandadoc(&self, signature: Option<&str>, payload: &[u8]) -> Result<usize, Error> {
        let config = self
            .integrations
            .config()
            .pandadoc
            .as_ref()
            .ok_or(IntegrationError::NotConfigured(pandadoc::PROVIDER))?;
        let secret = config
            .webhook_key
            .as_deref()
            .ok_or(IntegrationError::NotConfigured("PandaDoc webhook"))?;
        let given = signature.ok_or(IntegrationError::InvalidSignature(pandadoc::PROVIDER))?;
        signature::verify_hex(pandadoc::PROVIDER, secret, payload, given)?;

        let events = pandadoc::parse_webhook(payload)?;

        self.apply_esign_events(EsignProvider::Pandadoc, events)
            .await
    }

    /// Checks the `X-AdobeSign-ClientId` header against the configured application and
    /// returns the value to echo back, which Adobe Sign requires on every delivery
    pub fn adobe_sign_client_id(&self, client_id_header: Option<&str>) -> Result<String, Error> {
        let config = self
            .integrations
            .config()
            .adobe_sign
            .as_ref()
            .ok_or(IntegrationError::NotConfigured(adobe_sign::PROVIDER))?;

        match client_id_header {
            Some(client_id) if client_id == config.client_id => Ok(client_id.to_string()),
            _ => Err(IntegrationError::InvalidSignature(adobe_sign::PROVIDER).into()),
        }
    }

    pub async fn adobe_sign(
        &self,
        client_id_header: Option<&str>,
        payload: &[u8],
    ) -> Result<AdobeSignDelivery, Error> {
        let client_id = self.adobe_sign_client_id(client_id_header)?;

        let events = adobe_sign::parse_webhook(payload)?;
        let applied = self
            .apply_esign_events(EsignProvider::AdobeSign, events)
            .await?;

        Ok(AdobeSignDelivery { client_id, applied })
    }

    /// Applies status changes to the contracts they refer to.
    ///
    /// Returns the number of contracts updated.
    async fn apply_esign_events(
        &self,
        provider: EsignProvider,
        events: Vec<EsignEvent>,
    ) -> Result<usize, Error> {
        let contract_repo = ContractRepository::new(self.db);
        let mut applied = 0;

        for event in events {
            let Some(contract) = contract_repo
                .find_by_external(provider, &event.external_id)
                .await?
            else {
                tracing::warn!(
                    external_id = %event.external_id,
                    "{} event for an unknown contract",
                    provider_name(provider)
                );
                continue;
            };

            let contract = contract_repo.set_status(contract, event.status).await?;
            applied += 1;

            tracing::info!(
                contract_id = %contract.id,
                "Contract moved to {:?} by {}",
                contract.status,
                provider_name(provider)
            );
        }

        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    mod stripe {
        use chrono::{NaiveDate, Utc};
        use entity::sea_orm_active_enums::InvoiceStatus;
        use hangar_test_utils::{constant::TEST_WEBHOOK_SECRET, fixtures::provider, prelude::*};

        use crate::server::{
            data::invoice::InvoiceRepository,
            error::{integration::IntegrationError, Error},
            integration::signature::stripe_header,
            service::webhook::WebhookService,
            util::test::test_state,
        };

        /// Expect a completed checkout to mark the invoice paid with its payment intent
        #[tokio::test]
        async fn marks_invoice_paid() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let state = test_state(&test);
            let client = test.crm().insert_client("Acme", None).await?;
            let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
            let invoice = test
                .crm()
                .insert_invoice(client.id, "INV-2025-0001", 1000, InvoiceStatus::Sent, date, date)
                .await?;
            let payload = provider::stripe_checkout_completed(invoice.id, "pi_123").to_string();
            let now = Utc::now().timestamp();
            let header = stripe_header(TEST_WEBHOOK_SECRET, now, payload.as_bytes()).unwrap();

            WebhookService::new(&state.db, &state.integrations)
                .stripe(Some(&header), payload.as_bytes(), now)
                .await
                .unwrap();

            let stored = InvoiceRepository::new(&test.db).get(invoice.id).await?.unwrap();
            assert_eq!(stored.status, InvoiceStatus::Paid);
            assert!(stored.paid_at.is_some());
            assert_eq!(stored.stripe_payment_intent.as_deref(), Some("pi_123"));

            Ok(())
        }

        /// Expect InvalidSignature for a payload signed with another secret, invoice untouched
        #[tokio::test]
        async fn rejects_bad_signature() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let state = test_state(&test);
            let client = test.crm().insert_client("Acme", None).await?;
            let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
            let invoice = test
                .crm()
                .insert_invoice(client.id, "INV-2025-0001", 1000, InvoiceStatus::Sent, date, date)
                .await?;
            let payload = provider::stripe_checkout_completed(invoice.id, "pi_123").to_string();
            let now = Utc::now().timestamp();
            let header = stripe_header("whsec_other", now, payload.as_bytes()).unwrap();

            let service = WebhookService::new(&state.db, &state.integrations);
            let forged = service.stripe(Some(&header), payload.as_bytes(), now).await;
            let unsigned = service.stripe(None, payload.as_bytes(), now).await;

            for result in [forged, unsigned] {
                assert!(matches!(
                    result,
                    Err(Error::IntegrationError(IntegrationError::InvalidSignature(_)))
                ));
            }
            let stored = InvoiceRepository::new(&test.db).get(invoice.id).await?.unwrap();
            assert_eq!(stored.status, InvoiceStatus::Sent);

            Ok(())
        }

        /// Expect unknown invoices to be acknowledged
        #[tokio::test]
        async fn acknowledges_unknown_invoice() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let state = test_state(&test);
            let payload = provider::stripe_checkout_completed(404, "pi_1").to_string();
            let now = Utc::now().timestamp();
            let header = stripe_header(TEST_WEBHOOK_SECRET, now, payload.as_bytes()).unwrap();

            let result = WebhookService::new(&state.db, &state.integrations)
                .stripe(Some(&header), payload.as_bytes(), now)
                .await;

            assert!(result.is_ok());

            Ok(())
        }
    }

    mod docusign {
        use entity::sea_orm_active_enums::{ContractStatus, EsignProvider};
        use hangar_test_utils::{constant::TEST_WEBHOOK_SECRET, prelude::*};

        use crate::server::{
            data::contract::ContractRepository,
            error::{integration::IntegrationError, Error},
            integration::signature::sign_base64,
            service::webhook::WebhookService,
            util::test::test_state,
        };

        /// Expect a completed envelope to sign the contract
        #[tokio::test]
        async fn signs_contract() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let state = test_state(&test);
            let client = test.crm().insert_client("Acme", None).await?;
            let contract = test
                .crm()
                .insert_contract(client.id, "MSA", ContractStatus::Draft)
                .await?;
            ContractRepository::new(&test.db)
                .mark_sent(contract.clone(), EsignProvider::Docusign, "env-1".to_string())
                .await?;
            let payload = br#"{"event":"envelope-completed","data":{"envelopeId":"env-1"}}"#;
            let signature = sign_base64(TEST_WEBHOOK_SECRET, payload).unwrap();

            let service = WebhookService::new(&state.db, &state.integrations);
            let applied = service.docusign(Some(&signature), payload).await.unwrap();
            let forged = service.docusign(Some("AAAA"), payload).await;

            assert_eq!(applied, 1);
            let stored = ContractRepository::new(&test.db).get(contract.id).await?.unwrap();
            assert_eq!(stored.status, ContractStatus::Signed);
            assert!(stored.signed_at.is_some());
            assert!(matches!(
                forged,
                Err(Error::IntegrationError(IntegrationError::InvalidSignature(_)))
            ));

            Ok(())
        }
    }

    mod pandadoc {
        use entity::sea_orm_active_enums::{ContractStatus, EsignProvider};
        use hangar_test_utils::{constant::TEST_WEBHOOK_SECRET, prelude::*};

        use crate::server::{
            data::contract::ContractRepository, integration::signature::sign_hex,
            service::webhook::WebhookService, util::test::test_state,
        };

        /// Expect only events for known documents to be applied
        #[tokio::test]
        async fn applies_known_documents() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let state = test_state(&test);
            let client = test.crm().insert_client("Acme", None).await?;
            let contract = test
                .crm()
                .insert_contract(client.id, "MSA", ContractStatus::Draft)
                .await?;
            ContractRepository::new(&test.db)
                .mark_sent(contract.clone(), EsignProvider::Pandadoc, "doc-1".to_string())
                .await?;
            let payload = br#"[
                {"event":"document_state_changed","data":{"id":"doc-1","status":"document.viewed"}},
                {"event":"document_state_changed","data":{"id":"doc-2","status":"document.completed"}}
            ]"#;
            let signature = sign_hex(TEST_WEBHOOK_SECRET, payload).unwrap();

            let applied = WebhookService::new(&state.db, &state.integrations)
                .pandadoc(Some(&signature), payload)
                .await
                .unwrap();

            assert_eq!(applied, 1);
            let stored = ContractRepository::new(&test.db).get(contract.id).await?.unwrap();
            assert_eq!(stored.status, ContractStatus::Viewed);

            Ok(())
        }
    }

    mod adobe_sign {
        use hangar_test_utils::prelude::*;

        use crate::server::{
            error::{integration::IntegrationError, Error},
            service::webhook::WebhookService,
            util::test::test_state,
        };

        /// Expect the configured client id echoed and any other refused
        #[tokio::test]
        async fn checks_client_id() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let state = test_state(&test);

            let service = WebhookService::new(&state.db, &state.integrations);
            let echoed = service.adobe_sign_client_id(Some("adobe-client")).unwrap();
            let refused = service.adobe_sign_client_id(Some("someone-else"));

            assert_eq!(echoed, "adobe-client");
            assert!(matches!(
                refused,
                Err(Error::IntegrationError(IntegrationError::InvalidSignature(_)))
            ));

            Ok(())
        }
    }
}
