//! HTTP routing and OpenAPI documentation configuration.
//!
//! Every API endpoint is registered here along with its utoipa path definition, and the
//! collected OpenAPI document is served through Swagger UI at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{
        analytics, auth, availability, client, compliance, contract, invoice, job, lead,
        message, payment, pilot, storage, user, webhook,
    },
    model::app::AppState,
};

/// Builds the application's HTTP router with all API endpoints and Swagger UI.
///
/// Handlers sharing a path are registered in the same `routes!` call. Static segments
/// such as `/api/jobs/export` take priority over `/api/jobs/{id}` in axum's matcher.
///
/// The OpenAPI specification is available at `/api/docs/openapi.json`.
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "Hangar", description = "Hangar drone services API"), tags(
        (name = auth::AUTH_TAG, description = "Login, logout and the current user"),
        (name = user::USER_TAG, description = "User account administration"),
        (name = client::CLIENT_TAG, description = "Client records"),
        (name = pilot::PILOT_TAG, description = "Pilot roster and scores"),
        (name = availability::AVAILABILITY_TAG, description = "Pilot availability calendar"),
        (name = job::JOB_TAG, description = "Jobs, assignments, files and public tracking"),
        (name = message::MESSAGE_TAG, description = "Job message threads"),
        (name = invoice::INVOICE_TAG, description = "Invoicing and Stripe checkout"),
        (name = contract::CONTRACT_TAG, description = "Contracts and e-signature"),
        (name = lead::LEAD_TAG, description = "Sales leads"),
        (name = compliance::COMPLIANCE_TAG, description = "Pilot compliance documents and W-9s"),
        (name = payment::PAYMENT_TAG, description = "Pilot payouts"),
        (name = analytics::ANALYTICS_TAG, description = "Dashboard and revenue forecast"),
        (name = storage::STORAGE_TAG, description = "Cloud storage connections and uploads"),
        (name = webhook::WEBHOOK_TAG, description = "Inbound provider webhooks"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(auth::login))
        .routes(routes!(auth::logout))
        .routes(routes!(auth::get_user))
        .routes(routes!(user::list_users, user::create_user))
        .routes(routes!(user::delete_user))
        .routes(routes!(client::list_clients, client::create_client))
        .routes(routes!(
            client::get_client,
            client::update_client,
            client::delete_client
        ))
        .routes(routes!(client::export_clients))
        .routes(routes!(client::import_clients))
        .routes(routes!(pilot::list_pilots, pilot::create_pilot))
        .routes(routes!(
            pilot::get_pilot,
            pilot::update_pilot,
            pilot::delete_pilot
        ))
        .routes(routes!(pilot::get_pilot_score))
        .routes(routes!(pilot::export_pilots))
        .routes(routes!(pilot::import_pilots))
        .routes(routes!(availability::get_availability))
        .routes(routes!(availability::set_availability))
        .routes(routes!(availability::list_available_pilots))
        .routes(routes!(compliance::get_w9, compliance::submit_w9))
        .routes(routes!(
            payment::list_pilot_payments,
            payment::create_pilot_payment
        ))
        .routes(routes!(payment::update_pilot_payment))
        .routes(routes!(job::list_jobs, job::create_job))
        .routes(routes!(job::get_job, job::update_job, job::delete_job))
        .routes(routes!(job::assign_pilot))
        .routes(routes!(job::update_assignment, job::unassign_pilot))
        .routes(routes!(job::list_job_files, job::add_job_file))
        .routes(routes!(job::delete_job_file))
        .routes(routes!(job::track_job))
        .routes(routes!(job::export_jobs))
        .routes(routes!(job::import_jobs))
        .routes(routes!(message::list_messages, message::post_message))
        .routes(routes!(invoice::list_invoices, invoice::create_invoice))
        .routes(routes!(
            invoice::get_invoice,
            invoice::update_invoice,
            invoice::delete_invoice
        ))
        .routes(routes!(invoice::checkout_invoice))
        .routes(routes!(invoice::export_invoices))
        .routes(routes!(invoice::import_invoices))
        .routes(routes!(contract::list_contracts, contract::create_contract))
        .routes(routes!(
            contract::get_contract,
            contract::update_contract,
            contract::delete_contract
        ))
        .routes(routes!(contract::send_contract))
        .routes(routes!(contract::export_contracts))
        .routes(routes!(lead::list_leads, lead::create_lead))
        .routes(routes!(lead::get_lead, lead::update_lead, lead::delete_lead))
        .routes(routes!(lead::convert_lead))
        .routes(routes!(lead::export_leads))
        .routes(routes!(lead::import_leads))
        .routes(routes!(
            compliance::list_compliance_docs,
            compliance::create_compliance_doc
        ))
        .routes(routes!(compliance::review_compliance_doc))
        .routes(routes!(compliance::delete_compliance_doc))
        .routes(routes!(compliance::list_expiring_docs))
        .routes(routes!(analytics::get_dashboard))
        .routes(routes!(analytics::get_forecast))
        .routes(routes!(storage::connect_storage))
        .routes(routes!(storage::storage_callback))
        .routes(routes!(storage::list_storage_files))
        .routes(routes!(storage::upload_job_file))
        .routes(routes!(webhook::stripe_webhook))
        .routes(routes!(webhook::docusign_webhook))
        .routes(routes!(webhook::pandadoc_webhook))
        .routes(routes!(
            webhook::adobe_sign_verify,
            webhook::adobe_sign_webhook
        ))
        .split_for_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
