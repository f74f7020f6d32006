//! Database model type aliases.
//!
//! Short names for the SeaORM models generated in the `entity` crate.

pub type UserModel = entity::user::Model;
pub type ClientModel = entity::client::Model;
pub type PilotModel = entity::pilot::Model;
pub type JobModel = entity::job::Model;
pub type JobAssignmentModel = entity::job_assignment::Model;
pub type JobFileModel = entity::job_file::Model;
pub type MessageModel = entity::message::Model;
pub type InvoiceModel = entity::invoice::Model;
pub type ContractModel = entity::contract::Model;
pub type LeadModel = entity::lead::Model;
pub type ComplianceDocModel = entity::compliance_doc::Model;
pub type PilotAvailabilityModel = entity::pilot_availability::Model;
pub type W9FormModel = entity::w9_form::Model;
pub type PilotPaymentModel = entity::pilot_payment::Model;
pub type StorageConnectionModel = entity::storage_connection::Model;
