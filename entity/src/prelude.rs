pub use super::client::Entity as Client;
pub use super::compliance_doc::Entity as ComplianceDoc;
pub use super::contract::Entity as Contract;
pub use super::invoice::Entity as Invoice;
pub use super::job::Entity as Job;
pub use super::job_assignment::Entity as JobAssignment;
pub use super::job_file::Entity as JobFile;
pub use super::lead::Entity as Lead;
pub use super::message::Entity as Message;
pub use super::pilot::Entity as Pilot;
pub use super::pilot_availability::Entity as PilotAvailability;
pub use super::pilot_payment::Entity as PilotPayment;
pub use super::storage_connection::Entity as StorageConnection;
pub use super::user::Entity as User;
pub use super::w9_form::Entity as W9Form;
