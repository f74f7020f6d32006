//! SeaORM entities for the hangar schema.

pub mod prelude;

pub mod client;
pub mod compliance_doc;
pub mod contract;
pub mod invoice;
pub mod job;
pub mod job_assignment;
pub mod job_file;
pub mod lead;
pub mod message;
pub mod pilot;
pub mod pilot_availability;
pub mod pilot_payment;
pub mod sea_orm_active_enums;
pub mod storage_connection;
pub mod user;
pub mod w9_form;
