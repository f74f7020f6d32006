//! Conversions from database models to API DTOs.

use crate::{
    model::{
        availability::AvailabilityDto, client::ClientDto, compliance::ComplianceDocDto,
        compliance::W9Dto, contract::ContractDto, invoice::InvoiceDto, job::AssignmentDto,
        job::JobFileDto, lead::LeadDto, payment::PilotPaymentDto, pilot::PilotDto,
        user::UserDto,
    },
    server::model::db::{
        ClientModel, ComplianceDocModel, ContractModel, InvoiceModel, JobAssignmentModel,
        JobFileModel, LeadModel, PilotAvailabilityModel, PilotModel, PilotPaymentModel,
        UserModel, W9FormModel,
    },
};

impl From<UserModel> for UserDto {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            pilot_id: user.pilot_id,
            client_id: user.client_id,
            created_at: user.created_at,
        }
    }
}

impl From<ClientModel> for ClientDto {
    fn from(client: ClientModel) -> Self {
        Self {
            id: client.id,
            name: client.name,
            contact_name: client.contact_name,
            email: client.email,
            phone: client.phone,
            address: client.address,
            notes: client.notes,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

impl From<PilotModel> for PilotDto {
    fn from(pilot: PilotModel) -> Self {
        Self {
            id: pilot.id,
            name: pilot.name,
            email: pilot.email,
            phone: pilot.phone,
            status: pilot.status,
            faa_cert_number: pilot.faa_cert_number,
            faa_cert_expiry: pilot.faa_cert_expiry,
            insurance_expiry: pilot.insurance_expiry,
            hourly_rate_cents: pilot.hourly_rate_cents,
            home_base: pilot.home_base,
            created_at: pilot.created_at,
            updated_at: pilot.updated_at,
        }
    }
}

impl From<PilotAvailabilityModel> for AvailabilityDto {
    fn from(entry: PilotAvailabilityModel) -> Self {
        Self {
            pilot_id: entry.pilot_id,
            date: entry.date,
            available: entry.available,
        }
    }
}

/// Builds an assignment DTO; a pilot missing from the join renders with an empty name
pub fn assignment_dto(assignment: JobAssignmentModel, pilot: Option<PilotModel>) -> AssignmentDto {
    AssignmentDto {
        pilot_id: assignment.pilot_id,
        pilot_name: pilot.map(|p| p.name).unwrap_or_default(),
        status: assignment.status,
        pay_cents: assignment.pay_cents,
        assigned_at: assignment.assigned_at,
    }
}

impl From<JobFileModel> for JobFileDto {
    fn from(file: JobFileModel) -> Self {
        Self {
            id: file.id,
            job_id: file.job_id,
            file_name: file.file_name,
            url: file.url,
            content_type: file.content_type,
            size_bytes: file.size_bytes,
            provider: file.provider,
            uploaded_by: file.uploaded_by,
            created_at: file.created_at,
        }
    }
}

impl From<InvoiceModel> for InvoiceDto {
    fn from(invoice: InvoiceModel) -> Self {
        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            client_id: invoice.client_id,
            job_id: invoice.job_id,
            amount_cents: invoice.amount_cents,
            status: invoice.status,
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            paid_at: invoice.paid_at,
            notes: invoice.notes,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}

impl From<ContractModel> for ContractDto {
    fn from(contract: ContractModel) -> Self {
        Self {
            id: contract.id,
            client_id: contract.client_id,
            title: contract.title,
            status: contract.status,
            provider: contract.provider,
            external_id: contract.external_id,
            document_url: contract.document_url,
            signer_name: contract.signer_name,
            signer_email: contract.signer_email,
            value_cents: contract.value_cents,
            sent_at: contract.sent_at,
            signed_at: contract.signed_at,
            created_at: contract.created_at,
            updated_at: contract.updated_at,
        }
    }
}

impl From<LeadModel> for LeadDto {
    fn from(lead: LeadModel) -> Self {
        Self {
            id: lead.id,
            name: lead.name,
            company: lead.company,
            email: lead.email,
            phone: lead.phone,
            source: lead.source,
            status: lead.status,
            estimated_value_cents: lead.estimated_value_cents,
            notes: lead.notes,
            converted_client_id: lead.converted_client_id,
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        }
    }
}

impl From<ComplianceDocModel> for ComplianceDocDto {
    fn from(doc: ComplianceDocModel) -> Self {
        Self {
            id: doc.id,
            pilot_id: doc.pilot_id,
            doc_type: doc.doc_type,
            file_url: doc.file_url,
            expires_on: doc.expires_on,
            status: doc.status,
            notes: doc.notes,
            reviewed_by: doc.reviewed_by,
            reviewed_at: doc.reviewed_at,
            created_at: doc.created_at,
        }
    }
}

impl From<W9FormModel> for W9Dto {
    fn from(form: W9FormModel) -> Self {
        Self {
            pilot_id: form.pilot_id,
            legal_name: form.legal_name,
            business_name: form.business_name,
            tax_classification: form.tax_classification,
            tin_last4: form.tin_last4,
            address: form.address,
            signed_at: form.signed_at,
            updated_at: form.updated_at,
        }
    }
}

impl From<PilotPaymentModel> for PilotPaymentDto {
    fn from(payment: PilotPaymentModel) -> Self {
        Self {
            id: payment.id,
            pilot_id: payment.pilot_id,
            job_id: payment.job_id,
            amount_cents: payment.amount_cents,
            status: payment.status,
            method: payment.method,
            reference: payment.reference,
            paid_at: payment.paid_at,
            created_at: payment.created_at,
        }
    }
}
