use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::ticket::{
    NewTicket as DomainNewTicket, Ticket as DomainTicket, TicketPatch as DomainTicketPatch,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::tickets)]
/// Diesel model for [`crate::domain::ticket::Ticket`].
pub struct Ticket {
    pub id: i32,
    pub ticket_id: String,
    pub tenant_id: String,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub device_model: String,
    pub reported_issue: String,
    pub service_operations: Option<String>,
    pub defect_cause: Option<String>,
    pub observations: Option<String>,
    pub estimated_cost: f64,
    pub status: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tickets)]
/// Insertable form of [`Ticket`].
pub struct NewTicket<'a> {
    pub ticket_id: &'a str,
    pub tenant_id: &'a str,
    pub client_name: Option<&'a str>,
    pub client_phone: Option<&'a str>,
    pub device_model: &'a str,
    pub reported_issue: &'a str,
    pub estimated_cost: f64,
    pub status: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::tickets)]
/// Data used when updating a [`Ticket`] record. `None` fields stay as stored.
pub struct TicketPatch<'a> {
    pub status: Option<&'a str>,
    pub service_operations: Option<&'a str>,
    pub defect_cause: Option<&'a str>,
    pub observations: Option<&'a str>,
    pub estimated_cost: Option<f64>,
    pub updated_at: NaiveDateTime,
}

impl From<Ticket> for DomainTicket {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            ticket_id: ticket.ticket_id,
            tenant_id: ticket.tenant_id,
            client_name: ticket.client_name,
            client_phone: ticket.client_phone,
            device_model: ticket.device_model,
            reported_issue: ticket.reported_issue,
            service_operations: ticket.service_operations,
            defect_cause: ticket.defect_cause,
            observations: ticket.observations,
            estimated_cost: ticket.estimated_cost,
            status: ticket.status,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewTicket> for NewTicket<'a> {
    fn from(ticket: &'a DomainNewTicket) -> Self {
        Self {
            ticket_id: ticket.ticket_id.as_str(),
            tenant_id: ticket.tenant_id.as_str(),
            client_name: ticket.client_name.as_deref(),
            client_phone: ticket.client_phone.as_deref(),
            device_model: ticket.device_model.as_str(),
            reported_issue: ticket.reported_issue.as_str(),
            estimated_cost: ticket.estimated_cost,
            status: ticket.status.as_str(),
            created_at: ticket.created_at,
        }
    }
}

impl<'a> TicketPatch<'a> {
    /// Stamps the change set with the moment the write is issued.
    pub fn from_domain(patch: &'a DomainTicketPatch, now: NaiveDateTime) -> Self {
        Self {
            status: patch.status.as_deref(),
            service_operations: patch.service_operations.as_deref(),
            defect_cause: patch.defect_cause.as_deref(),
            observations: patch.observations.as_deref(),
            estimated_cost: patch.estimated_cost,
            updated_at: now,
        }
    }
}
