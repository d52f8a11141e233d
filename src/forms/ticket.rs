use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::ticket::{NewTicket, TicketPatch};

#[derive(Deserialize, Validate)]
/// Reception form for a new repair ticket.
pub struct AddTicketForm {
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    #[validate(length(min = 1))]
    pub device_model: String,
    #[validate(length(min = 1))]
    pub reported_issue: String,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub estimated_cost: f64,
}

impl AddTicketForm {
    pub fn to_new_ticket(
        &self,
        ticket_id: String,
        tenant_id: String,
        created_at: NaiveDateTime,
    ) -> NewTicket {
        NewTicket::new(
            ticket_id,
            tenant_id,
            self.client_name.clone(),
            self.client_phone.clone(),
            self.device_model.clone(),
            self.reported_issue.clone(),
            self.estimated_cost,
            created_at,
        )
    }
}

#[derive(Deserialize, Validate)]
/// Form data for updating a single existing ticket.
pub struct SaveTicketForm {
    #[validate(length(min = 1))]
    pub ticket_id: String,
    pub status: Option<String>,
    pub service_operations: Option<String>,
    pub defect_cause: Option<String>,
    pub observations: Option<String>,
    #[validate(range(min = 0.0))]
    pub estimated_cost: Option<f64>,
}

impl From<&SaveTicketForm> for TicketPatch {
    fn from(form: &SaveTicketForm) -> Self {
        TicketPatch {
            status: trimmed(form.status.as_deref()),
            service_operations: trimmed(form.service_operations.as_deref()),
            defect_cause: trimmed(form.defect_cause.as_deref()),
            observations: trimmed(form.observations.as_deref()),
            estimated_cost: form.estimated_cost,
        }
    }
}

#[derive(Deserialize, Validate)]
/// Form data for deleting a ticket.
pub struct DeleteTicketForm {
    #[validate(length(min = 1))]
    pub ticket_id: String,
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
