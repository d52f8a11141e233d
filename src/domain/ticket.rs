use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Status assigned to every freshly received device.
pub const INITIAL_TICKET_STATUS: &str = "Dispozitiv Receptionat";

/// A repair ticket (fișă) as stored by the ticket source.
///
/// Tickets are the only persisted record in the system; clients are derived
/// from them on the fly and never stored on their own.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Ticket {
    pub id: i32,
    /// Short public identifier printed on the reception slip, e.g. `BMP268`.
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

impl Ticket {
    /// Most recent activity on the ticket, falling back to the creation time
    /// when it was never updated.
    pub fn last_activity(&self) -> Option<NaiveDateTime> {
        self.updated_at.or(self.created_at)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTicket {
    pub ticket_id: String,
    pub tenant_id: String,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub device_model: String,
    pub reported_issue: String,
    pub estimated_cost: f64,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl NewTicket {
    #[must_use]
    pub fn new(
        ticket_id: String,
        tenant_id: String,
        client_name: Option<String>,
        client_phone: Option<String>,
        device_model: String,
        reported_issue: String,
        estimated_cost: f64,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            ticket_id,
            tenant_id,
            client_name: client_name
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            client_phone: client_phone
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            device_model,
            reported_issue,
            estimated_cost,
            status: INITIAL_TICKET_STATUS.to_string(),
            created_at,
        }
    }
}

/// Partial update over the editable ticket fields.
///
/// `None` leaves the stored value untouched, so an edit made against a
/// derived client carries each ticket's unrelated fields through unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TicketPatch {
    pub status: Option<String>,
    pub service_operations: Option<String>,
    pub defect_cause: Option<String>,
    pub observations: Option<String>,
    pub estimated_cost: Option<f64>,
}

impl TicketPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.service_operations.is_none()
            && self.defect_cause.is_none()
            && self.observations.is_none()
            && self.estimated_cost.is_none()
    }
}
