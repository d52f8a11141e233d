//! DTOs shaped for the client detail and edit templates.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::client::VirtualClient;
use crate::domain::ticket::Ticket;

/// Aggregated data required to render the client details page.
///
/// Everything here is recomputed from the ticket snapshot on each request;
/// a `None` timestamp renders as unknown.
#[derive(Debug, Serialize)]
pub struct ClientPageData {
    pub client: VirtualClient,
    pub tickets: Vec<Ticket>,
    pub ticket_count: usize,
    pub first_seen: Option<NaiveDateTime>,
    pub last_activity: Option<NaiveDateTime>,
}
