use crate::domain::ticket::Ticket;
use crate::pagination::Paginated;

/// Data required to render the tickets index template.
pub struct TicketsPageData {
    pub tickets: Paginated<Ticket>,
    pub search_query: Option<String>,
}
