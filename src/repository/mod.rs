use crate::domain::client::VirtualClient;
use crate::domain::ticket::{NewTicket, Ticket, TicketPatch};
use crate::repository::errors::RepositoryResult;

pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod ticket;

pub use ticket::DieselRepository;

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Tenant-scoped ticket listing. Without pagination the full collection is
/// returned, which is what the client aggregation pass needs.
#[derive(Debug, Clone)]
pub struct TicketListQuery {
    pub tenant_id: String,
    pub status: Option<String>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl TicketListQuery {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            status: None,
            search: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait TicketReader {
    fn get_ticket_by_id(
        &self,
        ticket_id: &str,
        tenant_id: &str,
    ) -> RepositoryResult<Option<Ticket>>;
    fn list_tickets(&self, query: TicketListQuery) -> RepositoryResult<(usize, Vec<Ticket>)>;
}

pub trait TicketWriter {
    fn create_tickets(&self, new_tickets: &[NewTicket]) -> RepositoryResult<usize>;
    fn update_ticket(
        &self,
        ticket_id: &str,
        tenant_id: &str,
        patch: &TicketPatch,
    ) -> RepositoryResult<Ticket>;
    fn delete_ticket(&self, ticket_id: &str, tenant_id: &str) -> RepositoryResult<()>;
}

/// Optional "dedicated client list" capability of the ticket source.
///
/// `Err(RepositoryError::NotFound)` means the capability is absent, in which
/// case callers derive the client list from tickets instead. This is a
/// negotiation branch, not a failure.
pub trait ClientLister {
    fn list_clients(&self, tenant_id: &str) -> RepositoryResult<Vec<VirtualClient>>;
}
