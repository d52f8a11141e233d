//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::client::VirtualClient;
use crate::domain::ticket::{NewTicket, Ticket, TicketPatch};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientLister, TicketListQuery, TicketReader, TicketWriter};

mock! {
    pub Repository {}

    impl TicketReader for Repository {
        fn get_ticket_by_id(
            &self,
            ticket_id: &str,
            tenant_id: &str,
        ) -> RepositoryResult<Option<Ticket>>;
        fn list_tickets(&self, query: TicketListQuery) -> RepositoryResult<(usize, Vec<Ticket>)>;
    }

    impl TicketWriter for Repository {
        fn create_tickets(&self, new_tickets: &[NewTicket]) -> RepositoryResult<usize>;
        fn update_ticket(
            &self,
            ticket_id: &str,
            tenant_id: &str,
            patch: &TicketPatch,
        ) -> RepositoryResult<Ticket>;
        fn delete_ticket(&self, ticket_id: &str, tenant_id: &str) -> RepositoryResult<()>;
    }

    impl ClientLister for Repository {
        fn list_clients(&self, tenant_id: &str) -> RepositoryResult<Vec<VirtualClient>>;
    }
}
