use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::client::VirtualClient;
use crate::domain::ticket::{NewTicket, Ticket, TicketPatch};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ClientLister, TicketListQuery, TicketReader, TicketWriter};

/// Diesel-backed ticket source.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TicketReader for DieselRepository {
    fn get_ticket_by_id(
        &self,
        ticket_id: &str,
        tenant_id: &str,
    ) -> RepositoryResult<Option<Ticket>> {
        use crate::models::ticket::Ticket as DbTicket;
        use crate::schema::tickets;

        let mut conn = self.pool.get()?;
        let ticket = tickets::table
            .filter(tickets::ticket_id.eq(ticket_id))
            .filter(tickets::tenant_id.eq(tenant_id))
            .first::<DbTicket>(&mut conn)
            .optional()?;

        Ok(ticket.map(Into::into))
    }

    fn list_tickets(&self, query: TicketListQuery) -> RepositoryResult<(usize, Vec<Ticket>)> {
        use crate::models::ticket::Ticket as DbTicket;
        use crate::schema::tickets;

        let mut conn = self.pool.get()?;

        let build = || {
            let mut items = tickets::table
                .filter(tickets::tenant_id.eq(&query.tenant_id))
                .into_boxed();
            if let Some(status) = &query.status {
                items = items.filter(tickets::status.eq(status));
            }
            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = items.filter(
                    tickets::ticket_id
                        .like(pattern.clone())
                        .nullable()
                        .or(tickets::client_name.like(pattern.clone()))
                        .or(tickets::client_phone.like(pattern.clone()))
                        .or(tickets::device_model.like(pattern).nullable()),
                );
            }
            items
        };

        let total: i64 = build().count().get_result(&mut conn)?;

        let mut select = build().order(tickets::created_at.desc());
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            select = select.limit(per_page).offset((page - 1) * per_page);
        }

        let items = select
            .load::<DbTicket>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect::<Vec<Ticket>>();

        Ok((total as usize, items))
    }
}

impl TicketWriter for DieselRepository {
    fn create_tickets(&self, new_tickets: &[NewTicket]) -> RepositoryResult<usize> {
        use crate::models::ticket::NewTicket as DbNewTicket;
        use crate::schema::tickets;

        let mut conn = self.pool.get()?;
        let insertables: Vec<DbNewTicket> = new_tickets.iter().map(|t| t.into()).collect();
        let affected = diesel::insert_into(tickets::table)
            .values(&insertables)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_ticket(
        &self,
        ticket_id: &str,
        tenant_id: &str,
        patch: &TicketPatch,
    ) -> RepositoryResult<Ticket> {
        use crate::models::ticket::{Ticket as DbTicket, TicketPatch as DbTicketPatch};
        use crate::schema::tickets;

        let mut conn = self.pool.get()?;
        let changes = DbTicketPatch::from_domain(patch, Utc::now().naive_utc());

        let updated = diesel::update(
            tickets::table
                .filter(tickets::ticket_id.eq(ticket_id))
                .filter(tickets::tenant_id.eq(tenant_id)),
        )
        .set(&changes)
        .get_result::<DbTicket>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_ticket(&self, ticket_id: &str, tenant_id: &str) -> RepositoryResult<()> {
        use crate::schema::tickets;

        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(
            tickets::table
                .filter(tickets::ticket_id.eq(ticket_id))
                .filter(tickets::tenant_id.eq(tenant_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl ClientLister for DieselRepository {
    /// The ticket store keeps no client records, so the capability is
    /// reported as absent and callers fall back to aggregation.
    fn list_clients(&self, _tenant_id: &str) -> RepositoryResult<Vec<VirtualClient>> {
        Err(RepositoryError::NotFound)
    }
}
