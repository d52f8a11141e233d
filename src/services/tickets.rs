use chrono::Utc;
use rand::Rng;
use validator::Validate;

use crate::domain::ticket::{Ticket, TicketPatch};
use crate::dto::clients::IndexQuery;
use crate::dto::tickets::TicketsPageData;
use crate::forms::ticket::{AddTicketForm, SaveTicketForm};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{TicketListQuery, TicketReader, TicketWriter};
use crate::services::{ServiceError, ServiceResult, ensure_owner, ensure_staff};

/// Short public ticket identifier printed on the reception slip, e.g. `BMP268`.
pub fn generate_ticket_id() -> String {
    let number: u32 = rand::thread_rng().gen_range(100..1000);
    format!("BMP{number}")
}

/// Loads the searchable, paginated ticket list. A failing ticket source
/// degrades to an empty table rather than an error page.
pub fn load_tickets_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: IndexQuery,
) -> ServiceResult<TicketsPageData>
where
    R: TicketReader + ?Sized,
{
    ensure_staff(user)?;

    let page = query.page.unwrap_or(1).max(1);
    let search_query = query
        .q
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut list_query =
        TicketListQuery::new(&user.tenant_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, mut tickets) = repo.list_tickets(list_query.clone()).unwrap_or_else(|e| {
        log::error!("Failed to list tickets: {e}");
        (0, Vec::new())
    });

    let total_pages = usize::max(1, total.div_ceil(DEFAULT_ITEMS_PER_PAGE));

    // A stale page number clamps to the last page; re-fetch at the clamped
    // offset so the table shows that page's rows.
    let page = page.min(total_pages);
    if tickets.is_empty() && total > 0 {
        list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);
        tickets = repo
            .list_tickets(list_query)
            .map(|(_total, tickets)| tickets)
            .unwrap_or_else(|e| {
                log::error!("Failed to list tickets: {e}");
                Vec::new()
            });
    }

    let tickets = Paginated::new(tickets, page, total_pages, total);

    Ok(TicketsPageData {
        tickets,
        search_query,
    })
}

/// Fetches one ticket scoped to the caller's tenant.
pub fn get_ticket<R>(
    repo: &R,
    user: &AuthenticatedUser,
    ticket_id: &str,
) -> ServiceResult<Option<Ticket>>
where
    R: TicketReader + ?Sized,
{
    ensure_staff(user)?;
    repo.get_ticket_by_id(ticket_id, &user.tenant_id)
        .map_err(ServiceError::from)
}

/// Validates the reception form and records a new ticket.
pub fn add_ticket<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddTicketForm,
) -> ServiceResult<String>
where
    R: TicketWriter + ?Sized,
{
    ensure_staff(user)?;

    if let Err(e) = form.validate() {
        log::error!("Failed to validate ticket form: {e}");
        return Err(ServiceError::Form(e.to_string()));
    }

    let new_ticket = form.to_new_ticket(
        generate_ticket_id(),
        user.tenant_id.clone(),
        Utc::now().naive_utc(),
    );
    let ticket_id = new_ticket.ticket_id.clone();

    repo.create_tickets(&[new_ticket])?;
    Ok(ticket_id)
}

/// Applies a single-ticket edit (status change, diagnosis, cost).
pub fn save_ticket<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SaveTicketForm,
) -> ServiceResult<Ticket>
where
    R: TicketWriter + ?Sized,
{
    ensure_staff(user)?;

    if let Err(e) = form.validate() {
        log::error!("Failed to validate ticket form: {e}");
        return Err(ServiceError::Form(e.to_string()));
    }

    let patch = TicketPatch::from(&form);
    repo.update_ticket(&form.ticket_id, &user.tenant_id, &patch)
        .map_err(ServiceError::from)
}

/// Removes a ticket. Owner only.
pub fn remove_ticket<R>(repo: &R, user: &AuthenticatedUser, ticket_id: &str) -> ServiceResult<()>
where
    R: TicketWriter + ?Sized,
{
    ensure_owner(user)?;
    repo.delete_ticket(ticket_id, &user.tenant_id)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_ids_have_the_reception_slip_shape() {
        for _ in 0..100 {
            let id = generate_ticket_id();
            assert!(id.starts_with("BMP"));
            let number: u32 = id[3..].parse().expect("numeric suffix");
            assert!((100..1000).contains(&number));
        }
    }
}
