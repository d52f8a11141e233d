use crate::dto::api::{ClientsQuery, ClientsResponse};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{ClientLister, TicketReader};
use crate::services::clients::{ClientSourceProbe, filter_clients, load_clients};
use crate::services::{ServiceResult, ensure_staff};

/// Returns the filtered list of derived clients visible to the caller.
///
/// Same search semantics as the HTML index page; pagination is applied only
/// when a page is requested.
pub fn list_clients<R>(
    repo: &R,
    probe: &ClientSourceProbe,
    user: &AuthenticatedUser,
    params: ClientsQuery,
) -> ServiceResult<ClientsResponse>
where
    R: ClientLister + TicketReader + ?Sized,
{
    ensure_staff(user)?;

    let clients = load_clients(repo, probe, &user.tenant_id);

    let search = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let filtered = match &search {
        Some(term) => filter_clients(&clients, term),
        None => clients,
    };

    let total = filtered.len();
    let clients = match params.page {
        Some(page) => {
            crate::services::clients::paginate_clients(filtered, page, DEFAULT_ITEMS_PER_PAGE)
                .items
        }
        None => filtered,
    };

    Ok(ClientsResponse { total, clients })
}
