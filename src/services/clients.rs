//! Derived client list: aggregation, search and pagination.
//!
//! Clients have no table of their own. Every call rebuilds the collection
//! from the tenant's tickets, so the list is always a materialized view of
//! the single source of truth.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::domain::client::{ClientKey, VirtualClient};
use crate::domain::ticket::Ticket;
use crate::dto::clients::{ClientsPageData, IndexQuery};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::errors::RepositoryError;
use crate::repository::{ClientLister, TicketListQuery, TicketReader};
use crate::services::{ServiceResult, ensure_staff};

/// Where the client list comes from for this process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientSource {
    /// The ticket source exposes a dedicated client listing.
    Dedicated,
    /// No client capability; the list is aggregated from tickets.
    DerivedFromTickets,
}

/// Caches the outcome of the client-capability probe so the absent endpoint
/// is not re-probed on every page load.
#[derive(Debug, Default)]
pub struct ClientSourceProbe {
    strategy: OnceLock<ClientSource>,
}

impl ClientSourceProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached(&self) -> Option<ClientSource> {
        self.strategy.get().copied()
    }

    fn remember(&self, source: ClientSource) -> ClientSource {
        *self.strategy.get_or_init(|| source)
    }
}

/// Folds a ticket collection into one [`VirtualClient`] per distinct
/// identity, in first-seen ticket order.
///
/// `created_at` keeps the earliest value seen among member tickets; a ticket
/// without a creation date never overwrites a known one.
pub fn aggregate_clients(tickets: &[Ticket]) -> Vec<VirtualClient> {
    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, VirtualClient> = HashMap::new();

    for ticket in tickets {
        let key = ClientKey::from(ticket);
        let id = key.encode();

        match by_key.get_mut(&id) {
            None => {
                by_key.insert(id.clone(), VirtualClient::new(&key, ticket.created_at));
                order.push(id);
            }
            Some(existing) => {
                existing.created_at = match (existing.created_at, ticket.created_at) {
                    (Some(current), Some(incoming)) => Some(current.min(incoming)),
                    (None, Some(incoming)) => Some(incoming),
                    (current, None) => current,
                };
            }
        }
    }

    order
        .into_iter()
        .filter_map(|id| by_key.remove(&id))
        .collect()
}

/// Case-insensitive substring match over name, phone and email; a record
/// matches when any field contains the query. An empty query matches all.
pub fn filter_clients(clients: &[VirtualClient], query: &str) -> Vec<VirtualClient> {
    let needle = query.to_lowercase();
    clients
        .iter()
        .filter(|client| {
            client.name.to_lowercase().contains(&needle)
                || client.phone.to_lowercase().contains(&needle)
                || client
                    .email
                    .as_deref()
                    .unwrap_or("")
                    .to_lowercase()
                    .contains(&needle)
        })
        .cloned()
        .collect()
}

/// Slices one page out of the filtered collection. A page number outside
/// `[1, total_pages]` is clamped, never an error.
pub fn paginate_clients(
    clients: Vec<VirtualClient>,
    page: usize,
    per_page: usize,
) -> Paginated<VirtualClient> {
    let total = clients.len();
    let total_pages = usize::max(1, total.div_ceil(per_page));
    let page = page.clamp(1, total_pages);

    let items = clients
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Paginated::new(items, page, total_pages, total)
}

/// Returns every derived client of the tenant.
///
/// The first call probes the dedicated client capability; a `NotFound`
/// answer selects the aggregation fallback for the rest of the process.
/// A transport failure on either path degrades to an empty collection.
pub fn load_clients<R>(repo: &R, probe: &ClientSourceProbe, tenant_id: &str) -> Vec<VirtualClient>
where
    R: ClientLister + TicketReader + ?Sized,
{
    let strategy = match probe.cached() {
        Some(strategy) => strategy,
        None => match repo.list_clients(tenant_id) {
            Ok(clients) => {
                probe.remember(ClientSource::Dedicated);
                return clients;
            }
            Err(RepositoryError::NotFound) => probe.remember(ClientSource::DerivedFromTickets),
            Err(e) => {
                log::error!("Client capability probe failed: {e}");
                return Vec::new();
            }
        },
    };

    match strategy {
        ClientSource::Dedicated => repo.list_clients(tenant_id).unwrap_or_else(|e| {
            log::error!("Failed to list clients: {e}");
            Vec::new()
        }),
        ClientSource::DerivedFromTickets => {
            let tickets = repo
                .list_tickets(TicketListQuery::new(tenant_id))
                .map(|(_total, tickets)| tickets)
                .unwrap_or_else(|e| {
                    log::error!("Failed to list tickets for aggregation: {e}");
                    Vec::new()
                });
            aggregate_clients(&tickets)
        }
    }
}

/// Loads the searchable, paginated client list for the index page.
pub fn load_clients_page<R>(
    repo: &R,
    probe: &ClientSourceProbe,
    user: &AuthenticatedUser,
    query: IndexQuery,
) -> ServiceResult<ClientsPageData>
where
    R: ClientLister + TicketReader + ?Sized,
{
    ensure_staff(user)?;

    let clients = load_clients(repo, probe, &user.tenant_id);

    let search_query = query
        .q
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let filtered = match &search_query {
        Some(term) => filter_clients(&clients, term),
        None => clients,
    };

    let page = query.page.unwrap_or(1);
    let clients = paginate_clients(filtered, page, DEFAULT_ITEMS_PER_PAGE);

    Ok(ClientsPageData {
        clients,
        search_query,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn ticket(name: Option<&str>, phone: Option<&str>, day: Option<u32>) -> Ticket {
        Ticket {
            client_name: name.map(str::to_string),
            client_phone: phone.map(str::to_string),
            created_at: day.map(date),
            ..Ticket::default()
        }
    }

    #[test]
    fn one_client_per_distinct_identity() {
        let tickets = vec![
            ticket(Some("Ana Pop"), Some("0722111222"), Some(5)),
            ticket(Some("Ion"), Some("0733000111"), Some(2)),
            ticket(Some("Ana Pop"), Some("0722111222"), Some(1)),
            ticket(None, None, Some(3)),
            ticket(Some(""), Some(""), Some(4)),
        ];
        let clients = aggregate_clients(&tickets);
        // Ana, Ion and the placeholder identity; empty strings fold into "-|-".
        assert_eq!(clients.len(), 3);
        assert_eq!(clients[0].name, "Ana Pop");
        assert_eq!(clients[1].name, "Ion");
        assert_eq!(clients[2].client_id, "-|-");
    }

    #[test]
    fn earliest_creation_date_wins() {
        let tickets = vec![
            ticket(Some("Ana Pop"), Some("0722111222"), Some(5)),
            ticket(Some("Ana Pop"), Some("0722111222"), Some(1)),
        ];
        let clients = aggregate_clients(&tickets);
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].created_at, Some(date(1)));
    }

    #[test]
    fn missing_creation_dates_never_overwrite() {
        let tickets = vec![
            ticket(Some("Ana"), Some("1"), Some(3)),
            ticket(Some("Ana"), Some("1"), None),
        ];
        assert_eq!(aggregate_clients(&tickets)[0].created_at, Some(date(3)));

        let tickets = vec![
            ticket(Some("Ana"), Some("1"), None),
            ticket(Some("Ana"), Some("1"), Some(7)),
        ];
        assert_eq!(aggregate_clients(&tickets)[0].created_at, Some(date(7)));
    }

    #[test]
    fn aggregated_created_at_is_lower_bound_of_members() {
        let tickets: Vec<Ticket> = (1..=9)
            .map(|day| ticket(Some("Ana"), Some("1"), Some(day)))
            .collect();
        let clients = aggregate_clients(&tickets);
        let lower = clients[0].created_at.unwrap();
        for t in &tickets {
            assert!(lower <= t.created_at.unwrap());
        }
    }

    #[test]
    fn filter_matches_phone_substring() {
        let clients = aggregate_clients(&[
            ticket(Some("Ana"), Some("0722111222"), Some(1)),
            ticket(Some("Ion"), Some("0733000111"), Some(1)),
        ]);
        let found = filter_clients(&clients, "0722");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ana");
    }

    #[test]
    fn filter_is_case_insensitive_and_idempotent() {
        let clients = aggregate_clients(&[
            ticket(Some("Ana Pop"), Some("1"), Some(1)),
            ticket(Some("Ion"), Some("2"), Some(1)),
        ]);
        let once = filter_clients(&clients, "ana");
        let twice = filter_clients(&once, "ana");
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
        assert!(filter_clients(&clients, "").len() == 2);
    }

    #[test]
    fn pagination_clamps_out_of_range_pages() {
        let clients = aggregate_clients(
            &(0..16)
                .map(|i| ticket(Some(&format!("Client {i}")), Some(&format!("07{i:08}")), Some(1)))
                .collect::<Vec<_>>(),
        );
        assert_eq!(clients.len(), 16);

        let page1 = paginate_clients(clients.clone(), 1, 15);
        assert_eq!(page1.items.len(), 15);
        assert_eq!(page1.total_pages, 2);

        let page2 = paginate_clients(clients.clone(), 2, 15);
        assert_eq!(page2.items.len(), 1);

        let clamped = paginate_clients(clients.clone(), 5, 15);
        assert_eq!(clamped.page, 2);
        assert_eq!(clamped.items.len(), 1);

        let low = paginate_clients(clients, 0, 15);
        assert_eq!(low.page, 1);
    }

    #[test]
    fn capability_probe_runs_once_and_falls_back_to_aggregation() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct NoClientCapability {
            probes: AtomicUsize,
        }

        impl ClientLister for NoClientCapability {
            fn list_clients(
                &self,
                _tenant_id: &str,
            ) -> crate::repository::errors::RepositoryResult<Vec<VirtualClient>> {
                self.probes.fetch_add(1, Ordering::SeqCst);
                Err(RepositoryError::NotFound)
            }
        }

        impl TicketReader for NoClientCapability {
            fn get_ticket_by_id(
                &self,
                _ticket_id: &str,
                _tenant_id: &str,
            ) -> crate::repository::errors::RepositoryResult<Option<Ticket>> {
                Ok(None)
            }

            fn list_tickets(
                &self,
                _query: TicketListQuery,
            ) -> crate::repository::errors::RepositoryResult<(usize, Vec<Ticket>)> {
                Ok((1, vec![ticket(Some("Ana"), Some("1"), Some(1))]))
            }
        }

        let repo = NoClientCapability {
            probes: AtomicUsize::new(0),
        };
        let probe = ClientSourceProbe::new();

        let first = load_clients(&repo, &probe, "tenant-1");
        let second = load_clients(&repo, &probe, "tenant-1");

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(probe.cached(), Some(ClientSource::DerivedFromTickets));
        assert_eq!(repo.probes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transport_failure_degrades_to_empty_and_keeps_probing() {
        struct Unreachable;

        impl ClientLister for Unreachable {
            fn list_clients(
                &self,
                _tenant_id: &str,
            ) -> crate::repository::errors::RepositoryResult<Vec<VirtualClient>> {
                Err(RepositoryError::ConnectionError("down".to_string()))
            }
        }

        impl TicketReader for Unreachable {
            fn get_ticket_by_id(
                &self,
                _ticket_id: &str,
                _tenant_id: &str,
            ) -> crate::repository::errors::RepositoryResult<Option<Ticket>> {
                Ok(None)
            }

            fn list_tickets(
                &self,
                _query: TicketListQuery,
            ) -> crate::repository::errors::RepositoryResult<(usize, Vec<Ticket>)> {
                Err(RepositoryError::ConnectionError("down".to_string()))
            }
        }

        let probe = ClientSourceProbe::new();
        assert!(load_clients(&Unreachable, &probe, "tenant-1").is_empty());
        // An unreachable collaborator must not pin the strategy.
        assert_eq!(probe.cached(), None);
    }

    #[test]
    fn empty_collection_paginates_to_one_empty_page() {
        let page = paginate_clients(Vec::new(), 3, 15);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }
}
