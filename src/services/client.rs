//! Detail view and write path of a derived client.
//!
//! The detail view re-derives the ticket subset behind one identity; the
//! write path fans a field edit out to every member ticket. There is no
//! transaction across tickets, so a partially applied edit is possible and
//! is reported as such instead of being hidden.

use std::thread;

use validator::Validate;

use crate::domain::client::{ClientKey, VirtualClient};
use crate::domain::ticket::{Ticket, TicketPatch};
use crate::dto::client::ClientPageData;
use crate::forms::client::SaveClientForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{TicketListQuery, TicketReader, TicketWriter};
use crate::services::{ServiceError, ServiceResult, ensure_staff};

/// Result of one per-ticket write during propagation.
#[derive(Debug)]
pub struct PropagationOutcome {
    pub ticket_id: String,
    pub result: RepositoryResult<()>,
}

/// Per-ticket outcomes of a fan-out edit, so callers can surface partial
/// success or retry the failed subset.
#[derive(Debug, Default)]
pub struct PropagationReport {
    pub outcomes: Vec<PropagationOutcome>,
}

impl PropagationReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &PropagationOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Derives the detail view of one identity from a ticket snapshot.
///
/// Pure and idempotent. An identity matching zero tickets yields an empty
/// view rather than an error: its tickets may have been renamed concurrently.
pub fn resolve_client_detail(key: &ClientKey, tickets: Vec<Ticket>) -> ClientPageData {
    let tickets: Vec<Ticket> = tickets.into_iter().filter(|t| key.matches(t)).collect();

    let first_seen = tickets.iter().filter_map(|t| t.created_at).min();
    let last_activity = tickets.iter().filter_map(|t| t.last_activity()).max();

    ClientPageData {
        client: VirtualClient::new(key, first_seen),
        ticket_count: tickets.len(),
        first_seen,
        last_activity,
        tickets,
    }
}

/// Loads the client detail page for an encoded identity key.
pub fn load_client_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    raw_key: &str,
) -> ServiceResult<ClientPageData>
where
    R: TicketReader + ?Sized,
{
    ensure_staff(user)?;

    let key = ClientKey::decode(raw_key);
    let tickets = repo
        .list_tickets(TicketListQuery::new(&user.tenant_id))
        .map(|(_total, tickets)| tickets)
        .unwrap_or_else(|e| {
            log::error!("Failed to list tickets for client detail: {e}");
            Vec::new()
        });

    Ok(resolve_client_detail(&key, tickets))
}

/// Applies one logical edit across every ticket of the selection.
///
/// All updates are dispatched concurrently and joined before returning.
/// Completed writes are never rolled back when a sibling write fails; the
/// report carries the per-ticket outcomes.
pub fn propagate_client_edit<R>(
    repo: &R,
    tenant_id: &str,
    tickets: &[Ticket],
    patch: &TicketPatch,
) -> PropagationReport
where
    R: TicketWriter + Sync + ?Sized,
{
    let outcomes = thread::scope(|scope| {
        let handles: Vec<_> = tickets
            .iter()
            .map(|ticket| {
                scope.spawn(move || repo.update_ticket(&ticket.ticket_id, tenant_id, patch))
            })
            .collect();

        handles
            .into_iter()
            .zip(tickets)
            .map(|(handle, ticket)| PropagationOutcome {
                ticket_id: ticket.ticket_id.clone(),
                result: handle
                    .join()
                    .unwrap_or_else(|_| {
                        Err(RepositoryError::Unexpected(
                            "ticket update worker panicked".to_string(),
                        ))
                    })
                    .map(|_updated| ()),
            })
            .collect()
    });

    PropagationReport { outcomes }
}

/// Validates the edit form, re-derives the member selection and fans the
/// edit out. Fetching the selection is part of the write path, so a failed
/// fetch surfaces as an error instead of degrading to an empty view.
pub fn save_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SaveClientForm,
) -> ServiceResult<PropagationReport>
where
    R: TicketReader + TicketWriter + Sync + ?Sized,
{
    ensure_staff(user)?;

    if let Err(e) = form.validate() {
        log::error!("Failed to validate client form: {e}");
        return Err(ServiceError::Form(e.to_string()));
    }

    let key = ClientKey::decode(&form.client_id);
    let (_total, tickets) = repo.list_tickets(TicketListQuery::new(&user.tenant_id))?;
    let members: Vec<Ticket> = tickets.into_iter().filter(|t| key.matches(t)).collect();

    let patch = TicketPatch::from(&form);
    if patch.is_empty() || members.is_empty() {
        return Ok(PropagationReport::default());
    }

    Ok(propagate_client_edit(
        repo,
        &user.tenant_id,
        &members,
        &patch,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn member(id: &str, created: u32, updated: Option<u32>) -> Ticket {
        Ticket {
            ticket_id: id.to_string(),
            client_name: Some("Ana Pop".to_string()),
            client_phone: Some("0722111222".to_string()),
            created_at: Some(date(created)),
            updated_at: updated.map(date),
            ..Ticket::default()
        }
    }

    #[test]
    fn detail_selects_only_matching_tickets() {
        let key = ClientKey::new(Some("Ana Pop"), Some("0722111222"));
        let tickets = vec![
            member("BMP1", 3, None),
            Ticket {
                ticket_id: "BMP2".to_string(),
                client_name: Some("Ion".to_string()),
                client_phone: Some("0733000111".to_string()),
                created_at: Some(date(1)),
                ..Ticket::default()
            },
            member("BMP3", 5, Some(9)),
        ];

        let page = resolve_client_detail(&key, tickets);
        assert_eq!(page.ticket_count, 2);
        assert_eq!(page.first_seen, Some(date(3)));
        assert_eq!(page.last_activity, Some(date(9)));
        assert_eq!(page.client.created_at, Some(date(3)));
    }

    #[test]
    fn detail_is_idempotent() {
        let key = ClientKey::new(Some("Ana Pop"), Some("0722111222"));
        let tickets = vec![member("BMP1", 3, Some(4)), member("BMP2", 2, None)];
        let a = resolve_client_detail(&key, tickets.clone());
        let b = resolve_client_detail(&key, tickets);
        assert_eq!(a.tickets, b.tickets);
        assert_eq!(a.first_seen, b.first_seen);
        assert_eq!(a.last_activity, b.last_activity);
    }

    #[test]
    fn unknown_identity_yields_empty_view_not_error() {
        let key = ClientKey::decode("Nobody|000");
        let page = resolve_client_detail(&key, vec![member("BMP1", 1, None)]);
        assert_eq!(page.ticket_count, 0);
        assert_eq!(page.first_seen, None);
        assert_eq!(page.last_activity, None);
    }

    #[test]
    fn last_activity_falls_back_to_created_at() {
        let key = ClientKey::new(Some("Ana Pop"), Some("0722111222"));
        let page = resolve_client_detail(&key, vec![member("BMP1", 6, None)]);
        assert_eq!(page.last_activity, Some(date(6)));
    }

    #[test]
    fn propagation_reports_partial_failure_without_rollback() {
        use std::sync::Mutex;

        struct FlakyWriter {
            updated: Mutex<Vec<String>>,
        }

        impl TicketWriter for FlakyWriter {
            fn create_tickets(
                &self,
                _new_tickets: &[crate::domain::ticket::NewTicket],
            ) -> RepositoryResult<usize> {
                Ok(0)
            }

            fn update_ticket(
                &self,
                ticket_id: &str,
                _tenant_id: &str,
                _patch: &TicketPatch,
            ) -> RepositoryResult<Ticket> {
                if ticket_id == "BMP2" {
                    return Err(RepositoryError::NotFound);
                }
                self.updated
                    .lock()
                    .expect("lock poisoned")
                    .push(ticket_id.to_string());
                Ok(Ticket::default())
            }

            fn delete_ticket(&self, _ticket_id: &str, _tenant_id: &str) -> RepositoryResult<()> {
                Ok(())
            }
        }

        let repo = FlakyWriter {
            updated: Mutex::new(Vec::new()),
        };
        let tickets = vec![
            member("BMP1", 1, None),
            member("BMP2", 2, None),
            member("BMP3", 3, None),
        ];
        let patch = TicketPatch {
            observations: Some("piesă comandată".to_string()),
            ..TicketPatch::default()
        };

        let report = propagate_client_edit(&repo, "tenant-1", &tickets, &patch);

        assert!(!report.is_complete());
        assert_eq!(report.succeeded(), 2);
        let failed: Vec<_> = report.failures().map(|o| o.ticket_id.as_str()).collect();
        assert_eq!(failed, vec!["BMP2"]);

        let mut updated = repo.updated.lock().expect("lock poisoned").clone();
        updated.sort();
        assert_eq!(updated, vec!["BMP1", "BMP3"]);
    }
}
