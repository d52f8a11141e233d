use serde::Deserialize;

use crate::domain::client::VirtualClient;
use crate::pagination::Paginated;

/// Query parameters accepted by the clients index page.
///
/// The UI resets `page` whenever `q` changes; the service additionally
/// clamps any stale page number into range.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Optional search string entered by the user.
    pub q: Option<String>,
    /// Page number requested by the user interface.
    pub page: Option<usize>,
}

/// Data required to render the clients index template.
pub struct ClientsPageData {
    /// Paginated list of derived clients to show in the table.
    pub clients: Paginated<VirtualClient>,
    /// Search query echoed back to the template when present.
    pub search_query: Option<String>,
}
