//! Derived client identity.
//!
//! The backend keeps no client table. A client exists only as the set of
//! tickets sharing the same `(name, phone)` pair, so the identity itself is
//! a value type computed from ticket fields.

use chrono::NaiveDateTime;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::domain::ticket::Ticket;

/// Substituted for a missing or empty name/phone so every ticket maps to a key.
pub const IDENTITY_PLACEHOLDER: &str = "-";

/// Separates name from phone inside an encoded key. Decode splits at the
/// first occurrence, so a `|` inside the name shifts the boundary while one
/// inside the phone survives.
pub const KEY_DELIMITER: char = '|';

/// Characters escaped when the key travels as a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%')
    .add(b'|');

/// Composite identity of a derived client.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientKey {
    pub name: String,
    pub phone: String,
}

impl ClientKey {
    /// Builds a key from raw ticket fields, defaulting absent or empty
    /// values to the placeholder so the mapping ticket -> identity is total.
    pub fn new(name: Option<&str>, phone: Option<&str>) -> Self {
        Self {
            name: normalize(name),
            phone: normalize(phone),
        }
    }

    /// Serializes the identity as `name|phone`.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.name, KEY_DELIMITER, self.phone)
    }

    /// Percent-encoded form, safe to embed in a URL path segment.
    pub fn encoded_url(&self) -> String {
        utf8_percent_encode(&self.encode(), PATH_SEGMENT).to_string()
    }

    /// Parses a key, percent-decoding first so keys that arrived through a
    /// URL segment and keys built in memory decode identically.
    ///
    /// A key without delimiter decodes to `(whole_string, "-")` rather than
    /// failing; the selection it names is simply empty.
    pub fn decode(raw: &str) -> Self {
        let decoded = percent_decode_str(raw).decode_utf8_lossy();
        match decoded.split_once(KEY_DELIMITER) {
            Some((name, phone)) => Self::new(Some(name), Some(phone)),
            None => Self::new(Some(&decoded), None),
        }
    }

    /// Whether the given ticket belongs to this identity.
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self == &Self::from(ticket)
    }
}

impl From<&Ticket> for ClientKey {
    fn from(ticket: &Ticket) -> Self {
        Self::new(ticket.client_name.as_deref(), ticket.client_phone.as_deref())
    }
}

fn normalize(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => IDENTITY_PLACEHOLDER.to_string(),
    }
}

/// A client record derived from tickets during one aggregation pass.
///
/// Never persisted; `created_at` is the earliest creation date seen across
/// member tickets and `email` has no source of truth.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct VirtualClient {
    /// Serialized [`ClientKey`], used as the row identity in views and URLs.
    pub client_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl VirtualClient {
    pub fn new(key: &ClientKey, created_at: Option<NaiveDateTime>) -> Self {
        Self {
            client_id: key.encode(),
            name: key.name.clone(),
            phone: key.phone.clone(),
            email: None,
            created_at,
        }
    }

    /// URL-safe form of the identity for links to the detail page.
    pub fn encoded_url(&self) -> String {
        utf8_percent_encode(&self.client_id, PATH_SEGMENT).to_string()
    }
}
