//! Async client for the Backdesk CRM back-office REST API.
//!
//! - **[`ApiClient`]** -- transport wrapper: bearer-token auth, URL
//!   construction, error-body decoding. Endpoint groups are inherent
//!   methods split across modules (compliance, customers, rewards,
//!   reference data).
//! - **[`ListQuery`]** -- the single request descriptor for every list
//!   endpoint: 1-based page, page size, optional text query, optional
//!   sorting map, flattened filter fields.
//! - **[`BulkScope`]** -- bulk mutation targeting: enumerated ids or
//!   "all rows matching the current filters" without id enumeration.
//!
//! Higher layers (`backdesk-core`) own the typed filter model and state
//! machinery; this crate stays at the wire.

mod client;
mod compliance;
mod customers;
mod reference;
mod rewards;

pub mod error;
pub mod models;
pub mod query;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::{Announcement, ComplianceRecord, CustomerRecord, Label, ListPage, RewardRecord};
pub use query::{BulkScope, LabelAction, ListQuery};
pub use transport::{TlsMode, TransportConfig};
