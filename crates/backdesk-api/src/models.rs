// Wire types for the Backdesk REST API.
//
// List responses carry the rows under an entity-specific plural key plus
// `total_count`; each response struct converts into the generic
// `ListPage<T>` so callers never touch the envelope. Fields use
// `#[serde(default)]` liberally because the backend omits nulls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single page of rows plus the server-reported total across all pages.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
}

// ── Compliance ───────────────────────────────────────────────────────

/// A compliance call-review record from `compliances/query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub id: String,
    pub customer_id: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    /// Review status: `pending`, `approved`, `rejected`, `escalated`.
    pub status: String,
    #[serde(default)]
    pub score: Option<f64>,
    pub call_started_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_secs: u64,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub notes: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ComplianceListResponse {
    pub compliances: Vec<ComplianceRecord>,
    pub total_count: u64,
}

impl From<ComplianceListResponse> for ListPage<ComplianceRecord> {
    fn from(r: ComplianceListResponse) -> Self {
        Self {
            rows: r.compliances,
            total_count: r.total_count,
        }
    }
}

// ── Customer ─────────────────────────────────────────────────────────

/// A customer record from `customers/query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Lifecycle status: `lead`, `active`, `dormant`, `closed`.
    pub status: String,
    #[serde(default)]
    pub label_ids: Vec<u64>,
    #[serde(default)]
    pub announcement_id: Option<u64>,
    #[serde(default)]
    pub balance: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_contact_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CustomerListResponse {
    pub customers: Vec<CustomerRecord>,
    pub total_count: u64,
}

impl From<CustomerListResponse> for ListPage<CustomerRecord> {
    fn from(r: CustomerListResponse) -> Self {
        Self {
            rows: r.customers,
            total_count: r.total_count,
        }
    }
}

// ── IB reward ────────────────────────────────────────────────────────

/// An introducing-broker reward configuration from `rewards/query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardRecord {
    pub id: String,
    pub broker_name: String,
    /// Reward tier name (`bronze`, `silver`, `gold`, ...).
    pub tier: String,
    pub rate_pct: f64,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub referred_count: u64,
    #[serde(default)]
    pub total_paid: f64,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RewardListResponse {
    pub rewards: Vec<RewardRecord>,
    pub total_count: u64,
}

impl From<RewardListResponse> for ListPage<RewardRecord> {
    fn from(r: RewardListResponse) -> Self {
        Self {
            rows: r.rewards,
            total_count: r.total_count,
        }
    }
}

// ── Reference data ───────────────────────────────────────────────────

/// A customer label (tag) usable in bulk assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LabelListResponse {
    pub labels: Vec<Label>,
}

/// An announcement assignable to customers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnnouncementListResponse {
    pub announcements: Vec<Announcement>,
}
