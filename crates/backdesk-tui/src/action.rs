//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;

use backdesk_api::BulkScope;
use backdesk_core::TableSnapshot;
use backdesk_core::{ComplianceRecord, CustomerRecord, Label, RewardRecord};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// A bulk mutation awaiting execution (and possibly confirmation).
#[derive(Debug, Clone)]
pub enum BulkAction {
    /// Assign/remove labels on customers.
    Relabel {
        scope: BulkScope,
        added: Vec<u64>,
        removed: Vec<u64>,
    },
    /// Attach an announcement to customers.
    Announce { scope: BulkScope, announcement_id: u64 },
    /// Delete customers.
    DeleteCustomers { scope: BulkScope },
    /// Delete compliance records.
    DeleteCompliances { scope: BulkScope },
}

impl BulkAction {
    pub fn scope(&self) -> &BulkScope {
        match self {
            Self::Relabel { scope, .. }
            | Self::Announce { scope, .. }
            | Self::DeleteCustomers { scope }
            | Self::DeleteCompliances { scope } => scope,
        }
    }

    /// Verb used in the confirmation dialog text.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Relabel { .. } => "Relabel",
            Self::Announce { .. } => "Announce to",
            Self::DeleteCustomers { .. } | Self::DeleteCompliances { .. } => "Delete",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relabel { added, removed, .. } => {
                write!(f, "relabel (+{} -{})", added.len(), removed.len())
            }
            Self::Announce { announcement_id, .. } => {
                write!(f, "announce #{announcement_id}")
            }
            Self::DeleteCustomers { .. } => f.write_str("delete customers"),
            Self::DeleteCompliances { .. } => f.write_str("delete compliance records"),
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),

    // ── Data (from table session streams) ─────────────────────────
    ComplianceSnapshot(TableSnapshot<ComplianceRecord>),
    CustomersSnapshot(TableSnapshot<CustomerRecord>),
    RewardsSnapshot(TableSnapshot<RewardRecord>),
    LabelsLoaded(Vec<Label>),

    // ── Search ────────────────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    SearchInput(String),

    // ── Bulk actions ──────────────────────────────────────────────
    /// Request a bulk mutation; broad-impact scopes go through the
    /// confirmation dialog first. The second field is the server-reported
    /// total for the current filter, used in the confirmation text.
    RequestBulk(BulkAction, u64),
    ConfirmYes,
    ConfirmNo,
    /// A bulk mutation finished (success or failure message).
    BulkDone {
        screen: ScreenId,
        result: Result<&'static str, String>,
    },

    // ── Help / notifications ──────────────────────────────────────
    ToggleHelp,
    Notify(Notification),
    DismissNotification,
}
