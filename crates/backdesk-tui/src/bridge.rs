//! Session bridge -- connects table sessions to TUI actions.
//!
//! Builds the three table sessions and spawns forwarding tasks:
//! every published snapshot and every recoverable table event becomes
//! an [`Action`] on the TUI's action channel. Shuts down cleanly on
//! cancellation.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use backdesk_api::ApiClient;
use backdesk_core::table::{SessionOptions, TableEvent, TableSnapshot};
use backdesk_core::{
    ComplianceSource, CustomerSource, RewardSource, Settings, TableSession, views,
};

use crate::action::{Action, Notification};

/// Bulk operations are capped server-side; mirror the cap client-side
/// so the selection model reports overruns before a request happens.
const MAX_SELECTION: usize = 5000;

/// Handles to the per-view sessions, shared with the screens.
pub struct SessionHandles {
    pub compliance: TableSession<ComplianceSource>,
    pub customers: TableSession<CustomerSource>,
    pub rewards: TableSession<RewardSource>,
}

/// Build all sessions, issue their initial fetches, and spawn the
/// forwarding tasks.
pub fn build_sessions(
    api: &Arc<ApiClient>,
    settings: &Settings,
    action_tx: &mpsc::UnboundedSender<Action>,
    cancel: &CancellationToken,
) -> SessionHandles {
    let options = SessionOptions {
        max_selection: Some(MAX_SELECTION),
        ..SessionOptions::default()
    };

    let (compliance, snap, events) = TableSession::new(
        ComplianceSource::new(Arc::clone(api)),
        views::compliance::NAME,
        settings.clone(),
        options.clone(),
    );
    forward(snap, events, action_tx.clone(), cancel.clone(), Action::ComplianceSnapshot);

    let (customers, snap, events) = TableSession::new(
        CustomerSource::new(Arc::clone(api)),
        views::customers::NAME,
        settings.clone(),
        options.clone(),
    );
    forward(snap, events, action_tx.clone(), cancel.clone(), Action::CustomersSnapshot);

    let (rewards, snap, events) = TableSession::new(
        RewardSource::new(Arc::clone(api)),
        views::rewards::NAME,
        settings.clone(),
        options,
    );
    forward(snap, events, action_tx.clone(), cancel.clone(), Action::RewardsSnapshot);

    // First load for every view.
    compliance.refresh();
    customers.refresh();
    rewards.refresh();

    // Labels populate the relabel prompt; failure is non-fatal.
    spawn_label_fetch(Arc::clone(api), action_tx.clone());

    SessionHandles {
        compliance,
        customers,
        rewards,
    }
}

fn forward<T: Send + Sync + 'static>(
    mut snap_rx: watch::Receiver<TableSnapshot<T>>,
    mut events_rx: mpsc::UnboundedReceiver<TableEvent>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
    wrap: fn(TableSnapshot<T>) -> Action,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => break,

                changed = snap_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snap_rx.borrow_and_update().clone();
                    let _ = action_tx.send(wrap(snapshot));
                }

                event = events_rx.recv() => {
                    let Some(event) = event else { break };
                    let notification = match event {
                        TableEvent::FetchFailed { message } => {
                            Notification::error(format!("fetch failed: {message}"))
                        }
                        TableEvent::SelectionLimit { limit } => {
                            Notification::warning(format!(
                                "selection is capped at {limit} rows"
                            ))
                        }
                    };
                    let _ = action_tx.send(Action::Notify(notification));
                }
            }
        }
        debug!("session bridge shut down");
    });
}

fn spawn_label_fetch(api: Arc<ApiClient>, action_tx: mpsc::UnboundedSender<Action>) {
    tokio::spawn(async move {
        match api.list_labels().await {
            Ok(labels) => {
                let _ = action_tx.send(Action::LabelsLoaded(labels));
            }
            Err(e) => {
                let _ = action_tx.send(Action::Notify(Notification::warning(format!(
                    "labels unavailable: {e}"
                ))));
            }
        }
    });
}
