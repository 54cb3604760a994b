// ── Concrete view definitions ──
//
// Default column sets and row-id accessors for the three list views.
// Both front-ends and the CSV export build their tables from these, so
// a column added here shows up everywhere at once.

use backdesk_api::{ComplianceRecord, CustomerRecord, RewardRecord};
use chrono::{DateTime, Utc};

use crate::table::columns::ColumnSpec;

fn fmt_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

fn fmt_opt_date(ts: Option<&DateTime<Utc>>) -> String {
    ts.map_or_else(|| "-".into(), fmt_date)
}

fn fmt_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn fmt_money(amount: Option<f64>) -> String {
    amount.map_or_else(|| "-".into(), |a| format!("{a:.2}"))
}

pub mod compliance {
    use super::{ColumnSpec, ComplianceRecord, fmt_date, fmt_duration};

    /// Settings namespace and per-page key for this view.
    pub const NAME: &str = "compliance";

    pub fn row_id(r: &ComplianceRecord) -> &str {
        &r.id
    }

    pub fn columns() -> Vec<ColumnSpec<ComplianceRecord>> {
        vec![
            ColumnSpec {
                id: "customer",
                label: "Customer",
                sortable: true,
                filter_field: None,
                render: |r| {
                    r.customer_name
                        .clone()
                        .unwrap_or_else(|| r.customer_id.clone())
                },
            },
            ColumnSpec {
                id: "agent",
                label: "Agent",
                sortable: true,
                filter_field: Some("agent"),
                render: |r| r.agent.clone().unwrap_or_else(|| "-".into()),
            },
            ColumnSpec {
                id: "status",
                label: "Status",
                sortable: true,
                filter_field: Some("status"),
                render: |r| r.status.clone(),
            },
            ColumnSpec {
                id: "score",
                label: "Score",
                sortable: true,
                filter_field: None,
                render: |r| r.score.map_or_else(|| "-".into(), |s| format!("{s:.1}")),
            },
            ColumnSpec {
                id: "started",
                label: "Call started",
                sortable: true,
                filter_field: None,
                render: |r| fmt_date(&r.call_started_at),
            },
            ColumnSpec {
                id: "duration",
                label: "Duration",
                sortable: true,
                filter_field: None,
                render: |r| fmt_duration(r.duration_secs),
            },
            ColumnSpec {
                id: "flagged",
                label: "Flagged",
                sortable: false,
                filter_field: None,
                render: |r| if r.flagged { "yes" } else { "" }.into(),
            },
        ]
    }
}

pub mod customers {
    use super::{ColumnSpec, CustomerRecord, fmt_date, fmt_money, fmt_opt_date};

    pub const NAME: &str = "customers";

    pub fn row_id(r: &CustomerRecord) -> &str {
        &r.id
    }

    pub fn columns() -> Vec<ColumnSpec<CustomerRecord>> {
        vec![
            ColumnSpec {
                id: "name",
                label: "Name",
                sortable: true,
                filter_field: None,
                render: |r| r.name.clone(),
            },
            ColumnSpec {
                id: "email",
                label: "Email",
                sortable: true,
                filter_field: None,
                render: |r| r.email.clone().unwrap_or_else(|| "-".into()),
            },
            ColumnSpec {
                id: "country",
                label: "Country",
                sortable: true,
                filter_field: Some("country"),
                render: |r| r.country.clone().unwrap_or_else(|| "-".into()),
            },
            ColumnSpec {
                id: "status",
                label: "Status",
                sortable: true,
                filter_field: Some("status"),
                render: |r| r.status.clone(),
            },
            ColumnSpec {
                id: "labels",
                label: "Labels",
                sortable: false,
                filter_field: None,
                render: |r| {
                    if r.label_ids.is_empty() {
                        String::new()
                    } else {
                        r.label_ids
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(",")
                    }
                },
            },
            ColumnSpec {
                id: "balance",
                label: "Balance",
                sortable: true,
                filter_field: None,
                render: |r| fmt_money(r.balance),
            },
            ColumnSpec {
                id: "created",
                label: "Created",
                sortable: true,
                filter_field: None,
                render: |r| fmt_date(&r.created_at),
            },
            ColumnSpec {
                id: "last_contact",
                label: "Last contact",
                sortable: true,
                filter_field: None,
                render: |r| fmt_opt_date(r.last_contact_at.as_ref()),
            },
        ]
    }
}

pub mod rewards {
    use super::{ColumnSpec, RewardRecord, fmt_date};

    pub const NAME: &str = "rewards";

    pub fn row_id(r: &RewardRecord) -> &str {
        &r.id
    }

    pub fn columns() -> Vec<ColumnSpec<RewardRecord>> {
        vec![
            ColumnSpec {
                id: "broker",
                label: "Broker",
                sortable: true,
                filter_field: None,
                render: |r| r.broker_name.clone(),
            },
            ColumnSpec {
                id: "tier",
                label: "Tier",
                sortable: true,
                filter_field: Some("tier"),
                render: |r| r.tier.clone(),
            },
            ColumnSpec {
                id: "rate",
                label: "Rate %",
                sortable: true,
                filter_field: None,
                render: |r| format!("{:.2}", r.rate_pct),
            },
            ColumnSpec {
                id: "active",
                label: "Active",
                sortable: true,
                filter_field: None,
                render: |r| if r.active { "yes" } else { "no" }.into(),
            },
            ColumnSpec {
                id: "referred",
                label: "Referred",
                sortable: true,
                filter_field: None,
                render: |r| r.referred_count.to_string(),
            },
            ColumnSpec {
                id: "paid",
                label: "Total paid",
                sortable: true,
                filter_field: None,
                render: |r| format!("{:.2}", r.total_paid),
            },
            ColumnSpec {
                id: "updated",
                label: "Updated",
                sortable: true,
                filter_field: None,
                render: |r| fmt_date(&r.updated_at),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formats_minutes_seconds() {
        assert_eq!(fmt_duration(412), "6:52");
        assert_eq!(fmt_duration(59), "0:59");
    }
}
