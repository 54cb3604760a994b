//! Label and announcement listings.

use tabled::Tabled;

use backdesk_api::{Announcement, Label};

use crate::cli::GlobalOpts;
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct LabelRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Color")]
    color: String,
}

impl From<&Label> for LabelRow {
    fn from(l: &Label) -> Self {
        Self {
            id: l.id,
            name: l.name.clone(),
            color: l.color.clone().unwrap_or_default(),
        }
    }
}

pub async fn labels(conn: &Connection, global: &GlobalOpts) -> Result<(), CliError> {
    let labels = conn.api.list_labels().await?;
    let out = output::render_list(&global.output, &labels, |l| LabelRow::from(l), |l| l.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

#[derive(Tabled)]
struct AnnouncementRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
}

impl From<&Announcement> for AnnouncementRow {
    fn from(a: &Announcement) -> Self {
        Self {
            id: a.id,
            title: a.title.clone(),
        }
    }
}

pub async fn announcements(conn: &Connection, global: &GlobalOpts) -> Result<(), CliError> {
    let announcements = conn.api.list_announcements().await?;
    let out = output::render_list(&global.output, &announcements, |a| AnnouncementRow::from(a), |a| {
        a.id.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
