//! Reference-data endpoints: labels and announcements.
//!
//! Both are small unpaginated lists fetched once per view and used to
//! populate bulk-action pickers.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Announcement, AnnouncementListResponse, Label, LabelListResponse};

impl ApiClient {
    /// Fetch all labels: `GET labels`.
    pub async fn list_labels(&self) -> Result<Vec<Label>, Error> {
        let resp: LabelListResponse = self.get("labels").await?;
        Ok(resp.labels)
    }

    /// Fetch all announcements: `GET announcements`.
    pub async fn list_announcements(&self) -> Result<Vec<Announcement>, Error> {
        let resp: AnnouncementListResponse = self.get("announcements").await?;
        Ok(resp.announcements)
    }
}
