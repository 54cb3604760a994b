//! Customer endpoints: list query plus the bulk mutation surface
//! (label assignment, announcement assignment, deletion).

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CustomerListResponse, CustomerRecord, ListPage};
use crate::query::{
    AnnouncementBulkRequest, BulkScope, DeleteBulkRequest, LabelAction, LabelBulkRequest,
    ListQuery,
};

impl ApiClient {
    /// Query customers: `POST customers/query`.
    pub async fn query_customers(
        &self,
        query: &ListQuery,
    ) -> Result<ListPage<CustomerRecord>, Error> {
        let resp: CustomerListResponse = self.post("customers/query", query).await?;
        Ok(resp.into())
    }

    /// Assign or remove labels on the scoped customers in one batch:
    /// `POST customers/labels`.
    pub async fn mutate_customer_labels(
        &self,
        scope: BulkScope,
        label_ids: Vec<u64>,
        action: LabelAction,
    ) -> Result<(), Error> {
        self.post_no_content(
            "customers/labels",
            &LabelBulkRequest {
                scope,
                label_ids,
                action,
            },
        )
        .await
    }

    /// Attach an announcement to the scoped customers:
    /// `POST customers/announcement`.
    pub async fn set_customer_announcement(
        &self,
        scope: BulkScope,
        announcement_id: u64,
    ) -> Result<(), Error> {
        self.post_no_content(
            "customers/announcement",
            &AnnouncementBulkRequest {
                scope,
                announcement_id,
            },
        )
        .await
    }

    /// Delete the scoped customers: `POST customers/delete`.
    pub async fn delete_customers(&self, scope: BulkScope) -> Result<(), Error> {
        self.post_no_content("customers/delete", &DeleteBulkRequest { scope })
            .await
    }
}
