//! Compliance call-review endpoints.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ComplianceListResponse, ComplianceRecord, ListPage};
use crate::query::{BulkScope, DeleteBulkRequest, ListQuery};

impl ApiClient {
    /// Query compliance records: `POST compliances/query`.
    pub async fn query_compliances(
        &self,
        query: &ListQuery,
    ) -> Result<ListPage<ComplianceRecord>, Error> {
        let resp: ComplianceListResponse = self.post("compliances/query", query).await?;
        Ok(resp.into())
    }

    /// Delete compliance records in bulk: `POST compliances/delete`.
    pub async fn delete_compliances(&self, scope: BulkScope) -> Result<(), Error> {
        self.post_no_content("compliances/delete", &DeleteBulkRequest { scope })
            .await
    }
}
