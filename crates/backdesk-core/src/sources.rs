// ── List sources ──
//
// Adapters binding each entity's query endpoint to the generic
// [`ListSource`] the table session coordinates against. Each holds a
// shared `ApiClient`; two views fetching the same resource do not share
// any cache -- only the backend.

use std::sync::Arc;

use backdesk_api::{ApiClient, ComplianceRecord, CustomerRecord, ListPage, ListQuery, RewardRecord};

use crate::table::session::ListSource;

/// Compliance call-review list endpoint.
#[derive(Clone)]
pub struct ComplianceSource {
    api: Arc<ApiClient>,
}

impl ComplianceSource {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

impl ListSource for ComplianceSource {
    type Row = ComplianceRecord;

    fn fetch(
        &self,
        query: ListQuery,
    ) -> impl Future<Output = Result<ListPage<Self::Row>, backdesk_api::Error>> + Send {
        let api = Arc::clone(&self.api);
        async move { api.query_compliances(&query).await }
    }
}

/// Customer list endpoint.
#[derive(Clone)]
pub struct CustomerSource {
    api: Arc<ApiClient>,
}

impl CustomerSource {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

impl ListSource for CustomerSource {
    type Row = CustomerRecord;

    fn fetch(
        &self,
        query: ListQuery,
    ) -> impl Future<Output = Result<ListPage<Self::Row>, backdesk_api::Error>> + Send {
        let api = Arc::clone(&self.api);
        async move { api.query_customers(&query).await }
    }
}

/// IB reward list endpoint.
#[derive(Clone)]
pub struct RewardSource {
    api: Arc<ApiClient>,
}

impl RewardSource {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

impl ListSource for RewardSource {
    type Row = RewardRecord;

    fn fetch(
        &self,
        query: ListQuery,
    ) -> impl Future<Output = Result<ListPage<Self::Row>, backdesk_api::Error>> + Send {
        let api = Arc::clone(&self.api);
        async move { api.query_rewards(&query).await }
    }
}
