//! Introducing-broker reward endpoints.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ListPage, RewardListResponse, RewardRecord};
use crate::query::ListQuery;

impl ApiClient {
    /// Query IB reward configurations: `POST rewards/query`.
    pub async fn query_rewards(&self, query: &ListQuery) -> Result<ListPage<RewardRecord>, Error> {
        let resp: RewardListResponse = self.post("rewards/query", query).await?;
        Ok(resp.into())
    }
}
