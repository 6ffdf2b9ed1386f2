use async_trait::async_trait;

use crate::api::client::ApiRequest;

/// Fetches at most a single identifier, just enough to prove the collection is reachable with
/// the configured credentials.
pub(crate) struct PingRequest;

#[async_trait]
impl ApiRequest for PingRequest {
    type Response = Vec<serde_json::Value>;

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("select", "id".to_string()), ("limit", "1".to_string())]
    }
}
