use async_trait::async_trait;

use crate::api::client::ApiRequest;
use crate::api::models::TripRow;

pub(crate) struct ListRequest;

#[async_trait]
impl ApiRequest for ListRequest {
    type Response = Vec<TripRow>;

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("select", "*".to_string()),
            ("order", "criado_em.desc".to_string()),
        ]
    }
}
