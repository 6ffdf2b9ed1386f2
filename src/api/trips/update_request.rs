use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};

use crate::api::client::{ApiError, ApiRequest};
use crate::api::models::TripRow;

pub(crate) struct UpdateRequest {
    id: String,
    row: TripRow,
}

impl UpdateRequest {
    pub(crate) fn new(id: String, row: TripRow) -> Self {
        Self { id, row }
    }
}

#[async_trait]
impl ApiRequest for UpdateRequest {
    type Response = Vec<TripRow>;

    const METHOD: Method = Method::PATCH;
    const RETURN_REPRESENTATION: bool = true;

    async fn add_payload(
        &self,
        request_builder: RequestBuilder,
    ) -> Result<RequestBuilder, ApiError> {
        Ok(request_builder.json(&self.row))
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("id", format!("eq.{}", self.id))]
    }
}
