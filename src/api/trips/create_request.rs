use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};

use crate::api::client::{ApiError, ApiRequest};
use crate::api::models::TripRow;

pub(crate) struct CreateRequest {
    row: TripRow,
}

impl CreateRequest {
    pub(crate) fn new(row: TripRow) -> Self {
        Self { row }
    }
}

#[async_trait]
impl ApiRequest for CreateRequest {
    type Response = Vec<TripRow>;

    const METHOD: Method = Method::POST;
    const RETURN_REPRESENTATION: bool = true;

    async fn add_payload(
        &self,
        request_builder: RequestBuilder,
    ) -> Result<RequestBuilder, ApiError> {
        Ok(request_builder.json(&self.row))
    }
}
