use async_trait::async_trait;
use reqwest::Method;

use crate::api::client::ApiRequest;

pub(crate) struct DeleteRequest {
    id: String,
}

impl DeleteRequest {
    pub(crate) fn new(id: String) -> Self {
        Self { id }
    }
}

#[async_trait]
impl ApiRequest for DeleteRequest {
    type Response = ();

    const METHOD: Method = Method::DELETE;

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("id", format!("eq.{}", self.id))]
    }
}
