use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::api::client::ApiError;

/// A single call against the remote collection. Implementors describe the method, the filters
/// and the body, the client takes care of addressing and credentials.
#[async_trait]
pub(crate) trait ApiRequest: Send + Sync {
    type Response: FromReqwestResponse;

    const METHOD: Method = Method::GET;

    /// Ask the remote to echo the affected rows back in the response body.
    const RETURN_REPRESENTATION: bool = false;

    async fn add_payload(
        &self,
        request_builder: RequestBuilder,
    ) -> Result<RequestBuilder, ApiError> {
        Ok(request_builder)
    }

    /// Query parameters appended to the collection URL, in order.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

#[async_trait]
pub(crate) trait FromReqwestResponse: Sized {
    async fn from_response(response: Response) -> Result<Self, ApiError>;
}

#[async_trait]
impl<T> FromReqwestResponse for Vec<T>
where
    T: DeserializeOwned + Send,
{
    async fn from_response(response: Response) -> Result<Self, ApiError> {
        let body = response.bytes().await?;

        // Some deployments answer representation requests with an empty body
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl FromReqwestResponse for () {
    async fn from_response(response: Response) -> Result<Self, ApiError> {
        // Drain the body so the connection can be reused
        let _ = response.bytes().await?;
        Ok(())
    }
}
