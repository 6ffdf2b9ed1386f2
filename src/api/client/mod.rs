mod error;
mod traits;

pub use error::{ApiClientError, ApiError};
pub(crate) use traits::{ApiRequest, FromReqwestResponse};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Url};

use crate::config::{ApiKey, SyncConfig};

/// The REST path prefix the remote service exposes its tables under.
const REST_PATH: [&str; 2] = ["rest", "v1"];

/// HTTP client bound to a single remote collection of trips, authenticating every request with
/// the static API key from the configuration.
#[derive(Clone)]
pub struct ApiClient {
    api_key: ApiKey,
    collection_url: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(config: &SyncConfig) -> Result<Self, ApiClientError> {
        let collection_url = collection_url(&config.base_url, &config.collection)?;
        let client = default_reqwest_client()?;

        Ok(Self {
            api_key: config.api_key.clone(),
            collection_url,
            client,
        })
    }

    pub(crate) async fn call<R: ApiRequest>(&self, request: R) -> Result<R::Response, ApiError> {
        let mut url = self.collection_url.clone();

        let query = request.query();
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.iter() {
                pairs.append_pair(key, value);
            }
        }

        tracing::debug!(method = %R::METHOD, %url, "sending request to remote collection");

        let key = self.api_key.expose();
        let mut request_builder = self
            .client
            .request(R::METHOD, url)
            .header("apikey", key)
            .bearer_auth(key);

        if R::RETURN_REPRESENTATION {
            request_builder = request_builder.header("Prefer", "return=representation");
        }

        let request_builder = request.add_payload(request_builder).await?;
        let response = request_builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|err| format!("<unreadable body: {err}>"));

            return Err(ApiError::Message {
                status_code: status.as_u16(),
                message,
            });
        }

        R::Response::from_response(response).await
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }
}

fn collection_url(base_url: &Url, collection: &str) -> Result<Url, ApiClientError> {
    let mut url = base_url.clone();

    url.path_segments_mut()
        .map_err(|_| ApiClientError::UnsupportedBaseUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(REST_PATH)
        .push(collection);

    Ok(url)
}

fn default_reqwest_client() -> Result<Client, ApiClientError> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert("Accept", HeaderValue::from_static("application/json"));

    let client = Client::builder()
        .default_headers(default_headers)
        .user_agent(crate::version::user_agent())
        .build()?;

    Ok(client)
}
