//! Client for the hosted REST collection holding the trips. The remote is addressed as
//! `{base_url}/rest/v1/{collection}` and filtered with `column=op.value` query parameters.

pub mod models;
pub mod trips;

pub(crate) mod client;

pub use client::{ApiClient, ApiClientError, ApiError};
