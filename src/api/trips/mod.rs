//! Operations against the remote trip collection. Every function is a single network call, no
//! retries happen at this layer.

mod create_request;
mod delete_request;
mod list_request;
mod ping_request;
mod update_request;

use create_request::CreateRequest;
use delete_request::DeleteRequest;
use list_request::ListRequest;
use ping_request::PingRequest;
use update_request::UpdateRequest;

use crate::api::client::{ApiClient, ApiError};
use crate::api::models::{from_remote_row, to_remote_row};
use crate::trip::Trip;

/// Writes a new trip and returns the record as stored remotely, including the identifier and
/// creation time the remote assigned.
pub async fn create(client: &ApiClient, trip: &Trip) -> Result<Trip, ApiError> {
    let request = CreateRequest::new(to_remote_row(trip));

    let row = client
        .call(request)
        .await?
        .into_iter()
        .next()
        .ok_or(ApiError::MissingRepresentation)?;

    from_remote_row(row)
}

/// Replaces the stored fields of the trip with the provided id.
pub async fn update(client: &ApiClient, id: &str, trip: &Trip) -> Result<Trip, ApiError> {
    let request = UpdateRequest::new(id.to_string(), to_remote_row(trip));

    let row = client
        .call(request)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

    from_remote_row(row)
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.call(DeleteRequest::new(id.to_string())).await
}

/// The full collection, newest first by creation time.
pub async fn list_all(client: &ApiClient) -> Result<Vec<Trip>, ApiError> {
    let rows = client.call(ListRequest).await?;
    let mut trips = Vec::with_capacity(rows.len());

    for row in rows {
        match from_remote_row(row) {
            Ok(trip) => trips.push(trip),
            Err(err) => tracing::warn!("skipping remote trip: {err}"),
        }
    }

    Ok(trips)
}

/// Whether the remote collection currently answers. Never fails, any problem reads as
/// unreachable.
pub async fn ping(client: &ApiClient) -> bool {
    match client.call(PingRequest).await {
        Ok(_) => true,
        Err(err) => {
            tracing::debug!("remote collection unreachable: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use httpmock::Method::{DELETE, GET, PATCH, POST};
    use httpmock::MockServer;
    use serde_json::json;
    use time::OffsetDateTime;

    use crate::config::SyncConfig;
    use crate::trip::{SourceTag, TripInput};

    fn client_for(server: &MockServer) -> ApiClient {
        let config = SyncConfig::new(&server.base_url(), "anon-key").unwrap();
        ApiClient::new(&config).unwrap()
    }

    fn draft() -> Trip {
        let input = TripInput {
            date: "2024-03-15".to_string(),
            time: "08:30".to_string(),
            driver: "Van".to_string(),
            origin: "Plant".to_string(),
            destination: "Airport".to_string(),
            passenger: Some("Ana - 111".to_string()),
            notes: None,
        };

        Trip::draft(&input, Some(OffsetDateTime::now_utc()))
    }

    fn stored_row(id: u64, created: &str) -> serde_json::Value {
        json!({
            "id": id,
            "data": "2024-03-15",
            "horario": "08:30",
            "motorista": "Van",
            "origem": "Plant",
            "destino": "Airport",
            "passageiro": "Ana - 111",
            "observacoes": null,
            "whatsapp_link": "https://api.whatsapp.com/send?text=x",
            "criado_em": created,
            "sincronizado": true
        })
    }

    #[tokio::test]
    async fn test_create_returns_remote_record() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/v1/viagens")
                    .header("apikey", "anon-key")
                    .header("authorization", "Bearer anon-key")
                    .header("prefer", "return=representation")
                    .json_body_partial(r#"{"motorista": "Van", "origem": "Plant", "sincronizado": true}"#);
                then.status(201)
                    .json_body(json!([stored_row(17, "2024-03-10T12:00:00+00:00")]));
            })
            .await;

        let client = client_for(&server);
        let created = create(&client, &draft()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(created.id, "17");
        assert!(created.synced);
        assert_eq!(created.source, SourceTag::Remote);
    }

    #[tokio::test]
    async fn test_create_surfaces_status_and_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/rest/v1/viagens");
                then.status(400).body("null value in column \"data\"");
            })
            .await;

        let client = client_for(&server);
        let err = create(&client, &draft()).await.unwrap_err();

        assert_eq!(err.status_code(), Some(400));
        match err {
            ApiError::Message { message, .. } => assert!(message.contains("null value")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_without_representation() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/rest/v1/viagens");
                then.status(201).body("");
            })
            .await;

        let client = client_for(&server);
        let err = create(&client, &draft()).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingRepresentation));
    }

    #[tokio::test]
    async fn test_update_filters_by_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/rest/v1/viagens")
                    .query_param("id", "eq.17")
                    .header("prefer", "return=representation");
                then.status(200)
                    .json_body(json!([stored_row(17, "2024-03-10T12:00:00+00:00")]));
            })
            .await;

        let client = client_for(&server);
        let updated = update(&client, "17", &draft()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(updated.id, "17");
    }

    #[tokio::test]
    async fn test_update_of_unknown_id() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PATCH).path("/rest/v1/viagens");
                then.status(200).json_body(json!([]));
            })
            .await;

        let client = client_for(&server);
        let err = update(&client, "99", &draft()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(id) if id == "99"));
    }

    #[tokio::test]
    async fn test_delete_filters_by_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/rest/v1/viagens")
                    .query_param("id", "eq.17");
                then.status(204);
            })
            .await;

        let client = client_for(&server);
        delete(&client, "17").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_all_skips_unusable_rows() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/viagens")
                    .query_param("select", "*")
                    .query_param("order", "criado_em.desc");
                then.status(200).json_body(json!([
                    stored_row(2, "2024-03-11T12:00:00+00:00"),
                    {"data": "2024-03-15", "motorista": "Van"},
                    stored_row(1, "2024-03-10T12:00:00+00:00"),
                ]));
            })
            .await;

        let client = client_for(&server);
        let trips = list_all(&client).await.unwrap();

        mock.assert_async().await;
        let ids: Vec<&str> = trips.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_ping() {
        let server = MockServer::start_async().await;
        let mut ok = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/viagens")
                    .query_param("select", "id")
                    .query_param("limit", "1");
                then.status(200).json_body(json!([{"id": 1}]));
            })
            .await;

        let client = client_for(&server);
        assert!(ping(&client).await);

        ok.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/v1/viagens");
                then.status(401).body("invalid api key");
            })
            .await;

        assert!(!ping(&client).await);
    }

    #[tokio::test]
    async fn test_ping_unreachable_host() {
        let config = SyncConfig::new("http://127.0.0.1:9", "anon-key").unwrap();
        let client = ApiClient::new(&config).unwrap();
        assert!(!ping(&client).await);
    }
}
