#![cfg(feature = "local-store")]

use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use serde_json::json;

use triplog::prelude::*;

fn input() -> TripInput {
    TripInput {
        date: "2024-03-15".to_string(),
        time: "08:30".to_string(),
        driver: "Uber".to_string(),
        origin: "Plant".to_string(),
        destination: "Airport".to_string(),
        passenger: Some("Ana".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn test_offline_write_survives_restart_and_replays() {
    let server = MockServer::start_async().await;
    let data_dir = tempfile::tempdir().unwrap();
    let config = SyncConfig::new(&server.base_url(), "anon-key").unwrap();

    // First session never reaches the remote
    let queued = {
        let kv = FileKeyValueStore::open(data_dir.path()).await.unwrap();
        let client = ApiClient::new(&config).unwrap();
        let coordinator = SyncCoordinator::new(client, kv, &config, Connectivity::Offline);

        let outcome = coordinator.save(&input()).await;
        assert!(outcome.success);
        assert_eq!(outcome.mode, Some(WriteMode::Local));
        outcome.data.unwrap()
    };

    let ping = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/viagens")
                .query_param("select", "id")
                .query_param("limit", "1");
            then.status(200).json_body(json!([]));
        })
        .await;

    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/viagens")
                .header("apikey", "anon-key")
                .json_body_partial(r#"{"motorista": "Uber", "passageiro": "Ana"}"#);
            then.status(201).json_body(json!([{
                "id": 41,
                "data": "2024-03-15",
                "horario": "08:30",
                "motorista": "Uber",
                "origem": "Plant",
                "destino": "Airport",
                "passageiro": "Ana",
                "observacoes": null,
                "whatsapp_link": queued.share_link,
                "criado_em": "2024-03-10T12:00:00+00:00",
                "sincronizado": true
            }]));
        })
        .await;

    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/viagens")
                .query_param("select", "*")
                .query_param("order", "criado_em.desc");
            then.status(200).json_body(json!([{
                "id": 41,
                "data": "2024-03-15",
                "horario": "08:30",
                "motorista": "Uber",
                "origem": "Plant",
                "destino": "Airport",
                "passageiro": "Ana",
                "criado_em": "2024-03-10T12:00:00+00:00"
            }]));
        })
        .await;

    // Second session picks the queue back up from disk
    let kv = FileKeyValueStore::open(data_dir.path()).await.unwrap();
    let client = ApiClient::new(&config).unwrap();
    let coordinator = SyncCoordinator::new(client, kv, &config, Connectivity::Offline);

    let pending = coordinator.pending_records().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, queued.id);

    assert_eq!(coordinator.probe_connectivity().await, Connectivity::Online);
    ping.assert_async().await;

    let report = coordinator.reconcile().await;
    assert_eq!(report, ReconcileReport { confirmed: 1, failed: 0 });
    create.assert_async().await;

    let trips = coordinator.fetch_all(true).await;
    list.assert_async().await;

    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].id, "41");
    assert_eq!(trips[0].driver, Driver::RideHailing);
    assert_eq!(coordinator.pending_count().await, 0);
}

#[tokio::test]
async fn test_unreachable_remote_keeps_every_write() {
    let data_dir = tempfile::tempdir().unwrap();
    let config = SyncConfig::new("http://127.0.0.1:9", "anon-key").unwrap();

    let kv = FileKeyValueStore::open(data_dir.path()).await.unwrap();
    let client = ApiClient::new(&config).unwrap();
    let coordinator = SyncCoordinator::new(client, kv, &config, Connectivity::Online);

    let outcome = coordinator.save(&input()).await;
    assert!(outcome.success);
    assert_eq!(outcome.mode, Some(WriteMode::Local));
    assert_eq!(coordinator.connectivity(), Connectivity::Offline);

    let second = coordinator.save(&input()).await;
    assert_eq!(second.mode, Some(WriteMode::Local));

    let trips = coordinator.fetch_all(true).await;
    assert_eq!(trips.len(), 2);
    assert!(trips.iter().all(Trip::is_pending));
}
