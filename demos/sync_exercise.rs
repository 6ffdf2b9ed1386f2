//! Walks a coordinator through an offline write, a reconnect and a refreshed listing. Reads the
//! remote settings from `TRIPLOG_BASE_URL` and `TRIPLOG_API_KEY`, without them it points at an
//! address nothing listens on and stays offline the whole time.

use std::time::Duration;

use triplog::prelude::*;

#[tokio::main]
async fn main() -> TripLogResult<()> {
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, Layer};

    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::DEBUG.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();
    tracing::info!("running triplog {}", full_version());

    let config = match SyncConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("{err}, using an unreachable placeholder remote");
            SyncConfig::new("http://127.0.0.1:9", "placeholder")?
        }
    };
    let config = config.with_reconnect_delay(Duration::from_millis(200));

    let data_dir = tempfile::tempdir().map_err(StoreError::from)?;
    let kv = FileKeyValueStore::open(data_dir.path()).await?;
    let client = ApiClient::new(&config)?;

    let coordinator = SyncCoordinator::new(client, kv, &config, Connectivity::Offline);

    let input = TripInput {
        date: "2024-03-15".to_string(),
        time: "08:30".to_string(),
        driver: "Van".to_string(),
        origin: "Plant".to_string(),
        destination: "Airport".to_string(),
        passenger: Some("Ana - 111 | Bruno - 222".to_string()),
        notes: Some("Gate 3".to_string()),
    };

    let outcome = coordinator.save(&input).await;
    tracing::info!(success = outcome.success, mode = ?outcome.mode, "{}", outcome.message);

    if let Some(trip) = &outcome.data {
        tracing::info!(id = %trip.id, "share with {}", trip.share_link);
    }

    let connectivity = coordinator.probe_connectivity().await;
    tracing::info!(?connectivity, "probed remote");

    if connectivity.is_online() {
        coordinator.set_online();
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    let trips = coordinator.fetch_all(true).await;
    tracing::info!(
        count = trips.len(),
        pending = coordinator.pending_count().await,
        "listing complete"
    );

    for trip in trips {
        tracing::info!(id = %trip.id, date = %trip.date, driver = %trip.driver, source = ?trip.source);
    }

    coordinator.shutdown();

    Ok(())
}
