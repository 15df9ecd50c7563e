mod store;

use clickhouse::Client;
use futures::StreamExt;
use tracing::{error, info, warn};
use wit_core::CombatLogUpload;

use crate::store::{create_events_table, insert_upload};

// connection settings, overridable from the environment / .env
struct WorkerConfig {
    nats_url: String,
    subject: String,
    clickhouse_url: String,
    clickhouse_db: String,
}

impl WorkerConfig {
    fn from_env() -> Self {
        let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());
        Self {
            nats_url: var("NATS_URL", "localhost:4222"),
            subject: var("WIT_INGEST_SUBJECT", "combat.ingest"),
            clickhouse_url: var("CLICKHOUSE_URL", "http://localhost:8123"),
            clickhouse_db: var("CLICKHOUSE_DB", "wit"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = WorkerConfig::from_env();

    //connect to NATS
    info!("Connecting to NATS...");
    let nats = async_nats::connect(config.nats_url.as_str()).await?;
    info!("Connected to NATS!");

    // connect to clickhouse
    info!("Connecting to ClickHouse...");
    let clickhouse = Client::default()
        .with_url(config.clickhouse_url.as_str())
        .with_database(config.clickhouse_db.as_str());
    info!("Connected to Clickhouse!");

    // Create table if not exists
    create_events_table(&clickhouse).await?;

    info!(subject = %config.subject, "Subscribing to combat log uploads...");
    let mut subscriber = nats.subscribe(config.subject.clone()).await?;

    //process messages
    while let Some(message) = subscriber.next().await {
        match serde_json::from_slice::<CombatLogUpload>(&message.payload) {
            Ok(upload) => {
                info!(
                    session_id = %upload.session_id,
                    uploader_id = %upload.uploader_id,
                    events = upload.events.len(),
                    "Received combat log"
                );
                if upload.events.is_empty() {
                    warn!(session_id = %upload.session_id, "Upload has no events, nothing to store");
                    continue;
                }
                if let Err(e) = insert_upload(&clickhouse, &upload).await {
                    error!(session_id = %upload.session_id, "Failed to store combat events: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to parse message: {}", e);
            }
        }
    }
    Ok(())
}
