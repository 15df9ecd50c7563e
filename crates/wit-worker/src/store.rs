// ClickHouse storage for combat events, one row per event

use clickhouse::Client;
use tracing::info;
use wit_core::CombatLogUpload;

// rows per INSERT statement
pub const INSERT_CHUNK: usize = 500;

const ROW_PLACEHOLDER: &str = "(toUUID(?), ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

// DateTime64(3) literal, always UTC
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub async fn create_events_table(client: &Client) -> Result<(), clickhouse::error::Error> {
    client.query(r#"
        CREATE TABLE IF NOT EXISTS combat_events (
            session_id UUID,
            seq UInt32,
            uploader_id String,
            uploaded_at DateTime64(3),
            timestamp DateTime64(3),
            kind LowCardinality(String),
            attacker String,
            target String,
            weapon String,
            amount Float64,
            damage_type Nullable(String)
        ) ENGINE = MergeTree()
        ORDER BY (session_id, timestamp, seq)
        PARTITION BY toYYYYMM(timestamp)
    "#).execute().await?;

    info!("combat_events table ready");
    Ok(())
}

/// INSERT statement with one placeholder tuple per row
pub fn insert_sql(rows: usize) -> String {
    let values = vec![ROW_PLACEHOLDER; rows].join(", ");
    format!(
        "INSERT INTO combat_events (session_id, seq, uploader_id, uploaded_at, timestamp, kind, attacker, target, weapon, amount, damage_type) VALUES {}",
        values
    )
}

pub async fn insert_upload(client: &Client, upload: &CombatLogUpload) -> Result<usize, clickhouse::error::Error> {
    let rows = upload.rows();
    let session_id = upload.session_id.to_string();
    let uploaded_at = upload.uploaded_at.format(TIMESTAMP_FORMAT).to_string();

    for (chunk_index, chunk) in rows.chunks(INSERT_CHUNK).enumerate() {
        let sql = insert_sql(chunk.len());
        let mut query = client.query(&sql);

        for (i, row) in chunk.iter().enumerate() {
            let seq = (chunk_index * INSERT_CHUNK + i) as u32;
            query = query
                .bind(session_id.as_str())
                .bind(seq)
                .bind(row.uploader_id.as_str())
                .bind(uploaded_at.as_str())
                .bind(row.timestamp.format(TIMESTAMP_FORMAT).to_string())
                .bind(row.kind.as_str())
                .bind(row.attacker.as_str())
                .bind(row.target.as_str())
                .bind(row.weapon.as_str())
                .bind(row.amount)
                .bind(row.damage_type.as_deref());
        }

        query.execute().await?;
    }

    info!(session_id = %upload.session_id, rows = rows.len(), "Combat events stored in ClickHouse");
    Ok(rows.len())
}
