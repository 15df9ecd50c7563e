use serde::{Deserialize, Serialize};
use wit_core::{CombatSummary, ParseStats};

#[derive(Serialize)]
pub struct PreviewResponse {
    pub events: usize,
    pub stats: ParseStats,
    pub summary: CombatSummary,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub status: String,
    pub events: usize,
    pub stats: ParseStats,
    pub summary: CombatSummary,
}

// stored combat event as read back from ClickHouse
#[derive(Serialize, Deserialize, clickhouse::Row)]
pub struct StoredEventRow {
    pub timestamp: String,
    pub kind: String,
    pub attacker: String,
    pub target: String,
    pub weapon: String,
    pub amount: f64,
    pub damage_type: Option<String>,
}

#[derive(Serialize, Deserialize, clickhouse::Row)]
pub struct SessionRow {
    pub session_id: String,
    pub uploader_id: String,
    pub events: u64,
    pub started_at: String,
    pub ended_at: String,
}
