use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::models::{SessionRow, SessionsQuery, StoredEventRow};
use crate::state::AppState;

// Handler: GET /api/combat-logs/{session_id}/events
pub async fn get_session_events(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<StoredEventRow>>, (StatusCode, String)> {
    info!(%session_id, "Session events request");

    let rows: Vec<StoredEventRow> = state
        .clickhouse
        .query(
            "SELECT toString(timestamp) as timestamp, kind, attacker, target, weapon, amount, damage_type
             FROM combat_events
             WHERE session_id = toUUID(?)
             ORDER BY timestamp, seq",
        )
        .bind(session_id.to_string())
        .fetch_all()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    if rows.is_empty() {
        return Err((StatusCode::NOT_FOUND, format!("No events for session {}", session_id)));
    }

    Ok(Json(rows))
}

// Handler: GET /api/combat-logs/sessions
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SessionsQuery>,
) -> Result<Json<Vec<SessionRow>>, (StatusCode, String)> {
    let limit = params.limit.unwrap_or(20).min(200);
    info!(limit, uploader_id = ?params.uploader_id, "Sessions request");

    let filter = if params.uploader_id.is_some() {
        "WHERE uploader_id = ?"
    } else {
        ""
    };

    let sql = format!(
        "SELECT toString(session_id) as session_id, any(uploader_id) as uploader_id, count() as events,
                toString(min(timestamp)) as started_at, toString(max(timestamp)) as ended_at
         FROM combat_events
         {}
         GROUP BY session_id
         ORDER BY max(uploaded_at) DESC
         LIMIT {}",
        filter, limit
    );

    let mut query = state.clickhouse.query(&sql);
    if let Some(ref uploader_id) = params.uploader_id {
        query = query.bind(uploader_id.as_str());
    }

    let sessions: Vec<SessionRow> = query
        .fetch_all()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(sessions))
}
