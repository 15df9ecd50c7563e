use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use tracing::info;
use wit_core::{CombatLogUpload, CombatSummary, ParseReport, parse_combat_log_report};

use crate::error::UploadError;
use crate::models::{PreviewRequest, PreviewResponse, UploadRequest, UploadResponse};
use crate::state::AppState;

/// Refuse oversized logs before any regex work is done on them
pub fn check_size(text: &str, limit: usize) -> Result<(), UploadError> {
    if text.len() > limit {
        return Err(UploadError::TooLarge {
            size: text.len(),
            limit,
        });
    }
    Ok(())
}

/// Validate and parse an upload; nothing is published here
pub fn prepare_upload(
    req: UploadRequest,
    limit: usize,
) -> Result<(CombatLogUpload, ParseReport), UploadError> {
    let uploader_id = req.uploader_id.trim();
    if uploader_id.is_empty() {
        return Err(UploadError::MissingUploader);
    }
    check_size(&req.text, limit)?;

    let mut report = parse_combat_log_report(&req.text);
    if report.events.is_empty() {
        return Err(UploadError::NoEvents);
    }

    let events = std::mem::take(&mut report.events);
    Ok((CombatLogUpload::new(uploader_id, events), report))
}

// Handler: POST /api/combat-logs/preview
pub async fn preview_combat_log(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, (StatusCode, String)> {
    check_size(&req.text, state.config.max_log_bytes)?;

    let report = parse_combat_log_report(&req.text);
    let summary = CombatSummary::from_events(&report.events);

    info!(
        events = report.events.len(),
        combat_lines = report.stats.combat_lines,
        unclassified = report.stats.unclassified,
        "Combat log previewed"
    );

    Ok(Json(PreviewResponse {
        events: report.events.len(),
        stats: report.stats,
        summary,
    }))
}

// Handler: POST /api/combat-logs
pub async fn upload_combat_log(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let (upload, report) = prepare_upload(req, state.config.max_log_bytes)?;
    let summary = CombatSummary::from_events(&upload.events);

    let payload = serde_json::to_vec(&upload).map_err(UploadError::from)?;

    state
        .nats
        .publish(state.config.ingest_subject.clone(), payload.into())
        .await
        .map_err(|e| UploadError::Publish(e.to_string()))?;

    info!(
        session_id = %upload.session_id,
        uploader_id = %upload.uploader_id,
        events = upload.events.len(),
        "Combat log published to NATS"
    );

    Ok(Json(UploadResponse {
        session_id: upload.session_id.to_string(),
        status: "accepted".to_string(),
        events: upload.events.len(),
        stats: report.stats,
        summary,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
[ 2024.05.01 20:15:03 ] (combat) 500 to Rogue Drone - Light Neutron Blaster II - Hits
[ 2024.05.01 20:15:10 ] (combat) 300 from Hostile Frigate - Penetrates
";

    fn request(uploader_id: &str, text: &str) -> UploadRequest {
        UploadRequest {
            uploader_id: uploader_id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_prepare_upload() {
        let (upload, report) = prepare_upload(request(" 1234 ", LOG), 1024).unwrap();
        assert_eq!(upload.uploader_id, "1234");
        assert_eq!(upload.events.len(), 2);
        assert!(report.events.is_empty());
        assert_eq!(report.stats.combat_lines, 2);
        assert_eq!(upload.rows().len(), 2);
    }

    #[test]
    fn test_oversized_log_rejected() {
        let err = prepare_upload(request("1234", LOG), 16).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { limit: 16, .. }));
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_missing_uploader_rejected() {
        let err = prepare_upload(request("  ", LOG), 1024).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_log_without_events_rejected() {
        let err = prepare_upload(request("1234", "[ 2024.05.01 20:15:03 ] (notify) hello"), 1024)
            .unwrap_err();
        assert!(matches!(err, UploadError::NoEvents));

        let (status, message) = <(StatusCode, String)>::from(err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(message, "no combat events found in the log");
    }
}
