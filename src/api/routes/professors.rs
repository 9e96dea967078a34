use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::routes::chat::ApiError;
use crate::api::state::AppState;
use crate::domain::ProfessorRecord;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub indexed: usize,
}

/// `POST /api/v1/professors` - embeds each record's review text and upserts
/// it into the index so the service can be seeded without external tooling.
pub async fn index_professors(
    State(state): State<AppState>,
    Json(records): Json<Vec<ProfessorRecord>>,
) -> Result<Json<IndexResponse>, ApiError> {
    for record in &records {
        state.retrieval_service.index_record(record).await.map_err(|e| {
            tracing::error!(error = %e, record_id = %record.id, "Failed to index record");
            ApiError(e)
        })?;
    }

    Ok(Json(IndexResponse {
        indexed: records.len(),
    }))
}
