use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    Json,
};
use tracing::info;

use crate::error::{validation_error, AppResult, Error};
use crate::ics_import::{self, models::ImportResponse, CalendarUpload};
use crate::image_relay::models::{RelayRequest, RelayResponse};
use crate::startup::AppState;

/// Handler for calendar file uploads.
///
/// The first multipart field that carries a file name is taken as the calendar file.
pub async fn import_ics_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ImportResponse>> {
    let mut multipart = multipart.map_err(|e| Error::Validation(e.body_text()))?;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Invalid upload: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(format!("Invalid upload: {e}")))?;

        upload = Some(CalendarUpload {
            filename,
            data: data.to_vec(),
        });
        break;
    }

    let response = ics_import::import_calendar(upload, &state.genres)?;
    Ok(Json(response))
}

/// Handler for image relay requests
pub async fn relay_image_handler(
    State(state): State<AppState>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> AppResult<Json<RelayResponse>> {
    let Json(request) = payload.map_err(|e| Error::Validation(e.body_text()))?;
    let image_url = request
        .image_url
        .ok_or_else(|| validation_error("imageUrl is required"))?;

    info!("Relay requested for {}", image_url);
    let result = state.relay.relay(&image_url).await?;

    Ok(Json(RelayResponse::from(result)))
}

/// Handler for health checks
pub async fn health_handler() -> &'static str {
    "OK"
}
