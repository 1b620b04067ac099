//! Calendar (`.ics`) upload import: validate the upload, read its VEVENT blocks and
//! reshape them into listing events with an inferred genre.

pub mod genre;
pub mod mapping;
pub mod models;
pub mod parser;
pub mod text;

use crate::error::{validation_error, AppResult};
use genre::GenreTable;
use models::{ImportResponse, ImportedEvent};
use tracing::info;

/// Marker every calendar container must contain
pub const CALENDAR_MARKER: &str = "BEGIN:VCALENDAR";

/// An uploaded file as received from the multipart form
#[derive(Debug, Clone)]
pub struct CalendarUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Check the file shape and decode its text
pub fn validate_upload(upload: &CalendarUpload) -> AppResult<String> {
    if !upload.filename.to_lowercase().ends_with(".ics") {
        return Err(validation_error("File must be an .ics calendar file"));
    }

    let content = String::from_utf8_lossy(&upload.data).into_owned();
    if !content.contains(CALENDAR_MARKER) {
        return Err(validation_error("Invalid calendar file: missing BEGIN:VCALENDAR"));
    }

    Ok(content)
}

/// Parse calendar text and map every valid event
pub fn parse_calendar(content: &str, genres: &GenreTable) -> Vec<ImportedEvent> {
    parser::parse_events(content)
        .into_iter()
        .map(|event| mapping::map_event(event, genres))
        .collect()
}

/// Run the whole import for one upload
pub fn import_calendar(
    upload: Option<CalendarUpload>,
    genres: &GenreTable,
) -> AppResult<ImportResponse> {
    let upload = upload.ok_or_else(|| validation_error("No file uploaded"))?;
    let content = validate_upload(&upload)?;

    info!(
        "Importing calendar {} ({} bytes)",
        upload.filename,
        upload.data.len()
    );

    let events = parse_calendar(&content, genres);
    info!("Found {} events in {}", events.len(), upload.filename);

    Ok(ImportResponse {
        success: true,
        message: format!("Found {} events in {}", events.len(), upload.filename),
        events,
        filename: upload.filename,
        file_size: upload.data.len(),
    })
}
