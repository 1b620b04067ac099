use serde::Serialize;

/// An event read from a calendar upload. Only built when uid, summary and start are present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    /// ISO-8601 date or date-time
    pub start: String,
    /// ISO-8601 date or date-time
    pub end: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub url: Option<String>,
    pub categories: Vec<String>,
}

/// A calendar event reshaped for the listing's import review screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedEvent {
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Date portion of the start (YYYY-MM-DD)
    pub date: String,
    /// Start time (HH:MM) if the start carries one
    pub time: Option<String>,
    pub end_date: Option<String>,
    pub end_time: Option<String>,
    pub venue: Option<String>,
    pub promoter: Option<String>,
    pub ticket_url: Option<String>,
    pub categories: Vec<String>,
    pub genre: String,
    pub source: &'static str,
}

/// Response body of a successful calendar import
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    pub events: Vec<ImportedEvent>,
    pub filename: String,
    pub file_size: usize,
}
