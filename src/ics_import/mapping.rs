use super::genre::GenreTable;
use super::models::{CalendarEvent, ImportedEvent};
use chrono::{NaiveDate, NaiveDateTime};

/// Source tag stamped on every imported record
pub const ICS_SOURCE: &str = "ics";

/// Split a normalized start/end value into a date and an optional `HH:MM` time
pub fn split_date_time(value: &str) -> (String, Option<String>) {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return (
            dt.date().format("%Y-%m-%d").to_string(),
            Some(dt.time().format("%H:%M").to_string()),
        );
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return (date.format("%Y-%m-%d").to_string(), None);
    }

    // Not a date chrono accepts; split on the time marker as-is
    match value.split_once('T') {
        Some((date, time)) => {
            let time: String = time.chars().take(5).collect();
            (date.to_string(), (!time.is_empty()).then_some(time))
        }
        None => (value.to_string(), None),
    }
}

/// Reshape a calendar event into the listing schema and tag its genre
pub fn map_event(event: CalendarEvent, genres: &GenreTable) -> ImportedEvent {
    let haystack = format!(
        "{} {} {}",
        event.summary,
        event.description.as_deref().unwrap_or_default(),
        event.categories.join(" ")
    );
    let genre = genres.infer(&haystack).to_string();

    let (date, time) = split_date_time(&event.start);
    let (end_date, end_time) = match event.end.as_deref() {
        Some(end) => {
            let (date, time) = split_date_time(end);
            (Some(date), time)
        }
        None => (None, None),
    };

    ImportedEvent {
        external_id: event.uid,
        title: event.summary,
        description: event.description,
        date,
        time,
        end_date,
        end_time,
        venue: event.location,
        promoter: event.organizer,
        ticket_url: event.url,
        categories: event.categories,
        genre,
        source: ICS_SOURCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(summary: &str, start: &str) -> CalendarEvent {
        CalendarEvent {
            uid: "uid-1".to_string(),
            summary: summary.to_string(),
            start: start.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_split_date_time_truncates_to_minutes() {
        assert_eq!(
            split_date_time("2025-08-15T20:30:45"),
            ("2025-08-15".to_string(), Some("20:30".to_string()))
        );
    }

    #[test]
    fn test_split_date_only() {
        assert_eq!(split_date_time("2025-08-15"), ("2025-08-15".to_string(), None));
    }

    #[test]
    fn test_split_passes_unparsable_value() {
        assert_eq!(split_date_time("soon"), ("soon".to_string(), None));
    }

    #[test]
    fn test_map_event_fields() {
        let mut source = event("Deep House Night", "2025-08-15T20:00:00");
        source.end = Some("2025-08-16".to_string());
        source.location = Some("The Cellar".to_string());
        source.organizer = Some("Night Owl".to_string());
        source.url = Some("https://tickets.example/1".to_string());

        let mapped = map_event(source, &GenreTable::default());
        assert_eq!(mapped.external_id, "uid-1");
        assert_eq!(mapped.title, "Deep House Night");
        assert_eq!(mapped.date, "2025-08-15");
        assert_eq!(mapped.time.as_deref(), Some("20:00"));
        assert_eq!(mapped.end_date.as_deref(), Some("2025-08-16"));
        assert_eq!(mapped.end_time, None);
        assert_eq!(mapped.venue.as_deref(), Some("The Cellar"));
        assert_eq!(mapped.promoter.as_deref(), Some("Night Owl"));
        assert_eq!(mapped.ticket_url.as_deref(), Some("https://tickets.example/1"));
        assert_eq!(mapped.genre, "house");
        assert_eq!(mapped.source, ICS_SOURCE);
    }

    #[test]
    fn test_genre_from_categories() {
        let mut source = event("Friday Session", "2025-08-15");
        source.categories = vec!["Jazz".to_string()];
        assert_eq!(map_event(source, &GenreTable::default()).genre, "jazz");
    }

    #[test]
    fn test_genre_defaults_to_other() {
        let mapped = map_event(event("Quiz Evening", "2025-08-15"), &GenreTable::default());
        assert_eq!(mapped.genre, "other");
    }
}
