use super::models::CalendarEvent;
use super::text::{normalize_date_time, organizer_name, unescape_text};
use tracing::debug;

const BEGIN_EVENT: &str = "BEGIN:VEVENT";
const END_EVENT: &str = "END:VEVENT";
const BEGIN_COMPONENT: &str = "BEGIN:";
const END_COMPONENT: &str = "END:";

/// Fields collected from one VEVENT block before validation
#[derive(Debug, Default)]
struct EventDraft {
    uid: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    start: Option<String>,
    end: Option<String>,
    location: Option<String>,
    organizer: Option<String>,
    url: Option<String>,
    categories: Vec<String>,
}

impl EventDraft {
    /// Route one unfolded `NAME[;PARAMS]:VALUE` pair to its field
    fn apply(&mut self, name: &str, value: &str) {
        let (bare, params) = name.split_once(';').unwrap_or((name, ""));

        match bare.to_ascii_uppercase().as_str() {
            "UID" => self.uid = Some(value.to_string()),
            "SUMMARY" => self.summary = Some(unescape_text(value)),
            "DESCRIPTION" => self.description = Some(unescape_text(value)),
            "DTSTART" => self.start = Some(normalize_date_time(value)),
            "DTEND" => self.end = Some(normalize_date_time(value)),
            "LOCATION" => self.location = Some(unescape_text(value)),
            "ORGANIZER" => self.organizer = Some(organizer_name(params, value)),
            "URL" => self.url = Some(value.to_string()),
            "CATEGORIES" => self.categories.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string),
            ),
            _ => {}
        }
    }

    /// Convert into an event if the required fields are present
    fn finish(self) -> Option<CalendarEvent> {
        let uid = self.uid.filter(|v| !v.is_empty())?;
        let summary = self.summary.filter(|v| !v.is_empty())?;
        let start = self.start.filter(|v| !v.is_empty())?;

        Some(CalendarEvent {
            uid,
            summary,
            description: self.description,
            start,
            end: self.end,
            location: self.location,
            organizer: self.organizer,
            url: self.url,
            categories: self.categories,
        })
    }
}

/// Parse every complete VEVENT block in `content`, in file order.
///
/// Blocks without an `END:VEVENT` marker or missing UID, SUMMARY or DTSTART are dropped.
pub fn parse_events(content: &str) -> Vec<CalendarEvent> {
    let mut events = Vec::new();

    for (index, segment) in content.split(BEGIN_EVENT).skip(1).enumerate() {
        let Some(end) = segment.find(END_EVENT) else {
            debug!("Skipping VEVENT block {} without END marker", index);
            continue;
        };

        match parse_block(&segment[..end]) {
            Some(event) => events.push(event),
            None => debug!("Dropping VEVENT block {} without UID, SUMMARY or DTSTART", index),
        }
    }

    events
}

/// Fold the lines of one block into properties and build the event.
///
/// Continuation lines (leading space or tab) extend the pending value; the pending
/// property is applied when the next property starts and at the end of the block.
/// Nested components such as VALARM are skipped so their properties never reach the event.
fn parse_block(block: &str) -> Option<CalendarEvent> {
    let mut draft = EventDraft::default();
    let mut pending: Option<(String, String)> = None;
    let mut nested = 0usize;

    for raw in block.lines() {
        let line = raw.trim_end_matches('\r');

        if let Some(rest) = line.strip_prefix(' ').or_else(|| line.strip_prefix('\t')) {
            if nested == 0 {
                if let Some((_, value)) = pending.as_mut() {
                    value.push_str(rest);
                }
            }
            continue;
        }

        if let Some((name, value)) = pending.take() {
            draft.apply(&name, &value);
        }

        if starts_with_ignore_case(line, BEGIN_COMPONENT) {
            nested += 1;
            continue;
        }
        if nested > 0 {
            if starts_with_ignore_case(line, END_COMPONENT) {
                nested -= 1;
            }
            continue;
        }

        if let Some((name, value)) = line.split_once(':') {
            pending = Some((name.to_string(), value.to_string()));
        }
    }

    if let Some((name, value)) = pending {
        draft.apply(&name, &value);
    }

    draft.finish()
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(body: &str) -> String {
        format!("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n{}END:VCALENDAR\r\n", body)
    }

    fn vevent(uid: &str, summary: &str, start: &str) -> String {
        format!(
            "BEGIN:VEVENT\r\nUID:{}\r\nSUMMARY:{}\r\nDTSTART:{}\r\nEND:VEVENT\r\n",
            uid, summary, start
        )
    }

    #[test]
    fn test_parses_all_complete_blocks_in_order() {
        let ics = wrap(&format!(
            "{}{}{}",
            vevent("a", "First", "20250801T190000Z"),
            vevent("b", "Second", "20250802"),
            vevent("c", "Third", "20250803T210000")
        ));

        let events = parse_events(&ics);
        let uids: Vec<&str> = events.iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(uids, vec!["a", "b", "c"]);
        assert_eq!(events[1].start, "2025-08-02");
    }

    #[test]
    fn test_drops_blocks_missing_required_fields() {
        let ics = wrap(&format!(
            "{}BEGIN:VEVENT\r\nUID:x\r\nDTSTART:20250801\r\nEND:VEVENT\r\n{}",
            vevent("a", "First", "20250801"),
            vevent("c", "Third", "20250803")
        ));

        assert_eq!(parse_events(&ics).len(), 2);
    }

    #[test]
    fn test_skips_block_without_end_marker() {
        let ics = format!(
            "BEGIN:VCALENDAR\n{}BEGIN:VEVENT\nUID:open\nSUMMARY:Open\nDTSTART:20250801\n",
            vevent("a", "First", "20250801")
        );

        let events = parse_events(&ics);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid, "a");
    }

    #[test]
    fn test_folded_lines_match_single_line() {
        let folded = wrap("BEGIN:VEVENT\r\nUID:1\r\nSUMMARY:Foo\r\n Bar\r\nDTSTART:20250801\r\nEND:VEVENT\r\n");
        let single = wrap("BEGIN:VEVENT\r\nUID:1\r\nSUMMARY:FooBar\r\nDTSTART:20250801\r\nEND:VEVENT\r\n");

        assert_eq!(parse_events(&folded), parse_events(&single));
        assert_eq!(parse_events(&folded)[0].summary, "FooBar");
    }

    #[test]
    fn test_tab_continuation_and_fold_at_block_end() {
        let ics = wrap("BEGIN:VEVENT\nUID:1\nDTSTART:20250801\nSUMMARY:Late\n\tShow\nEND:VEVENT\n");
        assert_eq!(parse_events(&ics)[0].summary, "LateShow");
    }

    #[test]
    fn test_parameters_are_stripped_before_dispatch() {
        let ics = wrap(
            "BEGIN:VEVENT\r\n\
             UID:p1\r\n\
             SUMMARY;LANGUAGE=en:Jazz Brunch\r\n\
             DTSTART;TZID=Europe/Helsinki:20250810T120000\r\n\
             DTEND;TZID=Europe/Helsinki:20250810T150000\r\n\
             ORGANIZER;CN=Blue Note:mailto:info@bluenote.example\r\n\
             LOCATION:Blue Note\\, Main St\r\n\
             URL:https://tickets.example/p1?a=1;b=2\r\n\
             CATEGORIES:Jazz, Brunch ,Live\r\n\
             X-CUSTOM:ignored\r\n\
             END:VEVENT\r\n",
        );

        let event = &parse_events(&ics)[0];
        assert_eq!(event.summary, "Jazz Brunch");
        assert_eq!(event.start, "2025-08-10T12:00:00");
        assert_eq!(event.end.as_deref(), Some("2025-08-10T15:00:00"));
        assert_eq!(event.organizer.as_deref(), Some("Blue Note"));
        assert_eq!(event.location.as_deref(), Some("Blue Note, Main St"));
        assert_eq!(event.url.as_deref(), Some("https://tickets.example/p1?a=1;b=2"));
        assert_eq!(event.categories, vec!["Jazz", "Brunch", "Live"]);
    }

    #[test]
    fn test_description_is_unescaped() {
        let ics = wrap("BEGIN:VEVENT\nUID:1\nSUMMARY:S\nDTSTART:20250801\nDESCRIPTION:A\\,B\\;C\\\\D\\nE\nEND:VEVENT\n");
        assert_eq!(
            parse_events(&ics)[0].description.as_deref(),
            Some("A,B;C\\D\nE")
        );
    }

    #[test]
    fn test_alarm_properties_do_not_leak_into_event() {
        let ics = wrap(
            "BEGIN:VEVENT\r\n\
             UID:alarm-1\r\n\
             SUMMARY:Blues Jam\r\n\
             DESCRIPTION:Real description\r\n\
             BEGIN:VALARM\r\n\
             ACTION:DISPLAY\r\n\
             DESCRIPTION:Reminder\r\n continued\r\n\
             TRIGGER:-PT30M\r\n\
             END:VALARM\r\n\
             DTSTART:20250812T190000\r\n\
             END:VEVENT\r\n",
        );

        let event = &parse_events(&ics)[0];
        assert_eq!(event.description.as_deref(), Some("Real description"));
        assert_eq!(event.start, "2025-08-12T19:00:00");
    }

    #[test]
    fn test_no_events_is_empty_not_error() {
        assert!(parse_events(&wrap("")).is_empty());
    }

    #[test]
    fn test_reparse_is_identical() {
        let ics = wrap(&format!(
            "{}{}",
            vevent("a", "First", "20250801"),
            vevent("b", "Second", "20250802")
        ));
        assert_eq!(parse_events(&ics), parse_events(&ics));
    }
}
