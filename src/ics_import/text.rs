//! Value-level helpers for calendar properties.

/// Reverse calendar string escaping.
///
/// Replacement order is fixed: `\n`, `\t`, `\r`, `\,`, `\;`, then `\\`.
pub fn unescape_text(value: &str) -> String {
    value
        .replace("\\n", "\n")
        .replace("\\t", "\t")
        .replace("\\r", "\r")
        .replace("\\,", ",")
        .replace("\\;", ";")
        .replace("\\\\", "\\")
}

/// Normalize a `DTSTART`/`DTEND` value to ISO-8601.
///
/// Everything except digits and `T` is dropped first. Values too short to hold a date
/// are returned unchanged.
pub fn normalize_date_time(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'T')
        .collect();

    if cleaned.len() >= 15 && cleaned.contains('T') {
        format!(
            "{}-{}-{}T{}:{}:{}",
            &cleaned[0..4],
            &cleaned[4..6],
            &cleaned[6..8],
            &cleaned[9..11],
            &cleaned[11..13],
            &cleaned[13..15]
        )
    } else if cleaned.len() >= 8 {
        format!("{}-{}-{}", &cleaned[0..4], &cleaned[4..6], &cleaned[6..8])
    } else {
        value.to_string()
    }
}

/// Extract a display name or address from an `ORGANIZER` property.
///
/// `params` is the raw parameter section of the property name (everything after the first `;`).
pub fn organizer_name(params: &str, value: &str) -> String {
    let common_name = params
        .split(';')
        .find_map(|param| param.strip_prefix("CN="))
        .map(|cn| cn.trim_matches('"').trim())
        .filter(|cn| !cn.is_empty());

    if let Some(cn) = common_name {
        return unescape_text(cn);
    }

    if let Some(address) = value
        .strip_prefix("mailto:")
        .or_else(|| value.strip_prefix("MAILTO:"))
    {
        return address.to_string();
    }

    unescape_text(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_sequence() {
        assert_eq!(unescape_text("A\\,B\\;C\\\\D\\nE"), "A,B;C\\D\nE");
    }

    #[test]
    fn test_unescape_tab_and_return() {
        assert_eq!(unescape_text("a\\tb\\rc"), "a\tb\rc");
    }

    #[test]
    fn test_normalize_utc_date_time() {
        assert_eq!(normalize_date_time("20250815T200000Z"), "2025-08-15T20:00:00");
    }

    #[test]
    fn test_normalize_date_only() {
        assert_eq!(normalize_date_time("20250815"), "2025-08-15");
    }

    #[test]
    fn test_normalize_short_time_keeps_date() {
        assert_eq!(normalize_date_time("20250815T2000"), "2025-08-15");
    }

    #[test]
    fn test_normalize_passes_garbage_through() {
        assert_eq!(normalize_date_time("tomorrow"), "tomorrow");
        assert_eq!(normalize_date_time("2025"), "2025");
    }

    #[test]
    fn test_organizer_prefers_common_name() {
        assert_eq!(
            organizer_name("CN=\"Night Owl Promotions\"", "mailto:owl@example.com"),
            "Night Owl Promotions"
        );
    }

    #[test]
    fn test_organizer_strips_mailto() {
        assert_eq!(organizer_name("", "mailto:owl@example.com"), "owl@example.com");
    }

    #[test]
    fn test_organizer_raw_value() {
        assert_eq!(organizer_name("ROLE=CHAIR", "Owl\\, Inc"), "Owl, Inc");
    }
}
