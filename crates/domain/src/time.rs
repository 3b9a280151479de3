use chrono::{DateTime, Utc};

/// Offset of the deployment's reference timezone. Server timestamps
/// without an explicit offset are interpreted in this timezone.
pub const REFERENCE_OFFSET: &str = "-05:00";

/// How far in the past a trigger time may be and still be scheduled.
/// Covers clock skew between device and server plus request latency.
pub const PAST_DUE_GRACE_MILLIS: i64 = 30 * 1000;

fn has_offset_suffix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() < 6 {
        return false;
    }
    let suffix = &bytes[bytes.len() - 6..];
    matches!(suffix[0], b'+' | b'-')
        && suffix[1].is_ascii_digit()
        && suffix[2].is_ascii_digit()
        && suffix[3] == b':'
        && suffix[4].is_ascii_digit()
        && suffix[5].is_ascii_digit()
}

/// Returns true if `raw` ends with a timezone designator, i.e. `Z`, `z`
/// or a `±HH:MM` offset
pub fn has_timezone(raw: &str) -> bool {
    raw.ends_with('Z') || raw.ends_with('z') || has_offset_suffix(raw)
}

/// Makes a server timestamp unambiguous by appending the reference offset
/// when it does not carry one already
pub fn normalize(raw: &str) -> String {
    if has_timezone(raw) {
        raw.to_string()
    } else {
        format!("{}{}", raw, REFERENCE_OFFSET)
    }
}

/// Parses a normalized timestamp into an absolute instant
pub fn parse_instant(normalized: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(normalized)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// An instant is past due when it lies more than `PAST_DUE_GRACE_MILLIS`
/// before `now_millis`
pub fn is_past_due(instant: &DateTime<Utc>, now_millis: i64) -> bool {
    now_millis - instant.timestamp_millis() > PAST_DUE_GRACE_MILLIS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn appends_reference_offset() {
        assert_eq!(normalize("2025-01-01T08:00:00"), "2025-01-01T08:00:00-05:00");
        assert_eq!(
            normalize("2025-01-01T08:00:00.123456"),
            "2025-01-01T08:00:00.123456-05:00"
        );
    }

    #[test]
    fn keeps_existing_designator() {
        for raw in &[
            "2025-01-01T08:00:00Z",
            "2025-01-01T08:00:00z",
            "2025-01-01T08:00:00+02:00",
            "2025-01-01T08:00:00-05:00",
        ] {
            assert_eq!(normalize(raw), *raw);
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in &[
            "",
            "Z",
            "garbage",
            "+1",
            "12:00",
            "2025-01-01",
            "2025-01-01T08:00:00",
            "2025-01-01T08:00:00Z",
            "2025-01-01T08:00:00+0100",
            "2025-01-01T08:00:00+01:00",
            "ÅÄÖ-05:0",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn parses_normalized_instants() {
        let instant = parse_instant(&normalize("2025-01-01T08:00:00")).expect("Valid instant");
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 1, 1, 13, 0, 0).unwrap());

        let instant = parse_instant(&normalize("2025-01-01T08:00:00Z")).expect("Valid instant");
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn rejects_malformed_timestamps() {
        assert!(parse_instant(&normalize("")).is_none());
        assert!(parse_instant(&normalize("tomorrow at noon")).is_none());
        assert!(parse_instant(&normalize("2025-13-01T08:00:00")).is_none());
    }

    #[test]
    fn past_due_has_grace_period() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let now_millis = now.timestamp_millis();
        let at = |secs: i64| now + chrono::Duration::seconds(secs);

        assert!(is_past_due(&at(-31), now_millis));
        assert!(!is_past_due(&at(-30), now_millis));
        assert!(!is_past_due(&at(-29), now_millis));
        assert!(!is_past_due(&at(60), now_millis));
    }
}
