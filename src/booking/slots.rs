use crate::booking::constants::{BOOKING_WINDOW_END_HOUR, BOOKING_WINDOW_START_HOUR};
use chrono::{NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

// Minutes may be a single digit ("10:7" reads as 10:07), matching the
// portal's loosest observed labels; out-of-range values fail time
// construction below.
static TIME_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{1,2})$").unwrap());

/// One rendered calendar-time button, read fresh on every scan. `color` is
/// the computed background colour reported by the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotCandidate {
    pub label: String,
    pub color: String,
}

impl SlotCandidate {
    /// The parsed time iff this candidate is bookable: label parses as HH:MM,
    /// the hour falls in the booking window and the colour matches exactly.
    pub fn matches(&self, accepted_color: &str) -> Option<NaiveTime> {
        let time = parse_slot_time(&self.label)?;
        (in_booking_window(time) && self.color == accepted_color).then_some(time)
    }
}

/// Parses a slot label of the shape `HH:MM`. Anything else yields `None`;
/// malformed labels are skipped during a scan, never fatal.
pub fn parse_slot_time(label: &str) -> Option<NaiveTime> {
    let caps = TIME_LABEL.captures(label.trim())?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

pub fn in_booking_window(time: NaiveTime) -> bool {
    (BOOKING_WINDOW_START_HOUR..BOOKING_WINDOW_END_HOUR).contains(&time.hour())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::constants::DEFAULT_ACCEPTED_COLOR;

    fn candidate(label: &str, color: &str) -> SlotCandidate {
        SlotCandidate {
            label: label.to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn parses_well_formed_labels() {
        assert_eq!(
            parse_slot_time("10:30"),
            NaiveTime::from_hms_opt(10, 30, 0)
        );
        assert_eq!(parse_slot_time(" 9:05 "), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_slot_time("10:7"), NaiveTime::from_hms_opt(10, 7, 0));
    }

    #[test]
    fn malformed_labels_yield_none() {
        for label in ["N/A", "10-00", "10:00:00", "", "25:00", "10:61", "ten:30"] {
            assert_eq!(parse_slot_time(label), None, "label {label:?}");
        }
    }

    #[test]
    fn booking_window_is_half_open() {
        assert!(!in_booking_window(NaiveTime::from_hms_opt(9, 59, 0).unwrap()));
        assert!(in_booking_window(NaiveTime::from_hms_opt(10, 0, 0).unwrap()));
        assert!(in_booking_window(NaiveTime::from_hms_opt(13, 59, 0).unwrap()));
        assert!(!in_booking_window(NaiveTime::from_hms_opt(14, 0, 0).unwrap()));
    }

    #[test]
    fn matches_requires_window_and_exact_color() {
        let accepted = DEFAULT_ACCEPTED_COLOR;
        assert!(candidate("10:30", accepted).matches(accepted).is_some());
        assert!(candidate("13:59", accepted).matches(accepted).is_some());
        // Right time, wrong colour.
        assert!(
            candidate("10:30", "rgb(10, 48, 144)")
                .matches(accepted)
                .is_none()
        );
        // Right colour, outside the window.
        assert!(candidate("14:00", accepted).matches(accepted).is_none());
        assert!(candidate("09:30", accepted).matches(accepted).is_none());
        // Malformed label never raises, just fails to match.
        assert!(candidate("N/A", accepted).matches(accepted).is_none());
    }

    #[test]
    fn first_qualifying_candidate_wins_in_document_order() {
        let accepted = DEFAULT_ACCEPTED_COLOR;
        let rendered = [
            candidate("09:00", accepted),             // too early
            candidate("N/A", accepted),               // malformed, skipped
            candidate("11:00", "rgb(200, 200, 200)"), // wrong colour
            candidate("11:30", accepted),             // first match
            candidate("12:00", accepted),             // qualifying but later
        ];
        let picked = rendered
            .iter()
            .enumerate()
            .find_map(|(i, c)| c.matches(accepted).map(|t| (i, t)));
        assert_eq!(picked, Some((3, NaiveTime::from_hms_opt(11, 30, 0).unwrap())));
    }
}
