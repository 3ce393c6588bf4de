//! Gesture-occurrence report assembly.
//!
//! Transforms the tracker's flat event list into the external report shape:
//! four fixed gesture groups, chronological within each group, with rendered
//! timestamps, direction labels, and intensity strings.

use serde::Serialize;

use crate::violation_tracker::{ViolationCategory, ViolationEvent};

/// One reported occurrence inside a gesture group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    /// Event start rendered as `M:SS`
    pub timestamp: String,
    /// Sustained duration in seconds, one decimal
    pub duration: f64,
    /// Direction label (`left`/`right`/`up`/`down`), empty for presence groups
    pub direction: String,
    /// Peak angle rendered as `"<n> degrees"`, empty for presence groups
    pub intensity: String,
}

/// A named gesture group with its chronological occurrences
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureGroup {
    /// Group name: `head_movement`, `eye_movement`, `face_missing`, or
    /// `multiple_faces`
    pub name: String,
    /// Occurrences ordered ascending by start time
    pub occurrence: Vec<Occurrence>,
}

const GROUPS: [(&str, &[ViolationCategory]); 4] = [
    (
        "head_movement",
        &[
            ViolationCategory::HeadLeft,
            ViolationCategory::HeadRight,
            ViolationCategory::HeadUp,
            ViolationCategory::HeadDown,
        ],
    ),
    (
        "eye_movement",
        &[
            ViolationCategory::GazeLeft,
            ViolationCategory::GazeRight,
            ViolationCategory::GazeUp,
            ViolationCategory::GazeDown,
        ],
    ),
    ("face_missing", &[ViolationCategory::FaceMissing]),
    ("multiple_faces", &[ViolationCategory::MultipleFaces]),
];

/// Partition finalized events into gesture groups.
///
/// Groups with no occurrences are omitted entirely.
#[must_use]
pub fn build_gesture_report(events: &[ViolationEvent]) -> Vec<GestureGroup> {
    let mut gestures = Vec::new();

    for (name, categories) in GROUPS {
        let mut group_events: Vec<&ViolationEvent> = events
            .iter()
            .filter(|event| categories.contains(&event.category))
            .collect();
        group_events.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        if group_events.is_empty() {
            continue;
        }

        let occurrence = group_events
            .iter()
            .map(|event| Occurrence {
                timestamp: format_timestamp(event.start_time),
                duration: event.duration,
                direction: event
                    .category
                    .direction()
                    .unwrap_or_default()
                    .to_string(),
                intensity: event
                    .intensity
                    .map_or_else(String::new, |i| format!("{} degrees", i.round() as i64)),
            })
            .collect();

        gestures.push(GestureGroup {
            name: name.to_string(),
            occurrence,
        });
    }

    gestures
}

/// Render seconds as `M:SS`, truncating the sub-second remainder
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    let whole = seconds.max(0.0) as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(category: ViolationCategory, start_time: f64, intensity: Option<f64>) -> ViolationEvent {
        ViolationEvent {
            category,
            start_time,
            duration: 0.5,
            intensity,
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.078), "0:00");
        assert_eq!(format_timestamp(22.345), "0:22");
        assert_eq!(format_timestamp(65.5), "1:05");
        assert_eq!(format_timestamp(105.999), "1:45");
    }

    #[test]
    fn test_empty_groups_are_omitted() {
        let events = [event(ViolationCategory::FaceMissing, 3.0, None)];
        let gestures = build_gesture_report(&events);
        assert_eq!(gestures.len(), 1);
        assert_eq!(gestures[0].name, "face_missing");
    }

    #[test]
    fn test_occurrences_sorted_by_start_time() {
        let events = [
            event(ViolationCategory::HeadRight, 40.0, Some(44.2)),
            event(ViolationCategory::HeadLeft, 10.0, Some(38.7)),
            event(ViolationCategory::HeadDown, 25.0, Some(27.0)),
        ];
        let gestures = build_gesture_report(&events);
        assert_eq!(gestures.len(), 1);

        let directions: Vec<_> = gestures[0]
            .occurrence
            .iter()
            .map(|o| o.direction.as_str())
            .collect();
        assert_eq!(directions, vec!["left", "down", "right"]);
    }

    #[test]
    fn test_intensity_rendering() {
        let events = [
            event(ViolationCategory::GazeRight, 1.0, Some(12.6)),
            event(ViolationCategory::MultipleFaces, 2.0, None),
        ];
        let gestures = build_gesture_report(&events);

        assert_eq!(gestures[0].name, "eye_movement");
        assert_eq!(gestures[0].occurrence[0].intensity, "13 degrees");
        assert_eq!(gestures[1].occurrence[0].direction, "");
        assert_eq!(gestures[1].occurrence[0].intensity, "");
    }
}
