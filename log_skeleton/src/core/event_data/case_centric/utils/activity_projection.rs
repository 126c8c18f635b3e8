//! Activity projections of traces and event logs
//!
//! Helpers to view traces only in terms of their activity labels.
use rayon::prelude::*;

use crate::core::event_data::case_centric::constants::{ACTIVITY_NAME, TRACE_END, TRACE_START};
use crate::core::event_data::case_centric::{AttributeValue, Event, EventLog, XESEditableAttribute};
use crate::error::LogSkeletonError;

/// Get the activity label of an event (i.e., its [`ACTIVITY_NAME`] attribute)
///
/// Fails with [`LogSkeletonError::MalformedEvent`] (without location) if the attribute is missing or not a string.
pub fn activity_of(event: &Event) -> Result<&str, LogSkeletonError> {
    match event.attributes.get_by_key(ACTIVITY_NAME).map(|a| &a.value) {
        Some(AttributeValue::String(s)) => Ok(s.as_str()),
        _ => Err(LogSkeletonError::MalformedEvent {
            trace_index: None,
            event_index: None,
        }),
    }
}

/// Project an activity trace onto the given activities
///
/// Keeps the original order of the trace.
pub fn project<'a>(trace: &[&'a str], activities: &[&str]) -> Vec<&'a str> {
    trace
        .iter()
        .filter(|act| activities.iter().any(|a| a == *act))
        .copied()
        .collect()
}

/// Number of occurrences of `activity` in the trace
///
/// Same as `project(trace, &[activity]).len()` without allocating.
pub fn count_of(trace: &[&str], activity: &str) -> usize {
    trace.iter().filter(|act| **act == activity).count()
}

/// Count how often `pattern` occurs contiguously in the trace
///
/// Overlapping occurrences are counted separately. An empty pattern never occurs.
pub fn subsequence_count(trace: &[&str], pattern: &[&str]) -> usize {
    if pattern.is_empty() {
        return 0;
    }
    trace.windows(pattern.len()).filter(|w| *w == pattern).count()
}

/// Check if the activity is one of the artificial [`TRACE_START`]/[`TRACE_END`] activities
pub fn is_sentinel(activity: &str) -> bool {
    activity == TRACE_START || activity == TRACE_END
}

///
/// Projection of an event log on just activity labels
///
/// Borrows the labels from the log, so it is cheap to construct and evaluating
/// relations on it does not need to look up event attributes again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityProjection<'a> {
    /// One activity sequence per trace (in log order)
    pub traces: Vec<Vec<&'a str>>,
}

impl<'a> ActivityProjection<'a> {
    /// Number of traces
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Returns `true` if the projected log has no traces
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
}

impl<'a> TryFrom<&'a EventLog> for ActivityProjection<'a> {
    type Error = LogSkeletonError;

    fn try_from(log: &'a EventLog) -> Result<Self, Self::Error> {
        let traces = log
            .traces
            .par_iter()
            .enumerate()
            .map(|(trace_index, t)| {
                t.events
                    .iter()
                    .enumerate()
                    .map(|(event_index, e)| {
                        activity_of(e).map_err(|err| err.at(trace_index, event_index))
                    })
                    .collect::<Result<Vec<&str>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { traces })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_data::case_centric::Attribute;

    #[test]
    fn project_keeps_order_and_duplicates() {
        let trace = ["a", "b", "c", "a", "d", "b"];
        assert_eq!(project(&trace, &["b", "a"]), vec!["a", "b", "a", "b"]);
        assert_eq!(project(&trace, &["x"]), Vec::<&str>::new());
        assert_eq!(project(&[], &["a"]), Vec::<&str>::new());
    }

    #[test]
    fn subsequence_count_counts_overlaps() {
        let trace = ["a", "a", "a", "b"];
        assert_eq!(subsequence_count(&trace, &["a", "a"]), 2);
        assert_eq!(subsequence_count(&trace, &["a", "b"]), 1);
        assert_eq!(subsequence_count(&trace, &["b", "a"]), 0);
        assert_eq!(subsequence_count(&trace, &[]), 0);
        assert_eq!(subsequence_count(&["a"], &["a", "b"]), 0);
    }

    #[test]
    fn sentinels() {
        assert!(is_sentinel(TRACE_START));
        assert!(is_sentinel(TRACE_END));
        assert!(!is_sentinel("start"));
    }

    #[test]
    fn activity_of_requires_string_concept_name() {
        assert_eq!(activity_of(&Event::new("a")), Ok("a"));
        let ev = Event {
            attributes: vec![Attribute::new(ACTIVITY_NAME, AttributeValue::Int(3))],
        };
        assert!(matches!(
            activity_of(&ev),
            Err(LogSkeletonError::MalformedEvent { .. })
        ));
    }

    #[test]
    fn projection_of_log() {
        let log = EventLog::from_activity_sequences([vec!["a", "b"], vec!["c"]]);
        let proj = ActivityProjection::try_from(&log).unwrap();
        assert_eq!(proj.traces, vec![vec!["a", "b"], vec!["c"]]);
        assert_eq!(proj.len(), 2);
    }

    #[test]
    fn projection_of_log_locates_malformed_event() {
        let mut log = EventLog::from_activity_sequences([vec!["a", "b"], vec!["c", "d", "e"]]);
        log.traces[1].events[2].attributes.clear();
        assert_eq!(
            ActivityProjection::try_from(&log),
            Err(LogSkeletonError::MalformedEvent {
                trace_index: Some(1),
                event_index: Some(2)
            })
        );
    }
}
