//! Constants for case-centric event data
/// Common identifying field for event identities (i.e., activities)
///
/// _Note_: While the concept XES extension is the de-facto standard for identifying activity names,
/// some XES files might not use `concept:name` or have events without a `concept:name` attribute.
/// Such events are reported as malformed by the log-skeleton discovery instead of being skipped.
pub const ACTIVITY_NAME: &str = "concept:name";

/// Activity label of the artificial event prepended to every trace of an extended log
///
/// Lives in a reserved `__LSK_` namespace so it cannot collide with real activity labels.
///
/// See also [`TRACE_END`] and [`super::EventLog::extend_traces`]
pub const TRACE_START: &str = "__LSK_TRACE_START__";

/// Activity label of the artificial event appended to every trace of an extended log
///
/// See also [`TRACE_START`]
pub const TRACE_END: &str = "__LSK_TRACE_END__";
