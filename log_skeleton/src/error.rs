use thiserror::Error;

use crate::core::event_data::case_centric::constants::ACTIVITY_NAME;

///
/// Error encountered while setting up or running the log-skeleton discovery
///
/// Discovery is deterministic, so none of these errors are worth retrying with the same input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogSkeletonError {
    /// Invalid setup of the discovery (e.g., no activity set was provided)
    #[error("invalid log-skeleton configuration: {0}")]
    Configuration(String),
    /// An event has no string [`ACTIVITY_NAME`] attribute
    ///
    /// Location is included when known (0-based indices into the log).
    #[error(
        "malformed event (trace {trace_index:?}, event {event_index:?}): missing string attribute `{}`",
        ACTIVITY_NAME
    )]
    MalformedEvent {
        /// Index of the trace containing the event
        trace_index: Option<usize>,
        /// Index of the event in its trace
        event_index: Option<usize>,
    },
}

impl LogSkeletonError {
    /// Attach the position of a malformed event inside the log
    ///
    /// Other errors are returned unchanged.
    pub fn at(self, trace_index: usize, event_index: usize) -> Self {
        match self {
            LogSkeletonError::MalformedEvent { .. } => LogSkeletonError::MalformedEvent {
                trace_index: Some(trace_index),
                event_index: Some(event_index),
            },
            e => e,
        }
    }
}
