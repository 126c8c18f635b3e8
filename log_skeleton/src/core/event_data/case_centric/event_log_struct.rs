use chrono::{DateTime, FixedOffset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

use super::constants::{ACTIVITY_NAME, TRACE_END, TRACE_START};
use super::utils::activity_projection::activity_of;
use crate::error::LogSkeletonError;

///
/// Possible attribute values according to the XES Standard
///
/// Tip: If you know the expected `AttributeValue` type, make use of the `try_as_xxx` functions (e.g., [`AttributeValue::try_as_string`])
///
/// ```rust
/// use log_skeleton::core::event_data::case_centric::AttributeValue;
/// let v = AttributeValue::Float(42.0);
///
/// let f = v.try_as_float().unwrap();
/// assert_eq!(*f,42.0);
/// ````
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(tag = "type", content = "content")]
pub enum AttributeValue {
    /// String values (XES `string` and `id` attributes)
    String(String),
    /// `DateTime` values
    Date(DateTime<FixedOffset>),
    /// Integer values
    Int(i64),
    /// Float values
    Float(f64),
    /// Boolean values
    Boolean(bool),
    /// Used to represent invalid values (e.g., `DateTime` which could not be parsed)
    None(),
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{s}"),
            AttributeValue::Date(d) => write!(f, "{}", d.to_rfc3339()),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Float(x) => write!(f, "{x}"),
            AttributeValue::Boolean(b) => write!(f, "{b}"),
            AttributeValue::None() => write!(f, "None"),
        }
    }
}

impl AttributeValue {
    ///
    /// Try to get attribute value as String
    ///
    /// Returns `Some()` of inner value if value is of variant [`AttributeValue::String`] and `None` otherwise
    ///
    pub fn try_as_string(&self) -> Option<&String> {
        match self {
            AttributeValue::String(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get attribute value as date
    ///
    pub fn try_as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            AttributeValue::Date(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get attribute value as int
    ///
    pub fn try_as_int(&self) -> Option<&i64> {
        match self {
            AttributeValue::Int(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get attribute value as float
    ///
    pub fn try_as_float(&self) -> Option<&f64> {
        match self {
            AttributeValue::Float(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get attribute value as bool
    ///
    pub fn try_as_bool(&self) -> Option<&bool> {
        match self {
            AttributeValue::Boolean(v) => Some(v),
            _ => None,
        }
    }
}

///
/// Attribute made up of the key and value
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Attribute {
    /// Attribute key
    pub key: String,
    /// Attribute value
    pub value: AttributeValue,
}

impl Attribute {
    ///
    /// Helper to create a new attribute
    ///
    pub fn new(key: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

///
/// Attributes are [`Vec`]s of [`Attribute`]s
///
/// See the [`XESEditableAttribute`] trait for convenient functions to add or look up attributes by key.
pub type Attributes = Vec<Attribute>;

///
/// Trait to easily add and look up attributes
///
pub trait XESEditableAttribute {
    ///
    /// Add a new attribute (with key and value)
    ///
    /// Note: Does _not_ check if attribute was already present.
    ///
    fn add_to_attributes(&mut self, key: String, value: AttributeValue);
    ///
    /// Get an attribute by key
    ///
    /// _Complexity_: Does linear lookup (i.e., in O(n)).
    fn get_by_key(&self, key: &str) -> Option<&Attribute>;
}

impl XESEditableAttribute for Attributes {
    fn add_to_attributes(&mut self, key: String, value: AttributeValue) {
        self.push(Attribute::new(key, value));
    }

    fn get_by_key(&self, key: &str) -> Option<&Attribute> {
        self.iter().find(|attr| attr.key == key)
    }
}

///
/// An event consists of multiple (event) attributes ([Attributes])
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Event {
    /// Event attributes
    pub attributes: Attributes,
}

impl Event {
    /// Create a new event with the provided activity
    ///
    /// Implicitly assumes usage of the concept XES extension (i.e., uses [`ACTIVITY_NAME`] as key)
    pub fn new(activity: impl Into<String>) -> Self {
        Event {
            attributes: vec![Attribute::new(
                ACTIVITY_NAME,
                AttributeValue::String(activity.into()),
            )],
        }
    }
}

///
/// A trace consists of a list of events and trace attributes (See also [`Event`] and [`Attributes`])
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Trace {
    /// Trace-level attributes
    #[serde(default)]
    pub attributes: Attributes,
    /// Events contained in trace
    pub events: Vec<Event>,
}

impl Trace {
    /// Create a trace without trace attributes from the activity labels of its events
    pub fn from_activities<I, S>(activities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Trace {
            attributes: Attributes::new(),
            events: activities.into_iter().map(Event::new).collect(),
        }
    }

    /// Prepend a [`TRACE_START`] and append a [`TRACE_END`] event
    pub fn extend(&mut self) {
        self.events.insert(0, Event::new(TRACE_START));
        self.events.push(Event::new(TRACE_END));
    }
}

///
/// Event log consisting of a list of [`Trace`]s and log [`Attributes`]
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct EventLog {
    /// Top-level attributes
    #[serde(default)]
    pub attributes: Attributes,
    /// Traces contained in log
    pub traces: Vec<Trace>,
}

impl EventLog {
    /// Construct an event log from plain activity sequences (one per trace)
    ///
    /// ```rust
    /// use log_skeleton::EventLog;
    /// let log = EventLog::from_activity_sequences([vec!["a", "b"], vec!["a", "c"]]);
    /// assert_eq!(log.traces.len(), 2);
    /// ```
    pub fn from_activity_sequences<I, T, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EventLog {
            attributes: Attributes::new(),
            traces: sequences.into_iter().map(Trace::from_activities).collect(),
        }
    }

    /// Turn every trace into an extended trace
    ///
    /// i.e., each trace gets an artificial [`TRACE_START`] event in front and an artificial [`TRACE_END`] event at the end.
    /// Calling this twice extends the traces twice.
    pub fn extend_traces(&mut self) {
        self.traces.iter_mut().for_each(Trace::extend);
    }
}

///
/// Set of activities considered when building activity pairs
///
/// Ordered, so that iteration (and all results derived from it) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ActivitySet(BTreeSet<String>);

impl ActivitySet {
    /// Collect all distinct activities occurring in an [`EventLog`]
    ///
    /// For an extended log (see [`EventLog::extend_traces`]) this includes [`TRACE_START`] and [`TRACE_END`].
    ///
    /// Fails with [`LogSkeletonError::MalformedEvent`] if any event has no string [`ACTIVITY_NAME`] attribute.
    pub fn from_log(log: &EventLog) -> Result<Self, LogSkeletonError> {
        let mut activities = BTreeSet::new();
        for (trace_index, trace) in log.traces.iter().enumerate() {
            for (event_index, event) in trace.events.iter().enumerate() {
                let act = activity_of(event).map_err(|e| e.at(trace_index, event_index))?;
                if !activities.contains(act) {
                    activities.insert(act.to_string());
                }
            }
        }
        Ok(Self(activities))
    }

    /// Check if the activity is part of this set
    pub fn contains(&self, activity: &str) -> bool {
        self.0.contains(activity)
    }

    /// Iterate over all activities (in sorted order)
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    /// Number of activities
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no activities
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ActivitySet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_traces_are_wrapped_in_sentinels() {
        let mut log = EventLog::from_activity_sequences([vec!["a", "b"], vec![]]);
        log.extend_traces();
        let acts: Vec<Vec<&str>> = log
            .traces
            .iter()
            .map(|t| t.events.iter().map(|e| activity_of(e).unwrap()).collect())
            .collect();
        assert_eq!(
            acts,
            vec![
                vec![TRACE_START, "a", "b", TRACE_END],
                vec![TRACE_START, TRACE_END]
            ]
        );
    }

    #[test]
    fn activity_set_from_log() {
        let mut log = EventLog::from_activity_sequences([vec!["b", "a"], vec!["c", "a"]]);
        let acts = ActivitySet::from_log(&log).unwrap();
        assert_eq!(acts.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);

        log.extend_traces();
        let acts = ActivitySet::from_log(&log).unwrap();
        assert_eq!(acts.len(), 5);
        assert!(acts.contains(TRACE_START) && acts.contains(TRACE_END));
    }

    #[test]
    fn activity_set_reports_malformed_event() {
        let mut log = EventLog::from_activity_sequences([vec!["a"], vec!["b", "c"]]);
        log.traces[1].events[1].attributes = vec![Attribute::new(
            "org:resource",
            AttributeValue::String("Mike".into()),
        )];
        assert_eq!(
            ActivitySet::from_log(&log),
            Err(LogSkeletonError::MalformedEvent {
                trace_index: Some(1),
                event_index: Some(1)
            })
        );
    }

    #[test]
    fn event_log_json_roundtrip_keeps_attribute_types() {
        let mut log = EventLog::from_activity_sequences([vec!["a"]]);
        log.traces[0].events[0]
            .attributes
            .add_to_attributes("cost".into(), AttributeValue::Int(7));
        let json = serde_json::to_string(&log).unwrap();
        let parsed: EventLog = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed.traces[0].events[0]
                .attributes
                .get_by_key("cost")
                .and_then(|a| a.value.try_as_int()),
            Some(&7)
        );
    }
}
