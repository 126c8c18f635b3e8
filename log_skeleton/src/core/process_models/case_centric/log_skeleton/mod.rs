//! Log-Skeleton Process Models
//!
//! A log skeleton describes an event log by a fixed set of behavioral relations
//! between activities, together with per-activity frequency statistics.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Activity in a log skeleton
pub type Activity = String;

/// Ordered pair of activities `(a1, a2)`
pub type ActivityPair = (Activity, Activity);

/// Result of a pair relation: the set of activity pairs for which the relation holds
pub type RelationResult = BTreeSet<ActivityPair>;

/// Result of the activity counter: frequency statistics per activity
pub type CounterResult = BTreeMap<Activity, ActivityCount>;

/// The six pair relations of a [`LogSkeleton`]
///
/// The activity counter is not a pair relation and thus not part of this enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// If `a1` occurs, `a2` occurs before it
    AlwaysBefore,
    /// If `a1` occurs, `a2` occurs after it
    AlwaysAfter,
    /// `a1` and `a2` occur equally often
    Equivalence,
    /// `a1` and `a2` never occur in the same trace
    NeverTogether,
    /// `a2` directly follows `a1` and `a1` directly follows `a2` (in some traces)
    NextBothWays,
    /// `a2` directly follows `a1` in some trace
    NextOneWay,
}

/// Name under which the activity counter is reported
pub const COUNTER_NAME: &str = "counter";

impl RelationKind {
    /// All pair relations
    pub const ALL: [RelationKind; 6] = [
        RelationKind::AlwaysBefore,
        RelationKind::AlwaysAfter,
        RelationKind::Equivalence,
        RelationKind::NeverTogether,
        RelationKind::NextBothWays,
        RelationKind::NextOneWay,
    ];

    /// Fixed name of the relation (e.g., `always_before`)
    pub fn name(&self) -> &'static str {
        match self {
            RelationKind::AlwaysBefore => "always_before",
            RelationKind::AlwaysAfter => "always_after",
            RelationKind::Equivalence => "equivalence",
            RelationKind::NeverTogether => "never_together",
            RelationKind::NextBothWays => "next_both_ways",
            RelationKind::NextOneWay => "next_one_way",
        }
    }
}

impl Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown log-skeleton relation '{s}'"))
    }
}

/// Frequency statistics of one activity over all traces of a log
///
/// `sum` is the total number of occurrences; `min`/`max` are the smallest/largest
/// number of occurrences within a single trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ActivityCount {
    /// Total number of occurrences
    pub sum: usize,
    /// Minimal number of occurrences in a trace
    pub min: usize,
    /// Maximal number of occurrences in a trace
    pub max: usize,
}

/// Entry of a [`LogSkeleton`], looked up by name (see [`LogSkeleton::get`])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSkeletonEntry<'a> {
    /// One of the pair relations
    Relation(&'a RelationResult),
    /// The activity counter
    Counter(&'a CounterResult),
}

///
/// Log-skeleton model: all pair relations plus the activity counter
///
/// Serializes to a JSON object keyed by relation name (`always_before`, ..., `counter`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LogSkeleton {
    /// See [`RelationKind::AlwaysBefore`]
    pub always_before: RelationResult,
    /// See [`RelationKind::AlwaysAfter`]
    pub always_after: RelationResult,
    /// See [`RelationKind::Equivalence`]
    pub equivalence: RelationResult,
    /// See [`RelationKind::NeverTogether`]
    pub never_together: RelationResult,
    /// See [`RelationKind::NextBothWays`]
    pub next_both_ways: RelationResult,
    /// See [`RelationKind::NextOneWay`]
    pub next_one_way: RelationResult,
    /// Frequency statistics per activity
    pub counter: CounterResult,
}

impl LogSkeleton {
    /// Get the result of a pair relation
    pub fn relation(&self, kind: RelationKind) -> &RelationResult {
        match kind {
            RelationKind::AlwaysBefore => &self.always_before,
            RelationKind::AlwaysAfter => &self.always_after,
            RelationKind::Equivalence => &self.equivalence,
            RelationKind::NeverTogether => &self.never_together,
            RelationKind::NextBothWays => &self.next_both_ways,
            RelationKind::NextOneWay => &self.next_one_way,
        }
    }

    /// Iterate over all pair relations and their results
    pub fn relations(&self) -> impl Iterator<Item = (RelationKind, &RelationResult)> + '_ {
        RelationKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.relation(kind)))
    }

    /// Look up an entry by its name (a [`RelationKind::name`] or [`COUNTER_NAME`])
    pub fn get(&self, name: &str) -> Option<LogSkeletonEntry<'_>> {
        if name == COUNTER_NAME {
            return Some(LogSkeletonEntry::Counter(&self.counter));
        }
        name.parse::<RelationKind>()
            .ok()
            .map(|kind| LogSkeletonEntry::Relation(self.relation(kind)))
    }

    /// Check if the pair `(a1, a2)` is part of the given relation
    pub fn holds(&self, kind: RelationKind, a1: &str, a2: &str) -> bool {
        self.relation(kind)
            .contains(&(a1.to_string(), a2.to_string()))
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_names_roundtrip() {
        for kind in RelationKind::ALL {
            assert_eq!(kind.name().parse::<RelationKind>(), Ok(kind));
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.to_string())
            );
        }
        assert!("counter".parse::<RelationKind>().is_err());
    }

    #[test]
    fn lookup_by_name() {
        let mut model = LogSkeleton::default();
        model.next_one_way.insert(("a".into(), "b".into()));
        model.counter.insert(
            "a".into(),
            ActivityCount {
                sum: 2,
                min: 1,
                max: 1,
            },
        );

        assert!(model.holds(RelationKind::NextOneWay, "a", "b"));
        assert!(!model.holds(RelationKind::NextOneWay, "b", "a"));
        match model.get("next_one_way") {
            Some(LogSkeletonEntry::Relation(r)) => assert_eq!(r.len(), 1),
            e => panic!("unexpected entry {e:?}"),
        }
        match model.get(COUNTER_NAME) {
            Some(LogSkeletonEntry::Counter(c)) => assert_eq!(c["a"].sum, 2),
            e => panic!("unexpected entry {e:?}"),
        }
        assert_eq!(model.get("eventually_follows"), None);
    }

    #[test]
    fn json_shape() {
        let mut model = LogSkeleton::default();
        model.equivalence.insert(("a".into(), "a".into()));
        let json: serde_json::Value = serde_json::from_str(&model.to_json().unwrap()).unwrap();
        assert_eq!(json["equivalence"], serde_json::json!([["a", "a"]]));
        assert_eq!(json["counter"], serde_json::json!({}));
        for kind in RelationKind::ALL {
            assert!(json.get(kind.name()).is_some());
        }
    }
}
