//! The log-skeleton relations
//!
//! Five relations are plain [`PairRelation`]s. [`NextBothWays`] is derived from the result of
//! [`NextOneWay`] and [`ActivityCounter`] reports frequencies instead of pairs.
use crate::core::event_data::case_centric::utils::activity_projection::{
    count_of, project, subsequence_count,
};
use crate::core::process_models::case_centric::log_skeleton::{
    CounterResult, RelationKind, RelationResult,
};

use super::relationship::{PairRelation, Quantifier, Reflexivity, RelationEvaluator};

/// Always-before: whenever `a1` occurs, the first of `a1`/`a2` in the trace is `a2`
///
/// i.e., the first occurrence of `a1` is preceded by an `a2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysBefore;

impl PairRelation for AlwaysBefore {
    const KIND: RelationKind = RelationKind::AlwaysBefore;
    const REFLEXIVITY: Reflexivity = Reflexivity::NonReflexive;
    const QUANTIFIER: Quantifier = Quantifier::ForAll;

    fn holds(&self, trace: &[&str], a1: &str, a2: &str) -> bool {
        if count_of(trace, a1) == 0 {
            return true;
        }
        project(trace, &[a1, a2]).first() == Some(&a2)
    }
}

/// Always-after: whenever `a1` occurs, the last of `a1`/`a2` in the trace is `a2`
///
/// i.e., the last occurrence of `a1` is followed by an `a2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAfter;

impl PairRelation for AlwaysAfter {
    const KIND: RelationKind = RelationKind::AlwaysAfter;
    const REFLEXIVITY: Reflexivity = Reflexivity::NonReflexive;
    const QUANTIFIER: Quantifier = Quantifier::ForAll;

    fn holds(&self, trace: &[&str], a1: &str, a2: &str) -> bool {
        if a1 == a2 {
            return false;
        }
        let projection = project(trace, &[a1, a2]);
        !projection.contains(&a1) || projection.last() == Some(&a2)
    }
}

/// Equivalence: `a1` and `a2` occur equally often in the trace
#[derive(Debug, Clone, Copy, Default)]
pub struct Equivalence;

impl PairRelation for Equivalence {
    const KIND: RelationKind = RelationKind::Equivalence;
    const REFLEXIVITY: Reflexivity = Reflexivity::Reflexive;
    const QUANTIFIER: Quantifier = Quantifier::ForAll;

    fn holds(&self, trace: &[&str], a1: &str, a2: &str) -> bool {
        count_of(trace, a1) == count_of(trace, a2)
    }
}

/// Never-together: `a1` and `a2` do not both occur in the trace
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverTogether;

impl PairRelation for NeverTogether {
    const KIND: RelationKind = RelationKind::NeverTogether;
    const REFLEXIVITY: Reflexivity = Reflexivity::NonReflexive;
    const QUANTIFIER: Quantifier = Quantifier::ForAll;

    fn holds(&self, trace: &[&str], a1: &str, a2: &str) -> bool {
        count_of(trace, a1) == 0 || count_of(trace, a2) == 0
    }
}

/// Next-one-way: `a2` directly follows `a1` somewhere in the trace
#[derive(Debug, Clone, Copy, Default)]
pub struct NextOneWay;

impl PairRelation for NextOneWay {
    const KIND: RelationKind = RelationKind::NextOneWay;
    const REFLEXIVITY: Reflexivity = Reflexivity::Reflexive;
    const QUANTIFIER: Quantifier = Quantifier::Exists;

    fn holds(&self, trace: &[&str], a1: &str, a2: &str) -> bool {
        subsequence_count(trace, &[a1, a2]) > 0
    }
}

/// Next-both-ways: pairs `(a1, a2)` where both `(a1, a2)` and `(a2, a1)` are in [`NextOneWay`]
///
/// Does not scan the log itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextBothWays;

impl NextBothWays {
    /// Derive next-both-ways from a next-one-way result
    pub fn from_next_one_way(next_one_way: &RelationResult) -> RelationResult {
        next_one_way
            .iter()
            .filter(|(a1, a2)| next_one_way.contains(&(a2.clone(), a1.clone())))
            .cloned()
            .collect()
    }
}

/// Activity counter: per-activity sum/min/max of occurrences per trace
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityCounter;

impl ActivityCounter {
    /// Count all activities of the evaluator's activity set
    ///
    /// See [`RelationEvaluator::count_activities`].
    pub fn apply(&self, evaluator: &RelationEvaluator<'_>) -> CounterResult {
        evaluator.count_activities()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_before_literal_check() {
        // first of {a1, a2} has to be a2
        assert!(AlwaysBefore.holds(&["b", "a", "c"], "a", "b"));
        assert!(!AlwaysBefore.holds(&["a", "b", "c"], "a", "b"));
        // a1 absent: vacuously true
        assert!(AlwaysBefore.holds(&["b", "c"], "a", "x"));
        // a1 present, a2 absent
        assert!(!AlwaysBefore.holds(&["a", "c"], "a", "b"));
        // only the first a1 matters
        assert!(AlwaysBefore.holds(&["b", "a", "a"], "a", "b"));
    }

    #[test]
    fn always_after() {
        assert!(AlwaysAfter.holds(&["a", "c", "b"], "a", "b"));
        assert!(!AlwaysAfter.holds(&["a", "b", "a"], "a", "b"));
        assert!(AlwaysAfter.holds(&["b", "c"], "a", "b"));
        assert!(!AlwaysAfter.holds(&["a", "c"], "a", "b"));
        assert!(!AlwaysAfter.holds(&["a", "a"], "a", "a"));
    }

    #[test]
    fn equivalence() {
        assert!(Equivalence.holds(&["a", "b", "b", "a"], "a", "b"));
        assert!(!Equivalence.holds(&["a", "b", "b"], "a", "b"));
        assert!(Equivalence.holds(&["c"], "a", "b"));
        assert!(Equivalence.holds(&["a"], "a", "a"));
    }

    #[test]
    fn never_together() {
        assert!(NeverTogether.holds(&["a", "c"], "a", "b"));
        assert!(NeverTogether.holds(&[], "a", "b"));
        assert!(!NeverTogether.holds(&["b", "c", "a"], "a", "b"));
    }

    #[test]
    fn next_one_way() {
        assert!(NextOneWay.holds(&["a", "b"], "a", "b"));
        assert!(!NextOneWay.holds(&["a", "c", "b"], "a", "b"));
        assert!(!NextOneWay.holds(&["b", "a"], "a", "b"));
        assert!(NextOneWay.holds(&["a", "a"], "a", "a"));
        assert!(!NextOneWay.holds(&["a"], "a", "a"));
    }

    #[test]
    fn next_both_ways_from_next_one_way() {
        let p = |a: &str, b: &str| (a.to_string(), b.to_string());
        let next_one_way: RelationResult = [p("a", "b"), p("b", "a"), p("b", "c"), p("c", "c")]
            .into_iter()
            .collect();
        assert_eq!(
            NextBothWays::from_next_one_way(&next_one_way),
            [p("a", "b"), p("b", "a"), p("c", "c")].into_iter().collect()
        );
    }
}
