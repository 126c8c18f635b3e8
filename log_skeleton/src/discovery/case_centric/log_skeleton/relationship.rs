//! Generic evaluation of log-skeleton relations
//!
//! Every pair relation is evaluated the same way: build all candidate activity pairs,
//! check a relation-specific predicate on every trace and aggregate the per-trace results
//! according to the [`Quantifier`] of the relation.
use itertools::Itertools;
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::event_data::case_centric::utils::activity_projection::{
    count_of, is_sentinel, ActivityProjection,
};
use crate::core::event_data::case_centric::ActivitySet;
use crate::core::process_models::case_centric::log_skeleton::{
    ActivityCount, CounterResult, RelationKind, RelationResult,
};

/// How the per-trace results of a relation predicate are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Quantifier {
    /// The predicate has to hold in (nearly) all traces
    ///
    /// A pair is kept if the fraction of satisfying traces is at least `1 - noise_threshold`.
    ForAll,
    /// The predicate has to hold in at least one trace
    ///
    /// The noise threshold is not applied.
    Exists,
}

/// Whether pairs `(a, a)` are considered at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Reflexivity {
    /// All pairs of the cartesian product are candidates
    Reflexive,
    /// Pairs `(a, a)` are removed before any predicate is evaluated
    NonReflexive,
}

///
/// Noise threshold (i.e., what fraction of traces are allowed to violate a [`Quantifier::ForAll`] relation)
///
/// Always in `[0, 1]`: values outside are clamped on construction and `NaN` becomes `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct NoiseThreshold(f64);

impl NoiseThreshold {
    /// Create a noise threshold, clamping `value` to `[0, 1]`
    ///
    /// ```rust
    /// use log_skeleton::discovery::case_centric::log_skeleton::NoiseThreshold;
    /// assert_eq!(NoiseThreshold::new(1.7).value(), 1.0);
    /// assert_eq!(NoiseThreshold::new(-3.0).value(), 0.0);
    /// assert_eq!(NoiseThreshold::new(0.25).value(), 0.25);
    /// ```
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// The (clamped) threshold value
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for NoiseThreshold {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for NoiseThreshold {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(NoiseThreshold::new)
    }
}

///
/// A log-skeleton relation between pairs of activities, defined by a predicate on single traces
///
/// Implementors only decide whether the relation holds for `(a1, a2)` in one trace;
/// candidate generation, aggregation over the log and filtering of the
/// artificial start/end activities is done by [`RelationEvaluator::evaluate`].
pub trait PairRelation: Sync {
    /// Which relation this is
    const KIND: RelationKind;
    /// Whether pairs `(a, a)` are candidates
    const REFLEXIVITY: Reflexivity;
    /// How per-trace results are aggregated
    const QUANTIFIER: Quantifier;

    /// Check the relation for the pair `(a1, a2)` on a single (activity-projected) trace
    fn holds(&self, trace: &[&str], a1: &str, a2: &str) -> bool;
}

///
/// Evaluates log-skeleton relations on one event log and activity set
///
/// The log is projected to activity labels once on construction.
/// All relations evaluated with the same evaluator share the log, activity set, noise threshold
/// and extension setting.
#[derive(Debug, Clone)]
pub struct RelationEvaluator<'a> {
    projection: ActivityProjection<'a>,
    activities: Vec<&'a str>,
    noise_threshold: NoiseThreshold,
    include_extensions: bool,
}

impl<'a> RelationEvaluator<'a> {
    /// Create an evaluator for an (already activity-projected) log
    ///
    /// * `include_extensions`: Keep pairs involving the artificial start/end activities in the results
    pub fn new(
        projection: ActivityProjection<'a>,
        activities: &'a ActivitySet,
        noise_threshold: NoiseThreshold,
        include_extensions: bool,
    ) -> Self {
        Self {
            projection,
            activities: activities.iter().collect(),
            noise_threshold,
            include_extensions,
        }
    }

    /// The effective noise threshold
    pub fn noise_threshold(&self) -> NoiseThreshold {
        self.noise_threshold
    }

    /// Whether pairs with artificial start/end activities are kept
    pub fn include_extensions(&self) -> bool {
        self.include_extensions
    }

    /// The activity-projected log
    pub fn projection(&self) -> &ActivityProjection<'a> {
        &self.projection
    }

    /// All candidate pairs (cartesian product of the activity set with itself)
    ///
    /// For [`Reflexivity::NonReflexive`], pairs `(a, a)` are left out.
    pub fn candidate_pairs(
        &self,
        reflexivity: Reflexivity,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.activities
            .iter()
            .copied()
            .cartesian_product(self.activities.iter().copied())
            .filter(move |(a1, a2)| reflexivity == Reflexivity::Reflexive || a1 != a2)
    }

    /// Pairs touching the artificial start/end activities never hold unless extensions are included
    fn is_excluded(&self, a1: &str, a2: &str) -> bool {
        !self.include_extensions && (is_sentinel(a1) || is_sentinel(a2))
    }

    /// Check if the relation holds for `(a1, a2)` on the whole log
    pub fn pair_holds<R: PairRelation>(&self, relation: &R, a1: &str, a2: &str) -> bool {
        if self.is_excluded(a1, a2) {
            return false;
        }
        let traces = &self.projection.traces;
        match R::QUANTIFIER {
            Quantifier::ForAll => {
                // Vacuously true on a log without traces
                if traces.is_empty() {
                    return true;
                }
                let satisfied = traces
                    .iter()
                    .filter(|trace| relation.holds(trace, a1, a2))
                    .count();
                satisfied as f64 / traces.len() as f64 >= 1.0 - self.noise_threshold.value()
            }
            Quantifier::Exists => traces.iter().any(|trace| relation.holds(trace, a1, a2)),
        }
    }

    /// Evaluate a pair relation on the log
    ///
    /// Returns all candidate pairs for which the relation holds.
    pub fn evaluate<R: PairRelation>(&self, relation: &R) -> RelationResult {
        let kind = R::KIND;
        let _span = tracing::debug_span!("evaluate_relation", relation = %kind).entered();
        let candidates: Vec<(&str, &str)> = self.candidate_pairs(R::REFLEXIVITY).collect();
        let num_candidates = candidates.len();
        let result: RelationResult = candidates
            .into_par_iter()
            .filter(|(a1, a2)| self.pair_holds(relation, a1, a2))
            .map(|(a1, a2)| (a1.to_string(), a2.to_string()))
            .collect();
        tracing::debug!(
            candidates = num_candidates,
            pairs = result.len(),
            "evaluated relation"
        );
        result
    }

    /// Count the occurrences of every activity per trace
    ///
    /// Reports the total, minimal and maximal per-trace count for every activity of the activity set.
    /// Neither the noise threshold nor the extension setting are applied here.
    /// On a log without traces all counts are `0`.
    pub fn count_activities(&self) -> CounterResult {
        let traces = &self.projection.traces;
        self.activities
            .par_iter()
            .map(|act| {
                let counts = traces.iter().map(|trace| count_of(trace, act));
                let stats = counts.fold(None, |acc: Option<ActivityCount>, c| {
                    Some(match acc {
                        None => ActivityCount {
                            sum: c,
                            min: c,
                            max: c,
                        },
                        Some(s) => ActivityCount {
                            sum: s.sum + c,
                            min: s.min.min(c),
                            max: s.max.max(c),
                        },
                    })
                });
                (act.to_string(), stats.unwrap_or_default())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_data::case_centric::constants::{TRACE_END, TRACE_START};
    use crate::core::event_data::case_centric::EventLog;

    /// `a1` occurs in the trace
    struct Occurs;
    impl PairRelation for Occurs {
        const KIND: RelationKind = RelationKind::Equivalence;
        const REFLEXIVITY: Reflexivity = Reflexivity::NonReflexive;
        const QUANTIFIER: Quantifier = Quantifier::ForAll;
        fn holds(&self, trace: &[&str], a1: &str, _a2: &str) -> bool {
            trace.contains(&a1)
        }
    }

    /// `a1` occurs in the trace (existential)
    struct OccursSomewhere;
    impl PairRelation for OccursSomewhere {
        const KIND: RelationKind = RelationKind::NextOneWay;
        const REFLEXIVITY: Reflexivity = Reflexivity::Reflexive;
        const QUANTIFIER: Quantifier = Quantifier::Exists;
        fn holds(&self, trace: &[&str], a1: &str, _a2: &str) -> bool {
            trace.contains(&a1)
        }
    }

    fn evaluator<'a>(
        log: &'a EventLog,
        acts: &'a ActivitySet,
        noise: f64,
        ext: bool,
    ) -> RelationEvaluator<'a> {
        RelationEvaluator::new(
            ActivityProjection::try_from(log).unwrap(),
            acts,
            NoiseThreshold::new(noise),
            ext,
        )
    }

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn noise_threshold_is_clamped() {
        assert_eq!(NoiseThreshold::new(2.0).value(), 1.0);
        assert_eq!(NoiseThreshold::new(-0.5).value(), 0.0);
        assert_eq!(NoiseThreshold::new(f64::NAN).value(), 0.0);
        assert_eq!(NoiseThreshold::new(f64::INFINITY).value(), 1.0);
        let parsed: NoiseThreshold = serde_json::from_str("5.0").unwrap();
        assert_eq!(parsed.value(), 1.0);
    }

    #[test]
    fn candidate_pairs_respect_reflexivity() {
        let log = EventLog::default();
        let acts: ActivitySet = ["a", "b", "c"].into_iter().collect();
        let ev = evaluator(&log, &acts, 0.0, false);
        assert_eq!(ev.candidate_pairs(Reflexivity::Reflexive).count(), 9);
        let non_reflexive: Vec<_> = ev.candidate_pairs(Reflexivity::NonReflexive).collect();
        assert_eq!(non_reflexive.len(), 6);
        assert!(non_reflexive.iter().all(|(a1, a2)| a1 != a2));
    }

    #[test]
    fn forall_applies_noise_threshold() {
        // "a" occurs in 3 of 4 traces, "b" in 2 of 4
        let log = EventLog::from_activity_sequences([
            vec!["a", "b"],
            vec!["a"],
            vec!["a"],
            vec!["b"],
        ]);
        let acts: ActivitySet = ["a", "b"].into_iter().collect();

        let strict = evaluator(&log, &acts, 0.0, false).evaluate(&Occurs);
        assert!(strict.is_empty());

        let noisy = evaluator(&log, &acts, 0.25, false).evaluate(&Occurs);
        assert_eq!(noisy, [pair("a", "b")].into_iter().collect());

        let too_strict = evaluator(&log, &acts, 0.2, false).evaluate(&Occurs);
        assert!(too_strict.is_empty());
    }

    #[test]
    fn forall_with_full_noise_keeps_every_candidate() {
        let log = EventLog::from_activity_sequences([vec!["x"], vec!["y"]]);
        let acts: ActivitySet = ["a", "b", "c"].into_iter().collect();
        let res = evaluator(&log, &acts, 1.0, false).evaluate(&Occurs);
        assert_eq!(res.len(), 6);
    }

    #[test]
    fn exists_ignores_noise_threshold() {
        let log = EventLog::from_activity_sequences([vec!["a"], vec!["b"], vec!["b"]]);
        let acts: ActivitySet = ["a", "b", "c"].into_iter().collect();
        for noise in [0.0, 0.5, 1.0] {
            let res = evaluator(&log, &acts, noise, false).evaluate(&OccursSomewhere);
            assert_eq!(res.len(), 6, "noise {noise}");
            assert!(res.iter().all(|(a1, _)| a1 != "c"));
        }
    }

    #[test]
    fn sentinel_pairs_need_extensions() {
        let mut log = EventLog::from_activity_sequences([vec!["a"], vec!["a"]]);
        log.extend_traces();
        let acts = ActivitySet::from_log(&log).unwrap();

        let without = evaluator(&log, &acts, 0.0, false).evaluate(&OccursSomewhere);
        assert_eq!(without, [pair("a", "a")].into_iter().collect());
        // Also with full noise, where ForAll would otherwise keep everything
        let forall = evaluator(&log, &acts, 1.0, false).evaluate(&Occurs);
        assert!(forall
            .iter()
            .all(|(a1, a2)| !is_sentinel(a1) && !is_sentinel(a2)));

        let with = evaluator(&log, &acts, 0.0, true).evaluate(&OccursSomewhere);
        assert_eq!(with.len(), 9);
        assert!(with.contains(&pair(TRACE_START, TRACE_END)));
    }

    #[test]
    fn empty_log() {
        let log = EventLog::default();
        let acts: ActivitySet = ["a", "b", TRACE_START].into_iter().collect();
        let ev = evaluator(&log, &acts, 0.0, false);
        assert_eq!(
            ev.evaluate(&Occurs),
            [pair("a", "b"), pair("b", "a")].into_iter().collect()
        );
        assert!(ev.evaluate(&OccursSomewhere).is_empty());
        assert!(ev
            .count_activities()
            .values()
            .all(|c| *c == ActivityCount::default()));
    }

    #[test]
    fn count_activities() {
        let log = EventLog::from_activity_sequences([
            vec!["a", "b", "a"],
            vec!["b"],
            vec!["a", "a", "a", "b"],
        ]);
        let acts: ActivitySet = ["a", "b", "z"].into_iter().collect();
        let counts = evaluator(&log, &acts, 0.7, false).count_activities();
        assert_eq!(
            counts["a"],
            ActivityCount {
                sum: 5,
                min: 0,
                max: 3
            }
        );
        assert_eq!(
            counts["b"],
            ActivityCount {
                sum: 3,
                min: 1,
                max: 1
            }
        );
        assert_eq!(counts["z"], ActivityCount::default());
    }
}
