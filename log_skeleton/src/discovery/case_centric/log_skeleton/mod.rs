//! Log-Skeleton Discovery
//!
//! Discovers a [`LogSkeleton`] from an [`EventLog`] and a set of activities.
//!
//! ```rust
//! use log_skeleton::core::event_data::case_centric::{ActivitySet, EventLog};
//! use log_skeleton::discovery::case_centric::log_skeleton::{
//!     discover_log_skeleton, LogSkeletonOptions,
//! };
//!
//! let log = EventLog::from_activity_sequences([vec!["a", "b"], vec!["a", "b", "b"]]);
//! let activities = ActivitySet::from_log(&log).unwrap();
//! let model = discover_log_skeleton(&log, &activities, LogSkeletonOptions::default()).unwrap();
//! assert!(model.next_one_way.contains(&("a".to_string(), "b".to_string())));
//! assert_eq!(model.counter["b"].max, 2);
//! ```
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::event_data::case_centric::utils::activity_projection::ActivityProjection;
use crate::core::event_data::case_centric::{ActivitySet, EventLog};
use crate::core::process_models::case_centric::log_skeleton::LogSkeleton;
use crate::error::LogSkeletonError;

mod relations;
mod relationship;

pub use relations::*;
pub use relationship::*;


///
/// Options for log-skeleton discovery
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogSkeletonOptions {
    /// Fraction of traces allowed to violate a relation that has to hold in all traces
    ///
    /// Clamped to `[0, 1]`.
    pub noise_threshold: f64,
    /// Keep pairs involving the artificial start/end activities
    pub include_extensions: bool,
}

impl Default for LogSkeletonOptions {
    fn default() -> Self {
        Self {
            noise_threshold: 0.0,
            include_extensions: false,
        }
    }
}

/// Builder for [`LogSkeletonDiscovery`]
#[derive(Debug, Clone, Default)]
pub struct LogSkeletonDiscoveryBuilder<'a> {
    log: Option<&'a EventLog>,
    activities: Option<&'a ActivitySet>,
    options: LogSkeletonOptions,
}

impl<'a> LogSkeletonDiscoveryBuilder<'a> {
    /// Set the event log to discover from
    pub fn log(mut self, log: &'a EventLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Set the activities to relate
    pub fn activities(mut self, activities: &'a ActivitySet) -> Self {
        self.activities = Some(activities);
        self
    }

    /// Set all options at once
    pub fn options(mut self, options: LogSkeletonOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the noise threshold (clamped to `[0, 1]`)
    pub fn noise_threshold(mut self, noise_threshold: f64) -> Self {
        self.options.noise_threshold = noise_threshold;
        self
    }

    /// Set whether pairs with the artificial start/end activities are kept
    pub fn include_extensions(mut self, include_extensions: bool) -> Self {
        self.options.include_extensions = include_extensions;
        self
    }

    /// Finish the setup
    ///
    /// Fails with [`LogSkeletonError::Configuration`] if no log or no activity set was provided.
    pub fn build(self) -> Result<LogSkeletonDiscovery<'a>, LogSkeletonError> {
        let log = self
            .log
            .ok_or_else(|| LogSkeletonError::Configuration("no event log provided".to_string()))?;
        let activities = self.activities.ok_or_else(|| {
            LogSkeletonError::Configuration("no activity set provided".to_string())
        })?;
        Ok(LogSkeletonDiscovery {
            log,
            activities,
            noise_threshold: NoiseThreshold::new(self.options.noise_threshold),
            include_extensions: self.options.include_extensions,
        })
    }
}

///
/// Log-skeleton discovery for one event log, activity set and noise threshold
///
/// All relations are evaluated on the same inputs.
#[derive(Debug, Clone)]
pub struct LogSkeletonDiscovery<'a> {
    log: &'a EventLog,
    activities: &'a ActivitySet,
    noise_threshold: NoiseThreshold,
    include_extensions: bool,
}

impl<'a> LogSkeletonDiscovery<'a> {
    /// Start configuring a discovery
    pub fn builder() -> LogSkeletonDiscoveryBuilder<'a> {
        LogSkeletonDiscoveryBuilder::default()
    }

    /// The effective (clamped) noise threshold
    pub fn noise_threshold(&self) -> NoiseThreshold {
        self.noise_threshold
    }

    /// Whether pairs with the artificial start/end activities are kept
    pub fn include_extensions(&self) -> bool {
        self.include_extensions
    }

    /// Run all relations and collect their results into a [`LogSkeleton`]
    ///
    /// Fails with [`LogSkeletonError::MalformedEvent`] if an event of the log has no activity label.
    pub fn apply(&self) -> Result<LogSkeleton, LogSkeletonError> {
        let projection = ActivityProjection::try_from(self.log)?;
        let evaluator = RelationEvaluator::new(
            projection,
            self.activities,
            self.noise_threshold,
            self.include_extensions,
        );

        let next_one_way = evaluator.evaluate(&NextOneWay);
        let model = LogSkeleton {
            always_before: evaluator.evaluate(&AlwaysBefore),
            always_after: evaluator.evaluate(&AlwaysAfter),
            equivalence: evaluator.evaluate(&Equivalence),
            never_together: evaluator.evaluate(&NeverTogether),
            next_both_ways: NextBothWays::from_next_one_way(&next_one_way),
            next_one_way,
            counter: ActivityCounter.apply(&evaluator),
        };

        tracing::info!(
            traces = evaluator.projection().len(),
            activities = self.activities.len(),
            noise_threshold = self.noise_threshold.value(),
            include_extensions = self.include_extensions,
            "discovered log skeleton"
        );
        Ok(model)
    }
}

/// Discover a [`LogSkeleton`] from an [`EventLog`]
///
/// Shorthand for building a [`LogSkeletonDiscovery`] and applying it.
pub fn discover_log_skeleton(
    log: &EventLog,
    activities: &ActivitySet,
    options: LogSkeletonOptions,
) -> Result<LogSkeleton, LogSkeletonError> {
    LogSkeletonDiscovery::builder()
        .log(log)
        .activities(activities)
        .options(options)
        .build()?
        .apply()
}
