//! Utilities for case-centric event data
pub mod activity_projection;
