#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![allow(clippy::needless_doctest_main)]
#![doc = include_str!("../README.md")]

pub mod core;
pub mod discovery;
/// Errors of the log-skeleton discovery
pub mod error;

#[cfg(test)]
mod test_utils;

#[doc(inline)]
pub use crate::core::event_data::case_centric::{ActivitySet, EventLog};

#[doc(inline)]
pub use crate::core::event_data::case_centric::xes::{import_xes_file, import_xes_slice};

#[doc(inline)]
pub use crate::core::io::Importable;

#[doc(inline)]
pub use crate::core::process_models::case_centric::log_skeleton::{LogSkeleton, RelationKind};

#[doc(inline)]
pub use crate::discovery::case_centric::log_skeleton::{
    discover_log_skeleton, LogSkeletonDiscovery, LogSkeletonOptions, NoiseThreshold,
};

#[doc(inline)]
pub use crate::error::LogSkeletonError;
