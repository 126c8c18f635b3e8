//! Core modules for process mining

pub mod event_data;

/// IO Traits
pub mod io;

pub mod process_models;

pub use event_data::case_centric::EventLog;
pub use process_models::case_centric::LogSkeleton;
