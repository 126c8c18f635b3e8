//! Case-centric Process Discovery
pub mod log_skeleton;
