//! Case-centric Process Models
pub mod log_skeleton;
#[doc(inline)]
pub use log_skeleton::LogSkeleton;
