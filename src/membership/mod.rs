//! Membership decision core.
//!
//! # Data Flow
//! ```text
//! PodSnapshot
//!     → classifier.rs (front end? backend?)
//!     → activity.rs (is the relevant container serviceable?)
//!     → tracker.rs (state transition, health probe for new candidates)
//!     → Vec<PoolOperation> for the reconciler
//! ```
//!
//! # Design Decisions
//! - One event is processed at a time, to completion
//! - The tracker owns all membership state; callers hold the instance

pub mod activity;
pub mod classifier;
pub mod tracker;

pub use activity::is_active;
pub use classifier::{Classification, Role, RoleClassifier};
pub use tracker::MembershipTracker;
