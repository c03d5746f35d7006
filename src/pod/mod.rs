//! Pod snapshot model.
//!
//! # Data Flow
//! ```text
//! kube watch event (Pod)
//!     → convert.rs (TryFrom<&Pod>, identity required)
//!     → snapshot.rs (PodSnapshot, read-only to the core)
//!     → membership classifier / activity / tracker
//! ```
//!
//! # Design Decisions
//! - Conditions are keyed by type, never by position in the status list
//! - A snapshot missing its IP or status lists is recoverable, a pod missing
//!   its name is not

pub mod convert;
pub mod snapshot;

pub use convert::UnexpectedPayload;
pub use snapshot::{
    ConditionStatus, ContainerSpec, ContainerState, ContainerStatus, DeletionMarkers, PodSnapshot,
    SnapshotError,
};
