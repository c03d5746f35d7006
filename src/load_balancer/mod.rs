//! Balancer pool subsystem.
//!
//! # Data Flow
//! ```text
//! Vec<PoolOperation> from the membership tracker
//!     → reconciler.rs (exists/insert for EnsurePresent, delete for EnsureAbsent)
//!     → store.rs (PoolStore trait)
//!         - kubectl.rs (edit the pool file inside the front-end pod)
//!         - memory.rs (dry run and tests)
//!     → one reload per batch that changed something
//! ```
//!
//! # Design Decisions
//! - The reconciler assumes it is the only writer of the pool
//! - Store failures abort the controller; a half-applied pool is not retried

pub mod kubectl;
pub mod memory;
pub mod reconciler;
pub mod store;

pub use kubectl::KubectlPoolStore;
pub use memory::MemoryPoolStore;
pub use reconciler::{ApplyReport, BalancerReconciler};
pub use store::{PoolOperation, PoolStore, StoreError};
