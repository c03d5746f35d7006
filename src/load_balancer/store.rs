//! Pool store abstraction.
//!
//! # Responsibilities
//! - Define the four operations the controller needs from the balancer pool
//! - Separate the benign "not found" outcome from real failures
//!
//! # Design Decisions
//! - `exists` answers `Ok(false)` for a missing member; only genuine failures are errors
//! - `delete` of a missing member is a no-op, never an error
//! - Every `StoreError` is fatal to the controller

use std::net::SocketAddr;

use async_trait::async_trait;
use thiserror::Error;

/// A pool mutation requested by the membership tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolOperation {
    EnsurePresent(SocketAddr),
    EnsureAbsent(SocketAddr),
}

/// Failure of a pool store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The command could not be started at all.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and reported failure.
    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The store refused the operation for another reason.
    #[error("pool store unavailable: {0}")]
    Unavailable(String),
}

/// The external list of balancer members the front end routes to.
#[async_trait]
pub trait PoolStore: Send + Sync {
    /// Whether `member` is currently listed.
    async fn exists(&self, member: SocketAddr) -> Result<bool, StoreError>;

    /// List `member`. Callers check `exists` first.
    async fn insert(&self, member: SocketAddr) -> Result<(), StoreError>;

    /// Remove `member` if listed.
    async fn delete(&self, member: SocketAddr) -> Result<(), StoreError>;

    /// Make the front end pick up the current list.
    async fn reload(&self) -> Result<(), StoreError>;
}
