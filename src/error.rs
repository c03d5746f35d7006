//! Process-level errors.
//!
//! Everything here ends the controller. Recoverable conditions (incomplete
//! snapshots, failed probes) never surface as a `ControllerError`.

use thiserror::Error;

use crate::config::ConfigError;
use crate::load_balancer::StoreError;
use crate::pod::UnexpectedPayload;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid backend image pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("pool store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    UnexpectedPayload(#[from] UnexpectedPayload),

    #[error("kubernetes client error: {0}")]
    Kube(#[from] kube::Error),

    #[error("kubeconfig error: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ControllerResult<T> = Result<T, ControllerError>;
