//! Point-in-time pod view consumed by the reconciliation core.

use std::collections::BTreeMap;
use std::net::IpAddr;

use thiserror::Error;

/// Reasons a snapshot is not yet usable. Always recoverable: the event is
/// skipped and a later, more complete snapshot of the same pod is awaited.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("pod has no IP yet")]
    NoAddress,

    #[error("pod IP '{0}' is not a valid address")]
    InvalidAddress(String),

    #[error("pod status elements are not initialized yet")]
    StatusNotPopulated,

    #[error("backend container '{0}' declares no port")]
    NoPort(String),
}

impl SnapshotError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            SnapshotError::NoAddress => "no_address",
            SnapshotError::InvalidAddress(_) => "invalid_address",
            SnapshotError::StatusNotPopulated => "status_not_populated",
            SnapshotError::NoPort(_) => "no_port",
        }
    }
}

/// Status of a pod condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl From<&str> for ConditionStatus {
    fn from(value: &str) -> Self {
        match value {
            "True" => ConditionStatus::True,
            "False" => ConditionStatus::False,
            _ => ConditionStatus::Unknown,
        }
    }
}

/// Lifecycle state reported for a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerState {
    Running,
    Waiting,
    Terminated,
    #[default]
    Unknown,
}

/// Declared container from the pod spec.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    /// Declared container ports, in declaration order.
    pub ports: Vec<u16>,
}

/// Observed container status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainerStatus {
    pub name: String,
    pub image: String,
    pub ready: bool,
    pub state: ContainerState,
}

/// Deletion markers set by the control plane when a pod is being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeletionMarkers {
    pub grace_period_set: bool,
    pub timestamp_set: bool,
}

impl DeletionMarkers {
    pub fn any(&self) -> bool {
        self.grace_period_set || self.timestamp_set
    }
}

/// Immutable view of a pod, produced once per watch event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PodSnapshot {
    pub namespace: String,
    pub name: String,
    /// Raw pod IP; empty until the pod is scheduled and networked.
    pub ip: String,
    pub labels: BTreeMap<String, String>,
    pub containers: Vec<ContainerSpec>,
    pub statuses: Vec<ContainerStatus>,
    /// Conditions keyed by type (`Ready`, `ContainersReady`, ...).
    pub conditions: BTreeMap<String, ConditionStatus>,
    pub deletion: DeletionMarkers,
}

impl PodSnapshot {
    /// Status of the condition with the given type, `Unknown` when absent.
    pub fn condition(&self, kind: &str) -> ConditionStatus {
        self.conditions.get(kind).copied().unwrap_or_default()
    }

    pub fn is_deleting(&self) -> bool {
        self.deletion.any()
    }

    /// Status of the container with the given name.
    pub fn container_status(&self, name: &str) -> Option<&ContainerStatus> {
        self.statuses.iter().find(|s| s.name == name)
    }

    /// Parse the pod address once the snapshot is complete enough to act on.
    pub fn ready_address(&self) -> Result<IpAddr, SnapshotError> {
        if self.ip.is_empty() {
            return Err(SnapshotError::NoAddress);
        }
        if self.conditions.is_empty() || self.statuses.is_empty() {
            return Err(SnapshotError::StatusNotPopulated);
        }
        self.ip
            .parse()
            .map_err(|_| SnapshotError::InvalidAddress(self.ip.clone()))
    }
}
