//! Pod role classification.
//!
//! # Responsibilities
//! - Recognize the front-end pod by exact name
//! - Recognize backend pods by image pattern and required labels
//! - Locate the backend container and its status within a pod
//!
//! # Design Decisions
//! - Image patterns are anchored at both ends; partial matches do not count
//! - Empty label requirement = always matches (wildcard)
//! - Front-end and backend checks are independent; a pod may satisfy both

use std::collections::BTreeMap;

use regex::Regex;

use crate::config::ControllerConfig;
use crate::pod::{ContainerSpec, ContainerStatus, PodSnapshot};

/// Compile a pattern so that it must match the whole input.
pub fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Role a pod plays in the balancer topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    FrontEnd,
    Backend,
    Other,
}

/// Outcome of classifying a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub front_end: bool,
    pub backend: bool,
}

impl Classification {
    /// Roles in processing order: front end first, then backend.
    pub fn roles(&self) -> Vec<Role> {
        let mut roles = Vec::with_capacity(2);
        if self.front_end {
            roles.push(Role::FrontEnd);
        }
        if self.backend {
            roles.push(Role::Backend);
        }
        if roles.is_empty() {
            roles.push(Role::Other);
        }
        roles
    }
}

/// Decides which role a pod snapshot plays.
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    front_end_pod: String,
    image_pattern: Regex,
    required_labels: BTreeMap<String, String>,
}

impl RoleClassifier {
    pub fn new(
        front_end_pod: impl Into<String>,
        image_pattern: &str,
        required_labels: BTreeMap<String, String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            front_end_pod: front_end_pod.into(),
            image_pattern: anchored(image_pattern)?,
            required_labels,
        })
    }

    pub fn from_config(config: &ControllerConfig) -> Result<Self, regex::Error> {
        Self::new(
            config.frontend.pod_name.clone(),
            &config.backend.image_pattern,
            config.backend.labels.clone(),
        )
    }

    pub fn classify(&self, pod: &PodSnapshot) -> Classification {
        Classification {
            front_end: pod.name == self.front_end_pod,
            backend: self.backend_container(pod).is_some() && self.labels_match(pod),
        }
    }

    /// First container spec whose image fully matches the backend pattern.
    pub fn backend_container<'a>(&self, pod: &'a PodSnapshot) -> Option<&'a ContainerSpec> {
        pod.containers
            .iter()
            .find(|c| self.image_pattern.is_match(&c.image))
    }

    /// Status of the backend container.
    ///
    /// Looked up by container name first. Falls back to the first status whose
    /// reported image matches the pattern, since registries may rewrite the
    /// image reference in the status.
    pub fn backend_status<'a>(
        &self,
        pod: &'a PodSnapshot,
        spec: &ContainerSpec,
    ) -> Option<&'a ContainerStatus> {
        pod.container_status(&spec.name).or_else(|| {
            pod.statuses
                .iter()
                .find(|s| self.image_pattern.is_match(&s.image))
        })
    }

    fn labels_match(&self, pod: &PodSnapshot) -> bool {
        self.required_labels
            .iter()
            .all(|(key, value)| pod.labels.get(key) == Some(value))
    }
}
