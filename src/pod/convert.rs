//! Conversion from Kubernetes `Pod` objects.

use k8s_openapi::api::core::v1::{ContainerState as K8sState, Pod};
use thiserror::Error;

use crate::pod::snapshot::{
    ConditionStatus, ContainerSpec, ContainerState, ContainerStatus, DeletionMarkers, PodSnapshot,
};

/// The watch delivered an object the controller cannot interpret.
#[derive(Debug, Error)]
#[error("unexpected event payload: {0}")]
pub struct UnexpectedPayload(pub String);

impl TryFrom<&Pod> for PodSnapshot {
    type Error = UnexpectedPayload;

    fn try_from(pod: &Pod) -> Result<Self, Self::Error> {
        let meta = &pod.metadata;
        let name = meta
            .name
            .clone()
            .ok_or_else(|| UnexpectedPayload("pod without a name".to_string()))?;

        let containers = pod
            .spec
            .as_ref()
            .map(|spec| {
                spec.containers
                    .iter()
                    .map(|c| ContainerSpec {
                        name: c.name.clone(),
                        image: c.image.clone().unwrap_or_default(),
                        ports: c
                            .ports
                            .iter()
                            .flatten()
                            .filter_map(|p| u16::try_from(p.container_port).ok())
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let status = pod.status.as_ref();

        let statuses = status
            .and_then(|s| s.container_statuses.as_ref())
            .map(|list| {
                list.iter()
                    .map(|s| ContainerStatus {
                        name: s.name.clone(),
                        image: s.image.clone(),
                        ready: s.ready,
                        state: s.state.as_ref().map(state_of).unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let conditions = status
            .and_then(|s| s.conditions.as_ref())
            .map(|list| {
                list.iter()
                    .map(|c| (c.type_.clone(), ConditionStatus::from(c.status.as_str())))
                    .collect()
            })
            .unwrap_or_default();

        Ok(PodSnapshot {
            namespace: meta.namespace.clone().unwrap_or_default(),
            name,
            ip: status.and_then(|s| s.pod_ip.clone()).unwrap_or_default(),
            labels: meta.labels.clone().unwrap_or_default(),
            containers,
            statuses,
            conditions,
            deletion: DeletionMarkers {
                grace_period_set: meta.deletion_grace_period_seconds.is_some(),
                timestamp_set: meta.deletion_timestamp.is_some(),
            },
        })
    }
}

fn state_of(state: &K8sState) -> ContainerState {
    if state.running.is_some() {
        ContainerState::Running
    } else if state.terminated.is_some() {
        ContainerState::Terminated
    } else if state.waiting.is_some() {
        ContainerState::Waiting
    } else {
        ContainerState::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pod(value: serde_json::Value) -> Pod {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_running_tomcat_pod() {
        let pod = pod(json!({
            "metadata": {
                "name": "tomcat-7d9f",
                "namespace": "apps",
                "labels": { "category": "test-dynamic-reverse-proxy", "app": "tomcat" }
            },
            "spec": {
                "containers": [{
                    "name": "tomcat",
                    "image": "tomcat:9.0",
                    "ports": [{ "containerPort": 8080 }, { "containerPort": 8443 }]
                }]
            },
            "status": {
                "podIP": "10.244.1.7",
                "conditions": [
                    { "type": "ContainersReady", "status": "True" },
                    { "type": "Initialized", "status": "True" },
                    { "type": "Ready", "status": "True" },
                    { "type": "PodScheduled", "status": "True" }
                ],
                "containerStatuses": [{
                    "name": "tomcat",
                    "image": "docker.io/library/tomcat:9.0",
                    "imageID": "",
                    "ready": true,
                    "restartCount": 0,
                    "state": { "running": { "startedAt": "2024-01-01T00:00:00Z" } }
                }]
            }
        }));

        let snapshot = PodSnapshot::try_from(&pod).unwrap();
        assert_eq!(snapshot.name, "tomcat-7d9f");
        assert_eq!(snapshot.namespace, "apps");
        assert_eq!(snapshot.ip, "10.244.1.7");
        assert_eq!(snapshot.containers[0].ports, vec![8080, 8443]);
        assert_eq!(snapshot.statuses[0].state, ContainerState::Running);
        assert!(snapshot.statuses[0].ready);
        assert_eq!(snapshot.condition("Ready"), ConditionStatus::True);
        assert_eq!(snapshot.condition("ContainersReady"), ConditionStatus::True);
        assert!(!snapshot.is_deleting());
    }

    #[test]
    fn test_terminating_pod() {
        let pod = pod(json!({
            "metadata": {
                "name": "httpd",
                "deletionTimestamp": "2024-01-01T00:00:00Z",
                "deletionGracePeriodSeconds": 30
            },
            "spec": { "containers": [{ "name": "httpd", "image": "httpd:2.4" }] },
            "status": {
                "containerStatuses": [{
                    "name": "httpd",
                    "image": "httpd:2.4",
                    "imageID": "",
                    "ready": false,
                    "restartCount": 0,
                    "state": { "terminated": { "exitCode": 0 } }
                }]
            }
        }));

        let snapshot = PodSnapshot::try_from(&pod).unwrap();
        assert!(snapshot.deletion.grace_period_set);
        assert!(snapshot.deletion.timestamp_set);
        assert_eq!(snapshot.statuses[0].state, ContainerState::Terminated);
        assert!(snapshot.ip.is_empty());
        assert!(snapshot.conditions.is_empty());
    }

    #[test]
    fn test_pending_pod_without_status() {
        let pod = pod(json!({
            "metadata": { "name": "tomcat-pending" },
            "spec": { "containers": [{ "name": "tomcat", "image": "tomcat:9.0" }] }
        }));

        let snapshot = PodSnapshot::try_from(&pod).unwrap();
        assert!(snapshot.statuses.is_empty());
        assert!(snapshot.containers[0].ports.is_empty());
    }

    #[test]
    fn test_nameless_pod_is_unexpected() {
        let pod = pod(json!({ "metadata": {} }));
        assert!(PodSnapshot::try_from(&pod).is_err());
    }
}
