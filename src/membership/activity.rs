//! Container activity evaluation.

use crate::pod::{ConditionStatus, ContainerState, ContainerStatus, PodSnapshot};

/// Whether `status` describes a container that can serve traffic right now.
///
/// Requires a found status that is ready and running, `Ready` and
/// `ContainersReady` pod conditions both `True`, and no deletion marker.
pub fn is_active(pod: &PodSnapshot, status: Option<&ContainerStatus>) -> bool {
    let Some(status) = status else {
        return false;
    };

    status.ready
        && status.state == ContainerState::Running
        && pod.condition("Ready") == ConditionStatus::True
        && pod.condition("ContainersReady") == ConditionStatus::True
        && !pod.is_deleting()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn active_pod() -> PodSnapshot {
        PodSnapshot {
            name: "tomcat-1".into(),
            ip: "10.0.0.1".into(),
            statuses: vec![ContainerStatus {
                name: "tomcat".into(),
                image: "tomcat:9.0".into(),
                ready: true,
                state: ContainerState::Running,
            }],
            conditions: BTreeMap::from([
                ("Initialized".to_string(), ConditionStatus::True),
                ("Ready".to_string(), ConditionStatus::True),
                ("ContainersReady".to_string(), ConditionStatus::True),
                ("PodScheduled".to_string(), ConditionStatus::True),
            ]),
            ..Default::default()
        }
    }

    fn check(pod: &PodSnapshot) -> bool {
        is_active(pod, pod.container_status("tomcat"))
    }

    #[test]
    fn test_active() {
        assert!(check(&active_pod()));
    }

    #[test]
    fn test_missing_status() {
        let pod = active_pod();
        assert!(!is_active(&pod, pod.container_status("other")));
    }

    #[test]
    fn test_not_ready_or_not_running() {
        let mut pod = active_pod();
        pod.statuses[0].ready = false;
        assert!(!check(&pod));

        let mut pod = active_pod();
        pod.statuses[0].state = ContainerState::Waiting;
        assert!(!check(&pod));

        let mut pod = active_pod();
        pod.statuses[0].state = ContainerState::Terminated;
        assert!(!check(&pod));
    }

    #[test]
    fn test_conditions_by_type() {
        let mut pod = active_pod();
        pod.conditions.insert("ContainersReady".into(), ConditionStatus::False);
        assert!(!check(&pod));

        let mut pod = active_pod();
        pod.conditions.remove("Ready");
        assert!(!check(&pod));

        // Order and count of the condition list do not matter.
        let mut pod = active_pod();
        pod.conditions = BTreeMap::from([
            ("ContainersReady".to_string(), ConditionStatus::True),
            ("Ready".to_string(), ConditionStatus::True),
        ]);
        assert!(check(&pod));
    }

    #[test]
    fn test_deletion_markers() {
        let mut pod = active_pod();
        pod.deletion.timestamp_set = true;
        assert!(!check(&pod));

        let mut pod = active_pod();
        pod.deletion.grace_period_set = true;
        assert!(!check(&pod));
    }
}
