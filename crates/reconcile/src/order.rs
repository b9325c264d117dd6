//! Deterministic resource ordering for install and uninstall

use crate::descriptor::ResourceDescriptor;
use crate::types::DesiredState;
use std::cmp::Reverse;

/// Kinds in install order: dependency kinds before the kinds that use them.
/// Namespaces and definitions come first so the objects that live in them
/// (or are instances of them) can be created afterwards.
const INSTALL_ORDER: &[&str] = &[
    "Namespace",
    "NetworkPolicy",
    "ResourceQuota",
    "LimitRange",
    "PodDisruptionBudget",
    "ServiceAccount",
    "Secret",
    "ConfigMap",
    "StorageClass",
    "PersistentVolume",
    "PersistentVolumeClaim",
    "CustomResourceDefinition",
    "ClusterRole",
    "ClusterRoleBinding",
    "Role",
    "RoleBinding",
    "Service",
    "DaemonSet",
    "Pod",
    "ReplicaSet",
    "Deployment",
    "StatefulSet",
    "Job",
    "CronJob",
    "Ingress",
    "APIService",
];

/// Rank of a kind in install order; unknown kinds share a default bucket
/// after everything known (custom resources install after their definitions).
fn install_rank(kind: &str) -> usize {
    INSTALL_ORDER
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(INSTALL_ORDER.len())
}

/// Sort resources for the given desired state.
///
/// `Present` applies install order; `Absent` the exact reverse ranking, so
/// dependents are deleted before their dependencies. The sort is stable:
/// resources of the same rank keep their input order, which makes runs
/// reproducible. Unknown kinds never fail, they sort into the default bucket.
pub fn ordered(
    mut resources: Vec<ResourceDescriptor>,
    desired: DesiredState,
) -> Vec<ResourceDescriptor> {
    match desired {
        DesiredState::Present => resources.sort_by_key(|r| install_rank(r.kind())),
        DesiredState::Absent => resources.sort_by_key(|r| Reverse(install_rank(r.kind()))),
    }
    resources
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn desc(kind: &str, name: &str) -> ResourceDescriptor {
        ResourceDescriptor::new("v1", kind, name, None, json!({}))
    }

    fn kinds(resources: &[ResourceDescriptor]) -> Vec<&str> {
        resources.iter().map(ResourceDescriptor::kind).collect()
    }

    #[test]
    fn test_install_order_dependencies_first() {
        let input = vec![
            desc("Deployment", "web"),
            desc("CustomResourceDefinition", "widgets.example.com"),
            desc("Namespace", "demo"),
            desc("ConfigMap", "settings"),
        ];
        let sorted = ordered(input, DesiredState::Present);
        assert_eq!(
            kinds(&sorted),
            vec![
                "Namespace",
                "ConfigMap",
                "CustomResourceDefinition",
                "Deployment"
            ]
        );
    }

    #[test]
    fn test_uninstall_order_is_reverse_ranking() {
        let input = vec![
            desc("Namespace", "demo"),
            desc("ConfigMap", "settings"),
            desc("Deployment", "web"),
        ];
        let sorted = ordered(input, DesiredState::Absent);
        assert_eq!(kinds(&sorted), vec!["Deployment", "ConfigMap", "Namespace"]);
    }

    #[test]
    fn test_unknown_kinds_install_last() {
        let input = vec![
            desc("Widget", "one"),
            desc("Namespace", "demo"),
            desc("Deployment", "web"),
        ];
        let sorted = ordered(input, DesiredState::Present);
        assert_eq!(kinds(&sorted), vec!["Namespace", "Deployment", "Widget"]);
    }

    #[test]
    fn test_unknown_kinds_delete_first() {
        let input = vec![
            desc("Namespace", "demo"),
            desc("Widget", "one"),
            desc("Deployment", "web"),
        ];
        let sorted = ordered(input, DesiredState::Absent);
        assert_eq!(kinds(&sorted), vec!["Widget", "Deployment", "Namespace"]);
    }

    #[test]
    fn test_stable_within_rank() {
        let input = vec![
            desc("ConfigMap", "b"),
            desc("ConfigMap", "a"),
            desc("ConfigMap", "c"),
        ];
        let sorted = ordered(input, DesiredState::Present);
        let names: Vec<&str> = sorted.iter().map(ResourceDescriptor::name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);

        let reversed = ordered(sorted, DesiredState::Absent);
        let names: Vec<&str> = reversed.iter().map(ResourceDescriptor::name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_deterministic() {
        let input = vec![
            desc("Service", "svc"),
            desc("Secret", "token"),
            desc("Widget", "w"),
            desc("Namespace", "demo"),
        ];
        let once = ordered(input.clone(), DesiredState::Present);
        let twice = ordered(input, DesiredState::Present);
        assert_eq!(once, twice);
    }
}
