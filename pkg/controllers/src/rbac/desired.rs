//! Desired state of the RBAC objects for an ExternalDNS instance.
//! Pure functions; nothing here reads from the store.

use pkg_constants::naming::{EXTERNAL_DNS_BASE_NAME, RBAC_API_GROUP, SERVICE_ACCOUNT_NAME};
use pkg_types::externaldns::{ExternalDns, SourceType};
use pkg_types::meta::ObjectMeta;
use pkg_types::rbac::{
    ClusterRole, ClusterRoleBinding, PolicyRule, Role, RoleBinding, RoleRef, Subject,
};

const READ_VERBS: &[&str] = &["get", "list", "watch"];
const MANAGE_VERBS: &[&str] = &["get", "list", "watch", "create", "update", "delete"];

/// Role the operator needs inside the operand namespace to manage the
/// operand's credentials, identities and deployments.
pub fn desired_operator_role(name: &str, namespace: &str) -> Role {
    Role {
        metadata: ObjectMeta::namespaced(name, namespace),
        rules: vec![
            PolicyRule::new(&[""], &["secrets"], MANAGE_VERBS),
            PolicyRule::new(&[""], &["serviceaccounts"], MANAGE_VERBS),
            PolicyRule::new(&["apps"], &["deployments"], MANAGE_VERBS),
        ],
    }
}

/// Binds the operator role to the operator's own service account, which
/// lives in the operator namespace rather than the operand namespace.
pub fn desired_operator_role_binding(
    name: &str,
    namespace: &str,
    operator_namespace: &str,
) -> RoleBinding {
    RoleBinding {
        metadata: ObjectMeta::namespaced(name, namespace),
        role_ref: RoleRef {
            api_group: RBAC_API_GROUP.to_string(),
            kind: "Role".to_string(),
            name: name.to_string(),
        },
        subjects: vec![Subject::service_account(
            SERVICE_ACCOUNT_NAME,
            operator_namespace,
        )],
    }
}

/// Cluster-wide read access an ExternalDNS operand needs to discover hostnames.
pub fn desired_cluster_role(external_dns: &ExternalDns) -> ClusterRole {
    let mut rules = vec![
        PolicyRule::new(&["networking.k8s.io"], &["ingresses"], READ_VERBS),
        PolicyRule::new(
            &[""],
            &["endpoints", "services", "pods", "nodes"],
            READ_VERBS,
        ),
    ];

    if external_dns.spec.source.source_type == SourceType::Route {
        rules.push(PolicyRule::new(
            &["route.openshift.io"],
            &["routes"],
            &["get", "watch", "list"],
        ));
    }

    ClusterRole {
        metadata: ObjectMeta::cluster(EXTERNAL_DNS_BASE_NAME),
        rules,
    }
}

/// Shared cluster binding: the instance's own service account first, then
/// every other service account in `namespace` owned by an ExternalDNS
/// instance.
pub fn desired_cluster_role_binding(
    namespace: &str,
    external_dns: &ExternalDns,
    owned_service_accounts: &[String],
) -> ClusterRoleBinding {
    let primary = external_dns.resource_name();
    let mut subjects = vec![Subject::service_account(primary.as_str(), namespace)];
    for sa in owned_service_accounts {
        if subjects.iter().any(|s| &s.name == sa) {
            continue;
        }
        subjects.push(Subject::service_account(sa.as_str(), namespace));
    }

    ClusterRoleBinding {
        metadata: ObjectMeta::cluster(EXTERNAL_DNS_BASE_NAME),
        role_ref: RoleRef {
            api_group: RBAC_API_GROUP.to_string(),
            kind: "ClusterRole".to_string(),
            name: EXTERNAL_DNS_BASE_NAME.to_string(),
        },
        subjects,
    }
}
