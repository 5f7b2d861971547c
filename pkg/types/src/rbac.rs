use serde::{Deserialize, Serialize};

use crate::impl_resource;
use crate::meta::ObjectMeta;

// --- Policy rules ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// API groups this rule applies to (e.g., "" for core, "apps")
    pub api_groups: Vec<String>,
    /// Resource types (e.g., "pods", "services")
    pub resources: Vec<String>,
    /// Allowed verbs (e.g., "get", "list", "watch")
    pub verbs: Vec<String>,
}

impl PolicyRule {
    pub fn new(api_groups: &[&str], resources: &[&str], verbs: &[&str]) -> Self {
        Self {
            api_groups: api_groups.iter().map(|s| s.to_string()).collect(),
            resources: resources.iter().map(|s| s.to_string()).collect(),
            verbs: verbs.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// --- Role ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

impl_resource!(Role, kind = "Role", plural = "roles", namespaced = true);

// --- ClusterRole ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRole {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

impl_resource!(
    ClusterRole,
    kind = "ClusterRole",
    plural = "clusterroles",
    namespaced = false
);

// --- Subject ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubjectKind {
    User,
    ServiceAccount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub kind: SubjectKind,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

impl Subject {
    pub fn service_account(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            kind: SubjectKind::ServiceAccount,
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

// --- Role reference ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub api_group: String,
    /// "Role" or "ClusterRole"
    pub kind: String,
    pub name: String,
}

// --- RoleBinding ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub metadata: ObjectMeta,
    pub role_ref: RoleRef,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl_resource!(
    RoleBinding,
    kind = "RoleBinding",
    plural = "rolebindings",
    namespaced = true
);

// --- ClusterRoleBinding ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRoleBinding {
    pub metadata: ObjectMeta,
    pub role_ref: RoleRef,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl_resource!(
    ClusterRoleBinding,
    kind = "ClusterRoleBinding",
    plural = "clusterrolebindings",
    namespaced = false
);
