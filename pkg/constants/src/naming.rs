//! Stable object names shared by the operator and its operands.

/// Name of the operator's own service account. Also used as the name of the
/// Role and RoleBinding the operator holds inside the operand namespace.
pub const SERVICE_ACCOUNT_NAME: &str = "external-dns-operator";

/// Base name for cluster-scoped objects shared by every ExternalDNS instance.
pub const EXTERNAL_DNS_BASE_NAME: &str = "external-dns";

/// Kind recorded in owner references of objects created for an ExternalDNS instance.
pub const EXTERNAL_DNS_KIND: &str = "ExternalDNS";

/// API group of the RBAC kinds.
pub const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

/// Default namespace where ExternalDNS operands run.
pub const DEFAULT_OPERAND_NAMESPACE: &str = "external-dns";

/// Default namespace where the operator itself runs.
pub const DEFAULT_OPERATOR_NAMESPACE: &str = "external-dns-operator";
