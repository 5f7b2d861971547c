use pkg_state::objects::ObjectClient;
use pkg_types::externaldns::ExternalDns;
use pkg_types::rbac::ClusterRoleBinding;

use super::compare::cluster_role_binding_changed;
use super::desired::desired_cluster_role_binding;
use super::identities::owned_service_accounts;
use super::{EnsureError, EnsureResult, RbacReconciler};

impl<C: ObjectClient> RbacReconciler<C> {
    /// Ensure the shared ClusterRoleBinding lists the service account of
    /// `external_dns` plus every other ExternalDNS-owned service account in
    /// the operand namespace, and nothing else.
    pub async fn ensure_cluster_role_binding(
        &self,
        external_dns: &ExternalDns,
    ) -> EnsureResult<ClusterRoleBinding> {
        let owned = match owned_service_accounts(&self.client, &self.operand_namespace).await {
            Ok(owned) => owned,
            Err(e) => return Err(EnsureError::absent(e)),
        };
        let desired = desired_cluster_role_binding(&self.operand_namespace, external_dns, &owned);
        self.ensure_object(desired, cluster_role_binding_changed).await
    }
}
