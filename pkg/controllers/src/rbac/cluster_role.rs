use pkg_state::objects::ObjectClient;
use pkg_types::externaldns::ExternalDns;
use pkg_types::rbac::ClusterRole;
use pkg_types::validate::validate_rules;

use super::compare::{ObjectChange, rules_changed};
use super::desired::desired_cluster_role;
use super::{EnsureError, EnsureResult, RbacReconciler};

impl<C: ObjectClient> RbacReconciler<C> {
    /// Ensure the shared ExternalDNS ClusterRole exists and grants exactly
    /// the rules required by `external_dns`'s source.
    pub async fn ensure_cluster_role(&self, external_dns: &ExternalDns) -> EnsureResult<ClusterRole> {
        let desired = desired_cluster_role(external_dns);
        if let Err(e) = validate_rules(&desired.rules) {
            return Err(EnsureError::absent(e));
        }

        self.ensure_object(desired, |current: &ClusterRole, desired: &ClusterRole| {
            rules_changed(&current.rules, &desired.rules).map(|reason| {
                let mut updated = current.clone();
                updated.rules = desired.rules.clone();
                ObjectChange { updated, reason }
            })
        })
        .await
    }
}
