use pkg_constants::naming::SERVICE_ACCOUNT_NAME;
use pkg_state::objects::ObjectClient;
use pkg_types::rbac::RoleBinding;

use super::compare::role_binding_changed;
use super::desired::desired_operator_role_binding;
use super::{EnsureResult, RbacReconciler};

impl<C: ObjectClient> RbacReconciler<C> {
    /// Ensure the RoleBinding granting the operator's service account (in the
    /// operator namespace) its Role in the operand namespace.
    pub async fn ensure_operator_role_binding(&self) -> EnsureResult<RoleBinding> {
        let desired = desired_operator_role_binding(
            SERVICE_ACCOUNT_NAME,
            &self.operand_namespace,
            &self.operator_namespace,
        );
        self.ensure_object(desired, role_binding_changed).await
    }
}
