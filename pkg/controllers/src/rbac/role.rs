use pkg_constants::naming::SERVICE_ACCOUNT_NAME;
use pkg_state::objects::ObjectClient;
use pkg_types::rbac::Role;
use pkg_types::validate::validate_rules;

use super::compare::{ObjectChange, rules_changed};
use super::desired::desired_operator_role;
use super::{EnsureError, EnsureResult, RbacReconciler};

impl<C: ObjectClient> RbacReconciler<C> {
    /// Ensure the operator's Role in the operand namespace exists and grants
    /// exactly the desired rules.
    pub async fn ensure_operator_role(&self) -> EnsureResult<Role> {
        let desired = desired_operator_role(SERVICE_ACCOUNT_NAME, &self.operand_namespace);
        if let Err(e) = validate_rules(&desired.rules) {
            return Err(EnsureError::absent(e));
        }

        self.ensure_object(desired, |current: &Role, desired: &Role| {
            // no partial merge of rules: any difference rewrites all of them
            rules_changed(&current.rules, &desired.rules).map(|reason| {
                let mut updated = current.clone();
                updated.rules = desired.rules.clone();
                ObjectChange { updated, reason }
            })
        })
        .await
    }
}
