use serde::{Deserialize, Serialize};

use crate::impl_resource;
use crate::meta::ObjectMeta;

/// Runtime identity of a workload inside a namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccount {
    pub metadata: ObjectMeta,
}

impl_resource!(
    ServiceAccount,
    kind = "ServiceAccount",
    plural = "serviceaccounts",
    namespaced = true
);
