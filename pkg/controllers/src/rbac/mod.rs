//! Reconciliation of the RBAC objects an ExternalDNS instance depends on.
//!
//! Every object follows the same pass: build the desired object, fetch the
//! current one, then create it if absent, update it if the comparator reports
//! a semantic difference, or leave it alone. After any write the object is
//! fetched again so callers see the stored representation.

pub mod cluster_role;
pub mod cluster_role_binding;
pub mod compare;
pub mod desired;
pub mod identities;
pub mod role;
pub mod role_binding;

use tracing::{debug, info};

use pkg_state::objects::ObjectClient;
use pkg_types::meta::{ObjectKey, Resource};

use compare::ObjectChange;

/// Failure of an ensure pass, together with the best-known state of the
/// object. `current` is `Some` only when the object is known to exist.
#[derive(Debug, thiserror::Error)]
#[error("{error:#}")]
pub struct EnsureError<T> {
    pub current: Option<T>,
    pub error: anyhow::Error,
}

impl<T> EnsureError<T> {
    fn absent(error: anyhow::Error) -> Self {
        Self {
            current: None,
            error,
        }
    }

    fn existing(current: T, error: anyhow::Error) -> Self {
        Self {
            current: Some(current),
            error,
        }
    }

    /// Whether the object exists despite the failure.
    pub fn exists(&self) -> bool {
        self.current.is_some()
    }
}

/// `Ok(Some(_))`: the object exists as returned. `Ok(None)`: it was created
/// but the verifying read did not find it.
pub type EnsureResult<T> = Result<Option<T>, EnsureError<T>>;

/// Ensures the RBAC objects of ExternalDNS operands.
pub struct RbacReconciler<C> {
    client: C,
    /// Namespace where operands run
    operand_namespace: String,
    /// Namespace where the operator's own service account lives
    operator_namespace: String,
}

impl<C: ObjectClient> RbacReconciler<C> {
    pub fn new(
        client: C,
        operand_namespace: impl Into<String>,
        operator_namespace: impl Into<String>,
    ) -> Self {
        Self {
            client,
            operand_namespace: operand_namespace.into(),
            operator_namespace: operator_namespace.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn operand_namespace(&self) -> &str {
        &self.operand_namespace
    }

    pub fn operator_namespace(&self) -> &str {
        &self.operator_namespace
    }

    /// Shared create-or-update pass. `compare` returns the copy of current to
    /// write when it differs semantically from desired.
    async fn ensure_object<T, F>(&self, desired: T, compare: F) -> EnsureResult<T>
    where
        T: Resource,
        F: FnOnce(&T, &T) -> Option<ObjectChange<T>>,
    {
        let key = desired.key();

        let current = match self.client.get::<T>(&key).await {
            Ok(current) => current,
            Err(e) => {
                return Err(EnsureError::absent(
                    e.context(format!("failed to get {} {}", T::KIND, key)),
                ));
            }
        };

        let Some(current) = current else {
            if let Err(e) = self.client.create(&desired).await {
                return Err(EnsureError::absent(
                    e.context(format!("failed to create {} {}", T::KIND, key)),
                ));
            }
            info!(
                kind = T::KIND,
                name = %key.name,
                namespace = key.namespace_or_empty(),
                "created {}",
                T::KIND
            );
            return self.refetch(&key).await;
        };

        let Some(change) = compare(&current, &desired) else {
            debug!(
                kind = T::KIND,
                name = %key.name,
                namespace = key.namespace_or_empty(),
                "{} up to date",
                T::KIND
            );
            return Ok(Some(current));
        };

        if let Err(e) = self.client.update(&change.updated).await {
            return Err(EnsureError::existing(
                current,
                e.context(format!("failed to update {} {}", T::KIND, key)),
            ));
        }
        info!(
            kind = T::KIND,
            name = %key.name,
            namespace = key.namespace_or_empty(),
            reason = %change.reason,
            "updated {}",
            T::KIND
        );
        self.refetch(&key).await
    }

    async fn refetch<T: Resource>(&self, key: &ObjectKey) -> EnsureResult<T> {
        self.client.get::<T>(key).await.map_err(|e| {
            EnsureError::absent(e.context(format!("failed to get {} {}", T::KIND, key)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_types::rbac::Role;

    #[test]
    fn ensure_error_reports_existence() {
        let absent: EnsureError<Role> = EnsureError::absent(anyhow::anyhow!("boom"));
        assert!(!absent.exists());
        assert_eq!(absent.to_string(), "boom");

        let role = desired::desired_operator_role("external-dns-operator", "external-dns");
        let existing = EnsureError::existing(
            role,
            anyhow::anyhow!("store down").context("failed to update Role"),
        );
        assert!(existing.exists());
        assert_eq!(existing.to_string(), "failed to update Role: store down");
    }
}
