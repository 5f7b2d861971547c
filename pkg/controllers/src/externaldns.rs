use anyhow::Context;
use std::time::Duration;
use tracing::{info, warn};

use crate::rbac::{EnsureResult, RbacReconciler};
use pkg_state::objects::ObjectClient;
use pkg_types::externaldns::ExternalDns;
use pkg_types::meta::Resource;

/// Background controller that keeps the RBAC objects of every ExternalDNS
/// instance converged. Instances are processed one at a time, so at most one
/// pass per instance runs at any moment.
pub struct ExternalDnsController<C> {
    reconciler: RbacReconciler<C>,
    check_interval: Duration,
}

impl<C: ObjectClient + 'static> ExternalDnsController<C> {
    pub fn new(reconciler: RbacReconciler<C>, check_interval: Duration) -> Self {
        Self {
            reconciler,
            check_interval,
        }
    }

    pub fn reconciler(&self) -> &RbacReconciler<C> {
        &self.reconciler
    }

    /// Start the controller loop as a background task.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "ExternalDnsController started (interval={}s, operand namespace={}, operator namespace={})",
                self.check_interval.as_secs(),
                self.reconciler.operand_namespace(),
                self.reconciler.operator_namespace()
            );
            let mut interval = tokio::time::interval(self.check_interval);
            loop {
                interval.tick().await;
                if let Err(e) = self.reconcile().await {
                    warn!("ExternalDnsController reconcile error: {:#}", e);
                }
            }
        })
    }

    /// One pass over all instances. A failing instance does not stop the
    /// others; it is retried on the next pass.
    pub async fn reconcile(&self) -> anyhow::Result<()> {
        let instances: Vec<ExternalDns> = self
            .reconciler
            .client()
            .list(None)
            .await
            .context("failed to list ExternalDNS instances")?;

        for instance in &instances {
            if let Err(e) = self.reconcile_instance(instance).await {
                warn!(
                    instance = %instance.metadata.name,
                    "ExternalDNS {}: RBAC not settled: {:#}",
                    instance.metadata.name,
                    e
                );
            }
        }
        Ok(())
    }

    /// Settle the permission objects of one instance, in dependency order.
    /// Stops at the first object that cannot be settled.
    pub async fn reconcile_instance(&self, instance: &ExternalDns) -> anyhow::Result<()> {
        let r = &self.reconciler;
        settle(r.ensure_operator_role().await)?;
        settle(r.ensure_operator_role_binding().await)?;
        settle(r.ensure_cluster_role(instance).await)?;
        settle(r.ensure_cluster_role_binding(instance).await)?;
        info!(
            instance = %instance.metadata.name,
            "ExternalDNS {}: RBAC settled",
            instance.metadata.name
        );
        Ok(())
    }
}

fn settle<T: Resource>(result: EnsureResult<T>) -> anyhow::Result<()> {
    match result {
        Ok(Some(_)) => Ok(()),
        Ok(None) => anyhow::bail!("{} was created but could not be read back", T::KIND),
        Err(e) => {
            let exists = e.exists();
            Err(anyhow::Error::new(e).context(format!("{} (exists: {})", T::KIND, exists)))
        }
    }
}
