use anyhow::Context;
use std::collections::BTreeSet;

use pkg_constants::naming::EXTERNAL_DNS_KIND;
use pkg_state::objects::ObjectClient;
use pkg_types::service_account::ServiceAccount;

/// Names of the service accounts in `namespace` owned by any ExternalDNS
/// instance, sorted and without duplicates.
pub async fn owned_service_accounts<C: ObjectClient>(
    client: &C,
    namespace: &str,
) -> anyhow::Result<Vec<String>> {
    let accounts: Vec<ServiceAccount> = client
        .list(Some(namespace))
        .await
        .with_context(|| format!("failed to list service accounts in namespace {}", namespace))?;

    let owned: BTreeSet<String> = accounts
        .into_iter()
        .filter(|sa| sa.metadata.is_owned_by_kind(EXTERNAL_DNS_KIND))
        .map(|sa| sa.metadata.name)
        .collect();
    Ok(owned.into_iter().collect())
}
