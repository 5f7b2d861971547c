use serde::{Deserialize, Serialize};

use crate::impl_resource;
use crate::meta::ObjectMeta;
use pkg_constants::naming::EXTERNAL_DNS_BASE_NAME;

// --- Source ---

/// Where an ExternalDNS instance discovers the hostnames it publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceType {
    #[default]
    Service,
    Ingress,
    Route,
    #[serde(rename = "CRD")]
    Crd,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalDnsSource {
    #[serde(rename = "type", default)]
    pub source_type: SourceType,
}

// --- Spec ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalDnsSpec {
    #[serde(default)]
    pub source: ExternalDnsSource,
}

// --- ExternalDNS ---

/// Cluster-scoped declaration of one ExternalDNS operand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalDns {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ExternalDnsSpec,
}

impl_resource!(
    ExternalDns,
    kind = "ExternalDNS",
    plural = "externaldnses",
    namespaced = false
);

impl ExternalDns {
    pub fn new(name: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            metadata: ObjectMeta::cluster(name),
            spec: ExternalDnsSpec {
                source: ExternalDnsSource { source_type },
            },
        }
    }

    /// Name of the per-instance objects (service account, deployment)
    /// in the operand namespace.
    pub fn resource_name(&self) -> String {
        format!("{}-{}", EXTERNAL_DNS_BASE_NAME, self.metadata.name)
    }
}
