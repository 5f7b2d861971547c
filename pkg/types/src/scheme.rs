use anyhow::{Result, bail};
use std::collections::BTreeMap;

use crate::externaldns::ExternalDns;
use crate::meta::Resource;
use crate::rbac::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};
use crate::service_account::ServiceAccount;

/// Registration record for one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    pub kind: &'static str,
    pub plural: &'static str,
    pub namespaced: bool,
}

/// Immutable set of kinds the object store is allowed to serve.
///
/// Built once at startup and shared by reference; there is no process-wide
/// registry to mutate.
#[derive(Debug, Clone)]
pub struct Scheme {
    kinds: BTreeMap<&'static str, KindInfo>,
}

impl Scheme {
    pub fn builder() -> SchemeBuilder {
        SchemeBuilder::default()
    }

    /// Scheme with every kind the operator reads or writes.
    pub fn operator() -> Result<Self> {
        Ok(Self::builder()
            .register::<ExternalDns>()?
            .register::<ServiceAccount>()?
            .register::<Role>()?
            .register::<RoleBinding>()?
            .register::<ClusterRole>()?
            .register::<ClusterRoleBinding>()?
            .build())
    }

    pub fn lookup(&self, kind: &str) -> Result<&KindInfo> {
        match self.kinds.get(kind) {
            Some(info) => Ok(info),
            None => bail!("kind {} is not registered in the scheme", kind),
        }
    }

    /// Lookup for a concrete type; also checks the registered scope matches.
    pub fn info_for<T: Resource>(&self) -> Result<&KindInfo> {
        let info = self.lookup(T::KIND)?;
        if info.namespaced != T::NAMESPACED || info.plural != T::PLURAL {
            bail!("kind {} is registered with a different shape", T::KIND);
        }
        Ok(info)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &KindInfo> {
        self.kinds.values()
    }
}

#[derive(Debug, Default)]
pub struct SchemeBuilder {
    kinds: BTreeMap<&'static str, KindInfo>,
}

impl SchemeBuilder {
    pub fn register<T: Resource>(mut self) -> Result<Self> {
        if self.kinds.contains_key(T::KIND) {
            bail!("kind {} registered twice", T::KIND);
        }
        if self.kinds.values().any(|k| k.plural == T::PLURAL) {
            bail!("plural {} already used by another kind", T::PLURAL);
        }
        self.kinds.insert(
            T::KIND,
            KindInfo {
                kind: T::KIND,
                plural: T::PLURAL,
                namespaced: T::NAMESPACED,
            },
        );
        Ok(self)
    }

    pub fn build(self) -> Scheme {
        Scheme { kinds: self.kinds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_scheme_has_all_kinds() {
        let scheme = Scheme::operator().unwrap();
        for kind in [
            "ExternalDNS",
            "ServiceAccount",
            "Role",
            "RoleBinding",
            "ClusterRole",
            "ClusterRoleBinding",
        ] {
            assert!(scheme.lookup(kind).is_ok(), "{} missing", kind);
        }
        assert!(!scheme.lookup("ClusterRole").unwrap().namespaced);
        assert!(scheme.lookup("RoleBinding").unwrap().namespaced);
        assert_eq!(scheme.kinds().count(), 6);
    }

    #[test]
    fn duplicate_registration_fails() {
        let res = Scheme::builder()
            .register::<Role>()
            .and_then(|b| b.register::<Role>());
        assert!(res.is_err());
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let scheme = Scheme::builder().register::<Role>().unwrap().build();
        assert!(scheme.lookup("ClusterRole").is_err());
        assert!(scheme.info_for::<ClusterRole>().is_err());
        assert!(scheme.info_for::<Role>().is_ok());
    }
}
