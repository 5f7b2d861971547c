use anyhow::{Context, bail};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::client::StateStore;
use pkg_constants::state::REGISTRY_PREFIX;
use pkg_types::meta::{ObjectKey, Resource};
use pkg_types::scheme::Scheme;
use pkg_types::validate::validate_name;

/// Typed access to stored objects.
///
/// A missing object is reported as `Ok(None)` by [`ObjectClient::get`] and is
/// never an error; every `Err` is an infrastructure or validation failure.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    /// Fetch the object stored under `key`.
    async fn get<T: Resource>(&self, key: &ObjectKey) -> anyhow::Result<Option<T>>;

    /// Store a new object. Fails if an object with the same key exists.
    ///
    /// The store assigns `uid`, `resource_version` and `created_at`; callers
    /// that need those must fetch the object again.
    async fn create<T: Resource>(&self, object: &T) -> anyhow::Result<()>;

    /// Replace an existing object. Fails if it does not exist or if the
    /// object's `resource_version` is not the stored one.
    async fn update<T: Resource>(&self, object: &T) -> anyhow::Result<()>;

    /// List objects of a kind, optionally restricted to one namespace.
    async fn list<T: Resource>(&self, namespace: Option<&str>) -> anyhow::Result<Vec<T>>;
}

/// [`ObjectClient`] over a [`StateStore`], storing JSON values at
/// `/registry/<plural>/<namespace>/<name>` or `/registry/<plural>/<name>`.
#[derive(Clone)]
pub struct StoreClient {
    store: StateStore,
    scheme: Arc<Scheme>,
}

impl StoreClient {
    pub fn new(store: StateStore, scheme: Arc<Scheme>) -> Self {
        Self { store, scheme }
    }

    fn object_path<T: Resource>(&self, key: &ObjectKey) -> anyhow::Result<String> {
        let info = self.scheme.info_for::<T>()?;
        match (info.namespaced, key.namespace.as_deref()) {
            (true, Some(ns)) => Ok(format!(
                "{}/{}/{}/{}",
                REGISTRY_PREFIX, info.plural, ns, key.name
            )),
            (false, None) => Ok(format!("{}/{}/{}", REGISTRY_PREFIX, info.plural, key.name)),
            (true, None) => bail!("{} {} requires a namespace", T::KIND, key.name),
            (false, Some(_)) => bail!("{} {} is cluster-scoped", T::KIND, key),
        }
    }

    fn list_prefix<T: Resource>(&self, namespace: Option<&str>) -> anyhow::Result<String> {
        let info = self.scheme.info_for::<T>()?;
        match namespace {
            Some(ns) if info.namespaced => {
                Ok(format!("{}/{}/{}/", REGISTRY_PREFIX, info.plural, ns))
            }
            Some(_) => bail!("{} is cluster-scoped and cannot be listed by namespace", T::KIND),
            None => Ok(format!("{}/{}/", REGISTRY_PREFIX, info.plural)),
        }
    }

    async fn read<T: Resource>(&self, path: &str) -> anyhow::Result<Option<T>> {
        match self.store.get(path).await? {
            Some(bytes) => {
                let object = serde_json::from_slice(&bytes)
                    .with_context(|| format!("failed to decode {} at {}", T::KIND, path))?;
                Ok(Some(object))
            }
            None => Ok(None),
        }
    }

    async fn write<T: Resource>(&self, path: &str, object: &T) -> anyhow::Result<()> {
        let data = serde_json::to_vec(object)?;
        self.store.put(path, &data).await
    }
}

#[async_trait]
impl ObjectClient for StoreClient {
    async fn get<T: Resource>(&self, key: &ObjectKey) -> anyhow::Result<Option<T>> {
        let path = self.object_path::<T>(key)?;
        self.read(&path).await
    }

    async fn create<T: Resource>(&self, object: &T) -> anyhow::Result<()> {
        let key = object.key();
        validate_name(&key.name)?;
        if let Some(ns) = key.namespace.as_deref() {
            validate_name(ns)?;
        }
        let path = self.object_path::<T>(&key)?;
        if self.store.get(&path).await?.is_some() {
            bail!("{} {} already exists", T::KIND, key);
        }

        let mut stored = object.clone();
        let meta = stored.metadata_mut();
        meta.uid = Some(Uuid::new_v4().to_string());
        meta.resource_version = 1;
        meta.created_at = Some(Utc::now());
        self.write(&path, &stored).await
    }

    async fn update<T: Resource>(&self, object: &T) -> anyhow::Result<()> {
        let key = object.key();
        let path = self.object_path::<T>(&key)?;
        let existing: T = match self.read(&path).await? {
            Some(existing) => existing,
            None => bail!("{} {} not found", T::KIND, key),
        };

        let stored_version = existing.metadata().resource_version;
        let update_version = object.metadata().resource_version;
        if update_version != stored_version {
            bail!(
                "conflict updating {} {}: stored resource version is {}, update is based on {}",
                T::KIND,
                key,
                stored_version,
                update_version
            );
        }

        let mut stored = object.clone();
        let meta = stored.metadata_mut();
        meta.resource_version = stored_version + 1;
        meta.uid = existing.metadata().uid.clone();
        meta.created_at = existing.metadata().created_at;
        self.write(&path, &stored).await
    }

    async fn list<T: Resource>(&self, namespace: Option<&str>) -> anyhow::Result<Vec<T>> {
        let prefix = self.list_prefix::<T>(namespace)?;
        let entries = self.store.list_prefix(&prefix).await?;
        entries
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_slice(&value)
                    .with_context(|| format!("failed to decode {} at {}", T::KIND, key))
            })
            .collect()
    }
}
