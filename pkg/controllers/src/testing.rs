//! In-memory object client with write counting and failure injection.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use pkg_constants::naming::EXTERNAL_DNS_KIND;
use pkg_state::client::StateStore;
use pkg_state::objects::{ObjectClient, StoreClient};
use pkg_types::meta::{ObjectKey, ObjectMeta, OwnerReference, Resource};
use pkg_types::scheme::Scheme;
use pkg_types::service_account::ServiceAccount;

pub struct TestClient {
    inner: StoreClient,
    creates: AtomicUsize,
    updates: AtomicUsize,
    pub fail_get: AtomicBool,
    pub fail_create: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_list: AtomicBool,
}

impl TestClient {
    pub async fn new() -> Self {
        let store = StateStore::in_memory().await.unwrap();
        let scheme = Arc::new(Scheme::operator().unwrap());
        Self {
            inner: StoreClient::new(store, scheme),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            fail_get: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            fail_list: AtomicBool::new(false),
        }
    }

    /// Direct access to the backing store; writes here are not counted.
    pub fn store(&self) -> &StoreClient {
        &self.inner
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.creates() + self.updates()
    }

    pub fn fail(flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectClient for TestClient {
    async fn get<T: Resource>(&self, key: &ObjectKey) -> anyhow::Result<Option<T>> {
        if self.fail_get.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        self.inner.get(key).await
    }

    async fn create<T: Resource>(&self, object: &T) -> anyhow::Result<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            anyhow::bail!("admission denied");
        }
        self.inner.create(object).await
    }

    async fn update<T: Resource>(&self, object: &T) -> anyhow::Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.load(Ordering::SeqCst) {
            anyhow::bail!("admission denied");
        }
        self.inner.update(object).await
    }

    async fn list<T: Resource>(&self, namespace: Option<&str>) -> anyhow::Result<Vec<T>> {
        if self.fail_list.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        self.inner.list(namespace).await
    }
}

/// Service account carrying an ExternalDNS owner reference.
pub fn owned_service_account(name: &str, namespace: &str) -> ServiceAccount {
    let mut metadata = ObjectMeta::namespaced(name, namespace);
    metadata.owner_references.push(OwnerReference {
        kind: EXTERNAL_DNS_KIND.to_string(),
        name: name.trim_start_matches("external-dns-").to_string(),
        uid: String::new(),
    });
    ServiceAccount { metadata }
}

pub async fn reconciler() -> crate::rbac::RbacReconciler<TestClient> {
    crate::rbac::RbacReconciler::new(TestClient::new().await, "external-dns", "operator-ns")
}
