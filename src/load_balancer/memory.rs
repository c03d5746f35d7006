//! In-memory pool store.
//!
//! Backs `--dry-run` and the test suites. Mutations are logged and counted
//! instead of reaching the cluster.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::load_balancer::store::{PoolStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    members: BTreeSet<SocketAddr>,
    inserts: usize,
    deletes: usize,
    reloads: usize,
    unavailable: bool,
}

/// Pool store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryPoolStore {
    inner: Mutex<Inner>,
}

impl MemoryPoolStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// List a member without counting it as an insertion.
    pub fn seed(&self, member: SocketAddr) {
        self.lock().members.insert(member);
    }

    /// Make every subsequent operation fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    pub fn members(&self) -> Vec<SocketAddr> {
        self.lock().members.iter().copied().collect()
    }

    pub fn insert_count(&self) -> usize {
        self.lock().inserts
    }

    pub fn delete_count(&self) -> usize {
        self.lock().deletes
    }

    pub fn reload_count(&self) -> usize {
        self.lock().reloads
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory pool store mutex poisoned")
    }

    fn checked(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        let inner = self.lock();
        if inner.unavailable {
            return Err(StoreError::Unavailable("memory store marked unavailable".to_string()));
        }
        Ok(inner)
    }
}

#[async_trait]
impl PoolStore for MemoryPoolStore {
    async fn exists(&self, member: SocketAddr) -> Result<bool, StoreError> {
        Ok(self.checked()?.members.contains(&member))
    }

    async fn insert(&self, member: SocketAddr) -> Result<(), StoreError> {
        let mut inner = self.checked()?;
        inner.members.insert(member);
        inner.inserts += 1;
        tracing::info!(%member, "[dry-run] insert balancer member");
        Ok(())
    }

    async fn delete(&self, member: SocketAddr) -> Result<(), StoreError> {
        let mut inner = self.checked()?;
        inner.members.remove(&member);
        inner.deletes += 1;
        tracing::info!(%member, "[dry-run] delete balancer member");
        Ok(())
    }

    async fn reload(&self) -> Result<(), StoreError> {
        self.checked()?.reloads += 1;
        tracing::info!("[dry-run] reload front end");
        Ok(())
    }
}
