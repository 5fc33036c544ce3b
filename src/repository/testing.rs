//! Test doubles for the repository layer.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{self, Cache, CacheError, MemoryCache};
use crate::images::{self, ImageError, ImageHost, UploadedImage};
use crate::models::{Category, CategoryChanges, NewCategory, NewProduct, Product, ProductChanges};
use crate::store::{self, CategoryStore, InMemoryStore, ProductStore, StoreError};

/// Memory cache that records writes and can be made to fail.
pub struct TestCache {
    inner: MemoryCache,
    sets: Mutex<Vec<(String, Duration)>>,
    fail_all: AtomicBool,
    fail_delete: Mutex<HashSet<String>>,
}

impl TestCache {
    pub fn new() -> Self {
        Self {
            inner: MemoryCache::new(1000),
            sets: Mutex::new(Vec::new()),
            fail_all: AtomicBool::new(false),
            fail_delete: Mutex::new(HashSet::new()),
        }
    }

    pub fn inner(&self) -> &MemoryCache {
        &self.inner
    }

    /// Writes straight into the backing cache without recording.
    pub async fn seed(&self, key: &str, value: &str) {
        self.inner
            .set(key, value, Duration::from_secs(60))
            .await
            .unwrap();
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.inner.get(key).await.unwrap().is_some()
    }

    pub fn sets(&self) -> Vec<(String, Duration)> {
        self.sets.lock().unwrap().clone()
    }

    pub fn fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete_of(&self, key: &str) {
        self.fail_delete.lock().unwrap().insert(key.to_string());
    }

    fn check(&self) -> cache::Result<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionFailed("cache is down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Cache for TestCache {
    async fn get(&self, key: &str) -> cache::Result<Option<String>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> cache::Result<()> {
        self.check()?;
        self.sets.lock().unwrap().push((key.to_string(), ttl));
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> cache::Result<()> {
        self.check()?;
        if self.fail_delete.lock().unwrap().contains(key) {
            return Err(CacheError::OperationFailed(format!("DEL {}", key)));
        }
        self.inner.delete(key).await
    }
}

/// In-memory store that counts reads and can reject writes.
#[derive(Default)]
pub struct CountingStore {
    pub inner: InMemoryStore,
    reads: AtomicUsize,
    fail_writes: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn check_write(&self) -> store::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStore for CountingStore {
    async fn find_products(&self) -> store::Result<Vec<Product>> {
        self.read();
        self.inner.find_products().await
    }

    async fn find_product(&self, id: &str) -> store::Result<Option<Product>> {
        self.read();
        self.inner.find_product(id).await
    }

    async fn find_slugs_with_prefix(
        &self,
        prefix: &str,
        exclude_id: Option<&str>,
    ) -> store::Result<HashSet<String>> {
        self.inner.find_slugs_with_prefix(prefix, exclude_id).await
    }

    async fn create_product(&self, product: NewProduct) -> store::Result<Product> {
        self.check_write()?;
        self.inner.create_product(product).await
    }

    async fn update_product(&self, id: &str, changes: ProductChanges) -> store::Result<Product> {
        self.check_write()?;
        self.inner.update_product(id, changes).await
    }

    async fn delete_product(&self, id: &str) -> store::Result<Product> {
        self.check_write()?;
        self.inner.delete_product(id).await
    }
}

#[async_trait]
impl CategoryStore for CountingStore {
    async fn find_categories(&self) -> store::Result<Vec<Category>> {
        self.read();
        self.inner.find_categories().await
    }

    async fn find_category(&self, id: &str) -> store::Result<Option<Category>> {
        self.read();
        self.inner.find_category(id).await
    }

    async fn create_category(&self, category: NewCategory) -> store::Result<Category> {
        self.check_write()?;
        self.inner.create_category(category).await
    }

    async fn update_category(&self, id: &str, changes: CategoryChanges) -> store::Result<Category> {
        self.check_write()?;
        self.inner.update_category(id, changes).await
    }

    async fn delete_category(&self, id: &str) -> store::Result<Category> {
        self.check_write()?;
        self.inner.delete_category(id).await
    }
}

/// Image host that hands out sequential ids and remembers destroys.
#[derive(Default)]
pub struct FakeImageHost {
    uploads: AtomicUsize,
    destroyed: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
}

impl FakeImageHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(&self, data_uri: &str, folder: &str) -> images::Result<UploadedImage> {
        images::parse_data_uri(data_uri)?;
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(ImageError::Upload("host rejected upload".to_string()));
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(UploadedImage {
            secure_url: format!("https://img.test/{}/{}.png", folder, n),
            public_id: format!("{}/{}", folder, n),
        })
    }

    async fn destroy(&self, public_id: &str) -> images::Result<()> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

/// A valid one-pixel-ish image payload.
pub const PNG_DATA_URI: &str = "data:image/png;base64,aGVsbG8=";
