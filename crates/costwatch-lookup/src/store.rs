//! Object storage backends
//!
//! Reports are stored as objects in a bucket, addressed by key. The lookup
//! only needs two operations: list the objects under a prefix with their
//! modification times, and fetch one object's bytes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use costwatch_core::error::{CostwatchError, Result};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// One entry of a bucket listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Object key, `/`-separated
    pub key: String,
    /// Last modification time
    pub last_modified: DateTime<Utc>,
}

/// Read access to an object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List objects in `bucket` whose key starts with `prefix`
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>>;

    /// Fetch the bytes of one object
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

/// Object store backed by a directory tree
///
/// Each bucket is a directory under the root; keys are file paths relative
/// to the bucket directory. Modification times come from file metadata.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory holding the buckets
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf> {
        if bucket.is_empty() || !is_plain_relative(Path::new(bucket)) {
            return Err(CostwatchError::StorageFault(format!(
                "invalid bucket name: {bucket:?}"
            )));
        }
        Ok(self.root.join(bucket))
    }
}

/// Whether `path` stays inside the directory it is joined to
fn is_plain_relative(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Key for a file below the bucket directory
fn object_key(bucket_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(bucket_dir).ok()?;
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let bucket_dir = self.bucket_dir(bucket)?;
        let bucket_name = bucket.to_string();
        let prefix = prefix.to_string();
        let objects = tokio::task::spawn_blocking(move || -> Result<Vec<ObjectSummary>> {
            if !bucket_dir.is_dir() {
                return Err(CostwatchError::StorageFault(format!(
                    "bucket not found: {bucket_name}"
                )));
            }
            let mut objects = Vec::new();
            for entry in walkdir::WalkDir::new(&bucket_dir).min_depth(1) {
                let entry = entry.map_err(|e| CostwatchError::StorageFault(e.to_string()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let Some(key) = object_key(&bucket_dir, entry.path()) else {
                    debug!("Skipping non UTF-8 object path {}", entry.path().display());
                    continue;
                };
                if !key.starts_with(&prefix) {
                    continue;
                }
                let modified = entry
                    .metadata()
                    .map_err(|e| CostwatchError::StorageFault(e.to_string()))?
                    .modified()?;
                objects.push(ObjectSummary {
                    key,
                    last_modified: DateTime::<Utc>::from(modified),
                });
            }
            Ok(objects)
        })
        .await
        .map_err(|e| CostwatchError::StorageFault(e.to_string()))??;

        debug!("Listed {} objects in {}", objects.len(), bucket);
        Ok(objects)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        if key.is_empty() || !is_plain_relative(Path::new(key)) {
            return Err(CostwatchError::StorageFault(format!(
                "invalid object key: {key:?}"
            )));
        }
        let path = self.bucket_dir(bucket)?.join(key);
        tokio::fs::read(&path)
            .await
            .map_err(|e| CostwatchError::StorageFault(format!("failed to read {key}: {e}")))
    }
}

#[derive(Debug, Clone)]
struct StoredObject {
    body: Vec<u8>,
    last_modified: DateTime<Utc>,
}

/// Object store held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    buckets: BTreeMap<String, BTreeMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty bucket
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.buckets.entry(bucket.into()).or_default();
        self
    }

    /// Add or replace an object, creating its bucket if needed
    pub fn with_object(
        mut self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        body: impl Into<Vec<u8>>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        self.buckets.entry(bucket.into()).or_default().insert(
            key.into(),
            StoredObject {
                body: body.into(),
                last_modified,
            },
        );
        self
    }

    fn bucket(&self, bucket: &str) -> Result<&BTreeMap<String, StoredObject>> {
        self.buckets
            .get(bucket)
            .ok_or_else(|| CostwatchError::StorageFault(format!("bucket not found: {bucket}")))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        Ok(self
            .bucket(bucket)?
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| ObjectSummary {
                key: key.clone(),
                last_modified: object.last_modified,
            })
            .collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.bucket(bucket)?
            .get(key)
            .map(|object| object.body.clone())
            .ok_or_else(|| CostwatchError::StorageFault(format!("no such key: {key}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use filetime::FileTime;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, body: &str, unix_secs: i64) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        filetime::set_file_mtime(&path, FileTime::from_unix_time(unix_secs, 0)).unwrap();
    }

    #[tokio::test]
    async fn test_fs_listing_filters_by_prefix() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "cost-reports/reports/2024-10-07.json", "{}", 1_728_259_200);
        write(temp.path(), "cost-reports/reports/weekly/2024-10-14.json", "{}", 1_728_864_000);
        write(temp.path(), "cost-reports/archive/2024-01-01.json", "{}", 1_704_067_200);

        let store = FsObjectStore::new(temp.path());
        let mut objects = store.list_objects("cost-reports", "reports/").await.unwrap();
        objects.sort_by(|a, b| a.key.cmp(&b.key));

        let keys: Vec<_> = objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(
            keys,
            ["reports/2024-10-07.json", "reports/weekly/2024-10-14.json"]
        );
        assert_eq!(
            objects[0].last_modified,
            Utc.timestamp_opt(1_728_259_200, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_fs_missing_bucket_is_fault() {
        let temp = TempDir::new().unwrap();
        let store = FsObjectStore::new(temp.path());
        let err = store.list_objects("absent", "reports/").await.unwrap_err();
        assert!(matches!(err, CostwatchError::StorageFault(_)));
        assert_eq!(err.to_string(), "Storage error: bucket not found: absent");

        // A plain file is not a bucket either
        write(temp.path(), "flat", "{}", 0);
        let err = store.list_objects("flat", "").await.unwrap_err();
        assert_eq!(err.to_string(), "Storage error: bucket not found: flat");
    }

    #[tokio::test]
    async fn test_fs_get_object_rejects_escaping_keys() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "secret.json", "{}", 0);
        fs::create_dir_all(temp.path().join("bucket")).unwrap();

        let store = FsObjectStore::new(temp.path());
        assert!(store.get_object("bucket", "../secret.json").await.is_err());
        assert!(store.get_object("..", "secret.json").await.is_err());
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let at = Utc.with_ymd_and_hms(2024, 10, 14, 8, 0, 0).unwrap();
        let store = MemoryObjectStore::new()
            .with_object("b", "reports/a.json", r#"{"period":"a"}"#, at)
            .with_object("b", "other/b.json", "{}", at);

        let objects = store.list_objects("b", "reports/").await.unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(
            store.get_object("b", "reports/a.json").await.unwrap(),
            br#"{"period":"a"}"#
        );
        assert!(store.get_object("b", "reports/missing.json").await.is_err());
        assert!(store.list_objects("nope", "").await.is_err());
    }
}
