//! JSON file collections
//!
//! Every collection is one JSON array on disk, loaded once at open and kept
//! in memory behind an async `RwLock`. Writers hold the lock across the file
//! write, so the on-disk order of mutations equals the in-memory order.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::config::StorageConfig;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::{Bug, User};
use crate::db::seed;

/// A single file-backed collection of records
#[derive(Debug)]
pub struct JsonCollection<T> {
    path: PathBuf,
    records: RwLock<Vec<T>>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Load a collection from `path`, creating an empty one if the file is missing
    pub async fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        let path = path.into();

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| DatabaseError::serialization(&path, e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                write_atomic(&path, &Vec::<T>::new()).await?;
                tracing::info!("Created empty collection at {}", path.display());
                Vec::new()
            }
            Err(e) => return Err(DatabaseError::io(&path, e)),
        };

        tracing::debug!("Loaded {} records from {}", records.len(), path.display());

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the current records under a read lock
    pub async fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let records = self.records.read().await;
        f(&records)
    }

    /// Clone of every record, in storage order
    pub async fn snapshot(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Apply `f` to a copy of the records and persist the result.
    ///
    /// The copy only replaces the live records once it is on disk, so an
    /// error from `f` or from the write leaves both untouched.
    pub async fn mutate<R>(&self, f: impl FnOnce(&mut Vec<T>) -> DbResult<R>) -> DbResult<R> {
        let mut records = self.records.write().await;
        let mut next = records.clone();
        let out = f(&mut next)?;

        write_atomic(&self.path, &next).await?;
        *records = next;

        Ok(out)
    }
}

/// Write `records` to a sibling temp file, then rename it over `path`
async fn write_atomic<T: Serialize>(path: &Path, records: &[T]) -> DbResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DatabaseError::io(parent, e))?;
    }

    let data =
        serde_json::to_vec_pretty(records).map_err(|e| DatabaseError::serialization(path, e))?;

    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, data)
        .await
        .map_err(|e| DatabaseError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| DatabaseError::io(path, e))?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Handle to every collection the service persists
#[derive(Debug, Clone)]
pub struct Database {
    bugs: Arc<JsonCollection<Bug>>,
    users: Arc<JsonCollection<User>>,
}

impl Database {
    /// Open (or create) the bug and user collections named in `config`
    pub async fn open(config: &StorageConfig) -> DbResult<Self> {
        let bugs = JsonCollection::open(&config.bugs_path).await?;
        let users = JsonCollection::open(&config.users_path).await?;

        if config.seed_demo_data && bugs.is_empty().await {
            let demo = seed::demo_bugs();
            let count = demo.len();
            bugs.mutate(|records| {
                records.extend(demo);
                Ok(())
            })
            .await?;
            tracing::info!("Seeded {} demo bugs", count);
        }

        Ok(Self {
            bugs: Arc::new(bugs),
            users: Arc::new(users),
        })
    }

    pub fn bugs(&self) -> &JsonCollection<Bug> {
        &self.bugs
    }

    pub fn users(&self) -> &JsonCollection<User> {
        &self.users
    }

    /// Check that both backing files are still reachable
    pub async fn health_check(&self) -> DbResult<()> {
        for path in [self.bugs.path(), self.users.path()] {
            tokio::fs::metadata(path)
                .await
                .map_err(|e| DatabaseError::io(path, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> StorageConfig {
        StorageConfig {
            bugs_path: dir.path().join("data/bug.json"),
            users_path: dir.path().join("data/user.json"),
            seed_demo_data: false,
        }
    }

    #[tokio::test]
    async fn test_open_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/bug.json");

        let collection = JsonCollection::<Bug>::open(&path).await.unwrap();

        assert!(collection.is_empty().await);
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[tokio::test]
    async fn test_mutate_persists_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bug.json");

        let collection = JsonCollection::<Bug>::open(&path).await.unwrap();
        collection
            .mutate(|records| {
                records.push(Bug::new("Keyboard Not Found", 3));
                Ok(())
            })
            .await
            .unwrap();

        let reopened = JsonCollection::<Bug>::open(&path).await.unwrap();
        let bugs = reopened.snapshot().await;
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0].title, "Keyboard Not Found");
        assert!(!tmp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_failed_closure_leaves_records_untouched() {
        let dir = TempDir::new().unwrap();
        let collection = JsonCollection::<Bug>::open(dir.path().join("bug.json"))
            .await
            .unwrap();

        let result: DbResult<()> = collection
            .mutate(|records| {
                records.push(Bug::new("never stored", 1));
                Err(DatabaseError::constraint("rejected"))
            })
            .await;

        assert!(result.unwrap_err().is_constraint_violation());
        assert!(collection.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_records_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bug.json");
        let collection = JsonCollection::<Bug>::open(&path).await.unwrap();

        // A directory squatting on the temp file name makes the write fail.
        std::fs::create_dir(tmp_path(&path)).unwrap();

        let result = collection
            .mutate(|records| {
                records.push(Bug::new("lost", 2));
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(DatabaseError::Io { .. })));
        assert!(collection.is_empty().await);
    }

    #[tokio::test]
    async fn test_malformed_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bug.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonCollection::<Bug>::open(&path).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Serialization { .. }));
    }

    #[tokio::test]
    async fn test_database_seeds_demo_bugs_once() {
        let dir = TempDir::new().unwrap();
        let mut config = storage(&dir);
        config.seed_demo_data = true;

        let db = Database::open(&config).await.unwrap();
        let seeded = db.bugs().len().await;
        assert!(seeded > 0);

        let db = Database::open(&config).await.unwrap();
        assert_eq!(db.bugs().len().await, seeded);
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = TempDir::new().unwrap();
        let config = storage(&dir);
        let db = Database::open(&config).await.unwrap();

        assert!(db.health_check().await.is_ok());

        std::fs::remove_file(&config.users_path).unwrap();
        assert!(db.health_check().await.is_err());
    }
}
