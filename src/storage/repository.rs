//! Write-through cached repository for the dataset
//!
//! [`DataRepository`] owns the in-memory copy of the dataset. Reads are served
//! from the cache once it is primed; saves go through the encrypting
//! serializer first and only then replace the cache and notify subscribers.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{de::DeserializeOwned, Serialize};

use crate::crypto::{SecureString, UnlockedSession};
use crate::error::{PassVaultError, PassVaultResult};
use crate::notify::Notifier;

use super::path_resolver::PathResolver;
use super::serializer::EncryptedSerializer;

/// A persistable root dataset
pub trait Dataset: Serialize + DeserializeOwned + Default + Clone + Send + Sync {
    /// Structural validation run after every load. May repair in place.
    fn validate(&mut self) -> PassVaultResult<()>;

    /// Whether the dataset holds any user content
    fn has_data(&self) -> bool;
}

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Cached access to the dataset at the resolver's current path
pub struct DataRepository<T: Dataset> {
    serializer: Arc<EncryptedSerializer>,
    resolver: Arc<PathResolver>,
    notifier: Arc<dyn Notifier>,
    cache: Mutex<Option<T>>,
    subscribers: Mutex<Vec<Subscriber<T>>>,
}

impl<T: Dataset> DataRepository<T> {
    pub fn new(
        serializer: Arc<EncryptedSerializer>,
        resolver: Arc<PathResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            serializer,
            resolver,
            notifier,
            cache: Mutex::new(None),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Current dataset, or an empty one if it cannot be loaded
    ///
    /// Load failures are reported through the notifier. The empty fallback is
    /// not cached, so the next call tries the file again.
    pub fn get(&self) -> T {
        match self.try_get() {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "failed to load dataset, using empty fallback");
                self.notifier.error(&format!("Failed to load data: {}", e));
                T::default()
            }
        }
    }

    /// Current dataset, propagating load failures
    pub fn try_get(&self) -> PassVaultResult<T> {
        let mut cache = self.lock_cache()?;
        if let Some(cached) = cache.as_ref() {
            tracing::debug!("dataset served from cache");
            return Ok(cached.clone());
        }

        let path = self.resolver.current_data_path();
        let mut data: T = self.serializer.load(&path)?;
        data.validate()?;

        *cache = Some(data.clone());
        Ok(data)
    }

    /// Persist `entity`, then replace the cache and notify subscribers
    ///
    /// On failure the previous cache is kept and `false` is returned.
    pub fn save(&self, entity: &T) -> bool {
        let path = self.resolver.current_data_path();
        if let Err(e) = self.serializer.save(entity, &path) {
            tracing::error!(error = %e, path = %path.display(), "failed to save dataset");
            self.notifier.error(&format!("Failed to save data: {}", e));
            return false;
        }

        match self.lock_cache() {
            Ok(mut cache) => *cache = Some(entity.clone()),
            Err(e) => {
                self.notifier.error(&e.to_string());
                return false;
            }
        }

        self.notify_subscribers(entity);
        true
    }

    /// Force the next read to go to storage
    pub fn invalidate_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            *cache = None;
            tracing::debug!("dataset cache invalidated");
        }
    }

    /// Replace the cache without writing, then notify subscribers
    pub fn update_cache(&self, entity: T) {
        if let Ok(mut cache) = self.cache.lock() {
            *cache = Some(entity.clone());
        }
        self.notify_subscribers(&entity);
    }

    /// Register a change callback; callbacks run in registration order
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(Arc::new(callback));
        }
    }

    /// Whether the current dataset holds any content
    pub fn exists(&self) -> bool {
        self.try_get().map(|d| d.has_data()).unwrap_or(false)
    }

    /// Load and validate a dataset from an arbitrary file, leaving the cache alone
    pub fn import(&self, path: &Path) -> PassVaultResult<T> {
        let mut data: T = self.serializer.load(path)?;
        data.validate()?;
        tracing::info!(path = %path.display(), "dataset imported");
        Ok(data)
    }

    /// Write the current dataset to an arbitrary file
    pub fn export(&self, path: &Path) -> bool {
        let data = match self.try_get() {
            Ok(data) => data,
            Err(e) => {
                self.notifier.error(&format!("Failed to export data: {}", e));
                return false;
            }
        };

        match self.serializer.save(&data, path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "dataset exported");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "export failed");
                self.notifier.error(&format!("Failed to export data: {}", e));
                false
            }
        }
    }

    /// Trial-load the real dataset with `passphrase`
    ///
    /// Nothing changes unless the load and validation succeed; then the session
    /// is installed and the cache primed with the result.
    pub fn unlock(&self, passphrase: &SecureString) -> PassVaultResult<T> {
        let session = UnlockedSession::unlock(passphrase)?;
        let path = self.resolver.current_data_path();

        let mut data: T = self.serializer.load_with_session(&path, &session)?;
        data.validate()?;

        let mut cache = self.lock_cache()?;
        self.serializer.install_session(session)?;
        *cache = Some(data.clone());
        Ok(data)
    }

    /// Path reads and writes currently go to
    pub fn current_path(&self) -> PathBuf {
        self.resolver.current_data_path()
    }

    pub fn serializer(&self) -> &Arc<EncryptedSerializer> {
        &self.serializer
    }

    pub fn resolver(&self) -> &Arc<PathResolver> {
        &self.resolver
    }

    fn notify_subscribers(&self, entity: &T) {
        // Snapshot so callbacks may subscribe or read without deadlocking
        let subscribers: Vec<Subscriber<T>> = match self.subscribers.lock() {
            Ok(s) => s.clone(),
            Err(_) => return,
        };
        for callback in subscribers {
            callback(entity);
        }
    }

    fn lock_cache(&self) -> PassVaultResult<MutexGuard<'_, Option<T>>> {
        self.cache
            .lock()
            .map_err(|e| PassVaultError::InvalidState(format!("Cache lock poisoned: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VaultPaths;
    use crate::notify::{Level, RecordingNotifier};
    use crate::storage::codec::JsonCodec;
    use crate::storage::file_io::{FileStorage, LocalFileStorage};
    use serde::Deserialize;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Notes {
        items: Vec<String>,
    }

    impl Dataset for Notes {
        fn validate(&mut self) -> PassVaultResult<()> {
            self.items.retain(|i| !i.trim().is_empty());
            Ok(())
        }

        fn has_data(&self) -> bool {
            !self.items.is_empty()
        }
    }

    fn notes(items: &[&str]) -> Notes {
        Notes {
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Local storage that counts reads and can be told to fail writes
    #[derive(Default)]
    struct CountingStorage {
        inner: LocalFileStorage,
        reads: AtomicUsize,
        fail_writes: AtomicBool,
    }

    impl CountingStorage {
        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl FileStorage for CountingStorage {
        fn read_text(&self, path: &Path) -> PassVaultResult<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read_text(path)
        }

        fn write_text(&self, path: &Path, content: &str) -> PassVaultResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PassVaultError::Storage("disk full".into()));
            }
            self.inner.write_text(path, content)
        }

        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }

        fn is_writable(&self, dir: &Path) -> bool {
            self.inner.is_writable(dir)
        }

        fn create_dir(&self, dir: &Path) -> PassVaultResult<()> {
            self.inner.create_dir(dir)
        }
    }

    struct Fixture {
        _temp_dir: TempDir,
        storage: Arc<CountingStorage>,
        notifier: Arc<RecordingNotifier>,
        repo: DataRepository<Notes>,
        data_file: PathBuf,
        dir: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();
        let paths = VaultPaths::with_base_dir(dir.clone());
        let data_file = paths.data_file();

        let storage = Arc::new(CountingStorage::default());
        let backend: Arc<dyn FileStorage> = storage.clone();
        let serializer = Arc::new(EncryptedSerializer::new(
            JsonCodec::new(backend.clone()),
            "test",
        ));
        let resolver = Arc::new(PathResolver::new(backend, paths));
        let notifier = Arc::new(RecordingNotifier::new());
        let repo = DataRepository::new(serializer, resolver, notifier.clone());

        Fixture {
            _temp_dir: temp_dir,
            storage,
            notifier,
            repo,
            data_file,
            dir,
        }
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let f = fixture();
        assert_eq!(f.repo.get(), Notes::default());
        assert!(!f.repo.exists());
        assert_eq!(f.storage.reads(), 0);
    }

    #[test]
    fn test_reads_hit_cache_until_invalidated() {
        let f = fixture();
        std::fs::write(&f.data_file, r#"{"items":["a","b"]}"#).unwrap();

        assert_eq!(f.repo.get(), notes(&["a", "b"]));
        assert_eq!(f.repo.get(), notes(&["a", "b"]));
        assert_eq!(f.storage.reads(), 1);

        f.repo.invalidate_cache();
        f.repo.get();
        assert_eq!(f.storage.reads(), 2);
    }

    #[test]
    fn test_validate_runs_on_load() {
        let f = fixture();
        std::fs::write(&f.data_file, r#"{"items":["a","  "]}"#).unwrap();
        assert_eq!(f.repo.get(), notes(&["a"]));
    }

    #[test]
    fn test_save_replaces_cache_and_notifies_in_order() {
        let f = fixture();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for id in 1..=3 {
            let seen = seen.clone();
            f.repo.subscribe(move |n: &Notes| {
                seen.lock().unwrap().push((id, n.items.len()));
            });
        }

        assert!(f.repo.save(&notes(&["x"])));

        assert_eq!(*seen.lock().unwrap(), vec![(1, 1), (2, 1), (3, 1)]);
        assert_eq!(f.repo.get(), notes(&["x"]));
        assert_eq!(f.storage.reads(), 0);
        assert!(f.data_file.exists());
    }

    #[test]
    fn test_failed_save_keeps_cache() {
        let f = fixture();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        f.repo.subscribe(move |_: &Notes| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(f.repo.save(&notes(&["kept"])));

        f.storage.fail_writes.store(true, Ordering::SeqCst);
        assert!(!f.repo.save(&notes(&["lost"])));

        assert_eq!(f.repo.get(), notes(&["kept"]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.notifier.count(Level::Error), 1);
    }

    #[test]
    fn test_load_failure_falls_back_without_caching() {
        let f = fixture();
        std::fs::write(&f.data_file, "{ broken").unwrap();

        assert_eq!(f.repo.get(), Notes::default());
        assert_eq!(f.notifier.count(Level::Error), 1);
        assert!(f.repo.try_get().is_err());

        std::fs::write(&f.data_file, r#"{"items":["fixed"]}"#).unwrap();
        assert_eq!(f.repo.get(), notes(&["fixed"]));
    }

    #[test]
    fn test_update_cache_does_not_write() {
        let f = fixture();
        f.repo.update_cache(notes(&["memory"]));

        assert_eq!(f.repo.get(), notes(&["memory"]));
        assert!(!f.data_file.exists());
    }

    #[test]
    fn test_update_cache_notifies_subscribers_in_order() {
        let f = fixture();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for id in 1..=2 {
            let seen = seen.clone();
            f.repo.subscribe(move |n: &Notes| {
                seen.lock().unwrap().push((id, n.items.clone()));
            });
        }

        f.repo.update_cache(notes(&["a", "b"]));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (1, vec!["a".to_string(), "b".to_string()]),
                (2, vec!["a".to_string(), "b".to_string()]),
            ]
        );
        assert!(!f.data_file.exists());
        assert_eq!(f.storage.reads(), 0);
    }

    #[test]
    fn test_import_and_export_leave_cache_alone() {
        let f = fixture();
        assert!(f.repo.save(&notes(&["current"])));

        let backup = f.dir.join("backup.json");
        assert!(f.repo.export(&backup));

        std::fs::write(f.dir.join("other.json"), r#"{"items":["other"]}"#).unwrap();
        let imported = f.repo.import(&f.dir.join("other.json")).unwrap();
        assert_eq!(imported, notes(&["other"]));
        assert_eq!(f.repo.get(), notes(&["current"]));

        assert_eq!(f.repo.import(&backup).unwrap(), notes(&["current"]));
    }

    #[test]
    fn test_unlock_is_atomic() {
        let f = fixture();
        let serializer = f.repo.serializer().clone();
        serializer
            .set_passphrase(&SecureString::new("correct horse"))
            .unwrap();
        assert!(f.repo.save(&notes(&["secret"])));
        serializer.clear_passphrase().unwrap();
        f.repo.invalidate_cache();

        let err = f.repo.unlock(&SecureString::new("wrong horse")).unwrap_err();
        assert!(err.is_authentication_failure());
        assert!(!serializer.has_passphrase());
        assert!(matches!(
            f.repo.try_get().unwrap_err(),
            PassVaultError::InvalidState(_)
        ));

        let data = f.repo.unlock(&SecureString::new("correct horse")).unwrap();
        assert_eq!(data, notes(&["secret"]));
        assert!(serializer.has_passphrase());

        let reads = f.storage.reads();
        assert_eq!(f.repo.get(), notes(&["secret"]));
        assert_eq!(f.storage.reads(), reads);
    }
}
