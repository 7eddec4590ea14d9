//! Process-wide registry of per-path write locks.
//!
//! This is global shared state: every writer created with `serialize_writes`
//! looks up the mutex for its resolved path here and keeps the returned
//! `Arc` for its whole lifetime. The registry only holds `Weak` references,
//! so a lock disappears once the last writer using it is gone; dead entries
//! are pruned on the next lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

/// Mutex serializing raw writes to one path.
pub type PathLock = Arc<Mutex<()>>;

static REGISTRY: OnceLock<Mutex<HashMap<PathBuf, Weak<Mutex<()>>>>> = OnceLock::new();

/// Canonical key for a path: the canonicalized path when it exists, else
/// the canonicalized parent joined with the file name, else the absolute
/// form. A file keeps its key from before it is created to after.
pub fn resolve_key(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    if let (Ok(dir), Some(name)) = (std::fs::canonicalize(parent), path.file_name()) {
        return dir.join(name);
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// The shared lock for `path`, created on first reference.
pub fn lock_for(path: &Path) -> PathLock {
    let key = resolve_key(path);
    let registry = REGISTRY.get_or_init(|| Mutex::new(HashMap::new()));
    let mut map = registry.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(existing) = map.get(&key).and_then(Weak::upgrade) {
        return existing;
    }

    map.retain(|_, weak| weak.strong_count() > 0);
    let lock = Arc::new(Mutex::new(()));
    map.insert(key.clone(), Arc::downgrade(&lock));
    log::debug!("registered write lock for {}", key.display());
    lock
}

/// Acquire a path lock. The mutex guards no data, so a panic in another
/// holder leaves nothing inconsistent and poisoning is ignored.
pub fn acquire(lock: &PathLock) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
fn registered_count() -> usize {
    REGISTRY
        .get()
        .map(|r| r.lock().unwrap_or_else(PoisonError::into_inner).len())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_path_same_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.txt");
        std::fs::write(&path, "").unwrap();

        let a = lock_for(&path);
        let b = lock_for(&path.parent().unwrap().join(".").join("shared.txt"));
        assert!(Arc::ptr_eq(&a, &b));

        let other = lock_for(&dir.path().join("other.txt"));
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[test]
    fn test_key_stable_across_creation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later.txt");
        let before = resolve_key(&path);
        std::fs::write(&path, "").unwrap();
        assert_eq!(before, resolve_key(&path));
    }

    #[test]
    fn test_lock_released_with_last_holder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transient.txt");

        let first = lock_for(&path);
        let weak = Arc::downgrade(&first);
        drop(first);
        assert!(weak.upgrade().is_none());

        let _again = lock_for(&path);
        assert!(registered_count() >= 1);
    }

    #[test]
    fn test_acquire_blocks_second_holder() {
        let lock = lock_for(Path::new("/nonexistent/textio-lock-test"));
        let guard = acquire(&lock);
        assert!(lock.try_lock().is_err());
        drop(guard);
        assert!(lock.try_lock().is_ok());
    }
}
