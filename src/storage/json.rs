//! JSON file store.
//!
//! Keeps the population in a `MemoryStore` and mirrors it to one JSON
//! snapshot file. Every `add` or `update` is applied to a staged copy,
//! the staged snapshot is written to `<file>.tmp` and renamed into place,
//! and only then does the staged copy replace the live one. A failed write
//! leaves both the file and the in-memory population as they were.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::{MemberStore, MemorySnapshot, MemoryStore};
use crate::model::{Member, MemberId};
use crate::{Error, Result};

/// File-backed member population.
pub struct JsonFileStore {
    path: PathBuf,
    tmp_path: PathBuf,
    live: RwLock<MemoryStore>,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Load `path` if it exists, otherwise start empty. The file is not
    /// created until the first write, but its directory must exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .ok_or_else(|| Error::Storage(format!("not a file path: {}", path.display())))?;

        let mut tmp_name = OsString::from(file_name);
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.is_dir() {
                return Err(Error::Storage(format!("directory does not exist: {}", dir.display())));
            }
        }

        let snapshot = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str::<MemorySnapshot>(&text).map_err(|e| {
                Error::Storage(format!("corrupt snapshot {}: {e}", path.display()))
            })?
        } else {
            MemorySnapshot::default()
        };

        debug!(path = %path.display(), members = snapshot.members.len(), "opened json store");
        Ok(Self {
            path,
            tmp_path,
            live: RwLock::new(MemoryStore::from_snapshot(snapshot)),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Handle on the live population. Cheap: `MemoryStore` clones share data.
    fn current(&self) -> MemoryStore {
        self.live.read().clone()
    }

    /// Apply `change` to a staged copy, write it out, then make it live.
    fn commit<T>(&self, change: impl FnOnce(&MemoryStore) -> T) -> Result<T> {
        let _guard = self.write_lock.lock();

        let staged = MemoryStore::from_snapshot(self.current().snapshot());
        let out = change(&staged);
        self.write_snapshot(&staged.snapshot())?;

        *self.live.write() = staged;
        Ok(out)
    }

    fn write_snapshot(&self, snapshot: &MemorySnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.tmp_path, json)?;
        fs::rename(&self.tmp_path, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl MemberStore for JsonFileStore {
    async fn add(&self, member: Member) -> Result<Member> {
        self.commit(|staged| staged.insert(member))
    }

    async fn get_by_id(&self, id: MemberId) -> Result<Option<Member>> {
        self.current().get_by_id(id).await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Member>> {
        self.current().get_by_name(name).await
    }

    async fn list_all(&self) -> Result<Vec<Member>> {
        self.current().list_all().await
    }

    async fn update(&self, member: Member) -> Result<()> {
        self.commit(|staged| staged.replace(member))?;
        Ok(())
    }

    async fn update_pair(&self, a: Member, b: Member) -> Result<()> {
        self.commit(|staged| {
            staged.replace(a);
            staged.replace(b);
        })
    }

    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Member>> {
        self.current().find_by_name_ignore_case(name).await
    }

    async fn count(&self) -> Result<usize> {
        self.current().count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("family.json")).unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("family.json");

        let anna_id = {
            let store = JsonFileStore::open(&path).unwrap();
            let mut anna = store.add(Member::new("Anna")).await.unwrap();
            let paul = store.add(Member::new("Paul")).await.unwrap();
            anna.add_child(paul.id);
            store.update(anna.clone()).await.unwrap();
            anna.id
        };

        let reopened = JsonFileStore::open(&path).unwrap();
        let anna = reopened.get_by_id(anna_id).await.unwrap().unwrap();
        assert_eq!(anna.children.len(), 1);
        assert_eq!(reopened.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("family.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(JsonFileStore::open(&path), Err(Error::Storage(_))));
    }

    #[test]
    fn test_missing_directory_rejected_at_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("family.json");

        assert!(matches!(JsonFileStore::open(&path), Err(Error::Storage(_))));
    }

    #[test]
    fn test_tmp_file_keeps_full_name() {
        let dir = tempfile::tempdir().unwrap();
        let json = JsonFileStore::open(dir.path().join("family.json")).unwrap();
        let yaml = JsonFileStore::open(dir.path().join("family.yaml")).unwrap();

        assert_eq!(json.tmp_path, dir.path().join("family.json.tmp"));
        assert_ne!(json.tmp_path, yaml.tmp_path);
    }

    #[tokio::test]
    async fn test_failed_write_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();

        let store = JsonFileStore::open(data.join("family.json")).unwrap();
        let mary = store.add(Member::new("Mary")).await.unwrap();
        fs::remove_dir_all(&data).unwrap();

        assert!(store.add(Member::new("Dennis")).await.is_err());
        assert_eq!(store.count().await.unwrap(), 1);

        let mut edited = mary.clone();
        edited.add_child(MemberId(2));
        assert!(store.update(edited).await.is_err());
        assert_eq!(store.get_by_id(mary.id).await.unwrap().unwrap(), mary);

        let dennis = store.get_by_name("Dennis").await.unwrap();
        assert!(dennis.is_none());

        // The id consumed by the failed add is not handed out either.
        fs::create_dir(&data).unwrap();
        let dennis = store.add(Member::new("Dennis")).await.unwrap();
        assert_eq!(dennis.id, MemberId(2));
    }

    #[tokio::test]
    async fn test_failed_pair_write_keeps_both_sides() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();

        let store = JsonFileStore::open(data.join("family.json")).unwrap();
        let mut mary = store.add(Member::new("Mary")).await.unwrap();
        let mut dennis = store.add(Member::new("Dennis")).await.unwrap();
        fs::remove_dir_all(&data).unwrap();

        mary.add_child(dennis.id);
        dennis.add_parent(mary.id);
        assert!(store.update_pair(mary.clone(), dennis.clone()).await.is_err());

        for id in [mary.id, dennis.id] {
            let stored = store.get_by_id(id).await.unwrap().unwrap();
            assert!(stored.children.is_empty() && stored.parents.is_empty());
        }

        fs::create_dir(&data).unwrap();
        store.update_pair(mary.clone(), dennis.clone()).await.unwrap();
        let reopened = JsonFileStore::open(data.join("family.json")).unwrap();
        assert_eq!(reopened.get_by_id(mary.id).await.unwrap().unwrap().children, vec![dennis.id]);
        assert_eq!(reopened.get_by_id(dennis.id).await.unwrap().unwrap().parents.as_slice(), &[mary.id]);
    }
}
