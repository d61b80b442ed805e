//! In-memory member store.
//!
//! This is the reference implementation of `MemberStore`.
//! Members live in a HashMap protected by RwLock, with a second map from
//! lowercased name to ids for case-insensitive lookup.
//!
//! ## Limitations
//!
//! - **Single-writer only**: each call takes its own locks, so a sequence
//!   of calls is not atomic. The engine serializes writers itself.
//! - **Exact `get_by_name`**: only `find_by_name_ignore_case` folds case.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use hashbrown::HashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::MemberStore;
use crate::Result;
use crate::model::{Member, MemberId};

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory member population. Clones share the same data.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    members: RwLock<HashMap<MemberId, Member>>,
    /// lowercase name → ids, ascending
    name_index: RwLock<HashMap<String, SmallVec<[MemberId; 1]>>>,
    next_id: AtomicU64,
}

/// Serializable copy of a store's contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub next_id: u64,
    pub members: Vec<Member>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::from_snapshot(MemorySnapshot::default())
    }

    /// Rebuild a store, including its name index, from a snapshot.
    pub fn from_snapshot(snapshot: MemorySnapshot) -> Self {
        let highest = snapshot.members.iter().map(|m| m.id.0).max().unwrap_or(0);
        let next_id = snapshot.next_id.max(highest + 1);

        let mut members = HashMap::with_capacity(snapshot.members.len());
        let mut name_index: HashMap<String, SmallVec<[MemberId; 1]>> = HashMap::new();
        for member in snapshot.members {
            index_insert(&mut name_index, &member.name, member.id);
            members.insert(member.id, member);
        }

        Self {
            inner: Arc::new(MemoryInner {
                members: RwLock::new(members),
                name_index: RwLock::new(name_index),
                next_id: AtomicU64::new(next_id),
            }),
        }
    }

    /// Copy out every member, oldest first.
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            next_id: self.inner.next_id.load(Ordering::Relaxed),
            members: self.sorted_members(),
        }
    }

    /// Synchronous `MemberStore::add`.
    pub fn insert(&self, mut member: Member) -> Member {
        member.id = MemberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));

        let mut members = self.inner.members.write();
        index_insert(&mut self.inner.name_index.write(), &member.name, member.id);
        members.insert(member.id, member.clone());
        member
    }

    /// Synchronous `MemberStore::update`. Returns false for an unknown id.
    pub fn replace(&self, member: Member) -> bool {
        let mut members = self.inner.members.write();
        let Some(slot) = members.get_mut(&member.id) else {
            return false;
        };

        if slot.name != member.name {
            let mut index = self.inner.name_index.write();
            index_remove(&mut index, &slot.name, member.id);
            index_insert(&mut index, &member.name, member.id);
        }
        *slot = member;
        true
    }

    fn sorted_members(&self) -> Vec<Member> {
        let mut all: Vec<Member> = self.inner.members.read().values().cloned().collect();
        all.sort_by_key(|m| m.id);
        all
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn index_key(name: &str) -> String {
    name.to_lowercase()
}

fn index_insert(index: &mut HashMap<String, SmallVec<[MemberId; 1]>>, name: &str, id: MemberId) {
    let ids = index.entry(index_key(name)).or_default();
    if let Err(pos) = ids.binary_search(&id) {
        ids.insert(pos, id);
    }
}

fn index_remove(index: &mut HashMap<String, SmallVec<[MemberId; 1]>>, name: &str, id: MemberId) {
    let key = index_key(name);
    if let Some(ids) = index.get_mut(&key) {
        ids.retain(|existing| *existing != id);
        if ids.is_empty() {
            index.remove(&key);
        }
    }
}

// ============================================================================
// MemberStore impl
// ============================================================================

#[async_trait]
impl MemberStore for MemoryStore {
    async fn add(&self, member: Member) -> Result<Member> {
        Ok(self.insert(member))
    }

    async fn get_by_id(&self, id: MemberId) -> Result<Option<Member>> {
        Ok(self.inner.members.read().get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Member>> {
        let members = self.inner.members.read();
        let index = self.inner.name_index.read();

        let hit = index
            .get(&index_key(name))
            .into_iter()
            .flatten()
            .filter_map(|id| members.get(id))
            .find(|m| m.name == name)
            .cloned();
        Ok(hit)
    }

    async fn list_all(&self) -> Result<Vec<Member>> {
        Ok(self.sorted_members())
    }

    async fn update(&self, member: Member) -> Result<()> {
        self.replace(member);
        Ok(())
    }

    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Member>> {
        let members = self.inner.members.read();
        let index = self.inner.name_index.read();

        let hit = index
            .get(&index_key(name))
            .and_then(|ids| ids.first())
            .and_then(|id| members.get(id))
            .cloned();
        Ok(hit)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.members.read().len())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_assigns_fresh_ids() {
        let store = MemoryStore::new();

        let a = store.add(Member::new("Anna")).await.unwrap();
        let b = store.add(Member::new("Anna")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.get_by_id(a.id).await.unwrap().unwrap().name, "Anna");
    }

    #[tokio::test]
    async fn test_get_by_name_is_exact() {
        let store = MemoryStore::new();
        store.add(Member::new("Anna")).await.unwrap();

        assert!(store.get_by_name("Anna").await.unwrap().is_some());
        assert!(store.get_by_name("anna").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_ignore_case_returns_oldest() {
        let store = MemoryStore::new();
        let first = store.add(Member::new("anna")).await.unwrap();
        store.add(Member::new("ANNA")).await.unwrap();

        let hit = store.find_by_name_ignore_case("Anna").await.unwrap().unwrap();
        assert_eq!(hit.id, first.id);
    }

    #[tokio::test]
    async fn test_update_replaces_and_reindexes() {
        let store = MemoryStore::new();
        let mut m = store.add(Member::new("Dennis")).await.unwrap();

        m.name = "Denis".into();
        m.add_child(MemberId(42));
        store.update(m.clone()).await.unwrap();

        let stored = store.get_by_id(m.id).await.unwrap().unwrap();
        assert_eq!(stored.children, vec![MemberId(42)]);
        assert!(store.find_by_name_ignore_case("dennis").await.unwrap().is_none());
        assert_eq!(store.find_by_name_ignore_case("denis").await.unwrap().unwrap().id, m.id);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let store = MemoryStore::new();
        let mut ghost = Member::new("Ghost");
        ghost.id = MemberId(99);

        store.update(ghost).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_all_in_creation_order() {
        let store = MemoryStore::new();
        for name in ["Paul", "Anna", "Mary", "Dennis"] {
            store.add(Member::new(name)).await.unwrap();
        }

        let names: Vec<String> = store.list_all().await.unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Paul", "Anna", "Mary", "Dennis"]);
    }

    #[tokio::test]
    async fn test_snapshot_restores_ids_and_index() {
        let store = MemoryStore::new();
        let a = store.add(Member::new("Anna")).await.unwrap();
        store.add(Member::new("Roni")).await.unwrap();

        let restored = MemoryStore::from_snapshot(store.snapshot());
        assert_eq!(restored.find_by_name_ignore_case("ANNA").await.unwrap().unwrap().id, a.id);

        let c = restored.add(Member::new("Carl")).await.unwrap();
        assert_eq!(c.id, MemberId(3));
    }
}
