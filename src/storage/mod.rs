//! # Member Store Trait
//!
//! The contract between the relationship engine and whatever holds the
//! member population. The engine only ever adds, reads, lists and
//! full-replaces members; it never deletes.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryStore` | `memory` | In-process, with a lowercase name index |
//! | `JsonFileStore` | `json` | `MemoryStore` flushed to a JSON snapshot on every write |

pub mod json;
pub mod memory;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::model::{Member, MemberId};

pub use json::JsonFileStore;
pub use memory::{MemorySnapshot, MemoryStore};

// ============================================================================
// Store Configuration
// ============================================================================

/// Which store backs a `FamilyTree`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-memory (no persistence)
    #[default]
    Memory,

    /// Whole population kept in one JSON file
    JsonFile { path: PathBuf },
}

impl StoreConfig {
    /// Open the configured store behind a trait object.
    pub fn open(&self) -> Result<Box<dyn MemberStore>> {
        Ok(match self {
            StoreConfig::Memory => Box::new(MemoryStore::new()),
            StoreConfig::JsonFile { path } => Box::new(JsonFileStore::open(path)?),
        })
    }
}

// ============================================================================
// MemberStore Trait
// ============================================================================

/// Keyed collection of members.
///
/// Reads hand back owned copies. Mutating a copy changes nothing until it
/// is passed to `update`.
#[async_trait]
pub trait MemberStore: Send + Sync + 'static {
    /// Assign a fresh id, insert, and return the stored record.
    async fn add(&self, member: Member) -> Result<Member>;

    /// Get a member by id. Returns None if not found.
    async fn get_by_id(&self, id: MemberId) -> Result<Option<Member>>;

    /// Lookup by name. Case policy belongs to the store.
    async fn get_by_name(&self, name: &str) -> Result<Option<Member>>;

    /// Full population, oldest first.
    async fn list_all(&self) -> Result<Vec<Member>>;

    /// Replace the member with the same id. Unknown ids are ignored.
    async fn update(&self, member: Member) -> Result<()>;

    /// Replace both endpoints of an edge.
    ///
    /// Default: two `update` calls. Stores that can fail between them
    /// should override this so neither side is written alone.
    async fn update_pair(&self, a: Member, b: Member) -> Result<()> {
        self.update(a).await?;
        self.update(b).await
    }

    /// First-created member whose name matches ignoring case.
    ///
    /// Default: linear scan over `list_all`.
    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Member>> {
        Ok(self.list_all().await?.into_iter().find(|m| m.name_matches(name)))
    }

    /// Number of stored members.
    async fn count(&self) -> Result<usize> {
        Ok(self.list_all().await?.len())
    }
}

#[async_trait]
impl<S: MemberStore + ?Sized> MemberStore for Box<S> {
    async fn add(&self, member: Member) -> Result<Member> {
        (**self).add(member).await
    }

    async fn get_by_id(&self, id: MemberId) -> Result<Option<Member>> {
        (**self).get_by_id(id).await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Member>> {
        (**self).get_by_name(name).await
    }

    async fn list_all(&self) -> Result<Vec<Member>> {
        (**self).list_all().await
    }

    async fn update(&self, member: Member) -> Result<()> {
        (**self).update(member).await
    }

    async fn update_pair(&self, a: Member, b: Member) -> Result<()> {
        (**self).update_pair(a, b).await
    }

    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Member>> {
        (**self).find_by_name_ignore_case(name).await
    }

    async fn count(&self) -> Result<usize> {
        (**self).count().await
    }
}
