//! # genealogy-rs — Family Relationship Graph
//!
//! Records who is whose parent, child and sibling, and rebuilds rooted
//! tree views of that graph on demand.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `MemberStore` is the contract between engine and storage
//! 2. **Ids, not references**: members link to each other by `MemberId` lists
//! 3. **Relationship codes**: `"PS"` reads "the parent's sibling"; every
//!    letter but the last navigates, the last one links
//! 4. **Views are projections**: `FamilyTreeView` is built per query, never stored
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use genealogy_rs::{AddRelationshipRequest, FamilyTree, TreeRequest};
//!
//! # async fn example() -> genealogy_rs::Result<()> {
//! let mut family = FamilyTree::open_memory().await?;
//!
//! // Anna is Paul's parent.
//! family.add_relationship(&AddRelationshipRequest::new("Paul", "Anna", "P")).await?;
//! // Roni is a sibling of Anna's first child's first child.
//! family.add_relationship(&AddRelationshipRequest::new("Anna", "Roni", "CCS")).await?;
//!
//! let tree = family.family_tree(&TreeRequest::new("Anna")).await?;
//! print!("{}", genealogy_rs::render::render_tree_to_string(&tree)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Stores
//!
//! | Store | Config | Description |
//! |-------|--------|-------------|
//! | Memory | `StoreConfig::Memory` (default) | In-process, lost on drop |
//! | JSON file | `StoreConfig::JsonFile { path }` | Snapshot rewritten on every write |

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod engine;
pub mod model;
pub mod render;
pub mod storage;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    AddOutcome, AddRelationshipRequest, Diagnostic, FamilyTreeView, Member, MemberId,
    MemberSummary, Relation, RelationPath, TreeRequest,
};

// ============================================================================
// Re-exports: Storage, engine, config
// ============================================================================

pub use config::Config;
pub use engine::{Engine, TreeDepth};
pub use storage::{JsonFileStore, MemberStore, MemoryStore, StoreConfig};

// ============================================================================
// Top-level FamilyTree handle
// ============================================================================

/// The primary entry point. A `FamilyTree` wraps a member store, checks
/// requests, and runs them through the engine.
///
/// Writes take `&mut self`: the engine mutates the population in place
/// and expects one writer at a time. Share a `FamilyTree` behind a lock
/// if several tasks need it.
pub struct FamilyTree<S: MemberStore> {
    store: S,
    tree_depth: TreeDepth,
}

impl<S: MemberStore> FamilyTree<S> {
    /// Create a FamilyTree over the given store.
    pub fn with_store(store: S) -> Self {
        Self { store, tree_depth: TreeDepth::default() }
    }

    pub fn with_tree_depth(mut self, depth: TreeDepth) -> Self {
        self.tree_depth = depth;
        self
    }

    /// Record that `member1` is related to `member2` by `relationship`.
    ///
    /// Unknown names are created. The returned target is the member the
    /// last letter was applied to, which may be a placeholder made while
    /// navigating.
    pub async fn add_relationship(&mut self, request: &AddRelationshipRequest) -> Result<AddOutcome> {
        let member1 = request.member1.trim();
        let member2 = request.member2.trim();
        if member1.is_empty() || member2.is_empty() {
            return Err(Error::InvalidInput("Member names cannot be empty.".into()));
        }
        let code = request.relationship.trim();
        if code.is_empty() {
            return Err(Error::InvalidInput("Relationship cannot be empty.".into()));
        }

        let path: RelationPath = code.parse()?;
        Engine::new(&self.store).add_relationship(member1, member2, &path).await
    }

    /// Build the tree view rooted at the member named in `request`.
    pub async fn family_tree(&self, request: &TreeRequest) -> Result<FamilyTreeView> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Name cannot be empty.".into()));
        }
        Engine::new(&self.store).family_tree(name, self.tree_depth).await
    }

    /// Every stored member, oldest first.
    pub async fn members(&self) -> Result<Vec<Member>> {
        self.store.list_all().await
    }

    /// Case-insensitive lookup, the same one `add_relationship` uses.
    pub async fn member_by_name(&self, name: &str) -> Result<Option<Member>> {
        self.store.find_by_name_ignore_case(name.trim()).await
    }

    /// Access the underlying store (for advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tree_depth(&self) -> TreeDepth {
        self.tree_depth
    }
}

/// In-memory family tree for testing and embedding.
impl FamilyTree<MemoryStore> {
    pub async fn open_memory() -> Result<Self> {
        Ok(Self::with_store(MemoryStore::new()))
    }
}

impl FamilyTree<Box<dyn MemberStore>> {
    /// Open whichever store `config` names.
    pub async fn open(config: &Config) -> Result<Self> {
        let store = config.store.open()?;
        Ok(Self::with_store(store).with_tree_depth(config.tree_depth))
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("Cycle detected: {name} ({id}) is its own descendant")]
    CycleDetected { id: MemberId, name: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
