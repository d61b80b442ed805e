//! Relationship engine.
//!
//! Runs the two operations against a `MemberStore`:
//!
//! ```text
//! add:  parse code → resolve/create both names → navigate steps
//!         → apply terminal relation → rebuild siblings
//! tree: resolve root by name → snapshot population → project descendants
//! ```
//!
//! An `Engine` lives for one operation and collects the non-fatal
//! `Diagnostic`s hit along the way.

pub mod apply;
pub mod navigate;
pub mod siblings;
pub mod tree;

use tracing::{info, warn};

use crate::model::*;
use crate::storage::MemberStore;
use crate::{Error, Result};

pub use apply::{link, link_self};
pub use navigate::PLACEHOLDER_SUFFIX;
pub use tree::{TreeBuilder, TreeDepth};

/// One engine operation over a borrowed store.
pub struct Engine<'s, S: MemberStore + ?Sized> {
    store: &'s S,
    diagnostics: Vec<Diagnostic>,
}

impl<'s, S: MemberStore + ?Sized> Engine<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store, diagnostics: Vec::new() }
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Link `member1` and `member2` by `path`, returning the navigated target.
    ///
    /// Names are taken as given; blank-name checks belong to the caller.
    pub async fn add_relationship(
        mut self,
        member1: &str,
        member2: &str,
        path: &RelationPath,
    ) -> Result<AddOutcome> {
        let start = self.resolve_or_create(member1).await?;
        let other = self.resolve_or_create(member2).await?;

        let target = self.navigate(&start, path.steps()).await?;
        self.apply(target.id, other.id, path.terminal()).await?;
        self.rebuild_siblings().await?;

        Ok(AddOutcome {
            target: MemberSummary::from(&target),
            diagnostics: self.diagnostics,
        })
    }

    /// Project the tree rooted at the member called `name`.
    pub async fn family_tree(&self, name: &str, depth: TreeDepth) -> Result<FamilyTreeView> {
        let root = self
            .store
            .get_by_name(name)
            .await?
            .ok_or_else(|| Error::MemberNotFound(name.to_string()))?;

        let population = self.store.list_all().await?;
        TreeBuilder::new(population, depth).build(root.id)
    }

    /// Case-insensitive lookup; creates and stores the member on a miss.
    pub async fn resolve_or_create(&mut self, name: &str) -> Result<Member> {
        if let Some(existing) = self.store.find_by_name_ignore_case(name).await? {
            return Ok(existing);
        }
        let created = self.store.add(Member::new(name)).await?;
        info!(id = %created.id, name = %created.name, "added new member");
        Ok(created)
    }

    /// Load a member by id, recording a dangling reference on a miss.
    async fn resolve(&mut self, id: MemberId) -> Result<Option<Member>> {
        let found = self.store.get_by_id(id).await?;
        if found.is_none() {
            self.dangling(id);
        }
        Ok(found)
    }

    fn dangling(&mut self, id: MemberId) {
        warn!(%id, "member id does not resolve");
        self.diagnostics.push(Diagnostic::DanglingReference { id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_resolve_or_create_reuses_case_insensitively() {
        let store = MemoryStore::new();
        let mut engine = Engine::new(&store);

        let a = engine.resolve_or_create("anna").await.unwrap();
        let b = engine.resolve_or_create("ANNA").await.unwrap();

        assert_eq!(a.id, b.id);
        assert_eq!(b.name, "anna");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_single_letter_targets_member1() {
        let store = MemoryStore::new();
        let path = RelationPath::parse("C").unwrap();

        let outcome = Engine::new(&store).add_relationship("Mary", "Dennis", &path).await.unwrap();

        assert_eq!(outcome.target.name, "Mary");
        assert!(outcome.diagnostics.is_empty());
        let dennis = store.get_by_name("Dennis").await.unwrap().unwrap();
        assert_eq!(dennis.parents.as_slice(), &[outcome.target.id]);
    }

    #[tokio::test]
    async fn test_tree_for_unknown_name_is_not_found() {
        let store = MemoryStore::new();
        let err = Engine::new(&store).family_tree("Nobody", TreeDepth::Unbounded).await.unwrap_err();
        assert!(matches!(err, Error::MemberNotFound(name) if name == "Nobody"));
    }
}
