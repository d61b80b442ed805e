//! Derive sibling edges from shared parents.

use hashbrown::HashMap;
use tracing::debug;

use super::Engine;
use crate::Result;
use crate::model::MemberId;
use crate::storage::MemberStore;

impl<S: MemberStore + ?Sized> Engine<'_, S> {
    /// Give every member each other child of each of its parents as a
    /// sibling. Only adds edges, never removes them. Returns the number
    /// of sibling entries added.
    pub async fn rebuild_siblings(&mut self) -> Result<usize> {
        let population = self.store.list_all().await?;
        let children_of: HashMap<MemberId, Vec<MemberId>> = population
            .iter()
            .map(|m| (m.id, m.children.clone()))
            .collect();

        let mut added = 0;
        for mut member in population {
            let own = member.id;
            let mut grew = false;
            for parent in member.parents.clone() {
                let Some(children) = children_of.get(&parent) else {
                    self.dangling(parent);
                    continue;
                };
                for &sibling in children.iter().filter(|id| **id != own) {
                    if member.add_sibling(sibling) {
                        added += 1;
                        grew = true;
                    }
                }
            }
            if grew {
                self.store.update(member).await?;
            }
        }

        debug!(added, "rebuilt sibling edges");
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Diagnostic, Member, Relation};
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_shared_parent_makes_siblings() {
        let store = MemoryStore::new();
        let mut engine = Engine::new(&store);
        let mary = engine.resolve_or_create("Mary").await.unwrap();
        let dennis = engine.resolve_or_create("Dennis").await.unwrap();
        let linda = engine.resolve_or_create("Linda").await.unwrap();
        engine.apply(mary.id, dennis.id, Relation::Child).await.unwrap();
        engine.apply(mary.id, linda.id, Relation::Child).await.unwrap();

        assert_eq!(engine.rebuild_siblings().await.unwrap(), 2);

        let dennis = store.get_by_id(dennis.id).await.unwrap().unwrap();
        let linda = store.get_by_id(linda.id).await.unwrap().unwrap();
        assert_eq!(dennis.siblings, vec![linda.id]);
        assert_eq!(linda.siblings, vec![dennis.id]);
    }

    #[tokio::test]
    async fn test_rebuild_is_stable() {
        let store = MemoryStore::new();
        let mut engine = Engine::new(&store);
        let p = engine.resolve_or_create("P").await.unwrap();
        for name in ["A", "B", "C"] {
            let child = engine.resolve_or_create(name).await.unwrap();
            engine.apply(p.id, child.id, Relation::Child).await.unwrap();
        }

        assert_eq!(engine.rebuild_siblings().await.unwrap(), 6);
        assert_eq!(engine.rebuild_siblings().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dangling_parent_is_skipped() {
        let store = MemoryStore::new();
        let mut orphan = store.add(Member::new("Orphan")).await.unwrap();
        orphan.add_parent(MemberId(500));
        store.update(orphan).await.unwrap();

        let mut engine = Engine::new(&store);
        assert_eq!(engine.rebuild_siblings().await.unwrap(), 0);
        assert_eq!(engine.diagnostics(), &[Diagnostic::DanglingReference { id: MemberId(500) }]);
    }
}
