//! Commit one relation between two members.

use tracing::warn;

use super::Engine;
use crate::Result;
use crate::model::{Diagnostic, Member, MemberId, Relation};
use crate::storage::MemberStore;

/// Insert the edge pair for `relation` between two distinct members.
///
/// `Child`: `from` becomes a parent of `to`. `Parent`: `from` becomes a
/// child of `to`. `Sibling`: both ways. Returns true if either list grew.
pub fn link(from: &mut Member, to: &mut Member, relation: Relation) -> bool {
    let (f, t) = (from.id, to.id);
    match relation {
        Relation::Child => from.add_child(t) | to.add_parent(f),
        Relation::Parent => from.add_parent(t) | to.add_child(f),
        Relation::Sibling => from.add_sibling(t) | to.add_sibling(f),
        Relation::Unknown(_) => false,
    }
}

/// `link` for a member related to itself.
pub fn link_self(member: &mut Member, relation: Relation) -> bool {
    let id = member.id;
    match relation {
        Relation::Child | Relation::Parent => member.add_child(id) | member.add_parent(id),
        Relation::Sibling => member.add_sibling(id),
        Relation::Unknown(_) => false,
    }
}

impl<S: MemberStore + ?Sized> Engine<'_, S> {
    /// Load both members fresh, link them, and persist whatever changed.
    ///
    /// Unknown letters leave the graph alone and are recorded as a
    /// diagnostic. Returns true if an edge was added.
    pub async fn apply(&mut self, from: MemberId, to: MemberId, relation: Relation) -> Result<bool> {
        if let Relation::Unknown(code) = relation {
            warn!(%code, %from, %to, "unknown relationship code");
            self.diagnostics.push(Diagnostic::UnknownRelation { code });
            return Ok(false);
        }

        if from == to {
            let Some(mut member) = self.resolve(from).await? else {
                return Ok(false);
            };
            let changed = link_self(&mut member, relation);
            if changed {
                self.store.update(member).await?;
            }
            return Ok(changed);
        }

        let Some(mut a) = self.resolve(from).await? else {
            return Ok(false);
        };
        let Some(mut b) = self.resolve(to).await? else {
            return Ok(false);
        };

        let changed = link(&mut a, &mut b, relation);
        if changed {
            self.store.update_pair(a, b).await?;
        }
        Ok(changed)
    }
}
