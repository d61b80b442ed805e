//! Member in the family graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::Relation;

/// Opaque member identifier. Issued once by the store, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub u64);

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named individual and the ids of everyone they are linked to.
///
/// Edges live as id lists on both endpoints; members never hold each
/// other directly, so the graph may contain cross-links freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub parents: SmallVec<[MemberId; 2]>,
    pub children: Vec<MemberId>,
    pub siblings: Vec<MemberId>,
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// A member with no links. The id is a placeholder until the store
    /// assigns the real one in `MemberStore::add`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: MemberId(0),
            name: name.into(),
            parents: SmallVec::new(),
            children: Vec::new(),
            siblings: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive name comparison used for create-or-reuse.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// The ids linked to this member by `relation`. Unknown letters have
    /// no list.
    pub fn links(&self, relation: Relation) -> &[MemberId] {
        match relation {
            Relation::Parent => &self.parents[..],
            Relation::Child => &self.children[..],
            Relation::Sibling => &self.siblings[..],
            Relation::Unknown(_) => &[],
        }
    }

    /// First linked id for `relation`, the one navigation follows.
    pub fn first_link(&self, relation: Relation) -> Option<MemberId> {
        self.links(relation).first().copied()
    }

    /// Returns true if the parent was not already present.
    pub fn add_parent(&mut self, id: MemberId) -> bool {
        if self.parents.contains(&id) {
            return false;
        }
        self.parents.push(id);
        true
    }

    /// Returns true if the child was not already present.
    pub fn add_child(&mut self, id: MemberId) -> bool {
        push_unique(&mut self.children, id)
    }

    /// Returns true if the sibling was not already present.
    pub fn add_sibling(&mut self, id: MemberId) -> bool {
        push_unique(&mut self.siblings, id)
    }
}

fn push_unique(list: &mut Vec<MemberId>, id: MemberId) -> bool {
    if list.contains(&id) {
        return false;
    }
    list.push(id);
    true
}
