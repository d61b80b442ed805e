//! Request and response shapes for the two engine operations.

use serde::{Deserialize, Serialize};

use super::{MemberId, MemberSummary, Relation};

/// "`member1` is linked to `member2` by `relationship`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRelationshipRequest {
    pub member1: String,
    pub member2: String,
    pub relationship: String,
}

impl AddRelationshipRequest {
    pub fn new(
        member1: impl Into<String>,
        member2: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            member1: member1.into(),
            member2: member2.into(),
            relationship: relationship.into(),
        }
    }
}

/// Root a tree view at the member called `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRequest {
    pub name: String,
}

impl TreeRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Non-fatal conditions hit while adding a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// Navigation found no edge for `step` and created (or reused) a
    /// placeholder member.
    Synthesized { id: MemberId, name: String, step: Relation },
    /// A relation letter outside `P`/`C`/`S` was applied; nothing changed.
    UnknownRelation { code: char },
    /// A stored id did not resolve to a member.
    DanglingReference { id: MemberId },
}

/// Result of `FamilyTree::add_relationship`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOutcome {
    /// The navigated member the terminal relation was applied to. This is
    /// `member1` for single-letter codes, otherwise possibly a placeholder.
    pub target: MemberSummary,
    pub diagnostics: Vec<Diagnostic>,
}

impl AddOutcome {
    /// Placeholders created or reused during navigation.
    pub fn synthesized(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::Synthesized { id, .. } => Some(*id),
            _ => None,
        })
    }
}
