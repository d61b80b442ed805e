//! Relation letters and the parsed relationship code.
//!
//! A code such as `"PS"` or `"CCS"` is read left to right. Every letter but
//! the last is a navigation step; the last letter is the relation applied
//! between the navigated member and the second named member.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{Error, Result};

/// One relation letter, interpreted relative to a "from" member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// `P`: the other member is a parent of "from".
    Parent,
    /// `C`: the other member is a child of "from".
    Child,
    /// `S`: the two members are siblings.
    Sibling,
    /// Any other letter. Accepted by the parser, ignored by the applier.
    Unknown(char),
}

impl Relation {
    /// Map a single letter, folding ASCII case.
    pub fn from_letter(c: char) -> Self {
        match c.to_ascii_uppercase() {
            'P' => Relation::Parent,
            'C' => Relation::Child,
            'S' => Relation::Sibling,
            other => Relation::Unknown(other),
        }
    }

    pub fn letter(self) -> char {
        match self {
            Relation::Parent => 'P',
            Relation::Child => 'C',
            Relation::Sibling => 'S',
            Relation::Unknown(c) => c,
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A relationship code split into navigation steps and a terminal relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationPath {
    steps: SmallVec<[Relation; 4]>,
    terminal: Relation,
}

impl RelationPath {
    /// Parse a relationship token. Only emptiness is rejected; unknown
    /// letters pass through as `Relation::Unknown`.
    pub fn parse(code: &str) -> Result<Self> {
        let mut letters: SmallVec<[Relation; 4]> = code.chars().map(Relation::from_letter).collect();
        let terminal = letters
            .pop()
            .ok_or_else(|| Error::InvalidInput("Relationship cannot be empty.".into()))?;
        Ok(Self { steps: letters, terminal })
    }

    /// Navigation steps, in order.
    pub fn steps(&self) -> &[Relation] {
        &self.steps
    }

    /// The relation applied after navigation.
    pub fn terminal(&self) -> Relation {
        self.terminal
    }

    /// Number of letters in the original code.
    pub fn len(&self) -> usize {
        self.steps.len() + 1
    }

    /// Always false: a parsed path has at least its terminal relation.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Display for RelationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        write!(f, "{}", self.terminal)
    }
}

impl std::str::FromStr for RelationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
