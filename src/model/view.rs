//! Read-only projections handed back to callers.

use serde::{Deserialize, Serialize};

use super::{Member, MemberId};

/// Identity and display name of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub id: MemberId,
    pub name: String,
}

impl From<&Member> for MemberSummary {
    fn from(m: &Member) -> Self {
        Self { id: m.id, name: m.name.clone() }
    }
}

/// A member and its descendants, built fresh per query and never stored.
///
/// Grandchildren show up twice: nested under `children`, and flattened
/// into `grandchildren` on this level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyTreeView {
    pub id: MemberId,
    pub name: String,
    pub parents: Vec<String>,
    pub siblings: Vec<String>,
    pub children: Vec<FamilyTreeView>,
    pub grandchildren: Vec<MemberSummary>,
}

impl FamilyTreeView {
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parents: Vec::new(),
            siblings: Vec::new(),
            children: Vec::new(),
            grandchildren: Vec::new(),
        }
    }

    /// Find a direct child projection by name.
    pub fn child(&self, name: &str) -> Option<&FamilyTreeView> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Number of projections in this subtree, the root included.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

// Flatten before dropping so long lines do not recurse once per generation.
impl Drop for FamilyTreeView {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_counts_every_projection() {
        let mut root = FamilyTreeView::new(MemberId(1), "A");
        let mut b = FamilyTreeView::new(MemberId(2), "B");
        b.children.push(FamilyTreeView::new(MemberId(4), "D"));
        root.children = vec![b, FamilyTreeView::new(MemberId(3), "C")];

        assert_eq!(root.size(), 4);
        assert_eq!(root.child("B").map(FamilyTreeView::size), Some(2));
        assert!(root.child("D").is_none());
    }
}
