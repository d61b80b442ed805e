//! Project a member and its descendants into a `FamilyTreeView`.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{FamilyTreeView, Member, MemberId, MemberSummary};
use crate::{Error, Result};

/// How many generations below the root get expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeDepth {
    /// Follow children until they run out.
    ///
    /// Building and dropping a view of any depth is safe. The derived
    /// `Clone`, `PartialEq` and serde impls on `FamilyTreeView` still
    /// recurse, so use `Limited` before serializing very deep lines.
    #[default]
    Unbounded,
    /// Stop expanding children past this many generations
    Limited(usize),
}

impl TreeDepth {
    fn expands(self, level: usize) -> bool {
        match self {
            TreeDepth::Unbounded => true,
            TreeDepth::Limited(max) => level < max,
        }
    }
}

/// One member being projected, with the children not yet visited.
struct Frame<'a> {
    level: usize,
    view: FamilyTreeView,
    pending: std::vec::IntoIter<&'a Member>,
}

/// Builds tree views from a snapshot of the population.
///
/// Descent uses an explicit stack, so chain length is bounded by memory
/// rather than by the thread stack. Ids that do not resolve are left out
/// of the view. A child that is already on the path from the root fails
/// the whole build with `Error::CycleDetected`.
pub struct TreeBuilder {
    members: HashMap<MemberId, Member>,
    depth: TreeDepth,
}

impl TreeBuilder {
    pub fn new(population: impl IntoIterator<Item = Member>, depth: TreeDepth) -> Self {
        Self {
            members: population.into_iter().map(|m| (m.id, m)).collect(),
            depth,
        }
    }

    pub fn build(&self, root: MemberId) -> Result<FamilyTreeView> {
        let member = self
            .members
            .get(&root)
            .ok_or_else(|| Error::MemberNotFound(format!("id {root}")))?;

        let mut on_path = HashSet::new();
        let mut stack = vec![self.enter(member, 0, &mut on_path)];
        let mut finished = None;

        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.pending.next() {
                if on_path.contains(&child.id) {
                    return Err(Error::CycleDetected {
                        id: child.id,
                        name: child.name.clone(),
                    });
                }
                frame.view.grandchildren.extend(
                    child
                        .children
                        .iter()
                        .filter_map(|id| self.lookup(*id))
                        .map(MemberSummary::from),
                );
                let level = frame.level + 1;
                let next = self.enter(child, level, &mut on_path);
                stack.push(next);
                continue;
            }

            let Some(done) = stack.pop() else { break };
            on_path.remove(&done.view.id);
            match stack.last_mut() {
                Some(parent) => parent.view.children.push(done.view),
                None => finished = Some(done.view),
            }
        }

        finished.ok_or_else(|| Error::MemberNotFound(format!("id {root}")))
    }

    /// Open a frame for `member`: its own view plus the children still to visit.
    fn enter<'a>(
        &'a self,
        member: &'a Member,
        level: usize,
        on_path: &mut HashSet<MemberId>,
    ) -> Frame<'a> {
        on_path.insert(member.id);

        let mut view = FamilyTreeView::new(member.id, member.name.clone());
        view.parents = self.names(&member.parents);
        view.siblings = self.names(&member.siblings);

        let pending: Vec<&Member> = if self.depth.expands(level) {
            member.children.iter().filter_map(|id| self.lookup(*id)).collect()
        } else {
            Vec::new()
        };

        Frame {
            level,
            view,
            pending: pending.into_iter(),
        }
    }

    fn names(&self, ids: &[MemberId]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.lookup(*id))
            .map(|m| m.name.clone())
            .collect()
    }

    fn lookup(&self, id: MemberId) -> Option<&Member> {
        let found = self.members.get(&id);
        if found.is_none() {
            debug!(%id, "skipping dangling member id");
        }
        found
    }
}
