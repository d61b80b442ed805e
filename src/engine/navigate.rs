//! Walk the navigation steps of a relationship code.

use tracing::warn;

use super::Engine;
use crate::Result;
use crate::model::{Diagnostic, Member, Relation};
use crate::storage::MemberStore;

/// Appended to the current member's name when a placeholder is made.
///
/// The suffix is the same for every step letter, so a placeholder made
/// while following `C` or `S` is still called "...'s Parent".
pub const PLACEHOLDER_SUFFIX: &str = "'s Parent";

impl<S: MemberStore + ?Sized> Engine<'_, S> {
    /// Follow `steps` from `start` and return the member the terminal
    /// relation should be applied to.
    ///
    /// Each step moves to the first linked member of that kind. On the
    /// first step with nothing to follow, a placeholder named after the
    /// current member is resolved or created, linked to `start` (not the
    /// current member) by that step, and returned at once. Remaining steps
    /// are dropped. An id that does not resolve leaves `current` in place.
    pub async fn navigate(&mut self, start: &Member, steps: &[Relation]) -> Result<Member> {
        let mut current = start.clone();

        for &step in steps {
            match current.first_link(step) {
                Some(next) => {
                    if let Some(member) = self.resolve(next).await? {
                        current = member;
                    }
                }
                None => {
                    let name = format!("{}{PLACEHOLDER_SUFFIX}", current.name);
                    let placeholder = self.resolve_or_create(&name).await?;
                    warn!(
                        %step,
                        from = %current.name,
                        placeholder = %placeholder.name,
                        "cannot navigate, linked placeholder member"
                    );
                    self.diagnostics.push(Diagnostic::Synthesized {
                        id: placeholder.id,
                        name: placeholder.name.clone(),
                        step,
                    });

                    self.apply(start.id, placeholder.id, step).await?;
                    return Ok(self.store.get_by_id(placeholder.id).await?.unwrap_or(placeholder));
                }
            }
        }

        Ok(current)
    }
}
