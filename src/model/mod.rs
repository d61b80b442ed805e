//! # Family Graph Model
//!
//! Plain data shared by storage, the engine and callers.
//! No I/O, no state, no async.

pub mod member;
pub mod relation;
pub mod request;
pub mod view;

pub use member::{Member, MemberId};
pub use relation::{Relation, RelationPath};
pub use request::{AddOutcome, AddRelationshipRequest, Diagnostic, TreeRequest};
pub use view::{FamilyTreeView, MemberSummary};
