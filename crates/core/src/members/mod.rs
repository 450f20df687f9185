//! Council member management.
//!
//! Members are rows in the actor directory. Deletion deactivates the actor
//! so transactions and audit entries that reference it stay resolvable.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::MemberError;
pub use service::{MemberRepository, MemberService};
pub use types::{CreateMemberInput, MAX_NAME_CHARS, NewMember};
