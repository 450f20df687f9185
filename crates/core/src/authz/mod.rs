//! Actor roles and the authorization gate.
//!
//! Every mutating entry point resolves the calling actor through an
//! [`ActorDirectory`] at request time and asks [`authorize`] for a decision.
//! Role checks live nowhere else.

pub mod actor;
pub mod error;
pub mod gate;

#[cfg(test)]
pub(crate) mod testing;

pub use actor::{Actor, ActorDirectory, ActorRole};
pub use error::{AuthzError, DenyReason};
pub use gate::{
    Operation, ResourceAction, ResourceRef, ResourceState, authorize, authorize_actor,
};
