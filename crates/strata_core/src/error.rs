//! # Core Error Types
//!
//! All precondition violations the checked profile can detect.
//!
//! Data-path operations (`add`, `get`, `del_entity`, filter construction) do
//! not return these: in checked builds a violation is logged at `error` level
//! and the call panics with the error text. Operations that deal with external input
//! (configuration parsing) return them through [`EcsResult`].

use thiserror::Error;

/// Errors that can occur in the ECS core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A structural operation was attempted on a destroyed world.
    #[error("world {0} is destroyed")]
    WorldDestroyed(u32),

    /// The entity is not alive (never created, or already destroyed).
    #[error("entity {0} is not alive")]
    EntityNotAlive(u32),

    /// The entity already holds a component of this type.
    #[error("entity {entity} already has component {component}")]
    DuplicateComponent {
        /// The entity index.
        entity: u32,
        /// The component type name.
        component: &'static str,
    },

    /// The entity does not hold a component of this type.
    #[error("entity {entity} has no component {component}")]
    MissingComponent {
        /// The entity index.
        entity: u32,
        /// The component type name.
        component: &'static str,
    },

    /// A component type appears in both the include and exclude sets.
    #[error("invalid filter mask: {0} is both included and excluded")]
    InvalidMask(&'static str),

    /// A component type appears twice on the same side of a mask.
    #[error("invalid filter mask: {0} is listed twice")]
    DuplicateMaskType(&'static str),

    /// A pool or filter handle was used with a world that did not issue it.
    #[error("handle issued by world {found} used with world {expected}")]
    ForeignHandle {
        /// The world the call was made on.
        expected: u32,
        /// The world that issued the handle.
        found: u32,
    },

    /// An entity cannot be copied onto itself.
    #[error("cannot copy entity {0} onto itself")]
    CopyOntoSelf(u32),

    /// Invalid configuration document or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for core operations.
pub type EcsResult<T> = Result<T, EcsError>;

/// Reports a precondition violation and aborts the current call.
///
/// Reached from checked validation branches, and in every profile when a
/// handle turns out to belong to another world.
#[cold]
#[track_caller]
pub(crate) fn violation(err: EcsError) -> ! {
    tracing::error!("precondition violated: {}", err);
    panic!("{err}");
}
