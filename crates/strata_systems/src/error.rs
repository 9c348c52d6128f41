//! # Pipeline Error Types
//!
//! Phase misuse and registration errors. Returned, never panicked, so a host
//! loop can propagate them with `?`.

use thiserror::Error;

/// Errors that can occur while driving a systems pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// `init` was called on a pipeline that already ran it.
    #[error("pipeline already initialized")]
    AlreadyInitialized,

    /// `run` or `destroy` was called before `init`.
    #[error("pipeline not initialized")]
    NotInitialized,

    /// `init` or `run` was called after `init` returned an error.
    #[error("pipeline init failed; only destroy is allowed")]
    InitFailed,

    /// A phase was called after `destroy`.
    #[error("pipeline already destroyed")]
    AlreadyDestroyed,

    /// A system or world was registered after `init`.
    #[error("cannot register {0} after init")]
    RegistrationClosed(String),

    /// A named world was registered twice.
    #[error("world {0:?} is already registered")]
    DuplicateWorld(String),

    /// A system left an entity alive with no components.
    #[error("system {system} leaked an entity in world {world:?}")]
    LeakedEntity {
        /// Name of the system that just ran.
        system: String,
        /// Name of the world, empty for the default world.
        world: String,
    },
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
