//! # World Configuration
//!
//! Initial capacities for every growable structure a [`World`](crate::World)
//! owns. Everything here is a starting size, not a limit: all storage grows
//! transparently when exceeded. Sizing it right up front keeps the steady
//! state allocation-free.
//!
//! ## Example
//!
//! ```rust
//! use strata_core::WorldConfig;
//!
//! let config = WorldConfig::from_toml_str(
//!     r#"
//!     entities = 4096
//!     pool_dense_size = 1024
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.entities, 4096);
//! assert_eq!(config.filters, WorldConfig::DEFAULT_FILTERS);
//! ```

use serde::Deserialize;

use crate::error::{EcsError, EcsResult};

/// Initial capacities for a world.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Entity slots (also the initial sparse size of every pool and filter).
    pub entities: usize,
    /// Recycled entity id free-list.
    pub recycled_entities: usize,
    /// Component pool registry.
    pub pools: usize,
    /// Filter registry.
    pub filters: usize,
    /// Dense storage of each component pool and each filter.
    pub pool_dense_size: usize,
    /// Per-entity list of attached component types.
    pub entity_components_size: usize,
}

impl WorldConfig {
    /// Default entity slot count.
    pub const DEFAULT_ENTITIES: usize = 512;
    /// Default recycled id free-list size.
    pub const DEFAULT_RECYCLED_ENTITIES: usize = 512;
    /// Default pool registry size.
    pub const DEFAULT_POOLS: usize = 512;
    /// Default filter registry size.
    pub const DEFAULT_FILTERS: usize = 512;
    /// Default dense size of a component pool.
    pub const DEFAULT_POOL_DENSE_SIZE: usize = 512;
    /// Default per-entity component list size.
    pub const DEFAULT_ENTITY_COMPONENTS_SIZE: usize = 8;

    /// Parses a configuration from a TOML document.
    ///
    /// Missing fields take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the document does not parse,
    /// names an unknown field, or sets any capacity to zero.
    pub fn from_toml_str(source: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| EcsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every capacity is non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] naming the first zero field.
    pub fn validate(&self) -> EcsResult<()> {
        let fields = [
            ("entities", self.entities),
            ("recycled_entities", self.recycled_entities),
            ("pools", self.pools),
            ("filters", self.filters),
            ("pool_dense_size", self.pool_dense_size),
            ("entity_components_size", self.entity_components_size),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(EcsError::InvalidConfig(format!(
                    "{name} must be greater than zero"
                )));
            }
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            entities: Self::DEFAULT_ENTITIES,
            recycled_entities: Self::DEFAULT_RECYCLED_ENTITIES,
            pools: Self::DEFAULT_POOLS,
            filters: Self::DEFAULT_FILTERS,
            pool_dense_size: Self::DEFAULT_POOL_DENSE_SIZE,
            entity_components_size: Self::DEFAULT_ENTITY_COMPONENTS_SIZE,
        }
    }
}
