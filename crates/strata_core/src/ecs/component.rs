//! # Component System
//!
//! Components are plain data records. At most one instance of each type is
//! attached to an entity. Storage slots are recycled in place, so every type
//! must know how to return to a clean state.

/// Stable index of a component pool inside its world.
///
/// Assigned in registration order, starting at 0. Used as the filter mask
/// element and as the per-entity component list element.
pub type PoolIndex = u16;

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Default`: fresh storage slots are default-constructed
/// - `Clone`: [`World::copy_entity`](crate::World::copy_entity) clones values
/// - `'static`: pools are looked up by `TypeId`
///
/// # Reset hook
///
/// Removing a component resets its storage slot so a later add on any entity
/// starts clean. By default the slot is overwritten with `Default::default()`.
/// A type can supply [`Component::AUTO_RESET`] instead. The hook then runs on
/// every freshly allocated slot and on every removal, and default-clearing is
/// skipped entirely: the hook alone must drop anything that would otherwise
/// go stale (handles, buffers, references). A hook that keeps a buffer's
/// allocation but forgets to clear it leaks the previous owner's data into
/// the next add.
///
/// # Example
///
/// ```rust
/// use strata_core::Component;
///
/// #[derive(Clone, Default)]
/// struct Inventory {
///     items: Vec<u32>,
/// }
///
/// impl Inventory {
///     // Keep the allocation, drop the contents.
///     fn reset(&mut self) {
///         self.items.clear();
///     }
/// }
///
/// impl Component for Inventory {
///     const AUTO_RESET: Option<fn(&mut Self)> = Some(Self::reset);
/// }
/// ```
pub trait Component: Default + Clone + 'static {
    /// Custom reset hook. `None` means reset by `Default::default()`.
    const AUTO_RESET: Option<fn(&mut Self)> = None;
}
