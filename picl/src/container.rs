//! Containerizing decorators.
//!
//! Annotation mutates the component it is given, which would corrupt the
//! canonical cached identity of a shared cell. [`containerize`] turns a
//! mutating decorator into a non-destructive one: the original component is
//! wrapped in a freshly named container holding a single reference to it,
//! and the decorator runs against the container instead.

use std::sync::Arc;

use crate::cell::CellCache;
use crate::component::{Component, Reference};

/// Wraps `component` in a new container named `{name}_{suffix}` holding one
/// reference to it, and runs `decorate` against the container and that
/// reference. The original component is never mutated.
///
/// Cache-aware: the derived container is memoized in `cache` under its
/// name, so repeated calls with identical inputs return the same object.
pub fn containerize(
    cache: &mut CellCache,
    component: &Arc<Component>,
    suffix: &str,
    decorate: impl FnOnce(&mut Component, &Reference),
) -> Arc<Component> {
    let name = arcstr::format!("{}_{}", component.name(), suffix);
    if let Some(existing) = cache.get(&name) {
        tracing::debug!(name = %name, "container cache hit");
        return existing.clone();
    }
    tracing::debug!(name = %name, "building container");

    let mut container = Component::new(name.clone());
    let reference = Reference::new(component.clone());
    decorate(&mut container, &reference);
    container.add_reference(reference);

    let container = Arc::new(container);
    cache.insert(name, container.clone());
    container
}
