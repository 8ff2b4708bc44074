//! Dependency lifetime definitions.

/// Dependency lifetimes controlling instance caching and release behavior.
///
/// The lifetime of a registration decides both *identity* (which resolutions
/// observe the same value) and *release* (which scope disposal tears the
/// value down).
///
/// # Lifetime Characteristics
///
/// - **Singleton**: one value per container, shared by every actor instance,
///   never released by any instance's scope
/// - **Scoped**: one value per instance scope, released when that scope is
///   disposed
/// - **Transient**: fresh value per resolution, released with the scope that
///   produced it
///
/// # Examples
///
/// ```rust
/// use props_di::{ServiceRegistry, Resolver, Lifetime};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Session { id: u32 }
///
/// let mut registry = ServiceRegistry::new();
///
/// // Singleton: one instance for the whole container
/// registry.register_singleton(Database {
///     url: "postgres://localhost".to_string(),
/// });
///
/// // Scoped: one instance per actor-instance scope
/// registry.register_scoped_factory::<Session, _>(|_| Session { id: 7 });
///
/// let provider = registry.build();
///
/// let db1 = provider.get::<Database>().unwrap();
/// let scope = provider.create_scope();
/// let db2 = scope.get::<Database>().unwrap();
/// assert!(Arc::ptr_eq(&db1, &db2)); // singleton identity is stable
///
/// let s1 = scope.get::<Session>().unwrap();
/// let s2 = scope.get::<Session>().unwrap();
/// assert!(Arc::ptr_eq(&s1, &s2)); // scoped identity is stable within a scope
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Single instance per container, cached for the container's lifetime.
    ///
    /// Singletons are created once on first resolution and shared across all
    /// scopes and threads. A scope's disposal never touches them; they are
    /// released only when the container itself is shut down.
    Singleton,
    /// Single instance per scope, cached for the scope's lifetime.
    ///
    /// Scoped values are created once per scope on first resolution within
    /// that scope. Every actor instance gets its own scope, so two instances
    /// never share a scoped value, and a restart replaces all of them.
    Scoped,
    /// New instance per resolution, never cached.
    ///
    /// Transients are created fresh every time they are requested. Release
    /// hooks they register still belong to the scope that resolved them.
    Transient,
}
