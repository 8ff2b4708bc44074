//! Resolver traits for dependency resolution.

use std::sync::Arc;

use crate::error::{ResolveError, ResolveResult};
use crate::key::{key_of, key_of_trait, Key};
use crate::traits::Dispose;

/// Type-erased shared value as stored by containers and scopes.
pub type AnyArc = Arc<dyn std::any::Any + Send + Sync>;

/// Object-safe resolution core.
///
/// This is the seam a container or scope implements: type-erased lookup by
/// [`Key`] plus registration of release hooks against the owning scope.
/// Users interact with the generic methods on [`Resolver`] instead.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single dependency by key.
    ///
    /// Returns the value wrapped in `Arc<dyn Any>`; [`Resolver::get`] handles
    /// the downcast. Lifetime rules apply: a singleton key resolves to the
    /// container-wide value, a scoped key to the value owned by this scope.
    fn resolve_any(&self, key: &Key) -> ResolveResult<AnyArc>;

    /// Registers a release hook with the owning scope.
    ///
    /// Hooks run in LIFO order, exactly once, when the scope is disposed.
    /// Hooks pushed through a root provider belong to the container and run
    /// only at container shutdown.
    fn push_disposer(&self, f: Box<dyn FnOnce() + Send>);
}

/// Generic, type-safe resolution interface.
///
/// Implemented by the root [`ServiceProvider`](crate::ServiceProvider), by
/// [`Scope`](crate::Scope), and by the [`ResolverContext`](crate::ResolverContext)
/// handed to factories and [`FromScope`](crate::FromScope) constructors.
///
/// # Examples
///
/// ```
/// use props_di::{ServiceRegistry, Resolver};
///
/// let mut registry = ServiceRegistry::new();
/// registry.register_singleton(42usize);
///
/// let provider = registry.build();
/// let n = provider.get::<usize>().unwrap();
/// assert_eq!(*n, 42);
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a required concrete dependency.
    fn get<T: 'static + Send + Sync>(&self) -> ResolveResult<Arc<T>> {
        let any = self.resolve_any(&key_of::<T>())?;
        any.downcast::<T>()
            .map_err(|_| ResolveError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves an optional concrete dependency.
    ///
    /// An unregistered dependency resolves to `Ok(None)` instead of failing.
    /// Any other failure (type mismatch, wrong lifetime) still propagates: a
    /// dependency that is registered but cannot be produced is an error, not
    /// an absent value.
    fn get_opt<T: 'static + Send + Sync>(&self) -> ResolveResult<Option<Arc<T>>> {
        match self.get::<T>() {
            Ok(v) => Ok(Some(v)),
            Err(ResolveError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Resolves a required trait-object dependency.
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> ResolveResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let any = self.resolve_any(&key_of_trait::<T>())?;
        // Trait objects are stored as Arc<Arc<dyn Trait>>.
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| ResolveError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves an optional trait-object dependency. Same absence policy as
    /// [`get_opt`](Self::get_opt).
    fn get_opt_trait<T: ?Sized + 'static + Send + Sync>(&self) -> ResolveResult<Option<Arc<T>>>
    where
        Arc<T>: 'static,
    {
        match self.get_trait::<T>() {
            Ok(v) => Ok(Some(v)),
            Err(ResolveError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Registers a value for release when the owning scope is disposed.
    ///
    /// Called from factories; the hook lands in the scope (or container, for
    /// singletons) that is executing the factory.
    fn register_disposer<T: Dispose>(&self, service: Arc<T>) {
        self.push_disposer(Box::new(move || service.dispose()));
    }
}
