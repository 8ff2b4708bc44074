//! Container/scope adapter contract.
//!
//! The lifecycle machinery never inspects container internals; it only
//! sequences calls through these two traits and tracks which release hooks
//! belong to which scope. The crate ships a reference implementation
//! ([`ServiceProvider`](crate::ServiceProvider)), and any other container can
//! participate by implementing them.

use std::sync::Arc;

use crate::error::{ResolveError, ResolveResult, TeardownError};
use crate::key::{key_of, Key};
use crate::traits::{AnyArc, Resolver, ResolverCore};

/// An owned dependency scope.
///
/// Repeated resolution of a scoped key through one scope returns the
/// identical value. Disposing the scope releases every scoped and transient
/// value that registered a release hook with it, in LIFO order, exactly once.
/// Singleton values are never released by a scope.
pub trait ServiceScope: ResolverCore {
    /// Releases everything this scope owns.
    ///
    /// Runs every registered hook even when some of them raise; failures are
    /// collected into a single [`TeardownError`]. A second call is a no-op
    /// returning `Ok(())` (the hooks are gone after the first drain).
    fn dispose(&mut self) -> Result<(), TeardownError>;
}

// Lets a boxed adapter scope act as the resolver behind a ResolverContext.
impl ResolverCore for Box<dyn ServiceScope> {
    fn resolve_any(&self, key: &Key) -> ResolveResult<AnyArc> {
        (**self).resolve_any(key)
    }

    fn push_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        (**self).push_disposer(f)
    }
}

impl Resolver for Box<dyn ServiceScope> {}

/// A container that can mint child scopes and resolve singletons.
///
/// Must tolerate concurrent `create_scope` and singleton resolution from
/// different instances without corrupting singleton identity: every caller
/// observes the same singleton value no matter which scope or thread asked.
pub trait ScopedContainer: Send + Sync {
    /// Creates a fresh, independent dependency scope.
    fn create_scope(&self) -> Box<dyn ServiceScope>;

    /// Resolves a container-wide singleton by key.
    ///
    /// Fails with [`ResolveError::WrongLifetime`] when the key names a scoped
    /// or transient registration.
    fn resolve_singleton_any(&self, key: &Key) -> ResolveResult<AnyArc>;
}

/// Typed convenience over [`ScopedContainer::resolve_singleton_any`].
pub trait ScopedContainerExt: ScopedContainer {
    /// Resolves a container-wide singleton.
    fn resolve_singleton<T: 'static + Send + Sync>(&self) -> ResolveResult<Arc<T>> {
        let any = self.resolve_singleton_any(&key_of::<T>())?;
        any.downcast::<T>()
            .map_err(|_| ResolveError::TypeMismatch(std::any::type_name::<T>()))
    }
}

impl<C: ScopedContainer + ?Sized> ScopedContainerExt for C {}
