//! Reference container: root provider and scopes.
//!
//! A compact container honoring the three lifetimes and the adapter contract
//! in [`crate::adapter`]. The lifecycle machinery works against the adapter
//! traits, so any other container can stand in for this one.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::adapter::{ScopedContainer, ServiceScope};
use crate::error::{ResolveError, ResolveResult, TeardownError};
use crate::internal::DisposeBag;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registry::Registration;
use crate::traits::{AnyArc, Resolver, ResolverCore};

pub mod context;
pub mod scope;

pub use context::ResolverContext;
pub use scope::Scope;

/// Root dependency provider.
///
/// Resolves singletons and transients, and mints [`Scope`]s for everything
/// scoped. Cheap to clone (`Arc` internally) and safe to share across
/// threads: singletons are cached once, and concurrent scope creation never
/// disturbs singleton identity.
///
/// Scoped keys cannot be resolved from the root; they need a scope.
///
/// # Examples
///
/// ```
/// use props_di::{ServiceRegistry, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
///
/// let mut registry = ServiceRegistry::new();
/// registry.register_singleton(Database { url: "postgres://localhost".into() });
///
/// let provider = registry.build();
/// let a = provider.get::<Database>().unwrap();
/// let b = provider.create_scope().get::<Database>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    pub(crate) entries: HashMap<Key, Registration>,
    pub(crate) root_disposers: Mutex<DisposeBag>,
}

impl ServiceProvider {
    pub(crate) fn new(entries: HashMap<Key, Registration>) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                entries,
                root_disposers: Mutex::new(DisposeBag::default()),
            }),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &ProviderInner {
        &self.inner
    }

    /// Creates a fresh scope for resolving scoped dependencies.
    ///
    /// Every scope has independent scoped state and its own release hooks;
    /// singletons resolved through a scope still come from this provider.
    pub fn create_scope(&self) -> Scope {
        Scope::new(self.clone())
    }

    /// Releases every singleton-level hook in LIFO order.
    ///
    /// Container shutdown, distinct from any scope's disposal. Singleton
    /// values stay untouched by instance teardown and are released only here.
    pub fn dispose_all(&self) -> Result<(), TeardownError> {
        let failures = self.inner().root_disposers.lock().drain_reverse();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(TeardownError::new(failures.join("; ")))
        }
    }

    /// Singleton resolution through the per-registration cell.
    pub(crate) fn resolve_singleton(&self, reg: &Registration) -> ResolveResult<AnyArc> {
        if let Some(cell) = &reg.singleton_cell {
            let value = cell.get_or_init(|| {
                let ctx = ResolverContext::new(self);
                (reg.ctor)(&ctx)
            });
            return Ok(value.clone());
        }
        // Registrations are built with a cell for every singleton.
        Err(ResolveError::WrongLifetime("registration is not a singleton"))
    }
}

impl Clone for ServiceProvider {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl Drop for ServiceProvider {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 {
            if let Some(bag) = self.inner.root_disposers.try_lock() {
                if !bag.is_empty() {
                    log::warn!(
                        "ServiceProvider dropped with unreleased singleton hooks; call dispose_all() first"
                    );
                }
            }
        }
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> ResolveResult<AnyArc> {
        let name = key.display_name();
        match self.inner().entries.get(key) {
            Some(reg) => match reg.lifetime {
                Lifetime::Singleton => self.resolve_singleton(reg),
                Lifetime::Scoped => Err(ResolveError::WrongLifetime(
                    "cannot resolve a scoped dependency from the root provider",
                )),
                Lifetime::Transient => {
                    let ctx = ResolverContext::new(self);
                    Ok((reg.ctor)(&ctx))
                }
            },
            None => Err(ResolveError::NotFound(name)),
        }
    }

    fn push_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        self.inner().root_disposers.lock().push(f);
    }
}

impl Resolver for ServiceProvider {}

impl ScopedContainer for ServiceProvider {
    fn create_scope(&self) -> Box<dyn ServiceScope> {
        Box::new(ServiceProvider::create_scope(self))
    }

    fn resolve_singleton_any(&self, key: &Key) -> ResolveResult<AnyArc> {
        match self.inner().entries.get(key) {
            Some(reg) if reg.lifetime == Lifetime::Singleton => self.resolve_singleton(reg),
            Some(_) => Err(ResolveError::WrongLifetime(
                "resolve_singleton requires a singleton registration",
            )),
            None => Err(ResolveError::NotFound(key.display_name())),
        }
    }
}
