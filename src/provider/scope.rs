//! Per-instance dependency scope.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::adapter::ServiceScope;
use crate::error::{ResolveError, ResolveResult, TeardownError};
use crate::internal::DisposeBag;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registry::Registration;
use crate::traits::{AnyArc, Resolver, ResolverCore};

use super::{ResolverContext, ServiceProvider};

/// An owned dependency scope minted by [`ServiceProvider::create_scope`].
///
/// One scope backs one actor instance. Scoped values are cached here and
/// released on [`dispose`](ServiceScope::dispose); singletons are delegated
/// to the root provider and survive any number of scope disposals.
///
/// # Lifetime Behavior
///
/// - **Singleton**: resolved and cached in the root provider, shared by all scopes
/// - **Scoped**: resolved and cached within this scope only
/// - **Transient**: created fresh per resolution, release hooks land here
///
/// # Examples
///
/// ```
/// use props_di::{ServiceRegistry, Resolver};
/// use std::sync::Arc;
///
/// struct RequestId(u64);
///
/// let mut registry = ServiceRegistry::new();
/// registry.register_scoped_factory::<RequestId, _>(|_| RequestId(1));
///
/// let provider = registry.build();
/// let scope_a = provider.create_scope();
/// let scope_b = provider.create_scope();
///
/// let a1 = scope_a.get::<RequestId>().unwrap();
/// let a2 = scope_a.get::<RequestId>().unwrap();
/// let b = scope_b.get::<RequestId>().unwrap();
/// assert!(Arc::ptr_eq(&a1, &a2));
/// assert!(!Arc::ptr_eq(&a1, &b));
/// ```
pub struct Scope {
    root: ServiceProvider,
    cache: Mutex<HashMap<Key, AnyArc>>,
    disposers: Mutex<DisposeBag>,
    disposed: AtomicBool,
}

impl Scope {
    pub(crate) fn new(root: ServiceProvider) -> Self {
        Self {
            root,
            cache: Mutex::new(HashMap::new()),
            disposers: Mutex::new(DisposeBag::default()),
            disposed: AtomicBool::new(false),
        }
    }

    /// Scoped resolution with the cache lock released around the factory
    /// call, so factories can resolve further scoped dependencies.
    fn resolve_scoped(&self, reg: &Registration, key: &Key) -> ResolveResult<AnyArc> {
        {
            let cache = self.cache.lock();
            if let Some(cached) = cache.get(key) {
                return Ok(cached.clone());
            }
        }

        let ctx = ResolverContext::new(self);
        let value = (reg.ctor)(&ctx);

        let mut cache = self.cache.lock();
        match cache.get(key) {
            Some(existing) => Ok(existing.clone()),
            None => {
                cache.insert(key.clone(), value.clone());
                Ok(value)
            }
        }
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> ResolveResult<AnyArc> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(ResolveError::WrongLifetime(
                "cannot resolve from a disposed scope",
            ));
        }
        match self.root.inner().entries.get(key) {
            Some(reg) => match reg.lifetime {
                Lifetime::Singleton => self.root.resolve_singleton(reg),
                Lifetime::Scoped => self.resolve_scoped(reg, key),
                Lifetime::Transient => {
                    let ctx = ResolverContext::new(self);
                    Ok((reg.ctor)(&ctx))
                }
            },
            None => Err(ResolveError::NotFound(key.display_name())),
        }
    }

    fn push_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        self.disposers.lock().push(f);
    }
}

impl Resolver for Scope {}

impl ServiceScope for Scope {
    fn dispose(&mut self) -> Result<(), TeardownError> {
        self.disposed.store(true, Ordering::Release);
        self.cache.lock().clear();
        let failures = self.disposers.lock().drain_reverse();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(TeardownError::new(failures.join("; ")))
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        let bag = self.disposers.get_mut();
        if !bag.is_empty() {
            log::warn!("Scope dropped with unreleased hooks; disposing now");
            bag.drain_reverse();
        }
    }
}
