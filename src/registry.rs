//! Dependency registration and the registry builder.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::key::{key_of, key_of_trait, Key};
use crate::lifetime::Lifetime;
use crate::provider::{ResolverContext, ServiceProvider};
use crate::traits::AnyArc;

/// Registration with lifetime and constructor.
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> AnyArc + Send + Sync>,
    /// Singleton cache, lock-free after first resolution. `None` for scoped
    /// and transient registrations.
    pub(crate) singleton_cell: Option<OnceCell<AnyArc>>,
}

impl Registration {
    fn new(
        lifetime: Lifetime,
        ctor: Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> AnyArc + Send + Sync>,
    ) -> Self {
        let singleton_cell = match lifetime {
            Lifetime::Singleton => Some(OnceCell::new()),
            _ => None,
        };
        Self { lifetime, ctor, singleton_cell }
    }
}

/// Builder for the reference container.
///
/// Register dependencies with their lifetimes, then [`build`](Self::build)
/// a [`ServiceProvider`]. Later registrations for the same key replace
/// earlier ones.
///
/// # Examples
///
/// ```rust
/// use props_di::{ServiceRegistry, Resolver};
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Session { url: String }
///
/// let mut registry = ServiceRegistry::new();
/// registry.register_singleton(Config { url: "postgres://localhost".into() });
/// registry.register_scoped_factory::<Session, _>(|r| {
///     let cfg = r.get::<Config>().unwrap();
///     Session { url: cfg.url.clone() }
/// });
///
/// let provider = registry.build();
/// let scope = provider.create_scope();
/// assert_eq!(scope.get::<Session>().unwrap().url, "postgres://localhost");
/// ```
#[derive(Default)]
pub struct ServiceRegistry {
    entries: HashMap<Key, Registration>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Registers an already-constructed singleton value.
    pub fn register_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        let arc: AnyArc = Arc::new(value);
        self.insert::<T>(
            Lifetime::Singleton,
            Arc::new(move |_: &ResolverContext<'_>| arc.clone()),
        )
    }

    /// Registers a singleton factory, invoked once on first resolution.
    pub fn register_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.insert::<T>(
            Lifetime::Singleton,
            Arc::new(move |r: &ResolverContext<'_>| Arc::new(factory(r)) as AnyArc),
        )
    }

    /// Registers a scoped factory, invoked once per scope.
    pub fn register_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.insert::<T>(
            Lifetime::Scoped,
            Arc::new(move |r: &ResolverContext<'_>| Arc::new(factory(r)) as AnyArc),
        )
    }

    /// Registers a transient factory, invoked on every resolution.
    pub fn register_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.insert::<T>(
            Lifetime::Transient,
            Arc::new(move |r: &ResolverContext<'_>| Arc::new(factory(r)) as AnyArc),
        )
    }

    /// Registers a singleton trait-object binding.
    pub fn register_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        Arc<T>: Send + Sync,
    {
        // Stored as Arc<Arc<dyn Trait>>; get_trait unwraps one level.
        let arc: AnyArc = Arc::new(value);
        self.insert_key(
            key_of_trait::<T>(),
            Lifetime::Singleton,
            Arc::new(move |_: &ResolverContext<'_>| arc.clone()),
        )
    }

    /// Registers a scoped trait-object factory.
    pub fn register_scoped_trait_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<T> + Send + Sync + 'static,
    {
        self.insert_key(
            key_of_trait::<T>(),
            Lifetime::Scoped,
            Arc::new(move |r: &ResolverContext<'_>| Arc::new(factory(r)) as AnyArc),
        )
    }

    /// Registers a transient trait-object factory.
    pub fn register_transient_trait_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<T> + Send + Sync + 'static,
    {
        self.insert_key(
            key_of_trait::<T>(),
            Lifetime::Transient,
            Arc::new(move |r: &ResolverContext<'_>| Arc::new(factory(r)) as AnyArc),
        )
    }

    /// Finalizes the registry into an immutable provider.
    pub fn build(self) -> ServiceProvider {
        ServiceProvider::new(self.entries)
    }

    fn insert<T: 'static>(
        &mut self,
        lifetime: Lifetime,
        ctor: Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> AnyArc + Send + Sync>,
    ) -> &mut Self {
        self.insert_key(
            key_of::<T>(),
            lifetime,
            ctor,
        )
    }

    fn insert_key(
        &mut self,
        key: Key,
        lifetime: Lifetime,
        ctor: Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> AnyArc + Send + Sync>,
    ) -> &mut Self {
        self.entries.insert(key, Registration::new(lifetime, ctor));
        self
    }
}
