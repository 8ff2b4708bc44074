//! Resolver context handed to factories and constructors.

use crate::error::ResolveResult;
use crate::key::Key;
use crate::traits::{AnyArc, Resolver, ResolverCore};

/// Context through which factories and [`FromScope`](crate::FromScope)
/// constructors resolve their dependencies.
///
/// Wraps whichever resolver is executing the construction (root provider,
/// scope, or an external adapter scope), so wiring code stays independent of
/// the concrete resolver type.
///
/// # Examples
///
/// ```
/// use props_di::{ServiceRegistry, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Repo { db: Arc<Database> }
///
/// let mut registry = ServiceRegistry::new();
/// registry.register_singleton(Database { url: "postgres://localhost".into() });
/// registry.register_scoped_factory::<Repo, _>(|r| {
///     // r is a ResolverContext; nested lookups stay in the same scope
///     Repo { db: r.get::<Database>().unwrap() }
/// });
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> ResolveResult<AnyArc> {
        self.resolver.resolve_any(key)
    }

    fn push_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        self.resolver.push_disposer(f);
    }
}

impl<'a> Resolver for ResolverContext<'a> {}
