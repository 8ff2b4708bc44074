//! Instantiation descriptors.
//!
//! A [`Props`] is the immutable blueprint for one actor address: it binds a
//! container, a target type, and the extra constructor arguments that are
//! not resolved from the container. Every instantiation it produces -- first
//! start or supervised restart -- gets a brand-new dependency scope, and the
//! returned [`TeardownHandle`] is the one way that scope is released.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::adapter::{ScopedContainer, ServiceScope};
use crate::error::{LifecycleError, ResolveError, ResolveResult};
use crate::provider::ResolverContext;
use crate::traits::AnyArc;

/// Constructor wiring for a dependency-built type.
///
/// The explicit registration table this crate uses instead of reflective
/// constructor discovery: the target type states which dependencies it wants
/// and in what shape, resolving each one through the scope it is given.
/// Resolved dependencies come first; positional extra arguments follow.
///
/// # Examples
///
/// ```
/// use props_di::{ExtraArgs, FromScope, ResolveResult, Resolver, ResolverContext};
/// use std::sync::Arc;
///
/// struct Database { url: String }
///
/// struct Worker {
///     db: Arc<Database>,
///     shard: Arc<u32>,
/// }
///
/// impl FromScope for Worker {
///     fn from_scope(deps: &ResolverContext<'_>, args: &ExtraArgs) -> ResolveResult<Self> {
///         Ok(Worker {
///             db: deps.get::<Database>()?,
///             shard: args.get::<u32>(0)?,
///         })
///     }
/// }
/// ```
pub trait FromScope: Sized + Send + 'static {
    /// Builds one instance from a freshly-created scope plus the
    /// descriptor's extra arguments.
    fn from_scope(deps: &ResolverContext<'_>, args: &ExtraArgs) -> ResolveResult<Self>;
}

/// Ordered extra constructor arguments, fixed at descriptor creation.
///
/// Values are opaque to the core; they are handed to every instantiation
/// unchanged and in order, including after restarts. Cloning shares the
/// underlying storage, which is immutable.
#[derive(Clone, Default)]
pub struct ExtraArgs {
    values: Arc<[AnyArc]>,
}

impl ExtraArgs {
    /// No extra arguments.
    pub fn none() -> Self {
        Self::default()
    }

    /// Starts building an argument list.
    pub fn builder() -> ExtraArgsBuilder {
        ExtraArgsBuilder { values: Vec::new() }
    }

    /// The argument at `index`, downcast to `T`.
    ///
    /// Fails with [`ResolveError::NotFound`] past the end of the list and
    /// [`ResolveError::TypeMismatch`] when the slot holds another type.
    pub fn get<T: 'static + Send + Sync>(&self, index: usize) -> ResolveResult<Arc<T>> {
        let any = self
            .values
            .get(index)
            .ok_or(ResolveError::NotFound(std::any::type_name::<T>()))?;
        any.clone()
            .downcast::<T>()
            .map_err(|_| ResolveError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builder for [`ExtraArgs`].
pub struct ExtraArgsBuilder {
    values: Vec<AnyArc>,
}

impl ExtraArgsBuilder {
    /// Appends one positional argument.
    pub fn arg<T: 'static + Send + Sync>(mut self, value: T) -> Self {
        self.values.push(Arc::new(value));
        self
    }

    /// Freezes the list.
    pub fn build(self) -> ExtraArgs {
        ExtraArgs { values: self.values.into() }
    }
}

/// Immutable instantiation descriptor for one target type.
///
/// Created once when an actor address is configured and reused for every
/// instantiation at that address, restarts included. Cloning or deriving a
/// descriptor (see [`with_extra_args`](Self::with_extra_args)) yields an
/// independent blueprint: copies share no resolution state, and routing or
/// pooling layers that fan one descriptor out to N instances still give
/// every instance its own scope.
///
/// # Examples
///
/// ```
/// use props_di::{ExtraArgs, FromScope, Props, ResolveResult, Resolver, ResolverContext, ServiceRegistry};
/// use std::sync::Arc;
///
/// struct Greeter { text: Arc<String> }
///
/// impl FromScope for Greeter {
///     fn from_scope(_deps: &ResolverContext<'_>, args: &ExtraArgs) -> ResolveResult<Self> {
///         Ok(Greeter { text: args.get::<String>(0)? })
///     }
/// }
///
/// let provider = ServiceRegistry::new().build();
/// let props = Props::<Greeter>::new(Arc::new(provider))
///     .with_extra_args(ExtraArgs::builder().arg("hello".to_string()).build());
///
/// let (greeter, mut teardown) = props.instantiate().unwrap();
/// assert_eq!(&*greeter.text, "hello");
/// teardown.invoke().unwrap();
/// ```
pub struct Props<A> {
    container: Arc<dyn ScopedContainer>,
    args: ExtraArgs,
    _target: PhantomData<fn() -> A>,
}

impl<A> Clone for Props<A> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
            args: self.args.clone(),
            _target: PhantomData,
        }
    }
}

impl<A: FromScope> Props<A> {
    /// Binds the target type to a container, with no extra arguments.
    pub fn new(container: Arc<dyn ScopedContainer>) -> Self {
        Self { container, args: ExtraArgs::none(), _target: PhantomData }
    }

    /// Derives an independent descriptor carrying `args` instead.
    ///
    /// The composition surface consumed by routing and pooling policy: the
    /// derived descriptor keeps the dependency wiring and still resolves a
    /// fresh scope per instantiation.
    pub fn with_extra_args(&self, args: ExtraArgs) -> Self {
        Self { container: self.container.clone(), args, _target: PhantomData }
    }

    /// The descriptor's extra arguments.
    pub fn extra_args(&self) -> &ExtraArgs {
        &self.args
    }

    /// Produces one instance plus the handle that releases its scope.
    ///
    /// Creates a new child scope, resolves the target's dependencies from it
    /// (singletons resolve to the container-wide values, scoped and
    /// transient dependencies to values owned by the new scope), and hands
    /// the extra arguments through positionally. On a resolution failure the
    /// partially-created scope is disposed before the error is returned, so
    /// nothing leaks and no instance is considered started.
    pub fn instantiate(&self) -> ResolveResult<(A, TeardownHandle)> {
        let scope = self.container.create_scope();
        let result = {
            let ctx = ResolverContext::new(&scope);
            A::from_scope(&ctx, &self.args)
        };
        match result {
            Ok(instance) => Ok((instance, TeardownHandle::new(scope))),
            Err(e) => {
                let mut scope = scope;
                if let Err(teardown) = scope.dispose() {
                    log::warn!("rollback of failed instantiation raised: {}", teardown);
                }
                Err(e)
            }
        }
    }
}

/// Consumed-once owner of an instance's scope.
///
/// Invoking the handle disposes the scope, releasing every scoped and
/// transient value it produced; singletons are untouched. A handle that is
/// dropped without being invoked disposes its scope anyway, so the scope is
/// released on every exit path.
pub struct TeardownHandle {
    scope: Option<Box<dyn ServiceScope>>,
}

impl TeardownHandle {
    pub(crate) fn new(scope: Box<dyn ServiceScope>) -> Self {
        Self { scope: Some(scope) }
    }

    /// Disposes the owned scope.
    ///
    /// Exactly-once: a second invocation reports
    /// [`LifecycleError::DoubleTeardown`] instead of touching anything, so a
    /// double release of any handle is impossible.
    pub fn invoke(&mut self) -> Result<(), LifecycleError> {
        match self.scope.take() {
            Some(mut scope) => scope.dispose().map_err(LifecycleError::Teardown),
            None => Err(LifecycleError::DoubleTeardown),
        }
    }

    /// Whether the scope has already been disposed through this handle.
    pub fn is_consumed(&self) -> bool {
        self.scope.is_none()
    }
}

impl Drop for TeardownHandle {
    fn drop(&mut self) {
        if let Some(mut scope) = self.scope.take() {
            if let Err(e) = scope.dispose() {
                log::warn!("scope disposal on drop raised: {}", e);
            }
        }
    }
}
