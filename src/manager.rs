//! Lifecycle manager: binds scope teardown to actor lifecycle events.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{LifecycleError, LifecycleResult, TeardownError};
use crate::observer::{LifecycleObserver, Observers};
use crate::props::{FromScope, Props, TeardownHandle};

/// Stable identity of one actor instance: address plus incarnation counter.
///
/// The address is shared across restarts; the incarnation distinguishes the
/// records the manager holds when a runtime re-keys instances per start.
///
/// # Examples
///
/// ```
/// use props_di::InstanceId;
///
/// let id = InstanceId::new("user/worker-1", 0);
/// assert_eq!(id.path(), "user/worker-1");
/// assert_eq!(id.to_string(), "user/worker-1#0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceId {
    path: Arc<str>,
    incarnation: u64,
}

impl InstanceId {
    /// Builds an identity from an address and incarnation counter.
    pub fn new(path: impl Into<Arc<str>>, incarnation: u64) -> Self {
        Self { path: path.into(), incarnation }
    }

    /// The actor address.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The incarnation counter.
    pub fn incarnation(&self) -> u64 {
        self.incarnation
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.path, self.incarnation)
    }
}

/// Drives creation and teardown of (scope, instance) pairs across an actor's
/// lifetime events.
///
/// The external runtime invokes the three hooks; the manager sequences
/// instantiation through [`Props`] and guarantees that each instance's scope
/// is disposed exactly once, at the moment the instance stops. Hook calls
/// for a *given* identity are expected to be strictly sequential (the
/// runtime's single-instance-at-a-time guarantee); across identities the
/// hooks are safe to call concurrently, and teardown failures never leak
/// from one identity to another.
///
/// # Examples
///
/// ```
/// use props_di::{
///     ExtraArgs, FromScope, InstanceId, LifecycleManager, Props, ResolveResult,
///     Resolver, ResolverContext, ServiceRegistry,
/// };
/// use std::sync::Arc;
///
/// struct Clock;
/// struct Reporter { clock: Arc<Clock> }
///
/// impl FromScope for Reporter {
///     fn from_scope(deps: &ResolverContext<'_>, _args: &ExtraArgs) -> ResolveResult<Self> {
///         Ok(Reporter { clock: deps.get::<Clock>()? })
///     }
/// }
///
/// let mut registry = ServiceRegistry::new();
/// registry.register_singleton(Clock);
/// let provider = registry.build();
///
/// let props = Props::<Reporter>::new(Arc::new(provider));
/// let manager = LifecycleManager::new();
/// let id = InstanceId::new("user/reporter", 0);
///
/// let reporter = manager.on_instance_starting(id.clone(), &props).unwrap();
/// let _ = reporter;
/// let restarted = manager.on_instance_restarting(id.clone(), &props).unwrap();
/// let _ = restarted;
/// assert!(manager.on_instance_stopped(&id).is_none());
/// ```
#[derive(Default)]
pub struct LifecycleManager {
    // One teardown handle per live instance. Per-identity exclusivity is the
    // runtime's job; the mutex covers hosts that cannot guarantee it.
    slots: Mutex<HashMap<InstanceId, TeardownHandle>>,
    observers: Observers,
}

impl LifecycleManager {
    /// Creates a manager with no live instances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer for lifecycle events.
    pub fn add_observer(&mut self, observer: Arc<dyn LifecycleObserver>) {
        self.observers.add(observer);
    }

    /// Instantiates from `props` and records the teardown handle under `id`.
    ///
    /// Returns the instance for the runtime to run. On a resolution failure
    /// nothing is recorded and no scope leaks; the address stays without a
    /// live instance until the supervisor retries.
    ///
    /// Starting an identity that already holds a live record first tears the
    /// stale record down (surfacing any teardown failure as an event), so no
    /// two records hold scopes past the takeover point.
    pub fn on_instance_starting<A: FromScope>(
        &self,
        id: InstanceId,
        props: &Props<A>,
    ) -> LifecycleResult<A> {
        let stale = self.slots.lock().remove(&id);
        if let Some(handle) = stale {
            self.run_teardown(&id, handle);
        }

        let (instance, handle) = props.instantiate()?;
        self.slots.lock().insert(id.clone(), handle);
        self.observers.instance_started(&id, std::any::type_name::<A>());
        Ok(instance)
    }

    /// Disposes the scope recorded under `id`, exactly once.
    ///
    /// Invoked on both graceful stop and the restart path. Returns the
    /// teardown failure when disposal raised; `None` means clean disposal --
    /// or that `id` held no live record, making a second call for the same
    /// identity a no-op rather than a double release.
    pub fn on_instance_stopped(&self, id: &InstanceId) -> Option<TeardownError> {
        let handle = self.slots.lock().remove(id)?;
        self.run_teardown(id, handle)
    }

    /// Stop-then-start for a supervised restart.
    ///
    /// The old scope's disposal completes (success or failure) before the
    /// new instance is constructed, so every scoped and transient value of
    /// the terminated instance is released before its replacement can run.
    /// A teardown failure is surfaced to observers but never blocks
    /// recovery; only a resolution failure of the *new* instance makes this
    /// return an error.
    pub fn on_instance_restarting<A: FromScope>(
        &self,
        id: InstanceId,
        props: &Props<A>,
    ) -> LifecycleResult<A> {
        self.on_instance_stopped(&id);
        self.on_instance_starting(id, props)
    }

    /// Number of instances currently holding a live scope.
    pub fn live_instances(&self) -> usize {
        self.slots.lock().len()
    }

    fn run_teardown(&self, id: &InstanceId, mut handle: TeardownHandle) -> Option<TeardownError> {
        match handle.invoke() {
            Ok(()) => {
                self.observers.instance_stopped(id);
                None
            }
            Err(LifecycleError::Teardown(e)) => {
                let e = e.for_instance(id.clone());
                self.observers.teardown_failed(id, &e);
                self.observers.instance_stopped(id);
                Some(e)
            }
            Err(_) => {
                // A handle freshly removed from the slot map cannot have
                // been consumed; report the invariant breach loudly.
                let e = TeardownError::new(
                    "teardown handle was already consumed while still recorded".to_string(),
                )
                .for_instance(id.clone());
                self.observers.teardown_failed(id, &e);
                Some(e)
            }
        }
    }
}
