//! # props-di
//!
//! Binds a dependency-injection container's lifetime model (singleton /
//! scoped / transient) to the lifecycle of actor instances in a supervised
//! runtime.
//!
//! An actor's constructor dependencies are resolved from a container scope
//! created fresh for every instance -- including instances produced by a
//! supervisor's restart-after-failure policy -- and that scope's resources
//! are released deterministically, exactly once, when the instance stops.
//! Singleton dependencies are shared across every instance and are never
//! touched by instance teardown.
//!
//! ## Pieces
//!
//! - [`Props`]: an immutable, cloneable instantiation descriptor. Binds a
//!   container, a target type, and a fixed list of extra (non-resolved)
//!   constructor arguments; [`Props::instantiate`] mints a fresh scope,
//!   wires the instance through its [`FromScope`] impl, and returns it with
//!   a consumed-once [`TeardownHandle`].
//! - [`LifecycleManager`]: bridges the host runtime's lifecycle callbacks
//!   (`starting` / `stopped` / `restarting`, keyed by [`InstanceId`]) to
//!   instantiation and exactly-once scope disposal.
//! - [`ScopedContainer`] / [`ServiceScope`]: the thin adapter contract the
//!   core sequences calls through. [`ServiceRegistry`] / [`ServiceProvider`]
//!   are the in-crate reference implementation; any container implementing
//!   the adapter works the same.
//!
//! ## Quick Start
//!
//! ```rust
//! use props_di::{
//!     Dispose, ExtraArgs, FromScope, InstanceId, LifecycleManager, Props,
//!     ResolveResult, Resolver, ResolverContext, ServiceRegistry,
//! };
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! // A shared (singleton) dependency and a per-instance (scoped) one.
//! struct EventLog;
//!
//! #[derive(Default)]
//! struct Session {
//!     closed: AtomicBool,
//! }
//!
//! impl Dispose for Session {
//!     fn dispose(&self) {
//!         self.closed.store(true, Ordering::SeqCst);
//!     }
//! }
//!
//! struct Worker {
//!     log: Arc<EventLog>,
//!     session: Arc<Session>,
//! }
//!
//! impl FromScope for Worker {
//!     fn from_scope(deps: &ResolverContext<'_>, _args: &ExtraArgs) -> ResolveResult<Self> {
//!         Ok(Worker {
//!             log: deps.get::<EventLog>()?,
//!             session: deps.get::<Arc<Session>>().map(|s| (*s).clone())?,
//!         })
//!     }
//! }
//!
//! let mut registry = ServiceRegistry::new();
//! registry.register_singleton(EventLog);
//! registry.register_scoped_factory::<Arc<Session>, _>(|r| {
//!     let session = Arc::new(Session::default());
//!     r.register_disposer(session.clone());
//!     session
//! });
//!
//! let provider = registry.build();
//! let props = Props::<Worker>::new(Arc::new(provider));
//! let manager = LifecycleManager::new();
//! let id = InstanceId::new("user/worker", 0);
//!
//! // First start.
//! let worker = manager.on_instance_starting(id.clone(), &props).unwrap();
//! let first_session = worker.session.clone();
//! let shared_log = worker.log.clone();
//!
//! // Supervised restart: old scope is released before the new instance runs.
//! let restarted = manager.on_instance_restarting(id.clone(), &props).unwrap();
//! assert!(first_session.closed.load(Ordering::SeqCst));
//! assert!(!restarted.session.closed.load(Ordering::SeqCst));
//! assert!(Arc::ptr_eq(&shared_log, &restarted.log)); // singleton identity kept
//!
//! // Final stop; a second stop for the same identity is a no-op.
//! assert!(manager.on_instance_stopped(&id).is_none());
//! assert!(manager.on_instance_stopped(&id).is_none());
//! ```
//!
//! ## Lifetimes
//!
//! - **Singleton**: one value per container, identical across all instances
//!   and restarts, released only at container shutdown
//! - **Scoped**: one value per instance scope, released when the instance
//!   stops or restarts
//! - **Transient**: fresh per resolution, released with the scope that
//!   produced it

pub mod adapter;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod manager;
pub mod observer;
pub mod props;
pub mod provider;
pub mod traits;

// Internal modules
mod internal;
mod registry;

pub use adapter::{ScopedContainer, ScopedContainerExt, ServiceScope};
pub use error::{LifecycleError, LifecycleResult, ResolveError, ResolveResult, TeardownError};
pub use key::{key_of, key_of_trait, Key};
pub use lifetime::Lifetime;
pub use manager::{InstanceId, LifecycleManager};
pub use observer::{LifecycleObserver, LoggingObserver};
pub use props::{ExtraArgs, ExtraArgsBuilder, FromScope, Props, TeardownHandle};
pub use provider::{ResolverContext, Scope, ServiceProvider};
pub use registry::ServiceRegistry;
pub use traits::{AnyArc, Dispose, Resolver, ResolverCore};
