//! Release hooks for scope-owned resources.

/// Trait for synchronous resource release.
///
/// Implement this for dependencies that need structured teardown (closing
/// connections, flushing buffers). Hooks run in LIFO order when the owning
/// scope is disposed. Lifecycle events for a given actor instance are
/// strictly sequential, so release is synchronous; a hook that takes time
/// delays the restart of its own instance and nothing else.
///
/// A released value must keep reporting itself released to every holder: a
/// disposed handle stays disposed even if the actor instance that owned it is
/// still referenced elsewhere.
///
/// # Examples
///
/// ```
/// use props_di::{Dispose, ServiceRegistry, Resolver};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// #[derive(Default)]
/// struct Connection {
///     closed: AtomicBool,
/// }
///
/// impl Dispose for Connection {
///     fn dispose(&self) {
///         self.closed.store(true, Ordering::SeqCst);
///     }
/// }
///
/// let mut registry = ServiceRegistry::new();
/// registry.register_scoped_factory::<Arc<Connection>, _>(|r| {
///     let conn = Arc::new(Connection::default());
///     r.register_disposer(conn.clone());
///     conn
/// });
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Releases the resource. Called at most once per registered hook.
    fn dispose(&self);
}
