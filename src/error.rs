//! Error types for dependency resolution and instance teardown.

use std::fmt;

use crate::manager::InstanceId;

/// Dependency resolution errors.
///
/// A resolution failure is fatal to the instantiation attempt that triggered
/// it: no instance is handed out, and any partially-created scope is disposed
/// before the error is returned.
///
/// # Examples
///
/// ```rust
/// use props_di::{ResolveError, ServiceRegistry, Resolver};
///
/// let provider = ServiceRegistry::new().build();
/// match provider.get::<String>() {
///     Err(ResolveError::NotFound(name)) => {
///         assert_eq!(name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Dependency not registered
    NotFound(&'static str),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Invalid lifetime resolution (e.g., scoped from the root provider)
    WrongLifetime(&'static str),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotFound(name) => write!(f, "Dependency not found: {}", name),
            ResolveError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            ResolveError::WrongLifetime(msg) => write!(f, "Lifetime error: {}", msg),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Result type for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Scope disposal raised.
///
/// Teardown failures are non-fatal by design: they are surfaced to observers
/// and returned to the caller, but never block a pending re-instantiation of
/// the crashed actor. The failure is isolated to the instance whose scope
/// raised it.
#[derive(Debug, Clone)]
pub struct TeardownError {
    /// The instance whose scope failed to dispose, when known. Disposal that
    /// happens before an identity is assigned (e.g., rollback of a failed
    /// instantiation) carries `None`.
    pub instance: Option<InstanceId>,
    /// What the release hooks reported.
    pub detail: String,
}

impl TeardownError {
    pub(crate) fn new(detail: String) -> Self {
        Self { instance: None, detail }
    }

    /// Annotates the error with the instance identity it belongs to.
    pub(crate) fn for_instance(mut self, instance: InstanceId) -> Self {
        self.instance = Some(instance);
        self
    }
}

impl fmt::Display for TeardownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(id) => write!(f, "Teardown failed for {}: {}", id, self.detail),
            None => write!(f, "Teardown failed: {}", self.detail),
        }
    }
}

impl std::error::Error for TeardownError {}

/// Errors surfaced by the lifecycle manager.
#[derive(Debug, Clone)]
pub enum LifecycleError {
    /// A required dependency could not be produced at instantiation time.
    /// No instance was started and no scope was leaked.
    Resolution(ResolveError),
    /// Scope disposal raised. Reported, never swallowed, does not abort the
    /// operation that triggered it.
    Teardown(TeardownError),
    /// A teardown handle was driven twice. The manager prevents this by
    /// construction (the identity association is removed on first teardown);
    /// seeing it means a handle was invoked directly after being consumed.
    DoubleTeardown,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::Resolution(e) => write!(f, "Instantiation failed: {}", e),
            LifecycleError::Teardown(e) => write!(f, "{}", e),
            LifecycleError::DoubleTeardown => {
                write!(f, "Teardown handle invoked after its scope was already disposed")
            }
        }
    }
}

impl std::error::Error for LifecycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LifecycleError::Resolution(e) => Some(e),
            LifecycleError::Teardown(e) => Some(e),
            LifecycleError::DoubleTeardown => None,
        }
    }
}

impl From<ResolveError> for LifecycleError {
    fn from(e: ResolveError) -> Self {
        LifecycleError::Resolution(e)
    }
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
