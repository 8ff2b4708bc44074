//! Lifecycle event observers.
//!
//! The channel through which the manager surfaces events -- most importantly
//! teardown failures -- to the hosting supervision layer without coupling to
//! it.

use std::sync::Arc;

use crate::error::TeardownError;
use crate::manager::InstanceId;

/// Observer of instance lifecycle events.
///
/// Observers are called synchronously from the lifecycle hooks; keep
/// implementations lightweight. All methods default to no-ops so an observer
/// implements only what it cares about.
///
/// # Examples
///
/// ```
/// use props_di::{InstanceId, LifecycleObserver, TeardownError};
///
/// struct FailureCounter(std::sync::atomic::AtomicUsize);
///
/// impl LifecycleObserver for FailureCounter {
///     fn teardown_failed(&self, _id: &InstanceId, _error: &TeardownError) {
///         self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
///     }
/// }
/// ```
pub trait LifecycleObserver: Send + Sync {
    /// A new instance was constructed and its scope recorded.
    fn instance_started(&self, id: &InstanceId, type_name: &'static str) {
        let _ = (id, type_name);
    }

    /// An instance's scope was disposed.
    fn instance_stopped(&self, id: &InstanceId) {
        let _ = id;
    }

    /// Disposal of an instance's scope raised.
    ///
    /// Non-fatal by contract: the manager keeps going (a restart still
    /// completes), this event is how the failure reaches the supervision
    /// layer.
    fn teardown_failed(&self, id: &InstanceId, error: &TeardownError) {
        let _ = (id, error);
    }
}

/// Observer that emits lifecycle events through the `log` facade.
#[derive(Default)]
pub struct LoggingObserver;

impl LifecycleObserver for LoggingObserver {
    fn instance_started(&self, id: &InstanceId, type_name: &'static str) {
        log::debug!("instance started: {} ({})", id, type_name);
    }

    fn instance_stopped(&self, id: &InstanceId) {
        log::debug!("instance stopped: {}", id);
    }

    fn teardown_failed(&self, id: &InstanceId, error: &TeardownError) {
        log::warn!("teardown failed for {}: {}", id, error.detail);
    }
}

/// Registered observer set.
#[derive(Default)]
pub(crate) struct Observers {
    list: Vec<Arc<dyn LifecycleObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn LifecycleObserver>) {
        self.list.push(observer);
    }

    pub(crate) fn instance_started(&self, id: &InstanceId, type_name: &'static str) {
        for obs in &self.list {
            obs.instance_started(id, type_name);
        }
    }

    pub(crate) fn instance_stopped(&self, id: &InstanceId) {
        for obs in &self.list {
            obs.instance_stopped(id);
        }
    }

    pub(crate) fn teardown_failed(&self, id: &InstanceId, error: &TeardownError) {
        for obs in &self.list {
            obs.teardown_failed(id, error);
        }
    }
}
