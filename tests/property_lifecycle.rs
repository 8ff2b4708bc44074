/// Property-based tests for lifecycle management
///
/// These verify the lifetime contracts hold for any number of restarts,
/// instances, and extra-argument shapes, not just the handful of counts the
/// unit tests pick.
use props_di::{
    Dispose, ExtraArgs, FromScope, InstanceId, LifecycleManager, Props, ResolveResult, Resolver,
    ResolverContext, ServiceRegistry,
};
use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

// ===== Test Services =====

struct Registry {
    built: AtomicU64,
}

struct Session {
    closed: Arc<AtomicBool>,
}

struct SessionProbe(Arc<AtomicBool>);

impl Dispose for SessionProbe {
    fn dispose(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

struct Worker {
    registry: Arc<Registry>,
    session: Arc<Session>,
}

impl FromScope for Worker {
    fn from_scope(deps: &ResolverContext<'_>, _args: &ExtraArgs) -> ResolveResult<Self> {
        Ok(Worker { registry: deps.get::<Registry>()?, session: deps.get::<Session>()? })
    }
}

fn worker_props() -> Props<Worker> {
    let mut registry = ServiceRegistry::new();
    registry.register_singleton(Registry { built: AtomicU64::new(0) });
    registry.register_scoped_factory::<Session, _>(|r| {
        let closed = Arc::new(AtomicBool::new(false));
        r.register_disposer(Arc::new(SessionProbe(closed.clone())));
        Session { closed }
    });
    Props::new(Arc::new(registry.build()))
}

// Property: singleton identity survives any restart count, and every
// superseded incarnation's scoped values are released.
proptest! {
    #[test]
    fn restarts_preserve_singleton_identity(restarts in 1usize..20) {
        let manager = LifecycleManager::new();
        let props = worker_props();
        let id = InstanceId::new("user/worker", 0);

        let first = manager.on_instance_starting(id.clone(), &props).unwrap();
        first.registry.built.fetch_add(1, Ordering::SeqCst);

        let mut previous_sessions = vec![first.session.clone()];
        let mut current = first;

        for _ in 0..restarts {
            let next = manager.on_instance_restarting(id.clone(), &props).unwrap();
            prop_assert!(Arc::ptr_eq(&current.registry, &next.registry));
            previous_sessions.push(next.session.clone());
            current = next;
        }

        // Every session except the live one was released.
        let live = previous_sessions.pop().unwrap();
        for stale in &previous_sessions {
            prop_assert!(stale.closed.load(Ordering::SeqCst));
            prop_assert!(!Arc::ptr_eq(stale, &live));
        }
        prop_assert!(!live.closed.load(Ordering::SeqCst));
        prop_assert_eq!(manager.live_instances(), 1);
    }
}

// Property: fanning one descriptor out to N instances always yields N
// distinct scopes, and stopping them all leaves no live record.
proptest! {
    #[test]
    fn fanout_yields_independent_scopes(instances in 1usize..16) {
        let manager = LifecycleManager::new();
        let props = worker_props();

        let mut workers = Vec::new();
        for i in 0..instances {
            let id = InstanceId::new(format!("user/pool/{}", i), 0);
            workers.push((id.clone(), manager.on_instance_starting(id, &props).unwrap()));
        }
        prop_assert_eq!(manager.live_instances(), instances);

        for (i, (_, a)) in workers.iter().enumerate() {
            for (_, b) in &workers[i + 1..] {
                prop_assert!(!Arc::ptr_eq(&a.session, &b.session));
                prop_assert!(Arc::ptr_eq(&a.registry, &b.registry));
            }
        }

        for (id, worker) in &workers {
            prop_assert!(manager.on_instance_stopped(id).is_none());
            prop_assert!(worker.session.closed.load(Ordering::SeqCst));
        }
        prop_assert_eq!(manager.live_instances(), 0);
    }
}

// Property: positional argument lookup always returns exactly the value at
// the requested index, for any mix of payloads.
proptest! {
    #[test]
    fn extra_args_index_round_trips(values in prop::collection::vec(any::<u64>(), 0..8)) {
        let mut builder = ExtraArgs::builder();
        for v in &values {
            builder = builder.arg(*v);
        }
        let args = builder.build();

        prop_assert_eq!(args.len(), values.len());
        for (i, v) in values.iter().enumerate() {
            prop_assert_eq!(*args.get::<u64>(i).unwrap(), *v);
        }
        prop_assert!(args.get::<u64>(values.len()).is_err());
    }
}
