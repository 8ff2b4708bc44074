use props_di::{
    Dispose, ExtraArgs, FromScope, InstanceId, LifecycleError, LifecycleManager,
    LifecycleObserver, LoggingObserver, Props, ResolveResult, Resolver, ResolverContext,
    ResolverCore,
    ServiceRegistry, TeardownError,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// ===== Test Services =====

struct Metrics;

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
    metrics: Arc<Metrics>,
    session: Arc<Session>,
}

impl FromScope for Worker {
    fn from_scope(deps: &ResolverContext<'_>, _args: &ExtraArgs) -> ResolveResult<Self> {
        Ok(Worker { metrics: deps.get::<Metrics>()?, session: deps.get::<Session>()? })
    }
}

fn worker_props() -> Props<Worker> {
    let mut registry = ServiceRegistry::new();
    registry.register_singleton(Metrics);
    registry.register_scoped_factory::<Session, _>(|r| {
        let closed = Arc::new(AtomicBool::new(false));
        r.register_disposer(Arc::new(SessionProbe(closed.clone())));
        Session { closed }
    });
    Props::new(Arc::new(registry.build()))
}

#[derive(Default)]
struct RecordingObserver {
    started: Mutex<Vec<String>>,
    stopped: Mutex<Vec<String>>,
    failed: Mutex<Vec<String>>,
}

impl LifecycleObserver for RecordingObserver {
    fn instance_started(&self, id: &InstanceId, _type_name: &'static str) {
        self.started.lock().unwrap().push(id.to_string());
    }

    fn instance_stopped(&self, id: &InstanceId) {
        self.stopped.lock().unwrap().push(id.to_string());
    }

    fn teardown_failed(&self, id: &InstanceId, _error: &TeardownError) {
        self.failed.lock().unwrap().push(id.to_string());
    }
}

// ===== Start / Stop =====

#[test]
fn start_then_stop_releases_the_instance_scope() {
    let manager = LifecycleManager::new();
    let props = worker_props();
    let id = InstanceId::new("user/worker-1", 0);

    let worker = manager.on_instance_starting(id.clone(), &props).unwrap();
    assert_eq!(manager.live_instances(), 1);
    assert!(!worker.session.closed.load(Ordering::SeqCst));

    assert!(manager.on_instance_stopped(&id).is_none());
    assert_eq!(manager.live_instances(), 0);
    assert!(worker.session.closed.load(Ordering::SeqCst));
}

#[test]
fn stop_without_a_live_record_is_a_no_op() {
    let manager = LifecycleManager::new();
    let id = InstanceId::new("user/ghost", 0);
    assert!(manager.on_instance_stopped(&id).is_none());
    assert!(manager.on_instance_stopped(&id).is_none());
}

#[test]
fn stop_is_idempotent_per_identity() {
    let manager = LifecycleManager::new();
    let props = worker_props();
    let id = InstanceId::new("user/worker-1", 0);

    let _ = manager.on_instance_starting(id.clone(), &props).unwrap();
    assert!(manager.on_instance_stopped(&id).is_none());
    // The record is gone; a repeated stop cannot double-release anything.
    assert!(manager.on_instance_stopped(&id).is_none());
}

#[test]
fn identities_are_isolated() {
    let manager = LifecycleManager::new();
    let props = worker_props();
    let id_a = InstanceId::new("user/worker-a", 0);
    let id_b = InstanceId::new("user/worker-b", 0);

    let a = manager.on_instance_starting(id_a.clone(), &props).unwrap();
    let b = manager.on_instance_starting(id_b.clone(), &props).unwrap();
    assert_eq!(manager.live_instances(), 2);
    assert!(Arc::ptr_eq(&a.metrics, &b.metrics));
    assert!(!Arc::ptr_eq(&a.session, &b.session));

    manager.on_instance_stopped(&id_a);
    assert!(a.session.closed.load(Ordering::SeqCst));
    assert!(!b.session.closed.load(Ordering::SeqCst));
    assert_eq!(manager.live_instances(), 1);
}

#[test]
fn resolution_failure_records_nothing() {
    struct Unregistered;
    struct Broken;
    impl FromScope for Broken {
        fn from_scope(deps: &ResolverContext<'_>, _args: &ExtraArgs) -> ResolveResult<Self> {
            deps.get::<Unregistered>().map(|_| Broken)
        }
    }

    let manager = LifecycleManager::new();
    let props = Props::<Broken>::new(Arc::new(ServiceRegistry::new().build()));
    let id = InstanceId::new("user/broken", 0);

    match manager.on_instance_starting(id, &props) {
        Err(LifecycleError::Resolution(_)) => {}
        other => panic!("expected Resolution error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(manager.live_instances(), 0);
}

// ===== Restart =====

#[test]
fn restart_with_a_new_incarnation_keeps_singletons_and_gets_a_fresh_session() {
    let manager = LifecycleManager::new();
    let props = worker_props();
    let id = InstanceId::new("user/worker-1", 0);

    // First incarnation resolves its session s1.
    let first = manager.on_instance_starting(id.clone(), &props).unwrap();
    let s1 = first.session.clone();

    // Crash; supervisor restarts the same identity.
    let second = manager
        .on_instance_restarting(InstanceId::new("user/worker-1", 1), &props)
        .unwrap();

    // The old record was keyed by incarnation 0, so stop it explicitly too.
    manager.on_instance_stopped(&id);

    assert!(s1.closed.load(Ordering::SeqCst));
    assert!(!second.session.closed.load(Ordering::SeqCst));
    assert!(!Arc::ptr_eq(&s1, &second.session));
    assert!(Arc::ptr_eq(&first.metrics, &second.metrics));
}

#[test]
fn restart_under_one_identity_swaps_the_scope() {
    let manager = LifecycleManager::new();
    let props = worker_props();
    let id = InstanceId::new("user/worker-1", 0);

    let first = manager.on_instance_starting(id.clone(), &props).unwrap();
    let second = manager.on_instance_restarting(id.clone(), &props).unwrap();

    assert_eq!(manager.live_instances(), 1);
    assert!(first.session.closed.load(Ordering::SeqCst));
    assert!(!second.session.closed.load(Ordering::SeqCst));

    manager.on_instance_stopped(&id);
    assert!(second.session.closed.load(Ordering::SeqCst));
}

#[test]
fn restart_hands_the_replacement_the_same_extra_args() {
    struct ShardWorker {
        session: Arc<Session>,
        shard: Arc<u32>,
        label: Arc<String>,
    }

    impl FromScope for ShardWorker {
        fn from_scope(deps: &ResolverContext<'_>, args: &ExtraArgs) -> ResolveResult<Self> {
            Ok(ShardWorker {
                session: deps.get::<Session>()?,
                shard: args.get::<u32>(0)?,
                label: args.get::<String>(1)?,
            })
        }
    }

    let mut registry = ServiceRegistry::new();
    registry.register_scoped_factory::<Session, _>(|r| {
        let closed = Arc::new(AtomicBool::new(false));
        r.register_disposer(Arc::new(SessionProbe(closed.clone())));
        Session { closed }
    });
    let props = Props::<ShardWorker>::new(Arc::new(registry.build())).with_extra_args(
        ExtraArgs::builder().arg(3u32).arg("shard-three".to_string()).build(),
    );
    assert_eq!(props.extra_args().len(), 2);

    let manager = LifecycleManager::new();
    let id = InstanceId::new("user/shard-3", 0);

    let first = manager.on_instance_starting(id.clone(), &props).unwrap();
    assert_eq!(*first.shard, 3);
    assert_eq!(*first.label, "shard-three");

    let second = manager.on_instance_restarting(id.clone(), &props).unwrap();
    // The replacement gets a fresh scope but the descriptor's arguments,
    // unchanged and in order.
    assert!(first.session.closed.load(Ordering::SeqCst));
    assert!(!second.session.closed.load(Ordering::SeqCst));
    assert_eq!(*second.shard, *first.shard);
    assert_eq!(*second.label, *first.label);
    assert!(Arc::ptr_eq(&first.shard, &second.shard));
}

#[test]
fn starting_over_a_stale_record_tears_the_stale_scope_down() {
    let manager = LifecycleManager::new();
    let props = worker_props();
    let id = InstanceId::new("user/worker-1", 0);

    let stale = manager.on_instance_starting(id.clone(), &props).unwrap();
    let fresh = manager.on_instance_starting(id.clone(), &props).unwrap();

    assert_eq!(manager.live_instances(), 1);
    assert!(stale.session.closed.load(Ordering::SeqCst));
    assert!(!fresh.session.closed.load(Ordering::SeqCst));
}

// ===== Teardown Failures =====

fn failing_props() -> Props<Worker> {
    let mut registry = ServiceRegistry::new();
    registry.register_singleton(Metrics);
    registry.register_scoped_factory::<Session, _>(|r| {
        let closed = Arc::new(AtomicBool::new(false));
        r.register_disposer(Arc::new(SessionProbe(closed.clone())));
        r.push_disposer(Box::new(|| panic!("release hook exploded")));
        Session { closed }
    });
    Props::new(Arc::new(registry.build()))
}

#[test]
fn teardown_failure_is_returned_and_carries_the_identity() {
    let manager = LifecycleManager::new();
    let id = InstanceId::new("user/flaky", 4);

    let worker = manager.on_instance_starting(id.clone(), &failing_props()).unwrap();
    let err = manager.on_instance_stopped(&id).expect("teardown should fail");

    assert_eq!(err.instance.as_ref(), Some(&id));
    assert!(err.detail.contains("release hook exploded"));
    // Hooks after the failing one still ran.
    assert!(worker.session.closed.load(Ordering::SeqCst));
    assert_eq!(manager.live_instances(), 0);
}

#[test]
fn teardown_failure_never_blocks_a_restart() {
    let mut manager = LifecycleManager::new();
    let observer = Arc::new(RecordingObserver::default());
    manager.add_observer(observer.clone());

    let props = failing_props();
    let id = InstanceId::new("user/flaky", 0);

    let _ = manager.on_instance_starting(id.clone(), &props).unwrap();
    let replacement = manager.on_instance_restarting(id.clone(), &props).unwrap();

    assert_eq!(manager.live_instances(), 1);
    assert!(!replacement.session.closed.load(Ordering::SeqCst));
    assert_eq!(observer.failed.lock().unwrap().as_slice(), ["user/flaky#0"]);
    assert_eq!(observer.started.lock().unwrap().len(), 2);
}

// ===== Observers =====

#[test]
fn observers_see_the_full_lifecycle() {
    let mut manager = LifecycleManager::new();
    let observer = Arc::new(RecordingObserver::default());
    manager.add_observer(observer.clone());
    // Events also fan out to the log facade without disturbing recording.
    manager.add_observer(Arc::new(LoggingObserver));

    let props = worker_props();
    let id = InstanceId::new("user/worker-1", 2);

    let _ = manager.on_instance_starting(id.clone(), &props).unwrap();
    manager.on_instance_stopped(&id);

    assert_eq!(observer.started.lock().unwrap().as_slice(), ["user/worker-1#2"]);
    assert_eq!(observer.stopped.lock().unwrap().as_slice(), ["user/worker-1#2"]);
    assert!(observer.failed.lock().unwrap().is_empty());
}

// ===== Direct Handle Misuse =====

#[test]
fn double_invoke_of_a_handle_reports_double_teardown() {
    let props = worker_props();
    let (_worker, mut handle) = props.instantiate().unwrap();

    assert!(!handle.is_consumed());
    handle.invoke().unwrap();
    assert!(handle.is_consumed());

    match handle.invoke() {
        Err(LifecycleError::DoubleTeardown) => {}
        other => panic!("expected DoubleTeardown, got {:?}", other),
    }
}

#[test]
fn dropped_handle_releases_its_scope() {
    let props = worker_props();
    let (worker, handle) = props.instantiate().unwrap();

    drop(handle);
    assert!(worker.session.closed.load(Ordering::SeqCst));
}

// ===== Identity =====

#[test]
fn instance_id_display_and_accessors() {
    let id = InstanceId::new("user/worker-1", 3);
    assert_eq!(id.path(), "user/worker-1");
    assert_eq!(id.incarnation(), 3);
    assert_eq!(id.to_string(), "user/worker-1#3");

    let same = InstanceId::new("user/worker-1", 3);
    let other_incarnation = InstanceId::new("user/worker-1", 4);
    assert_eq!(id, same);
    assert_ne!(id, other_incarnation);
}
