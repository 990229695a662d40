use std::time::{Duration, Instant};

use crate::core::NodeCore;
use crate::factory::Factory;
use crate::node::Node;
use crate::status::NodeStatus;

/// User-implemented leaf behavior. An action produces externally observable
/// effects from `on_tick` and reports completion by setting its own status.
/// Synchronous actions set a terminal status before returning; asynchronous
/// ones may leave status at `RUNNING` (external work scheduled) or
/// `SUSPENDED` (external work started, do not re-tick) and complete later,
/// possibly from another thread via `NodeCore::status_handle`.
pub trait Action: Send {
    fn class_name(&self) -> &'static str;

    fn on_tick(&mut self, core: &mut NodeCore);

    fn on_init(&mut self, _core: &mut NodeCore) {}
    fn on_abort(&mut self, _core: &mut NodeCore) {}
    fn on_delete(&mut self, _core: &mut NodeCore) {}
}

/// Wraps an `Action` with the shared `NodeCore` and throttle bookkeeping,
/// making it a full `Node` the engine can tick. Mirrors careBT's
/// `ActionNode`.
pub struct ActionHandle<A> {
    core: NodeCore,
    behavior: A,
    throttle_ms: Option<u64>,
    last_tick: Option<Instant>,
}

impl<A: Action> ActionHandle<A> {
    pub fn new(core: NodeCore, behavior: A) -> Self {
        Self {
            core,
            behavior,
            throttle_ms: None,
            last_tick: None,
        }
    }

    /// Minimum wall-time in milliseconds between successive `on_tick`
    /// invocations. A tick inside the throttle window is silently skipped —
    /// status is left unchanged.
    pub fn set_throttle_ms(&mut self, throttle_ms: u64) {
        self.throttle_ms = Some(throttle_ms);
    }
}

impl<A: Action> Node for ActionHandle<A> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn on_init(&mut self) {
        self.behavior.on_init(&mut self.core);
    }

    fn on_abort(&mut self) {
        self.behavior.on_abort(&mut self.core);
    }

    fn on_delete(&mut self) {
        self.behavior.on_delete(&mut self.core);
    }

    fn internal_tick(&mut self) {
        let now = Instant::now();
        if let (Some(throttle_ms), Some(last)) = (self.throttle_ms, self.last_tick)
            && now.duration_since(last) < Duration::from_millis(throttle_ms)
        {
            return;
        }

        if matches!(self.core.status(), NodeStatus::Idle | NodeStatus::Running) {
            self.core
                .logger()
                .info(&format!("ticking {} - {}", self.behavior.class_name(), self.core.status()));
            self.behavior.on_tick(&mut self.core);
            self.last_tick = Some(now);
        }
    }
}

/// A closure-backed `Action`, for demos and tests that don't want to name a
/// struct per leaf. `class_name` stands in for the concrete type name the
/// contingency-handler class matcher patterns against.
pub struct FnAction<F> {
    class_name: &'static str,
    tick: F,
}

impl<F> FnAction<F>
where
    F: FnMut(&mut NodeCore) + Send,
{
    pub fn new(class_name: &'static str, tick: F) -> Self {
        Self { class_name, tick }
    }
}

impl<F> Action for FnAction<F>
where
    F: FnMut(&mut NodeCore) + Send,
{
    fn class_name(&self) -> &'static str {
        self.class_name
    }

    fn on_tick(&mut self, core: &mut NodeCore) {
        (self.tick)(core);
    }
}

/// Builds a `Factory` for an `Action` type constructed fresh (via `make`)
/// each time the child descriptor lazily instantiates it.
pub fn action_factory<A, F>(declaration: &'static str, make: F) -> Factory
where
    A: Action + 'static,
    F: Fn() -> A + Send + Sync + 'static,
{
    Box::new(move |logger| {
        let behavior = make();
        let core = NodeCore::new(behavior.class_name(), declaration, logger)?;
        Ok(Box::new(ActionHandle::new(core, behavior)) as Box<dyn Node>)
    })
}
