use std::time::Duration;

pub use arbor_core::{
    action_factory, Action, ActionHandle, CallArg, CallArgsError, CompositeKind, ControlNode,
    DeclarationError, ExecutionContext, FallbackNode, Factory, FnAction, LogLevel, Logger, Node,
    NodeCore, NodeStatus, ParallelNode, SequenceNode, StatusHandle, Value, WildcardMatcher,
};

pub mod demo;

/// Routes engine log lines through the `tracing` ecosystem. The tick engine
/// itself never picks a sink — this is the one `BehaviorTreeRunner` installs
/// by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "arbor", "{message}"),
            LogLevel::Debug => tracing::debug!(target: "arbor", "{message}"),
            LogLevel::Info => tracing::info!(target: "arbor", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "arbor", "{message}"),
            LogLevel::Error => tracing::error!(target: "arbor", "{message}"),
        }
    }
}

/// Knobs for `BehaviorTreeRunner::run_until_done`.
#[derive(Debug, Clone, Copy)]
pub struct RunnerConfig {
    /// Wall-clock delay between successive ticks of the root.
    pub tick_interval: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
        }
    }
}

/// Drives a tree's root node to completion at a fixed tick rate. The engine
/// itself (`arbor-core`) is synchronous; this is the async wall-clock loop
/// around it, the only part of the system that talks to a runtime.
pub struct BehaviorTreeRunner {
    root: Box<dyn Node>,
    config: RunnerConfig,
    tick_count: u64,
}

impl BehaviorTreeRunner {
    /// Takes ownership of an already-constructed (but not yet initialized)
    /// root node, runs its `on_init`, and leaves it ready to tick.
    pub fn new(mut root: Box<dyn Node>, config: RunnerConfig) -> Self {
        root.set_status(NodeStatus::Idle);
        root.on_init();
        Self { root, config, tick_count: 0 }
    }

    pub fn root(&self) -> &dyn Node {
        self.root.as_ref()
    }

    /// Number of times the root has been ticked by `run_until_done` so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Ticks the root exactly once and returns its resulting status.
    pub fn tick_once(&mut self) -> NodeStatus {
        self.root.tick();
        self.root.status()
    }

    /// Ticks at `config.tick_interval` until the root reaches a terminal
    /// status, then returns it.
    pub async fn run_until_done(&mut self) -> NodeStatus {
        loop {
            let status = self.tick_once();
            self.tick_count += 1;
            if status.is_terminal() {
                return status;
            }
            tokio::time::sleep(self.config.tick_interval).await;
        }
    }

    /// Cancels the whole tree immediately.
    pub fn abort(&mut self) {
        self.root.abort();
    }
}
