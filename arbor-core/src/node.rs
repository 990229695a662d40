use crate::core::NodeCore;
use crate::status::NodeStatus;

/// The engine-facing contract every tree node satisfies — leaves
/// (`ActionHandle`) and composites (`SequenceNode`/`FallbackNode`/
/// `ParallelNode`) alike. Mirrors careBT's `TreeNode`: a shared core plus a
/// handful of lifecycle hooks subclasses override.
///
/// Lifecycle: constructed -> `on_init` (once, after inputs bound) -> repeated
/// `internal_tick` until status is terminal -> `on_delete` (once) ->
/// destroyed. `on_abort` is an alternative terminal path injected by a parent
/// or a timeout.
pub trait Node: Send {
    fn core(&self) -> &NodeCore;
    fn core_mut(&mut self) -> &mut NodeCore;

    /// Called once, right after the node is instantiated and its inputs are
    /// bound.
    fn on_init(&mut self) {}

    /// Called when the node is aborted, before status is set to `ABORTED`.
    fn on_abort(&mut self) {}

    /// Called once the node has reached a terminal status, to release any
    /// resources it acquired.
    fn on_delete(&mut self) {}

    /// Called when the node's timeout timer fires while it is still
    /// `RUNNING` or `SUSPENDED`. The default aborts the node and reports
    /// `"TIMEOUT"` as the contingency message.
    fn on_timeout(&mut self) {
        self.abort();
        self.set_message("TIMEOUT");
    }

    /// The node-kind-specific step of a tick: an action runs its user
    /// callback (subject to throttling); a composite advances its children
    /// per its policy. Never called directly by a parent — use `tick`,
    /// which also polls the timeout first.
    fn internal_tick(&mut self);

    /// The node-kind-specific abort path. Actions just cancel the timer, run
    /// `on_abort`, and go `ABORTED`; composites first recursively abort
    /// their live child/children, then do the same.
    fn internal_abort(&mut self) {
        self.core_mut().cancel_timeout();
        self.on_abort();
        self.core_mut().set_status(NodeStatus::Aborted);
    }

    /// Public entry point to cancel this node.
    fn abort(&mut self) {
        self.internal_abort();
    }

    /// The public tick entry point used by parents (and by
    /// `BehaviorTreeRunner` on the root). Polls the timeout before
    /// dispatching to `internal_tick`.
    fn tick(&mut self) {
        if self.core().timeout_due() {
            self.on_timeout();
            return;
        }
        self.internal_tick();
    }

    fn status(&self) -> NodeStatus {
        self.core().status()
    }

    fn message(&self) -> String {
        self.core().message()
    }

    fn class_name(&self) -> &'static str {
        self.core().class_name()
    }

    fn set_status(&mut self, status: NodeStatus) {
        self.core_mut().set_status(status);
    }

    fn set_message(&mut self, message: &str) {
        self.core_mut().set_message(message.to_string());
    }
}
