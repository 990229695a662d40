use crate::control::{CompositeKind, ControlNode};
use crate::core::NodeCore;
use crate::node::Node;
use crate::status::NodeStatus;

/// Ticks children in order, advancing past each that finishes `SUCCESS` (or
/// `FIXED`). Fails as soon as one fails; succeeds once every child has
/// (spec.md §4.5).
pub struct SequenceNode(ControlNode);

impl SequenceNode {
    pub fn new(core: NodeCore) -> Self {
        Self(ControlNode::new(core, CompositeKind::Sequence))
    }

    pub fn control(&self) -> &ControlNode {
        &self.0
    }

    pub fn control_mut(&mut self) -> &mut ControlNode {
        &mut self.0
    }
}

impl Node for SequenceNode {
    fn core(&self) -> &NodeCore {
        self.0.core()
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        self.0.core_mut()
    }

    fn on_delete(&mut self) {
        self.0.remove_all_children();
    }

    fn internal_tick(&mut self) {
        tick_ordered(&mut self.0, true);
    }

    fn internal_abort(&mut self) {
        self.0.abort();
    }
}

/// Shared advance-or-short-circuit logic for `SequenceNode`/`FallbackNode`.
/// `is_sequence` swaps which terminal status continues the walk and which
/// one short-circuits it; `ABORTED` always hard-stops regardless of polarity.
///
/// Ticks at most one child per call (spec.md §5): a child that finishes
/// `SUCCESS`/`FIXED` only advances the cursor and reports `RUNNING` — the
/// next child isn't touched until the composite itself is ticked again. The
/// composite only collapses to its own terminal status when the cursor is
/// already past the last child at tick entry.
pub(crate) fn tick_ordered(control: &mut ControlNode, is_sequence: bool) {
    if control.children().is_empty() {
        // Conservative reading of an open question in spec.md §9: an empty
        // composite never has anything to report success or failure for, so
        // it stays RUNNING rather than vacuously succeeding.
        return;
    }

    let cursor = control_cursor(control);
    if cursor >= control.children().len() {
        let outcome = if is_sequence { NodeStatus::Success } else { NodeStatus::Failure };
        control.core_mut().set_status(outcome);
        return;
    }

    if let Err(err) = control.ensure_instance(cursor) {
        control.core_mut().logger().warn(&format!("failed to construct child {cursor}: {err}"));
        control.core_mut().set_status(NodeStatus::Failure);
        return;
    }

    control.tick_child(cursor);
    control.dispatch_contingency(cursor);

    let Some(status) = control.children().get(cursor).and_then(|c| c.instance()).map(Node::status) else {
        // The contingency handler removed this child out from under us;
        // report RUNNING and let the next external tick re-resolve.
        control.core_mut().set_status(NodeStatus::Running);
        return;
    };

    if status == NodeStatus::Aborted {
        control.sync_child_outcome(cursor);
        control.core_mut().set_status(NodeStatus::Aborted);
        return;
    }

    let continues = if is_sequence {
        matches!(status, NodeStatus::Success | NodeStatus::Fixed)
    } else {
        matches!(status, NodeStatus::Failure | NodeStatus::Fixed)
    };
    let short_circuits = if is_sequence {
        status == NodeStatus::Failure
    } else {
        status == NodeStatus::Success
    };

    if continues {
        control.sync_child_outcome(cursor);
        advance_cursor(control);
        // One child per tick: even if that was the last child, the
        // collapse to the composite's own terminal status waits for the
        // next external tick, where the cursor-past-end check above fires.
        control.core_mut().set_status(NodeStatus::Running);
        return;
    }
    if short_circuits {
        control.sync_child_outcome(cursor);
        control.core_mut().set_status(status);
        return;
    }
    // RUNNING or SUSPENDED: mirror the child's status and wait for the
    // next external tick.
    control.core_mut().set_status(status);
}

fn control_cursor(control: &ControlNode) -> usize {
    // SequenceNode/FallbackNode own no public cursor accessor by design —
    // `ControlNode` tracks it privately and exposes advancement only via
    // `advance_cursor`/`control_cursor`, kept crate-private to this module
    // and `fallback.rs`.
    control.cursor_for_ordered()
}

fn advance_cursor(control: &mut ControlNode) {
    control.advance_cursor_for_ordered();
}
