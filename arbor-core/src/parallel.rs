use crate::control::{CompositeKind, ControlNode};
use crate::core::NodeCore;
use crate::node::Node;
use crate::status::NodeStatus;

/// Ticks every non-terminal child once per tick, independent of the others.
/// Succeeds once `success_threshold` children have reached `SUCCESS`/`FIXED`;
/// fails as soon as success is no longer mathematically reachable given how
/// many have already failed (spec.md §4.7).
///
/// Children may be added or removed while the composite is `RUNNING`
/// (spec.md §4.7, §9) — each round only ever walks a length snapshot taken
/// at the start of the round, so a handler mutating the list mid-round never
/// causes an index to be observed twice or to alias a just-inserted child.
pub struct ParallelNode(ControlNode);

impl ParallelNode {
    pub fn new(core: NodeCore) -> Self {
        Self(ControlNode::new(core, CompositeKind::Parallel))
    }

    pub fn control(&self) -> &ControlNode {
        &self.0
    }

    pub fn control_mut(&mut self) -> &mut ControlNode {
        &mut self.0
    }
}

impl Node for ParallelNode {
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
        tick_parallel(&mut self.0);
    }

    fn internal_abort(&mut self) {
        self.0.abort();
    }
}

fn tick_parallel(control: &mut ControlNode) {
    let total = control.children().len();
    if total == 0 {
        return;
    }

    for index in 0..total {
        if index >= control.children().len() {
            break;
        }
        if control.children()[index].last_status().is_terminal() {
            // Already decided in a previous round; nothing left to tick.
            continue;
        }
        if let Err(err) = control.ensure_instance(index) {
            control.core_mut().logger().warn(&format!("failed to construct child {index}: {err}"));
            control.core_mut().set_status(NodeStatus::Failure);
            return;
        }
        control.tick_child(index);
        control.dispatch_contingency(index);

        let Some(status) = control.children().get(index).and_then(|c| c.instance()).map(Node::status) else {
            continue;
        };
        if status == NodeStatus::Aborted {
            control.abort();
            return;
        }
        control.sync_child_outcome(index);
    }

    let threshold = control.success_threshold();
    let total = control.children().len();
    let successes = control
        .children()
        .iter()
        .filter(|c| matches!(c.last_status(), NodeStatus::Success | NodeStatus::Fixed))
        .count();
    let failures = control
        .children()
        .iter()
        .filter(|c| c.last_status() == NodeStatus::Failure)
        .count();

    if successes >= threshold {
        finish_parallel(control, NodeStatus::Success);
        return;
    }
    // Only declare failure once success is unreachable *given the current
    // child list*. While the threshold exceeds the child count, more
    // children may still be added dynamically (spec.md §9), so withhold
    // judgment rather than failing a composite that simply hasn't grown
    // enough yet.
    if total >= threshold && total.saturating_sub(failures) < threshold {
        finish_parallel(control, NodeStatus::Failure);
        return;
    }
    control.core_mut().set_status(NodeStatus::Running);
}

/// Aborts every still-live child (the decision has already been made, so
/// their outcome no longer matters) and reports the composite's own status.
fn finish_parallel(control: &mut ControlNode, outcome: NodeStatus) {
    for index in 0..control.children().len() {
        if control.children()[index].instance().is_some() {
            control.release_child(index);
        }
    }
    control.core_mut().set_status(outcome);
}
