use crate::control::{CompositeKind, ControlNode};
use crate::core::NodeCore;
use crate::node::Node;
use crate::sequence::tick_ordered;

/// Ticks children in order, advancing past each that finishes `FAILURE` (or
/// `FIXED`). Succeeds as soon as one succeeds; fails once every child has
/// (spec.md §4.6) — `SequenceNode`'s dual.
pub struct FallbackNode(ControlNode);

impl FallbackNode {
    pub fn new(core: NodeCore) -> Self {
        Self(ControlNode::new(core, CompositeKind::Fallback))
    }

    pub fn control(&self) -> &ControlNode {
        &self.0
    }

    pub fn control_mut(&mut self) -> &mut ControlNode {
        &mut self.0
    }
}

impl Node for FallbackNode {
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
        tick_ordered(&mut self.0, false);
    }

    fn internal_abort(&mut self) {
        self.0.abort();
    }
}
