use arbor_core::{action_factory, Action, Node, NodeCore, NodeStatus, SequenceNode, Value};

use crate::common;

struct Produce(Value);

impl Action for Produce {
    fn class_name(&self) -> &'static str {
        "Produce"
    }

    fn on_tick(&mut self, core: &mut NodeCore) {
        core.set("out", self.0.clone());
        core.set_status(NodeStatus::Success);
    }
}

struct Echo;

impl Action for Echo {
    fn class_name(&self) -> &'static str {
        "Echo"
    }

    fn on_tick(&mut self, core: &mut NodeCore) {
        let seen = core.get("in").cloned();
        core.set("echoed", seen.unwrap_or(Value::Bool(false)));
        core.set_status(NodeStatus::Success);
    }
}

#[test]
fn an_output_produced_by_one_child_is_visible_as_the_next_childs_input() {
    let mut seq = SequenceNode::new(common::core("SequenceNode", ""));
    seq.control_mut()
        .append_child(action_factory("=> ?result", || Produce(Value::Int(7))), "", "?result")
        .unwrap();
    seq.control_mut()
        .append_child(action_factory("?in => ?echoed", || Echo), "?result", "?final")
        .unwrap();
    seq.set_status(NodeStatus::Idle);
    // One child per tick: the first child's SUCCESS only advances the
    // cursor, so the second child runs on the next tick.
    seq.tick();
    assert_eq!(seq.status(), NodeStatus::Running);
    seq.tick();
    assert_eq!(seq.status(), NodeStatus::Success);
    assert_eq!(seq.core().get("final"), Some(&Value::Int(7)));
}

#[test]
fn output_binding_happens_on_success_but_never_on_fixed() {
    struct FailsThenWouldProduce;
    impl Action for FailsThenWouldProduce {
        fn class_name(&self) -> &'static str {
            "FailsThenWouldProduce"
        }
        fn on_tick(&mut self, core: &mut NodeCore) {
            core.set("result", Value::Int(99));
            core.set_status(NodeStatus::Failure);
        }
    }

    let mut seq = SequenceNode::new(common::core("SequenceNode", ""));
    seq.control_mut()
        .append_child(action_factory("=> ?result", || FailsThenWouldProduce), "", "?captured")
        .unwrap();
    seq.control_mut().attach("FailsThenWouldProduce", &[NodeStatus::Failure], "*", |control| {
        control.fix_current_child();
    });
    seq.set_status(NodeStatus::Idle);
    seq.tick();
    assert_eq!(seq.status(), NodeStatus::Running);
    seq.tick();
    assert_eq!(seq.status(), NodeStatus::Success);
    // The handler reclassified FAILURE as FIXED; invariant 6 says outputs
    // only bind on SUCCESS, so the parent slot stays unset.
    assert_eq!(seq.core().get("captured"), None);
}
