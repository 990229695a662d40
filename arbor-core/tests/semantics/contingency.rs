use arbor_core::{action_factory, Node, NodeStatus, SequenceNode};

use crate::common::{self, Fixed};

#[test]
fn a_matching_handler_runs_and_can_fix_the_failed_child() {
    let mut seq = SequenceNode::new(common::core("SequenceNode", ""));
    seq.control_mut()
        .append_child(action_factory("", || Fixed::new(NodeStatus::Failure)), "", "")
        .unwrap();
    seq.control_mut()
        .append_child(action_factory("", || Fixed::new(NodeStatus::Success)), "", "")
        .unwrap();
    seq.control_mut().attach("Fixed", &[NodeStatus::Failure], "*", |control| {
        control.fix_current_child();
    });
    seq.set_status(NodeStatus::Idle);
    // The handler reclassified the first child's FAILURE as FIXED, so the
    // sequence continues past it instead of short-circuiting — one child
    // per tick means the second child only runs on the next tick.
    seq.tick();
    assert_eq!(seq.status(), NodeStatus::Running);
    seq.tick();
    assert_eq!(seq.status(), NodeStatus::Success);
}

#[test]
fn handlers_are_tried_in_registration_order_first_match_wins() {
    let mut seq = SequenceNode::new(common::core("SequenceNode", ""));
    seq.control_mut()
        .append_child(action_factory("", || Fixed::new(NodeStatus::Failure)), "", "")
        .unwrap();

    let order = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let order_a = order.clone();
    let order_b = order.clone();
    seq.control_mut().attach("Fixed", &[NodeStatus::Failure], "*", move |_control| {
        order_a.lock().unwrap().push("first");
    });
    seq.control_mut().attach("Fixed", &[NodeStatus::Failure], "*", move |_control| {
        order_b.lock().unwrap().push("second");
    });
    seq.set_status(NodeStatus::Idle);
    seq.tick();
    assert_eq!(*order.lock().unwrap(), vec!["first"]);
}

#[test]
fn class_pattern_and_message_pattern_must_both_match() {
    struct Picky;
    impl arbor_core::Action for Picky {
        fn class_name(&self) -> &'static str {
            "Picky"
        }
        fn on_tick(&mut self, core: &mut arbor_core::NodeCore) {
            core.set_status(NodeStatus::Failure);
            core.set_message("no-disk-space");
        }
    }

    let mut seq = SequenceNode::new(common::core("SequenceNode", ""));
    seq.control_mut().append_child(action_factory("", || Picky), "", "").unwrap();
    seq.control_mut().attach("Pic?y", &[NodeStatus::Failure], "wrong-message", |control| {
        control.fix_current_child();
    });
    seq.set_status(NodeStatus::Idle);
    seq.tick();
    // message pattern didn't match, so the handler never ran.
    assert_eq!(seq.status(), NodeStatus::Failure);

    let mut seq2 = SequenceNode::new(common::core("SequenceNode", ""));
    seq2.control_mut().append_child(action_factory("", || Picky), "", "").unwrap();
    seq2.control_mut().attach("Pic?y", &[NodeStatus::Failure], "no-disk-*", |control| {
        control.fix_current_child();
    });
    seq2.set_status(NodeStatus::Idle);
    seq2.tick();
    assert_eq!(seq2.status(), NodeStatus::Running);
    seq2.tick();
    assert_eq!(seq2.status(), NodeStatus::Success);
}
