use arbor_core::{action_factory, Node, NodeStatus, ParallelNode};

use crate::common::{self, Fixed, NeverFinishes};

#[test]
fn succeeds_once_threshold_of_children_succeed() {
    let mut p = ParallelNode::new(common::core("ParallelNode", ""));
    p.control_mut().append_child(action_factory("", || Fixed::new(NodeStatus::Success)), "", "").unwrap();
    p.control_mut().append_child(action_factory("", || Fixed::new(NodeStatus::Success)), "", "").unwrap();
    p.control_mut().append_child(action_factory("", || Fixed::new(NodeStatus::Failure)), "", "").unwrap();
    p.control_mut().set_success_threshold(2);
    p.set_status(NodeStatus::Idle);
    p.tick();
    assert_eq!(p.status(), NodeStatus::Success);
}

#[test]
fn fails_as_soon_as_success_becomes_unreachable() {
    let mut p = ParallelNode::new(common::core("ParallelNode", ""));
    p.control_mut().append_child(action_factory("", || Fixed::new(NodeStatus::Failure)), "", "").unwrap();
    p.control_mut().append_child(action_factory("", || Fixed::new(NodeStatus::Failure)), "", "").unwrap();
    p.control_mut().append_child(action_factory("", || Fixed::new(NodeStatus::Success)), "", "").unwrap();
    p.control_mut().set_success_threshold(2);
    p.set_status(NodeStatus::Idle);
    p.tick();
    assert_eq!(p.status(), NodeStatus::Failure);
}

#[test]
fn children_that_finish_keep_their_terminal_status_without_a_live_instance() {
    let mut p = ParallelNode::new(common::core("ParallelNode", ""));
    p.control_mut().append_child(action_factory("", || Fixed::new(NodeStatus::Success)), "", "").unwrap();
    p.control_mut().append_child(action_factory("", || NeverFinishes), "", "").unwrap();
    p.control_mut().set_success_threshold(2);
    p.set_status(NodeStatus::Idle);
    p.tick();
    assert_eq!(p.status(), NodeStatus::Running);
    assert!(p.control().children()[0].instance().is_none());
    assert_eq!(p.control().children()[0].last_status(), NodeStatus::Success);
    assert!(p.control().children()[1].instance().is_some());
}

#[test]
fn a_child_added_while_running_is_ticked_on_the_next_round() {
    let mut p = ParallelNode::new(common::core("ParallelNode", ""));
    p.control_mut().append_child(action_factory("", || NeverFinishes), "", "").unwrap();
    p.control_mut().set_success_threshold(2);
    p.set_status(NodeStatus::Idle);
    p.tick();
    assert_eq!(p.status(), NodeStatus::Running);

    p.control_mut().add_child(action_factory("", || Fixed::new(NodeStatus::Success)), "", "").unwrap();
    p.tick();
    assert_eq!(p.control().children()[1].last_status(), NodeStatus::Success);
    assert_eq!(p.status(), NodeStatus::Running);
}

#[test]
fn aborting_a_parallel_cascades_to_every_live_child() {
    let mut p = ParallelNode::new(common::core("ParallelNode", ""));
    p.control_mut().append_child(action_factory("", || NeverFinishes), "", "").unwrap();
    p.control_mut().append_child(action_factory("", || NeverFinishes), "", "").unwrap();
    p.set_status(NodeStatus::Idle);
    p.tick();
    assert_eq!(p.status(), NodeStatus::Running);

    p.abort();
    assert_eq!(p.status(), NodeStatus::Aborted);
    assert!(p.control().children().iter().all(|c| c.instance().is_none()));
}
