use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::DeclarationError;
use crate::logger::{Logger, NullLogger};
use crate::status::NodeStatus;
use crate::value::{parse_declaration, Value};

#[derive(Debug, Default)]
struct StatusCell {
    status: NodeStatus,
    message: String,
}

/// A cloneable, thread-safe handle onto a node's status+message. Lets an
/// asynchronous action complete itself "from an external thread or
/// callback" (spec.md §3/§5) without the tick loop racing it.
#[derive(Clone)]
pub struct StatusHandle {
    cell: Arc<Mutex<StatusCell>>,
}

impl StatusHandle {
    pub fn status(&self) -> NodeStatus {
        self.cell.lock().status
    }

    pub fn message(&self) -> String {
        self.cell.lock().message.clone()
    }

    pub fn set_status(&self, status: NodeStatus) {
        self.cell.lock().status = status;
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.cell.lock().message = message.into();
    }
}

/// Shared state every node carries: identity, status, contingency message,
/// parameter slots, and the timeout deadline. `ActionNode` and `ControlNode`
/// both embed one of these rather than inheriting from a common base class.
pub struct NodeCore {
    class_name: &'static str,
    status: Arc<Mutex<StatusCell>>,
    input_names: Vec<String>,
    output_names: Vec<String>,
    slots: HashMap<String, Value>,
    timeout_deadline: Option<Instant>,
    logger: Arc<dyn Logger>,
}

impl NodeCore {
    pub fn new(
        class_name: &'static str,
        declaration: &str,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, DeclarationError> {
        let (input_names, output_names) = parse_declaration(declaration)?;
        logger.trace(&format!(
            "{class_name} in_params: {input_names:?} out_params: {output_names:?}"
        ));
        Ok(Self {
            class_name,
            status: Arc::new(Mutex::new(StatusCell::default())),
            input_names,
            output_names,
            slots: HashMap::new(),
            timeout_deadline: None,
            logger,
        })
    }

    /// Build a `NodeCore` with no declared parameters and a discarding
    /// logger. Convenient for unit tests that only exercise tick mechanics.
    pub fn for_testing(class_name: &'static str) -> Self {
        Self::new(class_name, "", Arc::new(NullLogger)).expect("empty declaration never errors")
    }

    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    pub fn logger(&self) -> Arc<dyn Logger> {
        self.logger.clone()
    }

    pub fn status(&self) -> NodeStatus {
        self.status.lock().status
    }

    pub fn message(&self) -> String {
        self.status.lock().message.clone()
    }

    /// Sets the node's status. Any terminal assignment cancels the pending
    /// timeout timer (invariant 2, spec.md §3).
    pub fn set_status(&mut self, status: NodeStatus) {
        self.status.lock().status = status;
        if status.is_terminal() {
            self.timeout_deadline = None;
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.status.lock().message = message.into();
    }

    /// A cloneable handle that can complete this node from another thread.
    pub fn status_handle(&self) -> StatusHandle {
        StatusHandle {
            cell: self.status.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.slots.insert(name.to_string(), value);
    }

    /// Schedules a one-shot timeout. Polled at the top of every tick rather
    /// than fired from a background OS timer thread — see DESIGN.md's
    /// resolution of the timer-concurrency open question.
    pub fn set_timeout(&mut self, timeout_ms: u64) {
        self.timeout_deadline = Some(Instant::now() + Duration::from_millis(timeout_ms));
    }

    pub fn cancel_timeout(&mut self) {
        if self.timeout_deadline.take().is_some() {
            self.logger.trace(&format!("{} -> cancel timeout timer", self.class_name));
        }
    }

    /// True iff a timeout is armed, has elapsed, and the node is still in a
    /// state where a timeout is meaningful (`RUNNING` or `SUSPENDED`).
    pub fn timeout_due(&self) -> bool {
        let status = self.status();
        matches!(status, NodeStatus::Running | NodeStatus::Suspended)
            && self
                .timeout_deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }
}
