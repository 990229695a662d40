//! A handful of toy actions used by the crate's own integration tests and
//! useful as a starting point for a first tree.

use arbor_core::{Action, NodeCore, NodeStatus, Value};

/// Succeeds immediately, publishing a greeting string as its one output.
#[derive(Debug, Default)]
pub struct Greet;

impl Action for Greet {
    fn class_name(&self) -> &'static str {
        "Greet"
    }

    fn on_tick(&mut self, core: &mut NodeCore) {
        core.set("greeting", Value::from("Hello"));
        core.set_status(NodeStatus::Success);
    }
}

/// Logs `"{greeting}, {name}!"` and succeeds immediately. Takes both as
/// inputs, so it's typically wired up after `Greet` in a sequence.
#[derive(Debug, Default)]
pub struct SayHello;

impl Action for SayHello {
    fn class_name(&self) -> &'static str {
        "SayHello"
    }

    fn on_tick(&mut self, core: &mut NodeCore) {
        let greeting = core.get("greeting").and_then(Value::as_str).unwrap_or("Hello").to_string();
        let name = core.get("name").and_then(Value::as_str).unwrap_or("there").to_string();
        core.logger().info(&format!("{greeting}, {name}!"));
        core.set_status(NodeStatus::Success);
    }
}

/// Stays `RUNNING` for `?ticks` ticks, then succeeds. Useful for exercising
/// tick-rate timing and mid-flight aborts without a real external resource.
#[derive(Debug, Default)]
pub struct CountingWait {
    remaining: i64,
}

impl Action for CountingWait {
    fn class_name(&self) -> &'static str {
        "CountingWait"
    }

    fn on_init(&mut self, core: &mut NodeCore) {
        self.remaining = core.get("ticks").and_then(Value::as_int).unwrap_or(1);
    }

    fn on_tick(&mut self, core: &mut NodeCore) {
        if self.remaining <= 0 {
            core.set_status(NodeStatus::Success);
            return;
        }
        self.remaining -= 1;
        core.set_status(NodeStatus::Running);
    }
}
