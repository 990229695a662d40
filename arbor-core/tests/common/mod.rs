#![allow(dead_code)]

use std::sync::Arc;

use arbor_core::{Action, Logger, NodeCore, NodeStatus, NullLogger};

pub fn core(class_name: &'static str, declaration: &str) -> NodeCore {
    NodeCore::new(class_name, declaration, Arc::new(NullLogger)).unwrap()
}

/// An action that reports a fixed status on its very first tick.
pub struct Fixed {
    pub status: NodeStatus,
}

impl Fixed {
    pub fn new(status: NodeStatus) -> Self {
        Self { status }
    }
}

impl Action for Fixed {
    fn class_name(&self) -> &'static str {
        "Fixed"
    }

    fn on_tick(&mut self, core: &mut NodeCore) {
        core.set_status(self.status);
    }
}

/// Stays `RUNNING` for `ticks` calls to `on_tick`, then reports `then`.
pub struct Scripted {
    pub remaining: u32,
    pub then: NodeStatus,
}

impl Scripted {
    pub fn new(ticks: u32, then: NodeStatus) -> Self {
        Self { remaining: ticks, then }
    }
}

impl Action for Scripted {
    fn class_name(&self) -> &'static str {
        "Scripted"
    }

    fn on_tick(&mut self, core: &mut NodeCore) {
        if self.remaining == 0 {
            core.set_status(self.then);
        } else {
            self.remaining -= 1;
            core.set_status(NodeStatus::Running);
        }
    }
}

/// Never finishes on its own; must be aborted.
pub struct NeverFinishes;

impl Action for NeverFinishes {
    fn class_name(&self) -> &'static str {
        "NeverFinishes"
    }

    fn on_tick(&mut self, core: &mut NodeCore) {
        core.set_status(NodeStatus::Running);
    }
}

pub fn null_logger() -> Arc<dyn Logger> {
    Arc::new(NullLogger)
}
