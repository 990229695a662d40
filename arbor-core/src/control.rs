use crate::core::NodeCore;
use crate::error::CallArgsError;
use crate::factory::Factory;
use crate::logger::Logger;
use crate::node::Node;
use crate::status::NodeStatus;
use crate::value::{parse_call_args, CallArg, Value};
use crate::wildcard::WildcardMatcher;

/// Which of the three composite policies a `ControlNode` implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    Sequence,
    Fallback,
    Parallel,
}

/// A child descriptor: how to build the child, how to bind its parameters,
/// and its live instance (if it has one right now).
pub struct ExecutionContext {
    factory: Factory,
    in_args: Vec<CallArg>,
    /// Output call-arguments are always references to parent slots
    /// (spec.md §3), so these are plain names, not `CallArg`.
    out_args: Vec<String>,
    instance: Option<Box<dyn Node>>,
    /// The child's last known status/message, kept after its instance is
    /// released so a parallel composite can still count it toward the
    /// success threshold (invariant 5, spec.md §3).
    last_status: NodeStatus,
    last_message: String,
}

impl ExecutionContext {
    fn new(factory: Factory, in_args: Vec<CallArg>, out_args: Vec<String>) -> Self {
        Self {
            factory,
            in_args,
            out_args,
            instance: None,
            last_status: NodeStatus::Idle,
            last_message: String::new(),
        }
    }

    pub fn instance(&self) -> Option<&dyn Node> {
        self.instance.as_deref()
    }

    pub fn last_status(&self) -> NodeStatus {
        self.last_status
    }
}

struct ContingencyHandler {
    class_pattern: WildcardMatcher,
    statuses: Vec<NodeStatus>,
    message_pattern: WildcardMatcher,
    handler: Box<dyn FnMut(&mut ControlNode) + Send>,
}

/// Shared machinery behind `SequenceNode`, `FallbackNode`, and
/// `ParallelNode`: the child list, parameter binding, and contingency
/// dispatch (spec.md §4.4). The three composite *policies* live in
/// `sequence.rs`/`fallback.rs`/`parallel.rs`; this is the common
/// "ControlNode (base)" component.
pub struct ControlNode {
    core: NodeCore,
    kind: CompositeKind,
    children: Vec<ExecutionContext>,
    /// Cursor into the child list — meaningful for sequence/fallback only.
    cursor: usize,
    handlers: Vec<ContingencyHandler>,
    /// Parallel-only; ignored (with a logged warning if mutated) by
    /// sequence/fallback.
    success_threshold: usize,
    /// The index of the child whose contingency handler is currently
    /// running, if any. Resolves spec.md §9's open question about what
    /// `fix_current_child` means inside a parallel handler: it applies to
    /// whichever child triggered the handler now executing.
    dispatch_cursor: Option<usize>,
}

impl ControlNode {
    pub fn new(core: NodeCore, kind: CompositeKind) -> Self {
        Self {
            core,
            kind,
            children: Vec::new(),
            cursor: 0,
            handlers: Vec::new(),
            success_threshold: 1,
            dispatch_cursor: None,
        }
    }

    pub fn core(&self) -> &NodeCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    pub fn children(&self) -> &[ExecutionContext] {
        &self.children
    }

    pub fn success_threshold(&self) -> usize {
        self.success_threshold
    }

    // ---- tree construction (called from `on_init`) ----

    /// Appends a child at the end of the child list.
    pub fn append_child(
        &mut self,
        factory: Factory,
        in_params: &str,
        out_params: &str,
    ) -> Result<(), CallArgsError> {
        let in_args = parse_call_args(in_params)?;
        let out_args = parse_out_names(out_params)?;
        self.children.push(ExecutionContext::new(factory, in_args, out_args));
        Ok(())
    }

    /// Parallel composites call this to add a child at the end, same as
    /// `append_child` — kept as a distinct name because that's the verb
    /// spec.md §4.7 and §9 use for parallel's dynamic mutation.
    pub fn add_child(
        &mut self,
        factory: Factory,
        in_params: &str,
        out_params: &str,
    ) -> Result<(), CallArgsError> {
        self.append_child(factory, in_params, out_params)
    }

    /// Inserts a child directly after the currently-executing one
    /// (sequence/fallback). When inserting more than one, insert in reverse
    /// order — each lands immediately after the cursor.
    pub fn insert_child_after_current(
        &mut self,
        factory: Factory,
        in_params: &str,
        out_params: &str,
    ) -> Result<(), CallArgsError> {
        let in_args = parse_call_args(in_params)?;
        let out_args = parse_out_names(out_params)?;
        let at = (self.cursor + 1).min(self.children.len());
        self.children
            .insert(at, ExecutionContext::new(factory, in_args, out_args));
        Ok(())
    }

    /// Removes the child at `index` (as the list exists right now). If it
    /// has a live instance, `on_delete` runs first.
    pub fn remove_child(&mut self, index: usize) {
        if index >= self.children.len() {
            self.core.logger().warn(&format!(
                "remove_child({index}) out of bounds for {} children",
                self.children.len()
            ));
            return;
        }
        if let Some(instance) = self.children[index].instance.as_mut() {
            instance.on_delete();
        }
        self.children.remove(index);
        if self.cursor > index {
            self.cursor -= 1;
        } else if self.cursor >= self.children.len() && !self.children.is_empty() {
            self.cursor = self.children.len() - 1;
        }
    }

    /// Removes every child, tearing down any live instance first.
    pub fn remove_all_children(&mut self) {
        for child in &mut self.children {
            if let Some(instance) = child.instance.as_mut() {
                instance.on_delete();
            }
        }
        self.children.clear();
        self.cursor = 0;
        self.dispatch_cursor = None;
    }

    /// Parallel-only. Sequence/fallback composites store the value but it
    /// has no effect on their tick logic.
    pub fn set_success_threshold(&mut self, threshold: usize) {
        if self.kind != CompositeKind::Parallel {
            self.core.logger().warn(&format!(
                "set_success_threshold called on a {:?} composite; it only affects Parallel",
                self.kind
            ));
        }
        self.success_threshold = threshold.max(1);
    }

    // ---- contingency handlers ----

    pub fn attach(
        &mut self,
        class_pattern: &str,
        statuses: &[NodeStatus],
        message_pattern: &str,
        handler: impl FnMut(&mut ControlNode) + Send + 'static,
    ) {
        self.handlers.push(ContingencyHandler {
            class_pattern: WildcardMatcher::new(class_pattern),
            statuses: statuses.to_vec(),
            message_pattern: WildcardMatcher::new(message_pattern),
            handler: Box::new(handler),
        });
    }

    /// Resolves the child the currently-dispatching handler fired for (or,
    /// outside of handler dispatch, the sequence/fallback cursor) to
    /// `FIXED` with an empty message, and clears it from contention.
    pub fn fix_current_child(&mut self) {
        let Some(index) = self.dispatch_cursor.or_else(|| {
            if self.kind == CompositeKind::Parallel {
                None
            } else {
                Some(self.cursor)
            }
        }) else {
            self.core
                .logger()
                .warn("fix_current_child called with no current child to fix");
            return;
        };
        if let Some(instance) = self.children.get_mut(index).and_then(|c| c.instance.as_mut()) {
            instance.set_status(NodeStatus::Fixed);
            instance.set_message("");
        }
    }

    /// Cancels the composite: aborts its live child/children first, then
    /// itself. Shared by `SequenceNode`/`FallbackNode`/`ParallelNode`'s
    /// `Node::internal_abort`, and callable directly from a contingency
    /// handler closure.
    pub fn abort(&mut self) {
        self.core.logger().info(&format!("aborting {}", self.core.class_name()));
        match self.kind {
            CompositeKind::Sequence | CompositeKind::Fallback => {
                if let Some(instance) = self.children.get_mut(self.cursor).and_then(|c| c.instance.as_mut())
                    && matches!(instance.status(), NodeStatus::Running | NodeStatus::Suspended)
                {
                    instance.internal_abort();
                    let message = instance.message();
                    self.core.set_message(message);
                }
                if let Some(c) = self.children.get_mut(self.cursor) {
                    if let Some(instance) = c.instance.as_mut() {
                        instance.on_delete();
                    }
                    c.instance = None;
                }
            }
            CompositeKind::Parallel => {
                for child in &mut self.children {
                    if let Some(instance) = child.instance.as_mut() {
                        if matches!(instance.status(), NodeStatus::Running | NodeStatus::Suspended) {
                            instance.internal_abort();
                        }
                        child.last_status = instance.status();
                        child.last_message = instance.message();
                        instance.on_delete();
                    }
                    child.instance = None;
                }
            }
        }
        self.core.set_status(NodeStatus::Aborted);
    }

    // ---- shared tick helpers, used by sequence.rs/fallback.rs/parallel.rs ----

    pub(crate) fn ensure_instance(&mut self, index: usize) -> Result<(), crate::error::DeclarationError> {
        if self.children[index].instance.is_some() {
            return Ok(());
        }
        let logger = self.core.logger();
        let instance = (self.children[index].factory)(logger)?;
        self.children[index].instance = Some(instance);
        self.bind_inputs(index);
        self.children[index]
            .instance
            .as_mut()
            .expect("just inserted")
            .on_init();
        Ok(())
    }

    pub(crate) fn tick_child(&mut self, index: usize) {
        if let Some(instance) = self.children[index].instance.as_mut() {
            instance.tick();
        }
    }

    /// The sequence/fallback walk cursor. Private to `ControlNode` itself;
    /// `sequence.rs`/`fallback.rs` drive it through these two accessors only.
    pub(crate) fn cursor_for_ordered(&self) -> usize {
        self.cursor
    }

    pub(crate) fn advance_cursor_for_ordered(&mut self) {
        self.cursor += 1;
    }

    pub(crate) fn dispatch_contingency(&mut self, index: usize) {
        let Some((class_name, status, message)) = self.children[index]
            .instance
            .as_ref()
            .map(|i| (i.class_name(), i.status(), i.message()))
        else {
            return;
        };

        self.core.logger().debug(&format!(
            "searching contingency-handler for: {class_name} - {status} - {message}"
        ));

        for hi in 0..self.handlers.len() {
            let is_match = {
                let h = &self.handlers[hi];
                h.class_pattern.is_match(class_name)
                    && h.statuses.contains(&status)
                    && h.message_pattern.is_match(&message)
            };
            if !is_match {
                continue;
            }

            self.core.logger().info(&format!("{class_name} -> running contingency handler"));
            // Pull the handler out to call it with `&mut self` without an
            // aliasing borrow, then put it back in its slot.
            let mut handler = self.handlers.remove(hi);
            self.dispatch_cursor = Some(index);
            (handler.handler)(self);
            self.dispatch_cursor = None;
            self.handlers.insert(hi, handler);
            break;
        }
    }

    pub(crate) fn release_child(&mut self, index: usize) {
        if let Some(instance) = self.children[index].instance.as_mut() {
            instance.on_delete();
        }
        self.children[index].instance = None;
    }

    /// Records the child's current status/message and, if it just became
    /// terminal, binds outputs (on `SUCCESS` only, invariant 6) and
    /// releases the instance.
    pub(crate) fn sync_child_outcome(&mut self, index: usize) {
        let Some((status, message)) = self.children[index].instance.as_ref().map(|i| (i.status(), i.message()))
        else {
            return;
        };
        self.children[index].last_status = status;
        self.children[index].last_message = message;
        if status.is_terminal() {
            if status == NodeStatus::Success {
                self.bind_outputs(index);
            }
            self.release_child(index);
        }
    }

    pub(crate) fn bind_inputs(&mut self, index: usize) {
        let logger = self.core.logger();
        let declared: Vec<String> = self.children[index]
            .instance
            .as_ref()
            .expect("instance constructed before binding inputs")
            .core()
            .input_names()
            .to_vec();
        let class_name = self.children[index].instance.as_ref().unwrap().class_name();
        let call_args = self.children[index].in_args.clone();

        if call_args.len() != declared.len() {
            logger.warn(&format!(
                "{class_name} takes {} argument(s), but {} was/were provided",
                declared.len(),
                call_args.len()
            ));
        }

        for (i, name) in declared.iter().enumerate() {
            let Some(arg) = call_args.get(i) else { break };
            let value = match arg {
                CallArg::Literal(v) => v.clone(),
                CallArg::Ref(parent_slot) => match self.core.get(parent_slot) {
                    Some(v) => v.clone(),
                    None => {
                        logger.warn(&format!(
                            "{class_name} input ?{name} references unset parent slot ?{parent_slot}"
                        ));
                        continue;
                    }
                },
            };
            self.children[index]
                .instance
                .as_mut()
                .unwrap()
                .core_mut()
                .set(name, value);
        }
    }

    pub(crate) fn bind_outputs(&mut self, index: usize) {
        let logger = self.core.logger();
        let instance = self.children[index].instance.as_ref().unwrap();
        let class_name = instance.class_name();
        let declared_outputs: Vec<String> = instance.core().output_names().to_vec();
        let values: Vec<Option<Value>> = declared_outputs
            .iter()
            .map(|name| instance.core().get(name).cloned())
            .collect();
        let out_args = self.children[index].out_args.clone();

        for (i, name) in declared_outputs.iter().enumerate() {
            match &values[i] {
                None => logger.warn(&format!("{class_name} output ?{name} is not set")),
                Some(value) => match out_args.get(i) {
                    Some(parent_slot) => self.core.set(parent_slot, value.clone()),
                    None => logger.warn(&format!("{class_name} output {i} not provided")),
                },
            }
        }
    }
}

fn parse_out_names(s: &str) -> Result<Vec<String>, CallArgsError> {
    s.split_whitespace()
        .map(|token| {
            token
                .strip_prefix('?')
                .map(str::to_string)
                .ok_or_else(|| CallArgsError::UnrecognizedToken(token.to_string()))
        })
        .collect()
}
