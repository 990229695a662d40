use std::sync::Arc;

use crate::error::DeclarationError;
use crate::logger::Logger;
use crate::node::Node;

/// Builds a fresh node instance, given the logger it should log through.
/// A child descriptor (`ExecutionContext`) holds one of these and invokes it
/// lazily, the first time the child is about to tick (spec.md §3).
pub type Factory = Box<dyn Fn(Arc<dyn Logger>) -> Result<Box<dyn Node>, DeclarationError> + Send>;
