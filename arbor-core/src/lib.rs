mod action;
mod control;
mod core;
mod error;
mod fallback;
mod factory;
mod logger;
mod node;
mod parallel;
mod sequence;
mod status;
mod value;
mod wildcard;

pub use action::{action_factory, Action, ActionHandle, FnAction};
pub use control::{CompositeKind, ControlNode, ExecutionContext};
pub use core::{NodeCore, StatusHandle};
pub use error::{CallArgsError, DeclarationError};
pub use fallback::FallbackNode;
pub use factory::Factory;
pub use logger::{LogLevel, Logger, NullLogger};
pub use node::Node;
pub use parallel::ParallelNode;
pub use sequence::SequenceNode;
pub use status::NodeStatus;
pub use value::{parse_call_args, parse_declaration, CallArg, Value};
pub use wildcard::WildcardMatcher;
