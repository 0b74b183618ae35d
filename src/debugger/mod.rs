//! Interactive introspection: dotted-path state access, breakpoints and a
//! key-driven command line.

pub mod command;
pub mod inspect;
pub mod session;

pub use command::{BreakOp, Command, CommandError};
pub use inspect::{Group, PathError, Registry, Value};
pub use session::{Breakpoint, BreakpointHit, Debugger, Mode, TickOutcome};
