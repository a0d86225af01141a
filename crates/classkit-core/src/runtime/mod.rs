//! The call-scoped visibility runtime: compiled classes, instances, and the
//! scope/facade types handed to executing method bodies.

mod compiled;
mod instance;
mod scope;

pub use compiled::CompiledClass;
pub use instance::Instance;
pub use scope::{CallScope, ParentDispatch};

pub(crate) use scope::invoke_public;

/// Reserved name of the construction hook. Triple-underscored on purpose:
/// the third underscore breaks both the private and the protected key shape,
/// so the hook classifies as public and survives composition like any other
/// public member.
pub const CONSTRUCT_HOOK: &str = "___construct";
