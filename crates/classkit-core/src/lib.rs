//! Runtime class composition with enforced member visibility.
//!
//! This crate retrofits classical object-oriented visibility (public,
//! protected, private, and constant members), trait composition, and linear
//! multi-parent inheritance onto a dynamic member-map object model.
//!
//! Visibility is derived from key shape at declaration time (`_name` is
//! protected, `__name` is private, `ALL_CAPS` is a constant) and carried as
//! explicit metadata from then on. A compiled class wraps every public
//! method in a call-scoped protocol: the executing body receives a
//! [`CallScope`] entitled to its protected and private state, while the
//! instance surface never exposes either. Inherited behavior is reachable
//! through the [`ParentDispatch`] facade, which exposes ancestor public and
//! protected members and momentarily opens ancestor private state during a
//! nested parent call.
//!
//! ```
//! use classkit_core::{members, ClassBuilder, Value};
//!
//! let account = ClassBuilder::new()
//!     .declare(members! {
//!         "CURRENCY" => "EUR",
//!         "_balance" => 0i64,
//!         "deposit" => Value::method(|ctx, args| {
//!             let amount = args.first().and_then(Value::as_int).unwrap_or(0);
//!             let balance = ctx.get("_balance").and_then(|v| v.as_int()).unwrap_or(0);
//!             ctx.set("_balance", Value::int(balance + amount));
//!             ctx.get("_balance").ok_or_else(|| {
//!                 classkit_core::Error::UndefinedMember("_balance".into())
//!             })
//!         }),
//!     })
//!     .unwrap();
//!
//! let instance = account.instantiate(&[]).unwrap();
//! assert_eq!(instance.call("deposit", &[Value::int(40)]).unwrap(), Value::int(40));
//! assert_eq!(instance.get("_balance"), None);
//! ```
//!
//! The runtime is single-threaded by design: depth counters and member
//! buckets are shared per compiled class, and reentrancy means call-stack
//! nesting, not parallelism.

pub mod builder;
mod compose;
pub mod definition;
pub mod errors;
pub mod registry;
pub mod runtime;
pub mod value;
pub mod visibility;

pub use builder::{ClassBuilder, TraitSource};
pub use definition::{DeclarationSource, Definition, Member};
pub use errors::{Error, Result};
pub use runtime::{CallScope, CompiledClass, Instance, ParentDispatch, CONSTRUCT_HOOK};
pub use value::{Members, Value};
pub use visibility::{classify, Visibility};

/// Build an ordered member map.
///
/// Values go through [`Value::from`], so literals, strings, and ready-made
/// [`Value`]s can be mixed freely.
#[macro_export]
macro_rules! members {
    () => { $crate::value::Members::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut members = $crate::value::Members::new();
        $(
            members.insert(($key).to_string(), $crate::value::Value::from($value));
        )+
        members
    }};
}
