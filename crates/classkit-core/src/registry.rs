//! The named-trait registry.
//!
//! A class registered under a name can later be folded into another class's
//! parent list exactly like any other parent. The store is thread-local:
//! the runtime is single-threaded by design, and tests stay isolated for
//! free because the harness runs each test on its own thread.

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::definition::Definition;

thread_local! {
    static TRAITS: RefCell<FxHashMap<String, Definition>> = RefCell::new(FxHashMap::default());
}

/// Store a fully merged member set under a name. Re-registering a name
/// replaces the previous entry.
pub fn register(name: impl Into<String>, definition: Definition) {
    let name = name.into();
    debug!(name = %name, members = definition.len(), "registered trait");
    TRAITS.with(|traits| {
        traits.borrow_mut().insert(name, definition);
    });
}

/// Look up a registered trait, returning an independent copy.
pub fn resolve(name: &str) -> Option<Definition> {
    TRAITS.with(|traits| traits.borrow().get(name).map(Definition::snapshot))
}

pub fn is_registered(name: &str) -> bool {
    TRAITS.with(|traits| traits.borrow().contains_key(name))
}

/// Drop every registration on the current thread.
pub fn clear() {
    TRAITS.with(|traits| traits.borrow_mut().clear());
}
