//! The call-scoped visibility protocol.
//!
//! Every public method invocation receives a [`CallScope`]: a view over the
//! instance and the class's shared buckets carrying exactly the member set
//! the method is entitled to. Nothing is ever attached to or removed from
//! the instance itself; entitlement lives in the scope, and reentrancy
//! bookkeeping is an RAII guard on the class's shared depth counters, so
//! teardown happens on every exit path, error returns included.
//!
//! Resolution order inside a scope: constants, own private, protected,
//! ancestor private (when entitled), instance own-data, public bucket.
//!
//! Ancestor private entitlement follows the override rule: a purely
//! inherited method entering at the outermost depth latches the entitlement
//! for the whole call window; an own-declared (overriding) method does not.
//! Parent-dispatch calls are entitled for the duration of the nested parent
//! call, tracked by the second depth counter.

use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;

use super::compiled::ClassShared;
use super::instance::Instance;
use crate::errors::{Error, Result};
use crate::value::{MethodFn, Value};
use crate::visibility::{classify, Visibility};

/// Decrements a depth counter on every exit path. When the counter returns
/// to zero the entitlement latch is cleared as well.
struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
    reset_on_zero: Option<&'a Cell<bool>>,
}

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>, reset_on_zero: Option<&'a Cell<bool>>) -> Self {
        depth.set(depth.get() + 1);
        Self {
            depth,
            reset_on_zero,
        }
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        let depth = self.depth.get() - 1;
        self.depth.set(depth);
        if depth == 0 {
            if let Some(latch) = self.reset_on_zero {
                latch.set(false);
            }
        }
    }
}

/// Run a method of the class's own family through the protocol.
pub(crate) fn invoke_public(
    class: &Rc<ClassShared>,
    instance: &Instance,
    name: &str,
    body: &MethodFn,
    args: &[Value],
) -> Result<Value> {
    if class.depth.get() == 0 {
        // Outermost entry: a purely inherited method opens ancestor private
        // state for the whole call window, an own-declared one does not.
        class
            .ancestor_state_open
            .set(!class.own_keys.contains(name));
    }
    instance.purge_constant_shadows();

    let _guard = DepthGuard::enter(&class.depth, Some(&class.ancestor_state_open));
    trace!(method = name, depth = class.depth.get(), "method entry");

    let mut scope = CallScope { class, instance };
    body(&mut scope, args)
}

/// Run an inherited binding through the parent-dispatch cycle.
fn invoke_parent(
    class: &Rc<ClassShared>,
    instance: &Instance,
    name: &str,
    body: &MethodFn,
    args: &[Value],
) -> Result<Value> {
    instance.purge_constant_shadows();

    let _guard = DepthGuard::enter(&class.parent_depth, None);
    trace!(
        method = name,
        parent_depth = class.parent_depth.get(),
        "parent-dispatch entry"
    );

    let mut scope = CallScope { class, instance };
    body(&mut scope, args)
}

/// The member view handed to an executing method body.
pub struct CallScope<'a> {
    class: &'a Rc<ClassShared>,
    instance: &'a Instance,
}

impl<'a> CallScope<'a> {
    /// Read a member the executing method is entitled to.
    pub fn get(&self, key: &str) -> Option<Value> {
        let v = self.class.constants.get(key).cloned();
        if v.is_some() {
            return v;
        }
        let v = self.class.private.borrow().get(key).cloned();
        if v.is_some() {
            return v;
        }
        let v = self.class.protected.borrow().get(key).cloned();
        if v.is_some() {
            return v;
        }
        if self.ancestor_state_visible() {
            let v = self.class.parent_private.borrow().get(key).cloned();
            if v.is_some() {
                return v;
            }
        }
        let v = self.instance.fields.borrow().get(key).cloned();
        if v.is_some() {
            return v;
        }
        self.class.public.get(key).cloned()
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Write a member. The bucket currently holding the key wins, so members
    /// declared with an explicit visibility tag keep it on writes; only keys
    /// in no bucket fall back to shape classification. Protected and private
    /// writes go straight to the long-lived buckets, so mutations persist
    /// across calls; everything else lands in instance own-data.
    /// Constant-named writes land in own-data too, where the next call entry
    /// purges them: methods keep observing the compile-time value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if self.class.private.borrow().contains_key(&key) {
            self.class.private.borrow_mut().insert(key, value);
            return;
        }
        if self.class.protected.borrow().contains_key(&key) {
            self.class.protected.borrow_mut().insert(key, value);
            return;
        }
        if self.ancestor_state_visible() && self.class.parent_private.borrow().contains_key(&key) {
            self.class.parent_private.borrow_mut().insert(key, value);
            return;
        }
        match classify(&key) {
            Visibility::Private => {
                self.class.private.borrow_mut().insert(key, value);
            }
            Visibility::Protected => {
                self.class.protected.borrow_mut().insert(key, value);
            }
            _ => {
                self.instance.fields.borrow_mut().insert(key, value);
            }
        }
    }

    /// Call a sibling member (any visibility the scope can see) on the same
    /// instance. Methods re-enter the protocol; natives run as-is.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        match self.get(name) {
            Some(Value::Method(body)) => {
                invoke_public(self.class, self.instance, name, &body, args)
            }
            Some(Value::Native(f)) => f(args),
            Some(_) => Err(Error::NotCallable(name.to_string())),
            None => Err(Error::UndefinedMember(name.to_string())),
        }
    }

    /// The parent-dispatch facade, bound to the same instance.
    pub fn parent(&self) -> ParentDispatch<'_> {
        ParentDispatch {
            class: self.class,
            instance: self.instance,
        }
    }

    /// The canonical instance surface. Protected and private members are
    /// not visible through it, even mid-call.
    pub fn instance(&self) -> &Instance {
        self.instance
    }

    fn ancestor_state_visible(&self) -> bool {
        self.class.parent_depth.get() > 0 || self.class.ancestor_state_open.get()
    }
}

/// Call-scoped access to inherited public and protected members, bound to
/// the calling instance. Ancestor private members are not reachable here;
/// they open up only inside a nested parent call, for its duration.
pub struct ParentDispatch<'a> {
    class: &'a Rc<ClassShared>,
    instance: &'a Instance,
}

impl ParentDispatch<'_> {
    /// Read an inherited public or protected member, pre-override.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.class.parents.get(key).cloned()
    }

    pub fn has(&self, key: &str) -> bool {
        self.class.parents.contains_key(key)
    }

    /// Invoke an inherited binding. The ancestor's private state is open to
    /// the running call chain until this nested call unwinds.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        match self.class.parents.get(name) {
            Some(Value::Method(body)) => {
                let body = body.clone();
                invoke_parent(self.class, self.instance, name, &body, args)
            }
            Some(Value::Native(f)) => f(args),
            Some(_) => Err(Error::NotCallable(name.to_string())),
            None => Err(Error::UndefinedMember(name.to_string())),
        }
    }
}
