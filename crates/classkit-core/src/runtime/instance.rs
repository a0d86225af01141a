//! Instances: the canonical object surface.
//!
//! An instance exposes its own data and the public bucket, nothing else.
//! Protected and private members never appear here; an executing method
//! reaches them through its [`CallScope`](super::CallScope), which borrows
//! from the class's shared buckets for exactly the duration of the call.

use std::cell::RefCell;
use std::rc::Rc;

use super::compiled::ClassShared;
use super::scope::invoke_public;
use crate::errors::{Error, Result};
use crate::value::{Members, Value};
use crate::visibility::{classify, Visibility};

pub struct Instance {
    pub(crate) class: Rc<ClassShared>,
    pub(crate) fields: RefCell<Members>,
}

impl Instance {
    pub(crate) fn new(class: Rc<ClassShared>, fields: Members) -> Self {
        Self {
            class,
            fields: RefCell::new(fields),
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class.name.as_deref()
    }

    /// Read a member from the outside. Public members and constants are
    /// always defined; protected and private names are never visible here,
    /// whatever the call stack is doing.
    pub fn get(&self, key: &str) -> Option<Value> {
        match classify(key) {
            Visibility::Protected | Visibility::Private => None,
            _ => {
                let shadowed = self.fields.borrow().get(key).cloned();
                shadowed
                    .or_else(|| self.class.constants.get(key).cloned())
                    .or_else(|| self.class.public.get(key).cloned())
            }
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Write own-data. A constant-named key is accepted as a surface shadow
    /// but is purged again on the next call entry and never reaches what
    /// methods observe.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.fields.borrow_mut().insert(key.into(), value);
    }

    /// Invoke a public method through the visibility protocol.
    ///
    /// Only methods compiled into the class run scoped. A callable attached
    /// to the surface with [`set`](Instance::set) is not part of the class
    /// and never receives a scope: natives run as plain functions, attached
    /// method values are rejected.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let attached = self.fields.borrow().get(name).cloned();
        if let Some(value) = attached {
            return match value {
                Value::Native(f) => f(args),
                _ => Err(Error::NotCallable(name.to_string())),
            };
        }
        match self.class.public.get(name).cloned() {
            Some(Value::Method(body)) => invoke_public(&self.class, self, name, &body, args),
            Some(Value::Native(f)) => f(args),
            Some(_) => Err(Error::NotCallable(name.to_string())),
            None => Err(Error::UndefinedMember(name.to_string())),
        }
    }

    /// Drop any own-data entry that shadows a constant. Runs on every call
    /// entry so constants are re-asserted regardless of depth.
    pub(crate) fn purge_constant_shadows(&self) {
        if self.class.constants.is_empty() {
            return;
        }
        self.fields
            .borrow_mut()
            .retain(|key, _| !self.class.constants.contains_key(key));
    }
}
