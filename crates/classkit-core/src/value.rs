//! Dynamic member values.
//!
//! A [`Value`] is anything a class member can hold. Structural values (lists
//! and maps) clone deeply, so every copy owns independent state. Intrinsic
//! values (timestamps, patterns, native functions, methods) are opaque and
//! copy by reference; this is the explicit allow-list the deep-copy rules
//! are built on.

use std::fmt;
use std::rc::Rc;
use std::time::SystemTime;

use indexmap::IndexMap;
use regex::Regex;

use crate::errors::Result;
use crate::runtime::CallScope;

/// Ordered member map. Declaration order is observable, so maps preserve it.
pub type Members = IndexMap<String, Value>;

/// A plain callable. Never routed through the visibility protocol.
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Result<Value>>;

/// A method body. Invoked through the visibility protocol with a call scope
/// entitled to the member set of its class.
pub type MethodFn = Rc<dyn Fn(&mut CallScope<'_>, &[Value]) -> Result<Value>>;

#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Structural; clones deeply.
    List(Vec<Value>),
    /// Structural; clones deeply.
    Map(Members),
    /// Opaque.
    Timestamp(SystemTime),
    /// Opaque; shared by reference across copies.
    Pattern(Rc<Regex>),
    /// Opaque; shared by reference across copies.
    Native(NativeFn),
    /// Opaque; shared by reference across copies.
    Method(MethodFn),
}

impl Value {
    pub fn null() -> Self {
        Value::Null
    }

    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn int(i: i64) -> Self {
        Value::Int(i)
    }

    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items)
    }

    pub fn map(members: Members) -> Self {
        Value::Map(members)
    }

    pub fn timestamp(at: SystemTime) -> Self {
        Value::Timestamp(at)
    }

    pub fn now() -> Self {
        Value::Timestamp(SystemTime::now())
    }

    pub fn pattern(pattern: Regex) -> Self {
        Value::Pattern(Rc::new(pattern))
    }

    pub fn native(f: impl Fn(&[Value]) -> Result<Value> + 'static) -> Self {
        Value::Native(Rc::new(f))
    }

    pub fn method(f: impl Fn(&mut CallScope<'_>, &[Value]) -> Result<Value> + 'static) -> Self {
        Value::Method(Rc::new(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for both method and native values.
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Native(_) | Value::Method(_))
    }

    pub fn is_method(&self) -> bool {
        matches!(self, Value::Method(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Members> {
        match self {
            Value::Map(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Regex> {
        match self {
            Value::Pattern(p) => Some(p),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Timestamp(_) => "timestamp",
            Value::Pattern(_) => "pattern",
            Value::Native(_) => "native",
            Value::Method(_) => "method",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Members> for Value {
    fn from(members: Members) -> Self {
        Value::Map(members)
    }
}

fn thin_eq<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    Rc::as_ptr(a) as *const u8 == Rc::as_ptr(b) as *const u8
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => a.as_str() == b.as_str(),
            (Value::Native(a), Value::Native(b)) => thin_eq(a, b),
            (Value::Method(a), Value::Method(b)) => thin_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(members) => f.debug_tuple("Map").field(members).finish(),
            Value::Timestamp(at) => f.debug_tuple("Timestamp").field(at).finish(),
            Value::Pattern(p) => f.debug_tuple("Pattern").field(&p.as_str()).finish(),
            Value::Native(_) => f.write_str("Native(..)"),
            Value::Method(_) => f.write_str("Method(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(members) => {
                f.write_str("{")?;
                for (i, (key, value)) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Value::Timestamp(at) => write!(f, "{:?}", at),
            Value::Pattern(p) => write!(f, "/{}/", p.as_str()),
            Value::Native(_) => f.write_str("<native>"),
            Value::Method(_) => f.write_str("<method>"),
        }
    }
}
