//! Raw class declarations.
//!
//! A [`Definition`] accumulates member declarations for one class across any
//! number of partial [`declare`](Definition::declare) calls. Later calls
//! overwrite earlier ones per key. Each key is classified once on the way in
//! and the resulting [`Visibility`] tag travels with the member from then on.

use indexmap::IndexMap;

use crate::errors::{Error, Result};
use crate::value::{Members, Value};
use crate::visibility::{classify, Visibility};

/// A declared member: its value plus its visibility tag.
#[derive(Debug, Clone)]
pub struct Member {
    pub value: Value,
    pub visibility: Visibility,
}

impl Member {
    /// A member with an explicit visibility tag.
    pub fn new(value: Value, visibility: Visibility) -> Self {
        Self { value, visibility }
    }

    /// A member whose visibility is derived from the key shape.
    pub fn classified(key: &str, value: Value) -> Self {
        Self {
            visibility: classify(key),
            value,
        }
    }
}

/// A source of member declarations: a ready member map, a map value, a
/// factory that produces one, or a definition carrying explicit visibility
/// tags.
pub enum DeclarationSource {
    Members(Members),
    Value(Value),
    Factory(Box<dyn FnOnce() -> Value>),
    Definition(Definition),
}

impl DeclarationSource {
    pub fn factory(f: impl FnOnce() -> Value + 'static) -> Self {
        DeclarationSource::Factory(Box::new(f))
    }
}

impl From<Members> for DeclarationSource {
    fn from(members: Members) -> Self {
        DeclarationSource::Members(members)
    }
}

impl From<Value> for DeclarationSource {
    fn from(value: Value) -> Self {
        DeclarationSource::Value(value)
    }
}

impl From<Definition> for DeclarationSource {
    fn from(definition: Definition) -> Self {
        DeclarationSource::Definition(definition)
    }
}

/// The ordered member store for one class-in-progress.
#[derive(Debug, Clone, Default)]
pub struct Definition {
    members: IndexMap<String, Member>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a definition from a plain member map, classifying every key.
    pub fn from_members(members: Members) -> Self {
        let mut definition = Self::new();
        definition.merge_members(members);
        definition
    }

    /// Merge a declaration source into the store. Later declarations
    /// overwrite earlier ones for identical keys.
    pub fn declare(&mut self, source: DeclarationSource) -> Result<()> {
        let value = match source {
            DeclarationSource::Members(members) => {
                self.merge_members(members);
                return Ok(());
            }
            DeclarationSource::Definition(definition) => {
                self.merge(&definition);
                return Ok(());
            }
            DeclarationSource::Value(value) => value,
            DeclarationSource::Factory(f) => f(),
        };
        match value {
            Value::Map(members) => {
                self.merge_members(members);
                Ok(())
            }
            other => Err(Error::InvalidDeclaration(format!(
                "expected a member map, got {}",
                other.type_name()
            ))),
        }
    }

    /// Insert a member under an explicit visibility tag, bypassing the
    /// key-shape classifier.
    pub fn insert(&mut self, key: impl Into<String>, member: Member) {
        self.members.insert(key.into(), member);
    }

    /// Fold another definition into this one, overwriting same-key entries.
    /// Structural values copy deeply; opaque values copy by reference.
    pub fn merge(&mut self, other: &Definition) {
        for (key, member) in other.iter() {
            self.members.insert(key.clone(), member.clone());
        }
    }

    /// Independent deep copy of the store, with the opaque-type exception
    /// list applied. New instances start from a snapshot so mutable nested
    /// defaults are never shared.
    pub fn snapshot(&self) -> Definition {
        self.clone()
    }

    pub fn get(&self, key: &str) -> Option<&Member> {
        self.members.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.members.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Member)> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn merge_members(&mut self, members: Members) {
        for (key, value) in members {
            let member = Member::classified(&key, value);
            self.members.insert(key, member);
        }
    }
}
