//! The class builder: the public entry point tying declaration, trait
//! registration, composition, and instantiation together.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::compose::compose;
use crate::definition::{DeclarationSource, Definition};
use crate::errors::{Error, Result};
use crate::registry;
use crate::runtime::{CompiledClass, Instance};
use crate::value::{Members, Value};

/// A parent/trait source accepted by [`ClassBuilder::add_parent`].
pub enum TraitSource {
    /// A name previously stored with [`ClassBuilder::register_as`].
    Name(String),
    Members(Members),
    Definition(Definition),
    Class(CompiledClass),
    Value(Value),
}

impl From<&str> for TraitSource {
    fn from(name: &str) -> Self {
        TraitSource::Name(name.to_string())
    }
}

impl From<String> for TraitSource {
    fn from(name: String) -> Self {
        TraitSource::Name(name)
    }
}

impl From<Members> for TraitSource {
    fn from(members: Members) -> Self {
        TraitSource::Members(members)
    }
}

impl From<Definition> for TraitSource {
    fn from(definition: Definition) -> Self {
        TraitSource::Definition(definition)
    }
}

impl From<CompiledClass> for TraitSource {
    fn from(class: CompiledClass) -> Self {
        TraitSource::Class(class)
    }
}

impl From<&CompiledClass> for TraitSource {
    fn from(class: &CompiledClass) -> Self {
        TraitSource::Class(class.clone())
    }
}

impl From<Value> for TraitSource {
    fn from(value: Value) -> Self {
        TraitSource::Value(value)
    }
}

/// Builds one class from partial declarations and an ordered parent list.
#[derive(Debug, Default)]
pub struct ClassBuilder {
    definition: Definition,
    parent_list: Vec<Definition>,
    name: Option<String>,
}

impl ClassBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate members. Sources merge key-by-key; later declarations
    /// overwrite earlier ones.
    pub fn declare(mut self, source: impl Into<DeclarationSource>) -> Result<Self> {
        self.definition.declare(source.into())?;
        Ok(self)
    }

    /// Append a parent/trait to the linearization order. Later parents
    /// override earlier ones; the class's own members override all of them.
    pub fn add_parent(mut self, source: impl Into<TraitSource>) -> Result<Self> {
        let parent = match source.into() {
            TraitSource::Name(name) => registry::resolve(&name)
                .ok_or_else(|| Error::InvalidTrait(format!("unknown trait `{}`", name)))?,
            TraitSource::Members(members) => Definition::from_members(members),
            TraitSource::Definition(definition) => definition,
            TraitSource::Class(class) => class.merged_definition(),
            TraitSource::Value(value) => match value {
                Value::Map(members) => Definition::from_members(members),
                other => {
                    return Err(Error::InvalidTrait(format!(
                        "expected a member map, got {}",
                        other.type_name()
                    )))
                }
            },
        };
        self.parent_list.push(parent);
        Ok(self)
    }

    /// Start a new class declared from `source` with this class's full
    /// merged definition as its parent.
    pub fn extend_as_child(&self, source: impl Into<DeclarationSource>) -> Result<ClassBuilder> {
        ClassBuilder::new()
            .declare(source)?
            .add_parent(self.merged_definition())
    }

    /// The accumulated parent list, in linearization order.
    pub fn parents(&self) -> &[Definition] {
        &self.parent_list
    }

    /// Deep copy of the own plus inherited raw declarations, parents first,
    /// own last.
    pub fn merged_definition(&self) -> Definition {
        let mut merged = Definition::new();
        for parent in &self.parent_list {
            merged.merge(parent);
        }
        merged.merge(&self.definition);
        merged
    }

    /// Store the merged definition under a name for later trait reuse.
    pub fn register_as(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        registry::register(name.clone(), self.merged_definition());
        self.name = Some(name);
        self
    }

    /// Run the composition engine and produce the constructible class.
    pub fn compile(&self) -> CompiledClass {
        let buckets = compose(&self.definition, &self.parent_list);
        let own_keys: FxHashSet<String> = self.definition.keys().cloned().collect();
        debug!(
            class = ?self.name,
            own = own_keys.len(),
            parents = self.parent_list.len(),
            "compiled class"
        );
        CompiledClass::from_parts(self.name.clone(), buckets, own_keys, self.merged_definition())
    }

    /// Compile, then build and construct one instance.
    pub fn instantiate(&self, args: &[Value]) -> Result<Instance> {
        self.compile().instantiate(args)
    }
}
