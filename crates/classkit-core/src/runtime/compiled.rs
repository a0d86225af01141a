//! The compiled, constructible class artifact.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashSet;
use tracing::trace;

use super::instance::Instance;
use super::{invoke_public, CONSTRUCT_HOOK};
use crate::compose::MemberBuckets;
use crate::definition::Definition;
use crate::errors::Result;
use crate::value::{Members, Value};

/// State shared by a compiled class and every one of its instances.
///
/// The protected/private buckets and the depth counters are deliberately
/// class-level, not per-instance: nested and recursive calls within one
/// method family detect reentrancy through the shared counters, and
/// protected/private mutations persist in the shared buckets across calls.
/// This also makes the whole runtime single-threaded by construction.
pub(crate) struct ClassShared {
    pub(crate) name: Option<String>,
    /// Immutable public surface, constants included.
    pub(crate) public: Members,
    /// Inherited public and protected members, pre-override. Backs the
    /// parent-dispatch facade.
    pub(crate) parents: Members,
    /// Frozen constant values, captured at compile time.
    pub(crate) constants: Members,
    pub(crate) protected: RefCell<Members>,
    pub(crate) private: RefCell<Members>,
    pub(crate) parent_private: RefCell<Members>,
    /// Keys present in the class's own raw declaration. A method found here
    /// is overriding (or newly declared) and is not entitled to ancestor
    /// private state.
    pub(crate) own_keys: FxHashSet<String>,
    /// Own plus inherited raw declarations, kept for trait reuse.
    pub(crate) merged: Definition,
    /// Stack depth of the class's own method family.
    pub(crate) depth: Cell<usize>,
    /// Stack depth of parent-dispatch calls.
    pub(crate) parent_depth: Cell<usize>,
    /// Latched at outermost entry: whether the current call window is
    /// entitled to ancestor private state. Cleared when the outermost call
    /// unwinds.
    pub(crate) ancestor_state_open: Cell<bool>,
}

/// A finalized, constructible class.
#[derive(Clone)]
pub struct CompiledClass {
    pub(crate) shared: Rc<ClassShared>,
}

impl CompiledClass {
    pub(crate) fn from_parts(
        name: Option<String>,
        buckets: MemberBuckets,
        own_keys: FxHashSet<String>,
        merged: Definition,
    ) -> Self {
        Self {
            shared: Rc::new(ClassShared {
                name,
                public: buckets.public,
                parents: buckets.parents,
                constants: buckets.constants,
                protected: RefCell::new(buckets.protected),
                private: RefCell::new(buckets.private),
                parent_private: RefCell::new(buckets.parent_private),
                own_keys,
                merged,
                depth: Cell::new(0),
                parent_depth: Cell::new(0),
                ancestor_state_open: Cell::new(false),
            }),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.shared.name.as_deref()
    }

    /// Deep copy of the own plus inherited raw declarations.
    pub fn merged_definition(&self) -> Definition {
        self.shared.merged.snapshot()
    }

    /// Build one instance and run the construction hook if the class
    /// declares or inherits one.
    ///
    /// The instance starts from an independent deep copy of the public
    /// bucket's non-callable defaults; protected and private members never
    /// materialize on it, they are reachable only through the call scope of
    /// an executing method.
    pub fn instantiate(&self, args: &[Value]) -> Result<Instance> {
        let mut fields = Members::new();
        for (key, value) in &self.shared.public {
            if value.is_callable() || self.shared.constants.contains_key(key) {
                continue;
            }
            fields.insert(key.clone(), value.clone());
        }

        let instance = Instance::new(self.shared.clone(), fields);
        trace!(class = ?self.shared.name, "instantiated");

        if let Some(Value::Method(hook)) = self.shared.public.get(CONSTRUCT_HOOK) {
            invoke_public(&self.shared, &instance, CONSTRUCT_HOOK, hook, args)?;
        }
        Ok(instance)
    }
}
