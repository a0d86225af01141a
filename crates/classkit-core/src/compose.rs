//! The composition engine: folds a class's own definition and its ordered
//! parent list into the effective member buckets.
//!
//! Linearization rule, spelled out: parents merge in registration order and
//! each later parent overwrites same-key entries from earlier ones; the
//! class's own members merge last and override all parents. This determines
//! every diamond-inheritance outcome.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::definition::Definition;
use crate::value::Members;
use crate::visibility::Visibility;

/// Effective member sets for one compiled class.
#[derive(Debug, Default)]
pub(crate) struct MemberBuckets {
    /// Public members, constants included, after override resolution.
    pub(crate) public: Members,
    /// Protected members, inherited and own.
    pub(crate) protected: Members,
    /// The class's own private members.
    pub(crate) private: Members,
    /// Inherited public and protected members, pre-override. Backs the
    /// parent-dispatch facade.
    pub(crate) parents: Members,
    /// Inherited private members, minus any key shadowed by an own private
    /// member.
    pub(crate) parent_private: Members,
    /// Frozen copy of the constant subset of `public`, captured at compile
    /// time.
    pub(crate) constants: Members,
}

/// Merge the own definition with the parent list.
pub(crate) fn compose(own: &Definition, parent_list: &[Definition]) -> MemberBuckets {
    let mut buckets = MemberBuckets::default();

    for parent in parent_list {
        for (key, member) in parent.iter() {
            match member.visibility {
                Visibility::Public | Visibility::Constant => {
                    buckets.public.insert(key.clone(), member.value.clone());
                    buckets.parents.insert(key.clone(), member.value.clone());
                    if member.visibility == Visibility::Constant {
                        buckets.constants.insert(key.clone(), member.value.clone());
                    }
                }
                Visibility::Protected => {
                    buckets.protected.insert(key.clone(), member.value.clone());
                    buckets.parents.insert(key.clone(), member.value.clone());
                }
                Visibility::Private => {
                    buckets
                        .parent_private
                        .insert(key.clone(), member.value.clone());
                }
            }
        }
    }

    let mut own_private: FxHashSet<&str> = FxHashSet::default();
    for (key, member) in own.iter() {
        match member.visibility {
            Visibility::Public | Visibility::Constant => {
                buckets.public.insert(key.clone(), member.value.clone());
                if member.visibility == Visibility::Constant {
                    buckets.constants.insert(key.clone(), member.value.clone());
                }
            }
            Visibility::Protected => {
                buckets.protected.insert(key.clone(), member.value.clone());
            }
            Visibility::Private => {
                buckets.private.insert(key.clone(), member.value.clone());
                own_private.insert(key.as_str());
            }
        }
    }

    // A child may shadow an inherited private name, never duplicate it.
    buckets
        .parent_private
        .retain(|key, _| !own_private.contains(key.as_str()));

    debug!(
        public = buckets.public.len(),
        protected = buckets.protected.len(),
        private = buckets.private.len(),
        inherited = buckets.parents.len(),
        constants = buckets.constants.len(),
        "composed member buckets"
    );

    buckets
}
