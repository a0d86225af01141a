//! Property-based tests for the classifier and the merge rules.

use classkit_core::{classify, members, ClassBuilder, Value, Visibility};
use proptest::prelude::*;

proptest! {
    #[test]
    fn all_caps_keys_are_constants(key in "[A-Z0-9_]{1,24}") {
        prop_assert_eq!(classify(&key), Visibility::Constant);
    }

    #[test]
    fn double_underscore_keys_are_private(body in "[a-z][a-z0-9_]{0,12}") {
        let key = format!("__{}", body);
        prop_assert_eq!(classify(&key), Visibility::Private);
    }

    #[test]
    fn single_underscore_keys_are_protected(body in "[a-z][a-z0-9_]{0,12}") {
        let key = format!("_{}", body);
        prop_assert_eq!(classify(&key), Visibility::Protected);
    }

    #[test]
    fn bare_keys_are_public(key in "[a-z][a-zA-Z0-9_]{0,12}") {
        prop_assert_eq!(classify(&key), Visibility::Public);
    }

    #[test]
    fn later_declarations_overwrite_earlier_ones(first in any::<i64>(), second in any::<i64>()) {
        let instance = ClassBuilder::new()
            .declare(members! { "slot" => first })
            .unwrap()
            .declare(members! { "slot" => second })
            .unwrap()
            .instantiate(&[])
            .unwrap();
        prop_assert_eq!(instance.get("slot"), Some(Value::int(second)));
    }

    #[test]
    fn own_members_override_inherited_ones(parent_value in any::<i64>(), own_value in any::<i64>()) {
        let parent = ClassBuilder::new()
            .declare(members! { "slot" => parent_value })
            .unwrap();
        let child = parent
            .extend_as_child(members! { "slot" => own_value })
            .unwrap()
            .instantiate(&[])
            .unwrap();
        prop_assert_eq!(child.get("slot"), Some(Value::int(own_value)));
    }

    #[test]
    fn the_last_parent_wins_collisions(first in any::<i64>(), second in any::<i64>()) {
        let a = ClassBuilder::new().declare(members! { "slot" => first }).unwrap();
        let b = ClassBuilder::new().declare(members! { "slot" => second }).unwrap();
        let merged = ClassBuilder::new()
            .add_parent(a.merged_definition())
            .unwrap()
            .add_parent(b.merged_definition())
            .unwrap()
            .instantiate(&[])
            .unwrap();
        prop_assert_eq!(merged.get("slot"), Some(Value::int(second)));
    }
}
