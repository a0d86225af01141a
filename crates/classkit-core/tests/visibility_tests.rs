use classkit_core::{classify, members, ClassBuilder, Definition, Error, Member, Value, Visibility};
use regex::Regex;

/// A root class exercising every visibility bucket: a constant, plain and
/// nested public defaults, protected and private state, and methods of all
/// three visibilities.
fn root_class() -> ClassBuilder {
    ClassBuilder::new()
        .declare(members! {
            "SOME_CONSTANT" => "foo",
            "sampleProperty" => 4.5f64,
            "sampleDeepProperty" => Value::map(members! {
                "sample1" => "Hello",
                "sample2" => Value::list(vec![
                    Value::int(4),
                    Value::int(5),
                    Value::int(6),
                    Value::int(7),
                ]),
                "sample3" => Value::map(members! {
                    "flag" => true,
                    "pattern" => Value::pattern(Regex::new("^abc").unwrap()),
                    "stamp" => Value::now(),
                }),
            }),
            "_sampleProperty" => 5.5f64,
            "_sampleDeepProperty" => Value::map(members! {
                "sample1" => "_Hello",
                "sample2" => Value::list(vec![Value::int(8), Value::int(9)]),
            }),
            "__sampleProperty" => 6.5f64,
            "__sampleDeepProperty" => Value::map(members! {
                "sample1" => "__Hello",
            }),
            "___construct" => Value::method(|ctx, _args| {
                ctx.set("constructCalled", Value::bool(true));
                Ok(Value::null())
            }),
            "sampleMethod" => Value::method(|ctx, _args| {
                Ok(ctx.get("SOME_CONSTANT").expect("constant visible inside method"))
            }),
            "_sampleMethod" => Value::method(|_ctx, _args| Ok(Value::str("_bar"))),
            "__sampleMethod" => Value::method(|_ctx, _args| Ok(Value::str("__zoo"))),
            "sampleAccessMethod" => Value::method(|ctx, _args| {
                let public = ctx.call("sampleMethod", &[])?;
                let protected = ctx.call("_sampleMethod", &[])?;
                let private = ctx.call("__sampleMethod", &[])?;
                Ok(Value::str(format!("{}{}{}", public, protected, private)))
            }),
        })
        .expect("root class declares cleanly")
}

#[test]
fn construct_hook_runs_on_instantiation() {
    let root = root_class().instantiate(&[]).unwrap();
    assert_eq!(root.get("constructCalled"), Some(Value::bool(true)));
}

#[test]
fn public_defaults_are_aligned() {
    let root = root_class().instantiate(&[]).unwrap();

    assert_eq!(root.get("sampleProperty"), Some(Value::float(4.5)));

    let deep = root.get("sampleDeepProperty").expect("deep property defined");
    let deep = deep.as_map().expect("deep property is a map");
    assert_eq!(deep.get("sample1"), Some(&Value::str("Hello")));
    assert_eq!(
        deep.get("sample2").unwrap().as_list().unwrap()[1],
        Value::int(5)
    );

    let sample3 = deep.get("sample3").unwrap().as_map().unwrap();
    assert_eq!(sample3.get("flag"), Some(&Value::bool(true)));
    assert!(sample3.get("pattern").unwrap().as_pattern().is_some());
    assert!(matches!(sample3.get("stamp"), Some(Value::Timestamp(_))));
}

#[test]
fn public_methods_are_always_defined() {
    let root = root_class().instantiate(&[]).unwrap();
    assert!(root.get("sampleMethod").map(|v| v.is_method()).unwrap_or(false));
    assert!(root.get("sampleAccessMethod").is_some());
}

#[test]
fn protected_members_are_invisible_outside_calls() {
    let root = root_class().instantiate(&[]).unwrap();
    assert_eq!(root.get("_sampleProperty"), None);
    assert_eq!(root.get("_sampleDeepProperty"), None);
    assert_eq!(root.get("_sampleMethod"), None);
    assert!(root.has("sampleMethod"));
    assert!(!root.has("_sampleMethod"));
    assert!(matches!(
        root.call("_sampleMethod", &[]),
        Err(Error::UndefinedMember(_))
    ));
}

#[test]
fn private_members_are_invisible_outside_calls() {
    let root = root_class().instantiate(&[]).unwrap();
    assert_eq!(root.get("__sampleProperty"), None);
    assert_eq!(root.get("__sampleDeepProperty"), None);
    assert_eq!(root.get("__sampleMethod"), None);
}

#[test]
fn methods_observe_all_three_visibilities() {
    let root = root_class().instantiate(&[]).unwrap();
    let result = root.call("sampleAccessMethod", &[]).unwrap();
    assert_eq!(result, Value::str("foo_bar__zoo"));
}

#[test]
fn constants_survive_external_reassignment() {
    let root = root_class().instantiate(&[]).unwrap();

    root.set("SOME_CONSTANT", Value::str("bar"));
    // The surface shows the shadow until the next call entry purges it.
    assert_eq!(root.get("SOME_CONSTANT"), Some(Value::str("bar")));

    assert_eq!(root.call("sampleMethod", &[]).unwrap(), Value::str("foo"));
    assert_eq!(root.get("SOME_CONSTANT"), Some(Value::str("foo")));
}

#[test]
fn composite_defaults_are_independent_per_instance() {
    let class = root_class().compile();
    let a = class.instantiate(&[]).unwrap();
    let b = class.instantiate(&[]).unwrap();

    let mut deep = a
        .get("sampleDeepProperty")
        .unwrap()
        .as_map()
        .unwrap()
        .clone();
    deep.insert("sample1".to_string(), Value::str("hi"));
    a.set("sampleDeepProperty", Value::map(deep));

    let a_deep = a.get("sampleDeepProperty").unwrap();
    let b_deep = b.get("sampleDeepProperty").unwrap();
    assert_eq!(a_deep.as_map().unwrap().get("sample1"), Some(&Value::str("hi")));
    assert_eq!(
        b_deep.as_map().unwrap().get("sample1"),
        Some(&Value::str("Hello"))
    );
}

#[test]
fn externally_attached_callables_get_no_scope() {
    let root = root_class().instantiate(&[]).unwrap();

    // An attached method value is not part of the class and must never run
    // entitled to its hidden state.
    root.set(
        "pry",
        Value::method(|ctx, _args| Ok(ctx.get("__sampleProperty").unwrap_or(Value::null()))),
    );
    assert!(matches!(root.call("pry", &[]), Err(Error::NotCallable(_))));
    assert_eq!(root.get("__sampleProperty"), None);

    // Attached natives are plain functions over their arguments.
    root.set(
        "double",
        Value::native(|args| {
            Ok(Value::int(args.first().and_then(Value::as_int).unwrap_or(0) * 2))
        }),
    );
    assert_eq!(root.call("double", &[Value::int(21)]).unwrap(), Value::int(42));
}

#[test]
fn explicitly_tagged_members_keep_their_bucket_on_writes() {
    let mut secrets = Definition::new();
    secrets.insert("apiKey", Member::new(Value::str("old"), Visibility::Private));

    let vault = ClassBuilder::new()
        .declare(secrets)
        .unwrap()
        .declare(members! {
            "rotate" => Value::method(|ctx, _args| {
                ctx.set("apiKey", Value::str("new"));
                Ok(ctx.get("apiKey").expect("private member visible in scope"))
            }),
        })
        .unwrap()
        .instantiate(&[])
        .unwrap();

    // The write lands in the bucket the member was declared into, so the
    // method observes it and the surface never does.
    assert_eq!(vault.call("rotate", &[]).unwrap(), Value::str("new"));
    assert_eq!(vault.get("apiKey"), None);
}

#[test]
fn visibility_tags_render_as_lowercase_names() {
    assert_eq!(classify("sampleMethod").as_str(), "public");
    assert_eq!(classify("_sampleMethod").as_str(), "protected");
    assert_eq!(classify("__sampleMethod").as_str(), "private");
    assert_eq!(classify("SOME_CONSTANT").as_str(), "constant");
}

#[test]
fn undefined_members_report_as_such() {
    let root = root_class().instantiate(&[]).unwrap();
    assert_eq!(root.get("nonexistent"), None);
    assert!(matches!(
        root.call("nonexistent", &[]),
        Err(Error::UndefinedMember(_))
    ));
    assert!(matches!(
        root.call("sampleProperty", &[]),
        Err(Error::NotCallable(_))
    ));
}
