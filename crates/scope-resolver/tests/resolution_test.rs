use std::rc::Rc;

use scope_resolver::{
    value, BoxError, Context, Factory, FactoryProbe, Global, Key, ResolveError, TypedKey,
};

#[derive(Debug, thiserror::Error)]
#[error("build exploded")]
struct BuildError;

fn string_factory(label: &str, out: &str) -> Factory {
    let out = out.to_owned();
    Factory::of(label, move |_ctx| Ok(out.clone()))
}

// --- Idempotence ---

#[test]
fn repeated_invokes_return_the_identical_value() {
    let ctx = Context::root();
    let key = Key::new("service");
    ctx.define(&key, string_factory("service", "built")).unwrap();

    let first = ctx.invoke(&key).unwrap();
    let second = ctx.invoke(&key).unwrap();
    assert!(value::same(&first, &second));
}

#[test]
fn repeated_invokes_re_raise_the_identical_cause() {
    let ctx = Context::root();
    let key = Key::new("service");
    ctx.define(
        &key,
        Factory::of("service", |_ctx| -> Result<(), BoxError> {
            Err(BuildError.into())
        }),
    )
    .unwrap();

    let first = cause_of(ctx.invoke(&key).unwrap_err());
    let second = cause_of(ctx.invoke(&key).unwrap_err());
    assert!(
        Rc::ptr_eq(&first, &second),
        "the cached failure must re-raise the same underlying error object"
    );
}

#[test]
fn failing_factories_are_never_retried() {
    let ctx = Context::root();
    let key = Key::new("service");
    let probe = FactoryProbe::new();
    ctx.define(
        &key,
        probe.factory("service", |_ctx| -> Result<(), BoxError> {
            Err(BuildError.into())
        }),
    )
    .unwrap();

    assert!(ctx.invoke(&key).is_err());
    assert!(ctx.invoke(&key).is_err());
    assert_eq!(probe.calls(), 1);
}

fn cause_of(err: ResolveError) -> Rc<BoxError> {
    match err {
        ResolveError::Factory { cause, .. } => cause,
        other => panic!("expected a factory error, got {other}"),
    }
}

// --- Write-after-read rejection ---

#[test]
fn configuring_a_read_key_is_rejected() {
    let ctx = Context::root();
    let key = Key::new("service");
    ctx.set(&key, value::pack(1u32)).unwrap();
    ctx.invoke(&key).unwrap();

    assert!(matches!(
        ctx.set(&key, value::pack(2u32)),
        Err(ResolveError::AlreadyRead { .. })
    ));
    assert!(matches!(
        ctx.define(&key, string_factory("service", "late")),
        Err(ResolveError::AlreadyRead { .. })
    ));
}

#[test]
fn configuring_a_failed_key_is_rejected_too() {
    let ctx = Context::root();
    let key = Key::new("service");
    ctx.define(
        &key,
        Factory::of("service", |_ctx| -> Result<(), BoxError> {
            Err(BuildError.into())
        }),
    )
    .unwrap();
    assert!(ctx.invoke(&key).is_err());

    assert!(matches!(
        ctx.set(&key, value::pack(1u32)),
        Err(ResolveError::AlreadyRead { .. })
    ));
}

#[test]
fn reconfiguring_before_the_first_read_is_fine() {
    let ctx = Context::root();
    let key = Key::new("service");
    ctx.set(&key, value::pack(1u32)).unwrap();
    ctx.set(&key, value::pack(2u32)).unwrap();
    let got = ctx.invoke(&key).unwrap();
    assert_eq!(*value::unpack::<u32>(&got).unwrap(), 2);
}

// --- Inheritance ---

#[test]
fn children_inherit_plain_values() {
    let parent = Context::root();
    let key = Key::new("answer");
    parent.set(&key, value::pack(42u32)).unwrap();

    let child = parent.fork();
    let got = child.invoke(&key).unwrap();
    assert_eq!(*value::unpack::<u32>(&got).unwrap(), 42);
}

#[test]
fn inherited_values_keep_their_identity() {
    let parent = Context::root();
    let key = Key::new("answer");
    parent.set(&key, value::pack(String::from("shared"))).unwrap();

    let child = parent.fork();
    let in_child = child.invoke(&key).unwrap();
    let in_parent = parent.invoke(&key).unwrap();
    assert!(value::same(&in_child, &in_parent));
}

#[test]
fn isolation_starts_at_the_first_read() {
    let parent = Context::root();
    let key = Key::new("answer");

    // Configured after the fork but before the child's first read: visible.
    let child = parent.fork();
    parent.set(&key, value::pack(1u32)).unwrap();
    let got = child.invoke(&key).unwrap();
    assert_eq!(*value::unpack::<u32>(&got).unwrap(), 1);

    // Reconfigured after the child's read: the child is pinned, the parent
    // (which never read the key) moves on.
    parent.set(&key, value::pack(2u32)).unwrap();
    let still = child.invoke(&key).unwrap();
    assert_eq!(*value::unpack::<u32>(&still).unwrap(), 1);
    let parents = parent.invoke(&key).unwrap();
    assert_eq!(*value::unpack::<u32>(&parents).unwrap(), 2);
}

#[test]
fn child_overrides_do_not_leak_upward() {
    let parent = Context::root();
    let key = Key::new("flavor");
    parent.set(&key, value::pack(String::from("vanilla"))).unwrap();

    let child = parent.fork();
    child
        .set(&key, value::pack(String::from("chocolate")))
        .unwrap();

    let in_child = child.invoke(&key).unwrap();
    assert_eq!(*value::unpack::<String>(&in_child).unwrap(), "chocolate");
    let in_parent = parent.invoke(&key).unwrap();
    assert_eq!(*value::unpack::<String>(&in_parent).unwrap(), "vanilla");
}

#[test]
fn fork_invoke_resolves_in_the_child() {
    let parent = Context::root();
    let key = Key::new("answer");
    parent.set(&key, value::pack(7u32)).unwrap();
    let got = parent.fork_invoke(&key).unwrap();
    assert_eq!(*value::unpack::<u32>(&got).unwrap(), 7);
    // The parent itself never read the key, so it is still configurable.
    parent.set(&key, value::pack(8u32)).unwrap();
}

// --- Cycles ---

#[test]
fn self_referential_factories_fail_with_a_cycle() {
    let ctx = Context::root();
    let key = Key::new("ouroboros");
    ctx.define(
        &key,
        Factory::new("ouroboros", {
            let key = key.clone();
            move |ctx, _k| Ok(ctx.invoke(&key)?)
        }),
    )
    .unwrap();

    let err = ctx.invoke(&key).unwrap_err();
    assert!(matches!(err, ResolveError::Cycle { .. }), "got {err}");
    assert!(err.is_cached_failure());

    // The cycle failure is cached, not recomputed.
    let again = ctx.invoke(&key).unwrap_err();
    assert!(matches!(again, ResolveError::Cycle { .. }));
}

#[test]
fn transitive_cycles_are_caught_in_the_same_context() {
    let ctx = Context::root();
    let ping = Key::new("ping");
    let pong = Key::new("pong");
    ctx.define(
        &ping,
        Factory::new("ping", {
            let pong = pong.clone();
            move |ctx, _k| Ok(ctx.invoke(&pong)?)
        }),
    )
    .unwrap();
    ctx.define(
        &pong,
        Factory::new("pong", {
            let ping = ping.clone();
            move |ctx, _k| Ok(ctx.invoke(&ping)?)
        }),
    )
    .unwrap();

    let err = ctx.invoke(&ping).unwrap_err();
    assert!(matches!(err, ResolveError::Cycle { .. }), "got {err}");
}

// --- Global handle ---

#[test]
fn global_handle_requires_an_active_context() {
    assert!(matches!(
        Global::current(),
        Err(ResolveError::NoActiveContext)
    ));
    assert!(matches!(
        Global::invoke(&Key::new("anything")),
        Err(ResolveError::NoActiveContext)
    ));
}

#[test]
fn global_handle_sees_the_resolving_context() {
    let ctx = Context::root();
    let answer = Key::new("answer");
    let via_global = Key::new("via-global");
    ctx.set(&answer, value::pack(11u32)).unwrap();
    ctx.define(
        &via_global,
        Factory::of("via-global", {
            let answer = answer.clone();
            move |_ctx| {
                // Deep call-tree code can reach the current scope without a
                // Context parameter.
                let found = Global::invoke(&answer)?;
                Ok(*value::unpack::<u32>(&found).unwrap())
            }
        }),
    )
    .unwrap();

    let got = ctx.invoke(&via_global).unwrap();
    assert_eq!(*value::unpack::<u32>(&got).unwrap(), 11);
}

// --- Default policy ---

#[test]
fn unconfigured_plain_keys_fail() {
    let ctx = Context::root();
    let err = ctx.invoke(&Key::new("nowhere")).unwrap_err();
    assert!(matches!(err, ResolveError::NoConfiguration { .. }));
}

#[test]
fn recipe_keys_build_themselves() {
    let ctx = Context::root();
    let key = TypedKey::<String>::recipe("greeting", |_ctx| Ok(String::from("hi")));
    assert_eq!(*ctx.get(&key).unwrap(), "hi");
}

#[test]
fn explicit_configuration_beats_the_recipe() {
    let ctx = Context::root();
    let key = TypedKey::<String>::recipe("greeting", |_ctx| Ok(String::from("hi")));
    ctx.set_typed(&key, String::from("custom")).unwrap();
    assert_eq!(*ctx.get(&key).unwrap(), "custom");
}

#[test]
fn recipes_participate_in_dependency_tracking() {
    // A recipe that reads another key records it, so a child overriding that
    // key gets a fresh instance.
    let suffix = Key::new("suffix");
    let key = TypedKey::<String>::recipe("greeting", {
        let suffix = suffix.clone();
        move |ctx| {
            let s = ctx.invoke(&suffix)?;
            Ok(format!("hi-{}", value::unpack::<String>(&s).unwrap()))
        }
    });

    let parent = Context::root();
    parent
        .set(&suffix, value::pack(String::from("prod")))
        .unwrap();
    assert_eq!(*parent.get(&key).unwrap(), "hi-prod");

    let child = parent.fork();
    child
        .set(&suffix, value::pack(String::from("test")))
        .unwrap();
    assert_eq!(*child.get(&key).unwrap(), "hi-test");
}

#[derive(Debug, Default, PartialEq)]
struct Cache {
    entries: Vec<String>,
}

#[test]
fn constructible_keys_produce_default_instances() {
    let ctx = Context::root();
    let key = TypedKey::<Cache>::constructible("cache");
    let cache = ctx.get(&key).unwrap();
    assert_eq!(*cache, Cache::default());
}

// --- Typed veneer ---

#[test]
fn typed_get_rejects_the_wrong_type() {
    let ctx = Context::root();
    let key = TypedKey::<String>::new("number");
    // Bypass the typed setter to store a u32 under a String-typed key.
    ctx.set(key.raw(), value::pack(3u32)).unwrap();
    assert!(matches!(
        ctx.get(&key),
        Err(ResolveError::TypeMismatch { .. })
    ));
}

#[test]
fn define_typed_and_chaining() {
    let ctx = Context::root();
    let a = TypedKey::<u32>::new("a");
    let b = TypedKey::<u32>::new("b");
    ctx.set_typed(&a, 1).unwrap().set_typed(&b, 2).unwrap();
    assert_eq!(*ctx.get(&a).unwrap(), 1);
    assert_eq!(*ctx.get(&b).unwrap(), 2);

    let doubled = TypedKey::<u32>::new("doubled");
    ctx.define_typed(&doubled, {
        let a = a.clone();
        move |ctx| Ok(*ctx.get(&a)? * 2)
    })
    .unwrap();
    assert_eq!(*ctx.get(&doubled).unwrap(), 2);
}

// --- Key bundles ---

scope_resolver::service_keys! {
    /// Keys for the bundle test.
    pub struct BundleKeys {
        greeting: String,
        cache: Cache,
    }
}

#[test]
fn service_keys_bundle_generates_fresh_identities() {
    let first = BundleKeys::new();
    let second = BundleKeys::new();
    assert_ne!(first.greeting.raw(), second.greeting.raw());
    assert_eq!(first.greeting.raw().name(), "greeting");
}

#[test]
fn service_keys_recipe_builder() {
    let keys = BundleKeys::new().with_greeting_recipe(|_ctx| Ok(String::from("bundled")));
    let ctx = Context::root();
    assert_eq!(*ctx.get(&keys.greeting).unwrap(), "bundled");
    // The cache key stays plain: unconfigured lookups fail.
    assert!(matches!(
        ctx.get(&keys.cache),
        Err(ResolveError::NoConfiguration { .. })
    ));
}
