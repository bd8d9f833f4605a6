use console_plug::{
    Mixin, MixinMethod, MixinOptions, PlugError, Pluggable, Receiver, args, plug_fn, pluggable,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tracing_test::traced_test;

// Each test binds its own host type so the process-wide registries never overlap.

struct Greeter;
pluggable!(Greeter, "Greeter");

#[test]
fn greet_at_type_level() {
    Greeter::plug(
        "greet",
        plug_fn(|_, a| Ok(json!(format!("hi {}", args::arg_as::<String>(a, 0)?)))),
    );

    assert!(Greeter::has_plug("greet"));
    assert_eq!(Greeter::call_static("greet", &[json!("Ann")]).unwrap(), json!("hi Ann"));
}

struct Counter {
    count: i64,
}
pluggable!(Counter, "Counter");

#[test]
fn instance_dispatch_reads_its_own_receiver() {
    Counter::plug(
        "doubled",
        plug_fn(|recv: Receiver<'_, Counter>, _| Ok(json!(recv.this()?.count * 2))),
    );

    let a = Counter { count: 2 };
    let b = Counter { count: 21 };
    assert_eq!(a.call("doubled", &[]).unwrap(), json!(4));
    assert_eq!(b.call("doubled", &[]).unwrap(), json!(42));

    let err = Counter::call_static("doubled", &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "plug on Counter needs an instance receiver but was called on the type"
    );
}

struct Text {
    body: String,
}
pluggable!(Text, "Text");

struct Casing;

impl Mixin<Text> for Casing {
    fn methods(&self) -> Vec<MixinMethod<'_, Text>> {
        vec![
            MixinMethod::plug("upper", || {
                plug_fn(|recv: Receiver<'_, Text>, _| Ok(json!(recv.this()?.body.to_uppercase())))
            }),
            MixinMethod::plug("lower", || {
                plug_fn(|recv: Receiver<'_, Text>, _| Ok(json!(recv.this()?.body.to_lowercase())))
            }),
        ]
    }
}

struct Padding {
    fill: char,
}

impl Mixin<Text> for Padding {
    fn methods(&self) -> Vec<MixinMethod<'_, Text>> {
        let fill = self.fill;
        vec![MixinMethod::plug("pad", move || {
            plug_fn(move |recv: Receiver<'_, Text>, a| {
                let width: usize = args::arg_as(a, 0)?;
                let body = &recv.this()?.body;
                let padding: String = std::iter::repeat_n(fill, width.saturating_sub(body.len()))
                    .collect();
                Ok(json!(format!("{body}{padding}")))
            })
        })]
    }
}

#[test]
fn sequential_mixins_without_overlap() {
    Text::mixin(&Casing, true).unwrap();
    Text::mixin(&Padding { fill: '.' }, false).unwrap();

    let t = Text {
        body: "Plug".into(),
    };
    assert_eq!(t.call("upper", &[]).unwrap(), json!("PLUG"));
    assert_eq!(t.call("lower", &[]).unwrap(), json!("plug"));
    assert_eq!(t.call("pad", &[json!(6)]).unwrap(), json!("Plug.."));

    // Re-importing without replace now collides with the first offered name.
    let err = Text::mixin(&Casing, false).unwrap_err();
    assert!(matches!(err, PlugError::Conflict { ref name } if name == "upper"));

    Text::clear_plugs();
    for name in ["upper", "lower", "pad"] {
        assert!(!Text::has_plug(name));
    }
    assert!(matches!(
        t.call("upper", &[]),
        Err(PlugError::UnknownOperation { .. })
    ));
}

struct Shape;
pluggable!(Shape, "Shape");

struct Geometry;

impl Mixin<Shape> for Geometry {
    fn mixin_name(&self) -> &str {
        "Geometry"
    }

    fn methods(&self) -> Vec<MixinMethod<'_, Shape>> {
        vec![
            MixinMethod::plug("area", || plug_fn(|_, _| Ok(json!(1.0)))),
            MixinMethod::returning("sides", "int"),
            MixinMethod::plug("perimeter", || plug_fn(|_, _| Ok(json!(4.0)))),
        ]
    }
}

#[test]
fn malformed_mixin_modes() {
    let err = Shape::mixin_with(
        &Geometry,
        MixinOptions {
            replace: true,
            atomic: true,
        },
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Geometry::sides must declare that it returns a plug");
    assert!(Shape::plugs().is_empty());

    let err = Shape::mixin(&Geometry, true).unwrap_err();
    assert!(matches!(err, PlugError::MalformedMixin { .. }));
    assert_eq!(Shape::plugs().names(), vec!["area".to_string()]);
}

struct Logged;
pluggable!(Logged, "Logged");

struct Noop;

impl Mixin<Logged> for Noop {
    fn methods(&self) -> Vec<MixinMethod<'_, Logged>> {
        vec![MixinMethod::plug("noop", || plug_fn(|_, _| Ok(Value::Null)))]
    }
}

#[test]
#[traced_test]
fn registry_changes_are_traced() {
    Logged::mixin(&Noop, true).unwrap();
    Logged::plug("noop", plug_fn(|_, _| Ok(json!("again"))));
    Logged::clear_plugs();

    assert!(logs_contain("imported mixin"));
    assert!(logs_contain("replaced plug"));
    assert!(logs_contain("cleared plugs"));
}
