//! End-to-end hydration of shared and cyclic value graphs.

use bumpalo::Bump;
use expect_test::expect;
use pretty_assertions::assert_eq;
use runtype_core::{ErrorKind, Runtime, Type, TypeManager, Value};

fn tree_item<'a>(types: &'a TypeManager<'a>) -> Type<'a> {
    let tree = types.declare("TreeItem");
    let item = types
        .structure()
        .named("TreeItem")
        .field("id", types.number())
        .field("parent", types.maybe(tree.ty(), None))
        .field("children", types.list(tree.ty(), None))
        .build()
        .unwrap();
    tree.define(item).unwrap()
}

#[test]
fn test_point() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let rt = Runtime::new(&arena);
    let point = types
        .structure()
        .named("Point")
        .field("x", types.number())
        .field("y", types.number())
        .build()
        .unwrap()
        .ty();

    let p = point
        .call(&rt, rt.object([("x", Value::from(1)), ("y", Value::from(2))]))
        .unwrap();
    assert!(point.is(p));
    assert!(p.is_frozen());

    let err = point
        .call(&rt, rt.object([("x", rt.str("a")), ("y", Value::from(2))]))
        .unwrap_err();
    expect![[r#"Invalid value "a" supplied to Point/x: Number"#]].assert_eq(&err.to_string());
}

#[test]
fn test_tree_parent_points_back() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let rt = Runtime::new(&arena);
    let tree = tree_item(types);

    let child = rt.object([
        ("id", Value::from(2)),
        ("parent", Value::Nil),
        ("children", rt.array([])),
    ]);
    let root = rt.object([
        ("id", Value::from(1)),
        ("parent", Value::Nil),
        ("children", rt.array([child])),
    ]);
    child.as_object().unwrap().set("parent", root).unwrap();

    let result = tree.call(&rt, root).unwrap();
    assert!(tree.is(result));
    assert_ne!(result, root);
    let built_child = result.get("children").at(0);
    assert!(tree.is(built_child));
    assert_eq!(built_child.get("parent"), result);
    assert_eq!(built_child.get("id"), Value::from(2));
    assert!(result.is_frozen());
    assert!(built_child.is_frozen());
    assert_eq!(tree.call(&rt, result).unwrap(), result);
    expect![[r#"{"id":1,"parent":null,"children":[{"id":2,"parent":[Circular],"children":[]}]}"#]]
        .assert_eq(&result.to_string());
}

#[test]
fn test_mutually_recursive_structs() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let rt = Runtime::new(&arena);
    let a_decl = types.declare("A");
    let b_decl = types.declare("B");
    let a = types
        .structure()
        .named("A")
        .field("name", types.string())
        .field("child", types.maybe(b_decl.ty(), None))
        .build()
        .unwrap();
    let b = types
        .structure()
        .named("B")
        .field("parent", a_decl.ty())
        .build()
        .unwrap();
    let a = a_decl.define(a).unwrap();
    let b = b_decl.define(b).unwrap();

    let raw_b = rt.object([("parent", Value::Nil)]);
    let raw_a = rt.object([("name", rt.str("root")), ("child", raw_b)]);
    raw_b.as_object().unwrap().set("parent", raw_a).unwrap();

    let result = a.call(&rt, raw_a).unwrap();
    let child = result.get("child");
    assert!(b.is(child));
    assert_eq!(child.get("parent"), result);
    assert_eq!(a.call(&rt, result).unwrap(), result);
}

#[test]
fn test_shared_substructure_is_built_once() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let rt = Runtime::new(&arena);
    let point = types
        .structure()
        .named("Point")
        .field("x", types.number())
        .build()
        .unwrap()
        .ty();
    let segment = types
        .structure()
        .named("Segment")
        .field("a1", point)
        .field("a2", point)
        .build()
        .unwrap()
        .ty();

    let shared = rt.object([("x", Value::from(1))]);
    let result = segment
        .call(&rt, rt.object([("a1", shared), ("a2", shared)]))
        .unwrap();
    assert_eq!(result.get("a1"), result.get("a2"));
    assert_ne!(result.get("a1"), shared);

    let points = types.list(point, None);
    let list = points.call(&rt, rt.array([shared, shared])).unwrap();
    assert_eq!(list.at(0), list.at(1));

    // Separate calls build separate instances.
    let again = point.call(&rt, shared).unwrap();
    assert_ne!(again, result.get("a1"));
}

#[test]
fn test_cyclic_tuple() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let rt = Runtime::new(&arena);
    let pair = types.declare("Pair");
    let pair = pair
        .define(types.tuple(&[types.number(), types.maybe(pair.ty(), None)], None))
        .unwrap();

    let raw = rt.array([Value::from(1), Value::Nil]);
    raw.as_array().unwrap().set(1, raw).unwrap();

    let result = pair.call(&rt, raw).unwrap();
    assert_ne!(result, raw);
    assert_eq!(result.at(0), Value::from(1));
    assert_eq!(result.at(1), result);
    assert!(result.is_frozen());

    assert!(pair.is(result));
    assert!(pair.is(raw));
    assert_eq!(pair.call(&rt, result).unwrap(), result);
    assert_eq!(pair.call(&rt, pair.call(&rt, result).unwrap()).unwrap(), result);
}

#[test]
fn test_list_of_cyclic_tuples() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let rt = Runtime::new(&arena);
    let pair = types.declare("Pair");
    let pair = pair
        .define(types.tuple(&[types.number(), types.maybe(pair.ty(), None)], None))
        .unwrap();
    let pairs = types.list(pair, None);

    let raw = rt.array([Value::from(1), Value::Nil]);
    raw.as_array().unwrap().set(1, raw).unwrap();

    // A raw cyclic array already satisfies `is`, so the list keeps it.
    let input = rt.array([raw]);
    let list = pairs.call(&rt, input).unwrap();
    assert_eq!(list, input);
    assert_eq!(list.at(0), raw);
    assert!(pairs.is(list));

    let instance = pair.call(&rt, raw).unwrap();
    let input = rt.array([instance, instance]);
    let list = pairs.call(&rt, input).unwrap();
    assert_eq!(list, input);
    assert_eq!(pairs.call(&rt, list).unwrap(), list);
}

#[test]
fn test_is_terminates_on_cycles() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let rt = Runtime::new(&arena);
    let node = types.declare("Node");
    let iface = types
        .interface()
        .named("Node")
        .field("value", types.number())
        .field("next", types.maybe(node.ty(), None))
        .build()
        .unwrap();
    let node = node.define(iface).unwrap();
    let nodes = types.list(node, None);

    let a = rt.object([("value", Value::from(1)), ("next", Value::Nil)]);
    let b = rt.object([("value", Value::from(2)), ("next", a)]);
    a.as_object().unwrap().set("next", b).unwrap();
    assert!(node.is(a));
    assert!(nodes.is(rt.array([a, b])));

    // The mismatch sits inside the cycle.
    let bad = rt.object([("value", rt.str("x")), ("next", a)]);
    b.as_object().unwrap().set("next", bad).unwrap();
    assert!(!node.is(a));
    assert!(!nodes.is(rt.array([a])));

    let ring = rt.array([]);
    ring.as_array().unwrap().push(ring).unwrap();
    let rings = types.declare("Rings");
    let rings = rings.define(types.list(rings.ty(), None)).unwrap();
    assert!(rings.is(ring));
    let numbers = types.dict(types.string(), types.number(), None);
    let looped = rt.object([("self", Value::Nil)]);
    looped.as_object().unwrap().set("self", looped).unwrap();
    assert!(!numbers.is(looped));
}

#[test]
fn test_acyclic_types_reject_cycles() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let rt = Runtime::new(&arena);
    let node = types.declare("Node");
    let iface = types
        .interface()
        .named("Node")
        .field("next", types.maybe(node.ty(), None))
        .build()
        .unwrap();
    let node = node.define(iface).unwrap();

    let raw = rt.object([("next", Value::Nil)]);
    raw.as_object().unwrap().set("next", raw).unwrap();

    let err = node.call(&rt, raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadValue);
    expect![[r#"Invalid value {"next":[Circular]} supplied to Node/next: ?Node (expected an acyclic value)"#]]
        .assert_eq(&err.to_string());
}

#[test]
fn test_long_chain() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let rt = Runtime::new(&arena);
    let tree = tree_item(types);

    let mut node = rt.object([
        ("id", Value::from(0)),
        ("parent", Value::Nil),
        ("children", rt.array([])),
    ]);
    for id in 1..64 {
        node = rt.object([
            ("id", Value::from(id)),
            ("parent", Value::Nil),
            ("children", rt.array([node])),
        ]);
    }
    let result = tree.call(&rt, node).unwrap();
    let mut depth = 0;
    let mut cursor = result;
    while let Some(next) = cursor.get("children").as_array().and_then(|c| c.get(0)) {
        cursor = next;
        depth += 1;
    }
    assert_eq!(depth, 63);
    assert_eq!(cursor.get("id"), Value::from(0));
}

#[test]
fn test_idempotency_across_kinds() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let rt = Runtime::new(&arena);
    let n = types.number();
    let point = types
        .structure()
        .named("Point")
        .field("x", n)
        .field("y", n)
        .build()
        .unwrap()
        .ty();
    let raw_point = || rt.object([("x", Value::from(1)), ("y", Value::from(2))]);
    let positive = types.refinement(n, |v| v.as_number().is_some_and(|x| x > 0.0), None);
    let declared = types.declare("DeclaredPoint");
    declared.define(point).unwrap();
    let holder = types.interface().field("p", point).build().unwrap().ty();
    let either = types
        .union(&[point, n], None)
        .unwrap()
        .set_dispatch(move |v| Some(if v.as_object().is_some() { point } else { n }))
        .ty();
    let add = rt.function("add", 2, |_, args| Ok(args[0]));

    let cases: Vec<(Type, Value)> = vec![
        (n, Value::from(1)),
        (types.string(), rt.str("s")),
        (point, raw_point()),
        (types.tuple(&[point, n], None), rt.array([raw_point(), Value::from(3)])),
        (types.list(point, None), rt.array([raw_point(), raw_point()])),
        (types.dict(types.string(), point, None), rt.object([("k", raw_point())])),
        (types.maybe(point, None), Value::Nil),
        (types.maybe(point, None), raw_point()),
        (positive, Value::from(4)),
        (types.intersection(&[positive, types.integer()], None).unwrap(), Value::from(4)),
        (types.enums_of("a b", None), rt.str("a")),
        (either, raw_point()),
        (declared.ty(), raw_point()),
        (holder, rt.object([("p", raw_point()), ("extra", Value::from(1))])),
        (types.func(&[n, n], Some(n), None).ty(), add),
    ];
    for (ty, raw) in cases {
        let once = ty.call(&rt, raw).unwrap();
        let twice = ty.call(&rt, once).unwrap();
        assert_eq!(twice, once, "{}", ty.name());
        assert!(ty.is(once), "{}", ty.name());
    }
}

#[test]
fn test_union_requires_dispatch() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let rt = Runtime::new(&arena);
    let union = types
        .union(&[types.string(), types.number()], Some("Id"))
        .unwrap();

    let err = union.ty().call(&rt, Value::from(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnimplementedDispatch);

    let number = types.number();
    let union = union.set_dispatch(move |v| v.as_number().map(|_| number));
    assert_eq!(union.ty().call(&rt, Value::from(1)).unwrap(), Value::from(1));
    let err = union.ty().call(&rt, rt.str("a")).unwrap_err();
    expect![[r#"Invalid value "a" supplied to Id (no constructor returned by dispatch)"#]]
        .assert_eq(&err.to_string());
}
