//! Tests for the host value model.

use crate::{
    api::{Error, Runtime},
    values::{Value, stringify},
};
use bumpalo::Bump;
use pretty_assertions::assert_eq;

#[test]
fn test_scalars_compare_by_value() {
    let arena = Bump::new();
    let rt = Runtime::new(&arena);
    assert_eq!(rt.str("a"), rt.str("a"));
    assert_eq!(Value::from(1), Value::from(1.0));
    assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    assert_ne!(Value::from(0), Value::Bool(false));
    assert_eq!(Value::from(None::<bool>), Value::Nil);
}

#[test]
fn test_heap_values_compare_by_identity() {
    let arena = Bump::new();
    let rt = Runtime::new(&arena);
    let a = rt.array([Value::from(1)]);
    let b = rt.array([Value::from(1)]);
    assert_eq!(a, a);
    assert_ne!(a, b);
    assert!(a.id().is_some());
    assert_ne!(a.id(), b.id());
    assert!(Value::from(1).id().is_none());
}

#[test]
fn test_object_access() {
    let arena = Bump::new();
    let rt = Runtime::new(&arena);
    let obj = rt.object([("x", Value::from(1)), ("y", Value::from(2)), ("x", Value::from(3))]);
    assert_eq!(obj.get("x"), Value::from(3));
    assert_eq!(obj.get("missing"), Value::Nil);
    assert_eq!(obj.as_object().unwrap().keys(), vec!["x", "y"]);
    assert_eq!(Value::from(1).get("x"), Value::Nil);
}

#[test]
fn test_frozen_rejects_writes() {
    let arena = Bump::new();
    let rt = Runtime::new(&arena);
    let obj = rt.object([("x", Value::from(1))]);
    let o = obj.as_object().unwrap();
    o.set("x", Value::from(2)).unwrap();
    assert!(!obj.is_frozen());
    o.freeze();
    assert!(obj.is_frozen());
    assert_eq!(
        o.set("x", Value::from(3)),
        Err(Error::Frozen {
            key: "x".to_string()
        })
    );
    assert_eq!(obj.get("x"), Value::from(2));

    let arr = rt.array([]);
    let a = arr.as_array().unwrap();
    a.push(Value::from(1)).unwrap();
    assert!(a.set(5, Value::Nil).is_err());
    a.freeze();
    assert!(a.push(Value::from(2)).is_err());
    assert_eq!(a.len(), 1);
}

#[test]
fn test_stringify() {
    let arena = Bump::new();
    let rt = Runtime::new(&arena);
    let value = rt.object([
        ("n", Value::from(1.5)),
        ("i", Value::from(2)),
        ("s", rt.str("a\"b\n")),
        ("list", rt.array([Value::Nil, Value::Bool(true)])),
        ("inf", Value::Number(f64::INFINITY)),
        ("when", rt.date(0)),
        ("re", rt.regexp("a+")),
        ("err", rt.error("boom")),
    ]);
    assert_eq!(
        stringify(value),
        r#"{"n":1.5,"i":2,"s":"a\"b\n","list":[null,true],"inf":null,"when":Date(0),"re":/a+/,"err":[Error: boom]}"#
    );
}

#[test]
fn test_stringify_cycle() {
    let arena = Bump::new();
    let rt = Runtime::new(&arena);
    let node = rt.object([("id", Value::from(1))]);
    node.as_object().unwrap().set("self", node).unwrap();
    assert_eq!(stringify(node), r#"{"id":1,"self":[Circular]}"#);

    // Shared, non-cyclic references render in full.
    let leaf = rt.array([]);
    let pair = rt.array([leaf, leaf]);
    assert_eq!(stringify(pair), "[[],[]]");
}

#[test]
fn test_type_names() {
    let arena = Bump::new();
    let rt = Runtime::new(&arena);
    let f = rt.function("f", 0, |_, _| Ok(Value::Nil));
    assert_eq!(f.type_name(), "function");
    assert_eq!(Value::Nil.type_name(), "nil");
    assert_eq!(rt.object(Vec::<(&str, Value)>::new()).type_name(), "object");
    assert!(Value::from(1).is_frozen());
}
