//! Declared-type queries must not depend on which live values happen to be
//! present, and generic declarations must resolve against the concrete
//! owning class.

use std::collections::BTreeMap;

use beanpath_meta::{Bean, DefaultObjectFactory, MetaObject, Value};
use beanpath_types::{
    ClassDef, ClassId, ClassKind, FieldDef, PrimitiveType, Type, TypeEnv, TypeStore,
};
use pretty_assertions::assert_eq;

struct Fixture {
    store: TypeStore,
    account: ClassId,
    order: ClassId,
    order_repo: ClassId,
    string: Type,
}

fn class_def(name: &str, super_class: Type) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Class,
        is_abstract: false,
        type_params: vec![],
        super_class: Some(super_class),
        interfaces: vec![],
        fields: vec![],
        methods: vec![],
        constructors: vec![],
    }
}

fn field(name: &str, ty: Type) -> FieldDef {
    FieldDef {
        name: name.to_string(),
        ty,
    }
}

/// Same shape as the navigation fixture, plus `Repo<T>`/`OrderRepo` to
/// exercise substitution through a generic supertype.
fn fixture() -> Fixture {
    let mut store = TypeStore::with_minimal_jdk();
    let wk = *store.well_known();
    let object = Type::class(wk.object, vec![]);
    let string = Type::class(wk.string, vec![]);

    let customer = store.add_class(ClassDef {
        fields: vec![field("name", string.clone())],
        ..class_def("demo.Customer", object.clone())
    });

    let order = store.add_class(ClassDef {
        fields: vec![
            field("id", Type::Primitive(PrimitiveType::Int)),
            field("customer", Type::class(customer, vec![])),
            field("codes", Type::array(string.clone())),
        ],
        ..class_def("demo.Order", object.clone())
    });

    let account = store.add_class(ClassDef {
        fields: vec![
            field("order", Type::class(order, vec![])),
            field(
                "orders",
                Type::class(wk.list, vec![Type::class(order, vec![])]),
            ),
        ],
        ..class_def("demo.Account", object.clone())
    });

    let repo_t = store.add_type_param("T", vec![object.clone()]);
    let repo = store.add_class(ClassDef {
        type_params: vec![repo_t],
        fields: vec![
            field("first", Type::Var(repo_t)),
            field("items", Type::class(wk.list, vec![Type::Var(repo_t)])),
        ],
        ..class_def("demo.Repo", object.clone())
    });

    let order_repo = store.add_class(ClassDef {
        super_class: Some(Type::class(repo, vec![Type::class(order, vec![])])),
        ..class_def("demo.OrderRepo", object)
    });

    Fixture {
        store,
        account,
        order,
        order_repo,
        string,
    }
}

#[test]
fn getter_types_are_identical_with_and_without_live_values() {
    let f = fixture();
    let factory = DefaultObjectFactory;

    let mut empty = Value::Bean(Bean::new(f.account));
    let meta = MetaObject::for_value(&f.store, &factory, &mut empty);
    let from_empty = meta.get_getter_type("order.customer.name").unwrap();

    let mut populated = Value::Bean(Bean::new(f.account));
    let mut meta = MetaObject::for_value(&f.store, &factory, &mut populated);
    meta.set_value("order.customer.name", Value::from("Ada"))
        .unwrap();
    let from_populated = meta.get_getter_type("order.customer.name").unwrap();

    assert_eq!(from_empty, f.string);
    assert_eq!(from_empty, from_populated);
}

#[test]
fn setter_types_match_getter_types_for_field_backed_properties() {
    let f = fixture();
    let factory = DefaultObjectFactory;
    let mut root = Value::Bean(Bean::new(f.account));
    let meta = MetaObject::for_value(&f.store, &factory, &mut root);

    assert_eq!(
        meta.get_setter_type("order.customer.name").unwrap(),
        f.string
    );
    assert_eq!(
        meta.get_setter_type("order.id").unwrap(),
        Type::Primitive(PrimitiveType::Int)
    );
}

#[test]
fn indexed_segments_report_the_element_type() {
    let f = fixture();
    let factory = DefaultObjectFactory;
    let mut root = Value::Bean(Bean::new(f.account));
    let meta = MetaObject::for_value(&f.store, &factory, &mut root);

    let wk = *f.store.well_known();
    assert_eq!(
        meta.get_getter_type("orders").unwrap(),
        Type::class(wk.list, vec![Type::class(f.order, vec![])])
    );
    assert_eq!(
        meta.get_getter_type("orders[0]").unwrap(),
        Type::class(f.order, vec![])
    );
    assert_eq!(
        meta.get_getter_type("orders[0].customer.name").unwrap(),
        f.string
    );
    assert_eq!(meta.get_getter_type("order.codes[1]").unwrap(), f.string);
}

#[test]
fn generic_declarations_resolve_against_the_concrete_subclass() {
    let f = fixture();
    let factory = DefaultObjectFactory;
    let mut root = Value::Bean(Bean::new(f.order_repo));
    let meta = MetaObject::for_value(&f.store, &factory, &mut root);

    let order = Type::class(f.order, vec![]);
    assert_eq!(meta.get_getter_type("first").unwrap(), order);
    assert_eq!(meta.get_getter_type("items[0]").unwrap(), order);
    assert_eq!(
        meta.get_getter_type("items").unwrap(),
        Type::class(f.store.well_known().list, vec![order])
    );
    assert_eq!(
        meta.get_getter_type("items[0].customer.name").unwrap(),
        f.string
    );
}

#[test]
fn map_value_types_come_from_live_values() {
    let f = fixture();
    let factory = DefaultObjectFactory;
    let wk = *f.store.well_known();

    let mut entries = BTreeMap::new();
    entries.insert("port".to_string(), Value::Int(8080));
    let mut root = Value::Map(entries);
    let meta = MetaObject::for_value(&f.store, &factory, &mut root);

    assert_eq!(
        meta.get_getter_type("port").unwrap(),
        Type::Primitive(PrimitiveType::Int)
    );
    assert_eq!(
        meta.get_getter_type("missing").unwrap(),
        Type::class(wk.object, vec![])
    );
}

#[test]
fn bare_sequences_report_live_element_types() {
    let f = fixture();
    let factory = DefaultObjectFactory;
    let wk = *f.store.well_known();

    let mut root = Value::List(vec![Value::Bean(Bean::new(f.order))]);
    let meta = MetaObject::for_value(&f.store, &factory, &mut root);

    assert_eq!(
        meta.get_getter_type("[0]").unwrap(),
        Type::class(f.order, vec![])
    );
    assert_eq!(
        meta.get_getter_type("[9]").unwrap(),
        Type::class(wk.object, vec![])
    );
}

#[test]
fn accessor_presence_survives_null_gaps() {
    let f = fixture();
    let factory = DefaultObjectFactory;
    let mut root = Value::Bean(Bean::new(f.account));
    let meta = MetaObject::for_value(&f.store, &factory, &mut root);

    assert!(meta.has_getter("order.customer.name"));
    assert!(meta.has_setter("order.customer.name"));
    assert!(meta.has_getter("orders[0].customer"));
    assert!(meta.has_getter("order.codes[0]"));
    assert!(!meta.has_getter("order.customer.bogus"));
    assert!(!meta.has_setter("bogus"));
}

#[test]
fn maps_accept_any_accessor() {
    let f = fixture();
    let factory = DefaultObjectFactory;
    let mut root = Value::Map(BTreeMap::new());
    let meta = MetaObject::for_value(&f.store, &factory, &mut root);

    assert!(meta.has_getter("anything"));
    assert!(meta.has_setter("anything[else]"));
}
