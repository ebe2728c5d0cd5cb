use beanpath_types::{
    resolve_field_type, resolve_param_types, resolve_return_type, ClassDef, ClassKind, FieldDef,
    MethodDef, PrimitiveType, Type, TypeEnv, TypeResolveError, TypeStore, WildcardType,
};

use pretty_assertions::assert_eq;

fn class_def(name: &str, super_class: Option<Type>) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Class,
        is_abstract: false,
        type_params: vec![],
        super_class,
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

#[test]
fn direct_type_param_resolves_to_actual_argument() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let string = store.well_known().string;

    let t = store.add_type_param("T", vec![Type::class(object, vec![])]);
    let boxed = store.add_class(ClassDef {
        type_params: vec![t],
        fields: vec![field("item", Type::Var(t))],
        ..class_def("com.example.Box", Some(Type::class(object, vec![])))
    });

    let src = Type::class(boxed, vec![Type::class(string, vec![])]);
    let resolved = resolve_field_type(&store, boxed, "item", &src).unwrap();
    assert_eq!(resolved, Type::class(string, vec![]));
}

#[test]
fn translation_composes_across_three_levels() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let string = store.well_known().string;
    let object_ty = Type::class(object, vec![]);

    // Base<T> { T value; }  Mid<T> extends Base<T>  Sub extends Mid<String>
    let base_t = store.add_type_param("T", vec![object_ty.clone()]);
    let base = store.add_class(ClassDef {
        type_params: vec![base_t],
        fields: vec![field("value", Type::Var(base_t))],
        ..class_def("com.example.Base", Some(object_ty.clone()))
    });
    let mid_t = store.add_type_param("T", vec![object_ty.clone()]);
    let mid = store.add_class(ClassDef {
        type_params: vec![mid_t],
        ..class_def(
            "com.example.Mid",
            Some(Type::class(base, vec![Type::Var(mid_t)])),
        )
    });
    let sub = store.add_class(class_def(
        "com.example.Sub",
        Some(Type::class(mid, vec![Type::class(string, vec![])])),
    ));

    let string_ty = Type::class(string, vec![]);

    // The binding survives at every level of the chain.
    let via_sub = resolve_field_type(&store, base, "value", &Type::class(sub, vec![])).unwrap();
    assert_eq!(via_sub, string_ty);

    let via_mid =
        resolve_field_type(&store, base, "value", &Type::class(mid, vec![string_ty.clone()]))
            .unwrap();
    assert_eq!(via_mid, string_ty);

    let via_base =
        resolve_field_type(&store, base, "value", &Type::class(base, vec![string_ty.clone()]))
            .unwrap();
    assert_eq!(via_base, string_ty);
}

#[test]
fn renamed_variables_translate_hop_by_hop() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let integer = store.well_known().integer;
    let list = store.well_known().list;
    let object_ty = Type::class(object, vec![]);

    // A<X> { List<X> xs; }  B<Y> extends A<Y>  C extends B<Integer>
    let x = store.add_type_param("X", vec![object_ty.clone()]);
    let a = store.add_class(ClassDef {
        type_params: vec![x],
        fields: vec![field("xs", Type::class(list, vec![Type::Var(x)]))],
        ..class_def("com.example.A", Some(object_ty.clone()))
    });
    let y = store.add_type_param("Y", vec![object_ty.clone()]);
    let b = store.add_class(ClassDef {
        type_params: vec![y],
        ..class_def("com.example.B", Some(Type::class(a, vec![Type::Var(y)])))
    });
    let c = store.add_class(class_def(
        "com.example.C",
        Some(Type::class(b, vec![Type::class(integer, vec![])])),
    ));

    let resolved = resolve_field_type(&store, a, "xs", &Type::class(c, vec![])).unwrap();
    assert_eq!(
        resolved,
        Type::class(list, vec![Type::class(integer, vec![])])
    );
}

#[test]
fn partially_bound_supertype_mixes_fixed_and_threaded_arguments() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let string = store.well_known().string;
    let integer = store.well_known().integer;
    let object_ty = Type::class(object, vec![]);

    // Pair<A, B> { A first; B second; }  Sub<T> extends Pair<String, T>
    let pa = store.add_type_param("A", vec![object_ty.clone()]);
    let pb = store.add_type_param("B", vec![object_ty.clone()]);
    let pair = store.add_class(ClassDef {
        type_params: vec![pa, pb],
        fields: vec![field("first", Type::Var(pa)), field("second", Type::Var(pb))],
        ..class_def("com.example.Pair", Some(object_ty.clone()))
    });
    let t = store.add_type_param("T", vec![object_ty.clone()]);
    let sub = store.add_class(ClassDef {
        type_params: vec![t],
        ..class_def(
            "com.example.PairSub",
            Some(Type::class(
                pair,
                vec![Type::class(string, vec![]), Type::Var(t)],
            )),
        )
    });

    let src = Type::class(sub, vec![Type::class(integer, vec![])]);
    assert_eq!(
        resolve_field_type(&store, pair, "first", &src).unwrap(),
        Type::class(string, vec![])
    );
    assert_eq!(
        resolve_field_type(&store, pair, "second", &src).unwrap(),
        Type::class(integer, vec![])
    );
}

#[test]
fn unresolved_variable_degrades_to_first_bound_or_object() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let number = store.well_known().number;
    let object_ty = Type::class(object, vec![]);

    let n = store.add_type_param("N", vec![Type::class(number, vec![])]);
    let u = store.add_type_param("U", vec![]);
    let holder = store.add_class(ClassDef {
        type_params: vec![n, u],
        fields: vec![field("bounded", Type::Var(n)), field("unbounded", Type::Var(u))],
        ..class_def("com.example.Bounds", Some(object_ty))
    });

    // Raw owning type: no arguments to substitute, so bounds decide.
    let src = Type::class(holder, vec![]);
    assert_eq!(
        resolve_field_type(&store, holder, "bounded", &src).unwrap(),
        Type::class(number, vec![])
    );
    assert_eq!(
        resolve_field_type(&store, holder, "unbounded", &src).unwrap(),
        Type::class(store.well_known().object, vec![])
    );
}

#[test]
fn declared_bound_does_not_shadow_an_explicit_argument() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let number = store.well_known().number;
    let integer = store.well_known().integer;

    // NumBox<N extends Number> { N value; } resolved through NumBox<Integer>:
    // the actual argument wins; the bound only covers the raw case.
    let n = store.add_type_param("N", vec![Type::class(number, vec![])]);
    let holder = store.add_class(ClassDef {
        type_params: vec![n],
        fields: vec![field("value", Type::Var(n))],
        ..class_def("com.example.NumBox", Some(Type::class(object, vec![])))
    });

    let src = Type::class(holder, vec![Type::class(integer, vec![])]);
    assert_eq!(
        resolve_field_type(&store, holder, "value", &src).unwrap(),
        Type::class(integer, vec![])
    );
}

#[test]
fn interface_bindings_resolve_in_declaration_order() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let string = store.well_known().string;
    let object_ty = Type::class(object, vec![]);

    // Keyed<K> { K key(); }  Impl implements Marker, Keyed<String>
    let k = store.add_type_param("K", vec![object_ty.clone()]);
    let keyed = store.add_class(ClassDef {
        kind: ClassKind::Interface,
        is_abstract: true,
        type_params: vec![k],
        methods: vec![MethodDef {
            name: "key".to_string(),
            params: vec![],
            return_type: Type::Var(k),
            is_static: false,
        }],
        ..class_def("com.example.Keyed", None)
    });
    let marker = store.add_class(ClassDef {
        kind: ClassKind::Interface,
        is_abstract: true,
        ..class_def("com.example.Marker", None)
    });
    let impl_class = store.add_class(ClassDef {
        interfaces: vec![
            Type::class(marker, vec![]),
            Type::class(keyed, vec![Type::class(string, vec![])]),
        ],
        ..class_def("com.example.Impl", Some(object_ty))
    });

    let resolved =
        resolve_return_type(&store, keyed, "key", &Type::class(impl_class, vec![])).unwrap();
    assert_eq!(resolved, Type::class(string, vec![]));
}

#[test]
fn method_param_types_resolve_through_the_hierarchy() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let string = store.well_known().string;
    let list = store.well_known().list;
    let object_ty = Type::class(object, vec![]);

    let t = store.add_type_param("T", vec![object_ty.clone()]);
    let sink = store.add_class(ClassDef {
        type_params: vec![t],
        methods: vec![MethodDef {
            name: "accept".to_string(),
            params: vec![Type::Var(t), Type::class(list, vec![Type::Var(t)])],
            return_type: Type::Primitive(PrimitiveType::Void),
            is_static: false,
        }],
        ..class_def("com.example.Sink", Some(object_ty.clone()))
    });
    let string_sink = store.add_class(class_def(
        "com.example.StringSink",
        Some(Type::class(sink, vec![Type::class(string, vec![])])),
    ));

    let params =
        resolve_param_types(&store, sink, "accept", &Type::class(string_sink, vec![])).unwrap();
    let string_ty = Type::class(string, vec![]);
    assert_eq!(
        params,
        vec![string_ty.clone(), Type::class(list, vec![string_ty])]
    );
}

#[test]
fn wildcard_bounds_are_substituted() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let number = store.well_known().number;
    let list = store.well_known().list;
    let object_ty = Type::class(object, vec![]);

    // WBox<T> { List<? extends T> items; }
    let t = store.add_type_param("T", vec![object_ty.clone()]);
    let wbox = store.add_class(ClassDef {
        type_params: vec![t],
        fields: vec![field(
            "items",
            Type::class(
                list,
                vec![Type::Wildcard(WildcardType {
                    lower_bounds: vec![],
                    upper_bounds: vec![Type::Var(t)],
                })],
            ),
        )],
        ..class_def("com.example.WBox", Some(object_ty))
    });

    let src = Type::class(wbox, vec![Type::class(number, vec![])]);
    let resolved = resolve_field_type(&store, wbox, "items", &src).unwrap();
    assert_eq!(
        resolved,
        Type::class(
            list,
            vec![Type::Wildcard(WildcardType {
                lower_bounds: vec![],
                upper_bounds: vec![Type::class(number, vec![])],
            })]
        )
    );
}

#[test]
fn generic_array_component_is_resolved() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let string = store.well_known().string;
    let object_ty = Type::class(object, vec![]);

    let t = store.add_type_param("T", vec![object_ty.clone()]);
    let abox = store.add_class(ClassDef {
        type_params: vec![t],
        fields: vec![field("values", Type::array(Type::Var(t)))],
        ..class_def("com.example.ArrayBox", Some(object_ty))
    });

    let src = Type::class(abox, vec![Type::class(string, vec![])]);
    let resolved = resolve_field_type(&store, abox, "values", &src).unwrap();
    assert_eq!(resolved, Type::array(Type::class(string, vec![])));
}

#[test]
fn concrete_declarations_pass_through() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let string = store.well_known().string;

    let plain = store.add_class(ClassDef {
        fields: vec![
            field("name", Type::class(string, vec![])),
            field("age", Type::Primitive(PrimitiveType::Int)),
        ],
        ..class_def("com.example.Plain", Some(Type::class(object, vec![])))
    });

    let src = Type::class(plain, vec![]);
    assert_eq!(
        resolve_field_type(&store, plain, "name", &src).unwrap(),
        Type::class(string, vec![])
    );
    assert_eq!(
        resolve_field_type(&store, plain, "age", &src).unwrap(),
        Type::Primitive(PrimitiveType::Int)
    );
}

#[test]
fn non_class_owning_type_is_rejected() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let object_ty = Type::class(object, vec![]);

    let t = store.add_type_param("T", vec![object_ty.clone()]);
    let boxed = store.add_class(ClassDef {
        type_params: vec![t],
        fields: vec![field("item", Type::Var(t))],
        ..class_def("com.example.Box2", Some(object_ty))
    });

    let err = resolve_field_type(
        &store,
        boxed,
        "item",
        &Type::Primitive(PrimitiveType::Int),
    )
    .unwrap_err();
    assert!(matches!(err, TypeResolveError::InvalidOwner(_)));
}

#[test]
fn unknown_members_are_reported() {
    let store = TypeStore::with_minimal_jdk();
    let string = store.well_known().string;
    let src = Type::class(string, vec![]);

    let err = resolve_field_type(&store, string, "missing", &src).unwrap_err();
    assert_eq!(
        err,
        TypeResolveError::UnknownField {
            class: "java.lang.String".to_string(),
            field: "missing".to_string(),
        }
    );
}
