//! The class descriptor table: declared generic signatures captured once as
//! structured data and consumed read-only through [`TypeEnv`].

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::{ClassId, Type, TypeVarId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
}

/// One type parameter declaration (`T extends Number`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    /// Declared upper bounds, in declaration order. Empty means the implicit
    /// `Object` bound.
    pub upper_bounds: Vec<Type>,
}

/// A field with its declared (possibly generic) type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDef {
    pub params: Vec<Type>,
}

/// The declared shape of one class or interface.
///
/// `super_class`/`interfaces` hold `Type::Class` values so that a
/// parameterized supertype (`class Sub extends Super<String, T>`) keeps its
/// actual type arguments, which is what the resolver threads downward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub kind: ClassKind,
    pub is_abstract: bool,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
    /// Declared constructors. Empty means the implicit Java default
    /// constructor.
    pub constructors: Vec<ConstructorDef>,
}

impl ClassDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Whether instances can be constructed with no arguments.
    pub fn has_default_constructor(&self) -> bool {
        self.constructors.is_empty() || self.constructors.iter().any(|c| c.params.is_empty())
    }
}

/// Ids of the classes every store seeds up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub integer: ClassId,
    pub collection: ClassId,
    pub list: ClassId,
    pub array_list: ClassId,
    pub map: ClassId,
    pub hash_map: ClassId,
}

/// Read-only facade over class and type-parameter metadata.
///
/// Every algorithm in this crate (and in the layers above) takes
/// `&dyn TypeEnv` rather than a concrete store, so tests and embedders can
/// supply their own descriptor source.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;
}

/// The default [`TypeEnv`] implementation: an append-only descriptor table.
#[derive(Debug, Clone)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    type_params: Vec<TypeParamDef>,
    by_name: HashMap<String, ClassId>,
    well_known: WellKnownTypes,
}

impl TypeStore {
    /// Create a store seeded with a minimal `java.lang`/`java.util` slice:
    /// enough of the collection and boxed-number hierarchies for property
    /// metadata and tests to lean on.
    pub fn with_minimal_jdk() -> TypeStore {
        let mut store = TypeStore {
            classes: Vec::new(),
            type_params: Vec::new(),
            by_name: HashMap::new(),
            // Placeholder ids, overwritten below once the classes exist.
            well_known: WellKnownTypes {
                object: ClassId(0),
                string: ClassId(0),
                number: ClassId(0),
                integer: ClassId(0),
                collection: ClassId(0),
                list: ClassId(0),
                array_list: ClassId(0),
                map: ClassId(0),
                hash_map: ClassId(0),
            },
        };

        let object = store.add_class(ClassDef {
            name: "java.lang.Object".to_string(),
            kind: ClassKind::Class,
            is_abstract: false,
            type_params: vec![],
            super_class: None,
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
            constructors: vec![],
        });
        let object_ty = Type::class(object, vec![]);

        let string = store.add_plain_class("java.lang.String", object_ty.clone());
        let number = store.add_class(ClassDef {
            name: "java.lang.Number".to_string(),
            kind: ClassKind::Class,
            is_abstract: true,
            type_params: vec![],
            super_class: Some(object_ty.clone()),
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
            constructors: vec![],
        });
        let integer =
            store.add_plain_class("java.lang.Integer", Type::class(number, vec![]));

        let collection_e = store.add_type_param("E", vec![object_ty.clone()]);
        let collection = store.add_class(ClassDef {
            name: "java.util.Collection".to_string(),
            kind: ClassKind::Interface,
            is_abstract: true,
            type_params: vec![collection_e],
            super_class: None,
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
            constructors: vec![],
        });

        let list_e = store.add_type_param("E", vec![object_ty.clone()]);
        let list = store.add_class(ClassDef {
            name: "java.util.List".to_string(),
            kind: ClassKind::Interface,
            is_abstract: true,
            type_params: vec![list_e],
            super_class: None,
            interfaces: vec![Type::class(collection, vec![Type::Var(list_e)])],
            fields: vec![],
            methods: vec![],
            constructors: vec![],
        });

        let abstract_list_e = store.add_type_param("E", vec![object_ty.clone()]);
        let abstract_list = store.add_class(ClassDef {
            name: "java.util.AbstractList".to_string(),
            kind: ClassKind::Class,
            is_abstract: true,
            type_params: vec![abstract_list_e],
            super_class: Some(object_ty.clone()),
            interfaces: vec![Type::class(list, vec![Type::Var(abstract_list_e)])],
            fields: vec![],
            methods: vec![],
            constructors: vec![],
        });

        let array_list_e = store.add_type_param("E", vec![object_ty.clone()]);
        let array_list = store.add_class(ClassDef {
            name: "java.util.ArrayList".to_string(),
            kind: ClassKind::Class,
            is_abstract: false,
            type_params: vec![array_list_e],
            super_class: Some(Type::class(abstract_list, vec![Type::Var(array_list_e)])),
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
            constructors: vec![],
        });

        let map_k = store.add_type_param("K", vec![object_ty.clone()]);
        let map_v = store.add_type_param("V", vec![object_ty.clone()]);
        let map = store.add_class(ClassDef {
            name: "java.util.Map".to_string(),
            kind: ClassKind::Interface,
            is_abstract: true,
            type_params: vec![map_k, map_v],
            super_class: None,
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
            constructors: vec![],
        });

        let hash_map_k = store.add_type_param("K", vec![object_ty.clone()]);
        let hash_map_v = store.add_type_param("V", vec![object_ty.clone()]);
        let hash_map = store.add_class(ClassDef {
            name: "java.util.HashMap".to_string(),
            kind: ClassKind::Class,
            is_abstract: false,
            type_params: vec![hash_map_k, hash_map_v],
            super_class: Some(object_ty),
            interfaces: vec![Type::class(
                map,
                vec![Type::Var(hash_map_k), Type::Var(hash_map_v)],
            )],
            fields: vec![],
            methods: vec![],
            constructors: vec![],
        });

        store.well_known = WellKnownTypes {
            object,
            string,
            number,
            integer,
            collection,
            list,
            array_list,
            map,
            hash_map,
        };
        store
    }

    fn add_plain_class(&mut self, name: &str, super_class: Type) -> ClassId {
        self.add_class(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Class,
            is_abstract: false,
            type_params: vec![],
            super_class: Some(super_class),
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
            constructors: vec![],
        })
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.by_name.insert(def.name.clone(), id);
        self.classes.push(def);
        id
    }

    pub fn add_type_param(&mut self, name: &str, upper_bounds: Vec<Type>) -> TypeVarId {
        let id = TypeVarId(self.type_params.len() as u32);
        self.type_params.push(TypeParamDef {
            name: name.to_string(),
            upper_bounds,
        });
        id
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Mutable access for fixture setup. Descriptor data is immutable once
    /// navigation starts; this exists so tests can wire hierarchies up in
    /// stages.
    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.0 as usize)
    }

    /// Mutable access to a type parameter, for fixtures whose bounds refer
    /// back to the parameter itself (`T extends Comparable<T>`).
    pub fn type_param_mut(&mut self, id: TypeVarId) -> Option<&mut TypeParamDef> {
        self.type_params.get_mut(id.0 as usize)
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.0 as usize)
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.0 as usize)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

/// Raw-class assignability: whether a value of class `from` can be viewed as
/// `target`, ignoring type arguments.
///
/// Walks the superclass chain and all transitively implemented interfaces.
/// Every type is assignable to `Object` (interfaces included, JLS 4.10.2).
pub fn is_assignable(env: &dyn TypeEnv, target: ClassId, from: ClassId) -> bool {
    if target == from || target == env.well_known().object {
        return true;
    }

    let mut queue = VecDeque::new();
    let mut seen = HashSet::new();
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        if current == target {
            return true;
        }
        let Some(def) = env.class(current) else {
            continue;
        };
        if let Some(id) = def.super_class.as_ref().and_then(Type::raw_class) {
            queue.push_back(id);
        }
        for iface in &def.interfaces {
            if let Some(id) = iface.raw_class() {
                queue.push_back(id);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_jdk_assignability() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();

        assert!(is_assignable(&store, wk.list, wk.array_list));
        assert!(is_assignable(&store, wk.collection, wk.array_list));
        assert!(is_assignable(&store, wk.object, wk.map));
        assert!(is_assignable(&store, wk.number, wk.integer));
        assert!(!is_assignable(&store, wk.array_list, wk.list));
        assert!(!is_assignable(&store, wk.map, wk.array_list));
    }

    #[test]
    fn lookup_by_name() {
        let store = TypeStore::with_minimal_jdk();
        assert_eq!(
            store.class_id("java.util.ArrayList"),
            Some(store.well_known().array_list)
        );
        assert_eq!(store.class_id("java.util.TreeMap"), None);
    }
}
