//! Static property metadata: what a class exposes, with every declared type
//! resolved against the queried owning type.
//!
//! This layer never touches live values, so type queries keep working when
//! the object graph has `null`s at every level.

use std::collections::{HashSet, VecDeque};

use beanpath_types::{
    is_assignable, resolve_field_type, resolve_param_types, resolve_return_type, ClassId, Type,
    TypeEnv,
};

use crate::error::{MetaError, MetaResult};
use crate::property::{accessor_property, property_matches, AccessorKind, PropertyTokenizer};

/// One navigable property with its resolved accessor types. A read-only
/// property has no `setter`; a write-only one has no `getter`.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub getter: Option<Type>,
    pub setter: Option<Type>,
}

/// Static path navigation over declared metadata.
pub struct MetaClass<'e> {
    env: &'e dyn TypeEnv,
    ty: Type,
    properties: Vec<Property>,
}

impl<'e> MetaClass<'e> {
    pub fn for_type(env: &'e dyn TypeEnv, ty: Type) -> MetaResult<MetaClass<'e>> {
        let properties = collect_properties(env, &ty)?;
        Ok(MetaClass {
            env,
            ty,
            properties,
        })
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    fn property_or_err(&self, name: &str) -> MetaResult<&Property> {
        self.property(name).ok_or_else(|| MetaError::NoSuchProperty {
            name: name.to_string(),
            class: self.ty.display(self.env).to_string(),
        })
    }

    pub fn getter_names(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter(|p| p.getter.is_some())
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn setter_names(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter(|p| p.setter.is_some())
            .map(|p| p.name.clone())
            .collect()
    }

    /// Resolve a possibly camel-cased, case-insensitive path to its
    /// canonical dotted spelling, one segment at a time.
    pub fn find_property(&self, name: &str, use_camel_case: bool) -> Option<String> {
        let prop = PropertyTokenizer::new(name);
        let matched = self
            .properties
            .iter()
            .find(|p| property_matches(&p.name, prop.name(), use_camel_case))?;
        match prop.children() {
            None => Some(matched.name.clone()),
            Some(children) => {
                let child_ty = matched.getter.clone().or_else(|| matched.setter.clone())?;
                let child = MetaClass::for_type(self.env, child_ty).ok()?;
                let rest = child.find_property(children, use_camel_case)?;
                Some(format!("{}.{}", matched.name, rest))
            }
        }
    }

    pub fn has_getter(&self, path: &str) -> bool {
        self.has_accessor(path, AccessorKind::Getter)
    }

    pub fn has_setter(&self, path: &str) -> bool {
        self.has_accessor(path, AccessorKind::Setter)
    }

    fn has_accessor(&self, path: &str, kind: AccessorKind) -> bool {
        let prop = PropertyTokenizer::new(path);
        let Some(p) = self.property(prop.name()) else {
            return false;
        };
        let declared = match kind {
            AccessorKind::Getter => &p.getter,
            AccessorKind::Setter => &p.setter,
        };
        let Some(mut ty) = declared.clone() else {
            return false;
        };
        if prop.index().is_some() {
            ty = element_type(self.env, &ty);
        }
        match prop.children() {
            None => true,
            Some(children) => MetaClass::for_type(self.env, ty)
                .map(|m| m.has_accessor(children, kind))
                .unwrap_or(false),
        }
    }

    /// The resolved type produced by reading `path`. For an indexed segment
    /// whose declared type is a parameterized collection, this is the
    /// collection's resolved element type, not the collection itself.
    pub fn getter_type(&self, path: &str) -> MetaResult<Type> {
        self.accessor_type(path, AccessorKind::Getter)
    }

    /// The resolved type accepted when writing `path`.
    pub fn setter_type(&self, path: &str) -> MetaResult<Type> {
        self.accessor_type(path, AccessorKind::Setter)
    }

    fn accessor_type(&self, path: &str, kind: AccessorKind) -> MetaResult<Type> {
        let prop = PropertyTokenizer::new(path);
        let p = self.property_or_err(prop.name())?;
        let declared = match kind {
            AccessorKind::Getter => &p.getter,
            AccessorKind::Setter => &p.setter,
        };
        let mut ty = declared.clone().ok_or_else(|| MetaError::NoSuchProperty {
            name: prop.name().to_string(),
            class: self.ty.display(self.env).to_string(),
        })?;
        if prop.index().is_some() {
            ty = element_type(self.env, &ty);
        }
        match prop.children() {
            None => Ok(ty),
            Some(children) => MetaClass::for_type(self.env, ty)?.accessor_type(children, kind),
        }
    }
}

/// The type obtained by indexing into `ty`: list element, map value, array
/// component. Non-collections index to themselves (the failure surfaces at
/// access time, on the live shape).
pub(crate) fn element_type(env: &dyn TypeEnv, ty: &Type) -> Type {
    let wk = env.well_known();
    let object = || Type::class(wk.object, vec![]);
    let unwrap_arg = |arg: Option<&Type>| match arg {
        Some(Type::Wildcard(w)) => w.upper_bounds.first().cloned().unwrap_or_else(object),
        Some(other) => other.clone(),
        None => object(),
    };
    match ty {
        Type::Array(component) => (**component).clone(),
        Type::Class(ct) if is_assignable(env, wk.map, ct.def) => unwrap_arg(ct.args.get(1)),
        Type::Class(ct) if is_assignable(env, wk.collection, ct.def) => unwrap_arg(ct.args.get(0)),
        _ => ty.clone(),
    }
}

/// Merge fields and accessor-shaped methods into properties, walking the
/// whole supertype graph. The most derived declaration wins; accessor
/// methods win over a same-named field at the same level.
fn collect_properties(env: &dyn TypeEnv, ty: &Type) -> MetaResult<Vec<Property>> {
    let Some(root) = ty.raw_class() else {
        return Ok(Vec::new());
    };

    let mut properties: Vec<Property> = Vec::new();
    let mut queue: VecDeque<ClassId> = VecDeque::new();
    let mut seen: HashSet<ClassId> = HashSet::new();
    queue.push_back(root);

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        let Some(def) = env.class(current) else {
            continue;
        };

        for method in &def.methods {
            if method.is_static {
                continue;
            }
            let Some((kind, name)) = accessor_property(&method.name) else {
                continue;
            };
            match kind {
                AccessorKind::Getter if method.params.is_empty() => {
                    let resolved = resolve_return_type(env, current, &method.name, ty)?;
                    upsert(&mut properties, &name, Some(resolved), None);
                }
                AccessorKind::Setter if method.params.len() == 1 => {
                    let resolved = resolve_param_types(env, current, &method.name, ty)?;
                    let Some(param) = resolved.into_iter().next() else {
                        continue;
                    };
                    upsert(&mut properties, &name, None, Some(param));
                }
                _ => {}
            }
        }

        for field in &def.fields {
            let resolved = resolve_field_type(env, current, &field.name, ty)?;
            upsert(
                &mut properties,
                &field.name,
                Some(resolved.clone()),
                Some(resolved),
            );
        }

        if let Some(id) = def.super_class.as_ref().and_then(Type::raw_class) {
            queue.push_back(id);
        }
        for iface in &def.interfaces {
            if let Some(id) = iface.raw_class() {
                queue.push_back(id);
            }
        }
    }

    Ok(properties)
}

fn upsert(properties: &mut Vec<Property>, name: &str, getter: Option<Type>, setter: Option<Type>) {
    if let Some(existing) = properties.iter_mut().find(|p| p.name == name) {
        if existing.getter.is_none() {
            existing.getter = getter;
        }
        if existing.setter.is_none() {
            existing.setter = setter;
        }
        return;
    }
    properties.push(Property {
        name: name.to_string(),
        getter,
        setter,
    });
}

#[cfg(test)]
mod tests {
    use beanpath_types::{ClassDef, ClassKind, FieldDef, MethodDef, PrimitiveType, TypeStore};

    use super::*;

    fn plain_class(name: &str, super_class: Type) -> ClassDef {
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

    #[test]
    fn accessor_methods_win_over_a_same_named_field() {
        let mut store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let object = Type::class(wk.object, vec![]);
        let string = Type::class(wk.string, vec![]);

        let widget = store.add_class(ClassDef {
            fields: vec![FieldDef {
                name: "label".to_string(),
                ty: Type::Primitive(PrimitiveType::Int),
            }],
            methods: vec![
                MethodDef {
                    name: "getLabel".to_string(),
                    params: vec![],
                    return_type: string.clone(),
                    is_static: false,
                },
                MethodDef {
                    name: "setLabel".to_string(),
                    params: vec![string.clone()],
                    return_type: Type::Primitive(PrimitiveType::Void),
                    is_static: false,
                },
            ],
            ..plain_class("demo.Widget", object)
        });

        let meta = MetaClass::for_type(&store, Type::class(widget, vec![])).unwrap();
        let label = meta.property("label").unwrap();
        assert_eq!(label.getter, Some(string.clone()));
        assert_eq!(label.setter, Some(string));
    }

    #[test]
    fn the_most_derived_declaration_wins() {
        let mut store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let object = Type::class(wk.object, vec![]);
        let string = Type::class(wk.string, vec![]);

        let base = store.add_class(ClassDef {
            fields: vec![FieldDef {
                name: "id".to_string(),
                ty: object.clone(),
            }],
            ..plain_class("demo.Base", object.clone())
        });
        let sub = store.add_class(ClassDef {
            fields: vec![FieldDef {
                name: "id".to_string(),
                ty: string.clone(),
            }],
            ..plain_class("demo.Sub", Type::class(base, vec![]))
        });

        let meta = MetaClass::for_type(&store, Type::class(sub, vec![])).unwrap();
        assert_eq!(meta.property("id").unwrap().getter, Some(string));
    }
}
