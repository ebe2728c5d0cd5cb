//! Whole-path navigation over a live value graph.
//!
//! `MetaObject` drives dotted, bracket-indexed paths across beans, sequences
//! and maps: reads short-circuit to `Null` at the first missing value, deep
//! writes build missing intermediates through the configured
//! [`ObjectFactory`] unless auto-instantiation is disabled, and type
//! queries fall back to declared metadata wherever the live graph runs out.

use beanpath_types::{Type, TypeEnv};

use crate::error::{MetaError, MetaResult};
use crate::factory::ObjectFactory;
use crate::meta_class::{element_type, MetaClass};
use crate::property::{AccessorKind, PropertyTokenizer};
use crate::value::Value;
use crate::wrapper::{
    bean_class_name, bean_meta, index_mut, indexed_get, map_value_type, read_segment, ObjectWrapper,
};

pub struct MetaObject<'a> {
    env: &'a dyn TypeEnv,
    factory: &'a dyn ObjectFactory,
    auto_instantiate: bool,
    value: &'a mut Value,
}

impl<'a> MetaObject<'a> {
    pub fn for_value(
        env: &'a dyn TypeEnv,
        factory: &'a dyn ObjectFactory,
        value: &'a mut Value,
    ) -> MetaObject<'a> {
        MetaObject {
            env,
            factory,
            auto_instantiate: true,
            value,
        }
    }

    /// Disable or re-enable construction of missing intermediates during
    /// deep writes.
    pub fn with_auto_instantiate(mut self, enabled: bool) -> MetaObject<'a> {
        self.auto_instantiate = enabled;
        self
    }

    pub fn value(&self) -> &Value {
        &*self.value
    }

    /// Read the value at `path`. A missing or null value anywhere along the
    /// way yields `Null`; structural misuse (bad property name, index out
    /// of bounds, indexing a scalar) is an error.
    pub fn get_value(&self, path: &str) -> MetaResult<Value> {
        read_path(self.env, self.value, path)
    }

    /// Write `value` at `path`, building missing intermediates when
    /// auto-instantiation is on. Writing `Null` through a missing
    /// intermediate is a no-op rather than a reason to build one.
    pub fn set_value(&mut self, path: &str, value: Value) -> MetaResult<()> {
        write_path(
            self.env,
            self.factory,
            self.auto_instantiate,
            self.value,
            path,
            value,
        )
    }

    /// The declared (resolved) type produced by reading `path`, independent
    /// of whether any live value is present along it.
    pub fn get_getter_type(&self, path: &str) -> MetaResult<Type> {
        accessor_type_path(self.env, self.value, path, AccessorKind::Getter)
    }

    /// The declared (resolved) type accepted when writing `path`.
    pub fn get_setter_type(&self, path: &str) -> MetaResult<Type> {
        accessor_type_path(self.env, self.value, path, AccessorKind::Setter)
    }

    pub fn has_getter(&self, path: &str) -> bool {
        has_accessor_path(self.env, self.value, path, AccessorKind::Getter)
    }

    pub fn has_setter(&self, path: &str) -> bool {
        has_accessor_path(self.env, self.value, path, AccessorKind::Setter)
    }

    /// Canonical spelling of a possibly case-mangled path, or `None` when
    /// some segment matches nothing.
    pub fn find_property(&self, name: &str, use_camel_case: bool) -> Option<String> {
        match &*self.value {
            Value::Bean(bean) => bean_meta(self.env, bean)
                .ok()
                .and_then(|m| m.find_property(name, use_camel_case)),
            Value::Map(_) => Some(name.to_string()),
            _ => None,
        }
    }

    pub fn getter_names(&self) -> Vec<String> {
        match &*self.value {
            Value::Bean(bean) => bean_meta(self.env, bean)
                .map(|m| m.getter_names())
                .unwrap_or_default(),
            Value::Map(entries) => entries.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn setter_names(&self) -> Vec<String> {
        match &*self.value {
            Value::Bean(bean) => bean_meta(self.env, bean)
                .map(|m| m.setter_names())
                .unwrap_or_default(),
            Value::Map(entries) => entries.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(&*self.value, Value::List(_) | Value::Array(_))
    }

    pub fn add(&mut self, element: Value) -> MetaResult<()> {
        match ObjectWrapper::wrap(self.env, self.value) {
            Some(mut wrapper) => wrapper.add(element),
            None => Err(MetaError::UnsupportedOperation {
                op: "add",
                target: self.value.shape_name(),
            }),
        }
    }

    pub fn add_all(&mut self, elements: Vec<Value>) -> MetaResult<()> {
        match ObjectWrapper::wrap(self.env, self.value) {
            Some(mut wrapper) => wrapper.add_all(elements),
            None => Err(MetaError::UnsupportedOperation {
                op: "addAll",
                target: self.value.shape_name(),
            }),
        }
    }
}

fn read_path(env: &dyn TypeEnv, container: &Value, path: &str) -> MetaResult<Value> {
    let prop = PropertyTokenizer::new(path);
    let current = read_segment(env, container, &prop)?;
    match prop.children() {
        Some(children) if !current.is_null() => read_path(env, &current, children),
        Some(_) => Ok(Value::Null),
        None => Ok(current),
    }
}

fn write_path(
    env: &dyn TypeEnv,
    factory: &dyn ObjectFactory,
    auto: bool,
    container: &mut Value,
    path: &str,
    value: Value,
) -> MetaResult<()> {
    let prop = PropertyTokenizer::new(path);
    match prop.children() {
        Some(children) => {
            let existing = read_segment(env, container, &prop)?;
            if existing.is_null() {
                if value.is_null() {
                    return Ok(());
                }
                if !auto {
                    return Err(MetaError::NullIntermediate {
                        path: prop.indexed_name().to_string(),
                    });
                }
                instantiate_segment(env, factory, container, &prop)?;
            }
            let wrapper = wrap_for(env, container, &prop)?;
            let child = wrapper.into_child_mut(&prop)?;
            write_path(env, factory, auto, child, children, value)
        }
        None => {
            if prop.index().is_some() && auto {
                ensure_indexed_container(env, factory, container, &prop)?;
            }
            let mut wrapper = wrap_for(env, container, &prop)?;
            wrapper.set(&prop, value)
        }
    }
}

fn wrap_for<'v>(
    env: &'v dyn TypeEnv,
    container: &'v mut Value,
    prop: &PropertyTokenizer,
) -> MetaResult<ObjectWrapper<'v>> {
    let shape = container.shape_name();
    ObjectWrapper::wrap(env, container).ok_or_else(|| MetaError::NoSuchProperty {
        name: prop.indexed_name().to_string(),
        class: shape.to_string(),
    })
}

/// Build the missing value a non-terminal segment needs before descent.
fn instantiate_segment(
    env: &dyn TypeEnv,
    factory: &dyn ObjectFactory,
    container: &mut Value,
    prop: &PropertyTokenizer,
) -> MetaResult<()> {
    match container {
        Value::Map(entries) => {
            // Key/value declarations are erased at this point, so map
            // children are built as nested maps.
            entries.insert(
                crate::wrapper::map_key(prop).to_string(),
                Value::Map(Default::default()),
            );
            Ok(())
        }
        Value::List(_) | Value::Array(_) => Err(MetaError::UnsupportedOperation {
            op: "auto-instantiation",
            target: container.shape_name(),
        }),
        Value::Bean(bean) => {
            let declared = {
                let meta = bean_meta(env, bean)?;
                let class = bean_class_name(env, bean);
                let property =
                    meta.property(prop.name())
                        .ok_or_else(|| MetaError::NoSuchProperty {
                            name: prop.name().to_string(),
                            class: class.clone(),
                        })?;
                property
                    .setter
                    .clone()
                    .or_else(|| property.getter.clone())
                    .ok_or_else(|| MetaError::NoSuchProperty {
                        name: prop.name().to_string(),
                        class,
                    })?
            };
            let slot = bean
                .fields
                .entry(prop.name().to_string())
                .or_insert(Value::Null);
            if slot.is_null() {
                *slot = factory.create(env, &declared)?;
                tracing::debug!(path = prop.indexed_name(), "auto-instantiated intermediate");
            }
            if prop.index().is_some() {
                let elem_ty = element_type(env, &declared);
                let elem = index_mut(slot, prop)?;
                if elem.is_null() {
                    *elem = factory.create(env, &elem_ty)?;
                    tracing::debug!(path = prop.indexed_name(), "auto-instantiated element");
                }
            }
            Ok(())
        }
        Value::Null => Err(MetaError::NullIntermediate {
            path: prop.indexed_name().to_string(),
        }),
        other => Err(MetaError::NoSuchProperty {
            name: prop.name().to_string(),
            class: other.shape_name().to_string(),
        }),
    }
}

/// Before a terminal indexed write on a bean property, make sure the
/// backing collection exists. The write itself still bounds-checks the
/// index; failures like an unknown property are also left to it.
fn ensure_indexed_container(
    env: &dyn TypeEnv,
    factory: &dyn ObjectFactory,
    container: &mut Value,
    prop: &PropertyTokenizer,
) -> MetaResult<()> {
    let Value::Bean(bean) = container else {
        return Ok(());
    };
    let declared = {
        let Ok(meta) = bean_meta(env, bean) else {
            return Ok(());
        };
        match meta.property(prop.name()) {
            Some(p) => p.setter.clone().or_else(|| p.getter.clone()),
            None => return Ok(()),
        }
    };
    let slot = bean
        .fields
        .entry(prop.name().to_string())
        .or_insert(Value::Null);
    if slot.is_null() {
        let Some(ty) = declared else {
            return Ok(());
        };
        *slot = factory.create(env, &ty)?;
        tracing::debug!(path = prop.indexed_name(), "auto-instantiated collection");
    }
    Ok(())
}

fn accessor_type_path(
    env: &dyn TypeEnv,
    container: &Value,
    path: &str,
    kind: AccessorKind,
) -> MetaResult<Type> {
    let prop = PropertyTokenizer::new(path);
    match prop.children() {
        Some(children) => {
            let child = read_segment(env, container, &prop)?;
            if child.is_null() {
                if matches!(container, Value::Map(_)) {
                    return Ok(object_type(env));
                }
                static_accessor_type(env, container, path, kind)
            } else {
                accessor_type_path(env, &child, children, kind)
            }
        }
        None => match container {
            Value::Map(entries) => Ok(map_value_type(env, entries, &prop)),
            Value::List(_) | Value::Array(_) => match indexed_get(container, &prop) {
                Ok(item) if !item.is_null() => Ok(item.static_type(env)),
                _ => Ok(object_type(env)),
            },
            _ => static_accessor_type(env, container, path, kind),
        },
    }
}

/// Resolve the remaining path purely against declared metadata, starting
/// from the container's static type. Used whenever the live graph has no
/// value to look at.
fn static_accessor_type(
    env: &dyn TypeEnv,
    container: &Value,
    path: &str,
    kind: AccessorKind,
) -> MetaResult<Type> {
    let meta = MetaClass::for_type(env, container.static_type(env))?;
    match kind {
        AccessorKind::Getter => meta.getter_type(path),
        AccessorKind::Setter => meta.setter_type(path),
    }
}

fn has_accessor_path(env: &dyn TypeEnv, container: &Value, path: &str, kind: AccessorKind) -> bool {
    let prop = PropertyTokenizer::new(path);
    match container {
        Value::Map(_) => true,
        Value::List(_) | Value::Array(_) => match prop.children() {
            None => prop.index().is_some(),
            Some(children) => match read_segment(env, container, &prop) {
                Ok(child) if !child.is_null() => has_accessor_path(env, &child, children, kind),
                _ => false,
            },
        },
        Value::Bean(bean) => {
            let Ok(meta) = bean_meta(env, bean) else {
                return false;
            };
            let statically = |p: &str| match kind {
                AccessorKind::Getter => meta.has_getter(p),
                AccessorKind::Setter => meta.has_setter(p),
            };
            match prop.children() {
                None => statically(path),
                Some(children) => {
                    if !statically(prop.indexed_name()) {
                        return false;
                    }
                    match read_segment(env, container, &prop) {
                        Ok(child) if !child.is_null() => {
                            has_accessor_path(env, &child, children, kind)
                        }
                        // Null gap: the static answer covers the rest.
                        Ok(_) => statically(path),
                        Err(_) => false,
                    }
                }
            }
        }
        _ => false,
    }
}

fn object_type(env: &dyn TypeEnv) -> Type {
    Type::class(env.well_known().object, vec![])
}
