//! Per-shape access strategies: the closed wrapper union over one borrowed
//! value, plus the segment-level helpers shared with the read-only
//! traversal in [`crate::meta_object`].
//!
//! The variant set is closed by design: beans, indexed sequences, and maps
//! cover every navigable shape, and no fourth case is anticipated.

use std::collections::BTreeMap;

use beanpath_types::{Type, TypeEnv};

use crate::error::{MetaError, MetaResult};
use crate::meta_class::MetaClass;
use crate::property::PropertyTokenizer;
use crate::value::{Bean, Value};

pub enum ObjectWrapper<'a> {
    Bean(BeanWrapper<'a>),
    Collection(CollectionWrapper<'a>),
    Map(MapWrapper<'a>),
}

pub struct BeanWrapper<'a> {
    env: &'a dyn TypeEnv,
    bean: &'a mut Bean,
}

pub struct CollectionWrapper<'a> {
    env: &'a dyn TypeEnv,
    seq: SeqMut<'a>,
}

enum SeqMut<'a> {
    List(&'a mut Vec<Value>),
    Array(&'a mut [Value]),
}

pub struct MapWrapper<'a> {
    env: &'a dyn TypeEnv,
    entries: &'a mut BTreeMap<String, Value>,
}

impl<'a> ObjectWrapper<'a> {
    /// Classify `value` into its access strategy. Scalars and `Null` are not
    /// navigable.
    pub fn wrap(env: &'a dyn TypeEnv, value: &'a mut Value) -> Option<ObjectWrapper<'a>> {
        match value {
            Value::Bean(bean) => Some(ObjectWrapper::Bean(BeanWrapper { env, bean })),
            Value::List(items) => Some(ObjectWrapper::Collection(CollectionWrapper {
                env,
                seq: SeqMut::List(items),
            })),
            Value::Array(items) => Some(ObjectWrapper::Collection(CollectionWrapper {
                env,
                seq: SeqMut::Array(&mut items[..]),
            })),
            Value::Map(entries) => Some(ObjectWrapper::Map(MapWrapper { env, entries })),
            _ => None,
        }
    }

    pub fn get(&self, prop: &PropertyTokenizer) -> MetaResult<Value> {
        match self {
            ObjectWrapper::Bean(w) => bean_get(w.env, w.bean, prop),
            ObjectWrapper::Collection(w) => w.get(prop),
            ObjectWrapper::Map(w) => Ok(map_get(w.entries, prop)),
        }
    }

    pub fn set(&mut self, prop: &PropertyTokenizer, value: Value) -> MetaResult<()> {
        match self {
            ObjectWrapper::Bean(w) => bean_set(w.env, w.bean, prop, value),
            ObjectWrapper::Collection(w) => w.set(prop, value),
            ObjectWrapper::Map(w) => {
                map_set(w.entries, prop, value);
                Ok(())
            }
        }
    }

    /// Consume the wrapper and hand back a mutable borrow of the value this
    /// segment names, creating an empty slot where the backing shape allows
    /// it (bean property storage, map entries).
    pub fn into_child_mut(self, prop: &PropertyTokenizer) -> MetaResult<&'a mut Value> {
        match self {
            ObjectWrapper::Bean(w) => bean_child_mut(w.env, w.bean, prop),
            ObjectWrapper::Collection(w) => match w.seq {
                SeqMut::List(items) => seq_index_mut(items, prop),
                SeqMut::Array(items) => seq_index_mut(items, prop),
            },
            ObjectWrapper::Map(w) => Ok(w
                .entries
                .entry(map_key(prop).to_string())
                .or_insert(Value::Null)),
        }
    }

    pub fn getter_type(&self, prop: &PropertyTokenizer) -> MetaResult<Type> {
        match self {
            ObjectWrapper::Bean(w) => bean_meta(w.env, w.bean)?.getter_type(prop.indexed_name()),
            ObjectWrapper::Collection(w) => Ok(w.element_type(prop)),
            ObjectWrapper::Map(w) => Ok(map_value_type(w.env, w.entries, prop)),
        }
    }

    pub fn setter_type(&self, prop: &PropertyTokenizer) -> MetaResult<Type> {
        match self {
            ObjectWrapper::Bean(w) => bean_meta(w.env, w.bean)?.setter_type(prop.indexed_name()),
            ObjectWrapper::Collection(w) => Ok(w.element_type(prop)),
            ObjectWrapper::Map(w) => Ok(map_value_type(w.env, w.entries, prop)),
        }
    }

    pub fn has_getter(&self, prop: &PropertyTokenizer) -> bool {
        match self {
            ObjectWrapper::Bean(w) => bean_meta(w.env, w.bean)
                .map(|m| m.has_getter(prop.indexed_name()))
                .unwrap_or(false),
            ObjectWrapper::Collection(_) => true,
            // Maps accept arbitrary keys.
            ObjectWrapper::Map(_) => true,
        }
    }

    pub fn has_setter(&self, prop: &PropertyTokenizer) -> bool {
        match self {
            ObjectWrapper::Bean(w) => bean_meta(w.env, w.bean)
                .map(|m| m.has_setter(prop.indexed_name()))
                .unwrap_or(false),
            ObjectWrapper::Collection(_) => true,
            ObjectWrapper::Map(_) => true,
        }
    }

    pub fn find_property(&self, name: &str, use_camel_case: bool) -> Option<String> {
        match self {
            ObjectWrapper::Bean(w) => bean_meta(w.env, w.bean)
                .ok()
                .and_then(|m| m.find_property(name, use_camel_case)),
            ObjectWrapper::Collection(_) => None,
            ObjectWrapper::Map(_) => Some(name.to_string()),
        }
    }

    pub fn getter_names(&self) -> Vec<String> {
        match self {
            ObjectWrapper::Bean(w) => bean_meta(w.env, w.bean)
                .map(|m| m.getter_names())
                .unwrap_or_default(),
            ObjectWrapper::Collection(_) => Vec::new(),
            ObjectWrapper::Map(w) => w.entries.keys().cloned().collect(),
        }
    }

    pub fn setter_names(&self) -> Vec<String> {
        match self {
            ObjectWrapper::Bean(w) => bean_meta(w.env, w.bean)
                .map(|m| m.setter_names())
                .unwrap_or_default(),
            ObjectWrapper::Collection(_) => Vec::new(),
            ObjectWrapper::Map(w) => w.entries.keys().cloned().collect(),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, ObjectWrapper::Collection(_))
    }

    pub fn add(&mut self, element: Value) -> MetaResult<()> {
        match self {
            ObjectWrapper::Collection(w) => w.add(element),
            ObjectWrapper::Bean(_) => Err(unsupported("add", "a bean")),
            ObjectWrapper::Map(_) => Err(unsupported("add", "a map")),
        }
    }

    pub fn add_all(&mut self, elements: Vec<Value>) -> MetaResult<()> {
        match self {
            ObjectWrapper::Collection(w) => {
                match &mut w.seq {
                    SeqMut::List(items) => {
                        items.extend(elements);
                        Ok(())
                    }
                    SeqMut::Array(_) => Err(unsupported("addAll", "a fixed-size array")),
                }
            }
            ObjectWrapper::Bean(_) => Err(unsupported("addAll", "a bean")),
            ObjectWrapper::Map(_) => Err(unsupported("addAll", "a map")),
        }
    }
}

impl CollectionWrapper<'_> {
    fn len(&self) -> usize {
        match &self.seq {
            SeqMut::List(items) => items.len(),
            SeqMut::Array(items) => items.len(),
        }
    }

    fn get(&self, prop: &PropertyTokenizer) -> MetaResult<Value> {
        let index = parse_index(prop)?;
        let item = match &self.seq {
            SeqMut::List(items) => items.get(index),
            SeqMut::Array(items) => items.get(index),
        };
        item.cloned().ok_or(MetaError::OutOfBounds {
            index,
            len: self.len(),
        })
    }

    fn set(&mut self, prop: &PropertyTokenizer, value: Value) -> MetaResult<()> {
        let index = parse_index(prop)?;
        let len = self.len();
        let slot = match &mut self.seq {
            SeqMut::List(items) => items.get_mut(index),
            SeqMut::Array(items) => items.get_mut(index),
        };
        match slot {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(MetaError::OutOfBounds { index, len }),
        }
    }

    fn add(&mut self, element: Value) -> MetaResult<()> {
        match &mut self.seq {
            SeqMut::List(items) => {
                items.push(element);
                Ok(())
            }
            SeqMut::Array(_) => Err(unsupported("add", "a fixed-size array")),
        }
    }

    /// The live element's runtime type when the index lands on a non-null
    /// value, otherwise `Object`. Declared element types are only visible
    /// through bean metadata, not from a bare sequence.
    fn element_type(&self, prop: &PropertyTokenizer) -> Type {
        let object = Type::class(self.env.well_known().object, vec![]);
        let Ok(index) = parse_index(prop) else {
            return object;
        };
        let item = match &self.seq {
            SeqMut::List(items) => items.get(index),
            SeqMut::Array(items) => items.get(index),
        };
        match item {
            Some(item) if !item.is_null() => item.static_type(self.env),
            _ => object,
        }
    }
}

/// The live value's runtime type for a map key, `Object` when absent.
pub(crate) fn map_value_type(env: &dyn TypeEnv, entries: &BTreeMap<String, Value>, prop: &PropertyTokenizer) -> Type {
    match entries.get(map_key(prop)) {
        Some(value) if !value.is_null() => value.static_type(env),
        _ => Type::class(env.well_known().object, vec![]),
    }
}

fn unsupported(op: &'static str, target: &'static str) -> MetaError {
    MetaError::UnsupportedOperation { op, target }
}

pub(crate) fn parse_index(prop: &PropertyTokenizer) -> MetaResult<usize> {
    let raw = prop.index().unwrap_or_default();
    raw.parse::<usize>()
        .map_err(|_| MetaError::InvalidIndex(raw.to_string()))
}

/// Key used when the backing object itself is a map: the indexed spelling
/// when an index is present, the bare name otherwise.
pub(crate) fn map_key(prop: &PropertyTokenizer) -> &str {
    if prop.index().is_some() {
        prop.indexed_name()
    } else {
        prop.name()
    }
}

pub(crate) fn map_get(entries: &BTreeMap<String, Value>, prop: &PropertyTokenizer) -> Value {
    entries.get(map_key(prop)).cloned().unwrap_or(Value::Null)
}

pub(crate) fn map_set(entries: &mut BTreeMap<String, Value>, prop: &PropertyTokenizer, value: Value) {
    entries.insert(map_key(prop).to_string(), value);
}

pub(crate) fn bean_meta<'e>(env: &'e dyn TypeEnv, bean: &Bean) -> MetaResult<MetaClass<'e>> {
    MetaClass::for_type(env, Type::class(bean.class, vec![]))
}

pub(crate) fn bean_class_name(env: &dyn TypeEnv, bean: &Bean) -> String {
    Type::class(bean.class, vec![]).display(env).to_string()
}

pub(crate) fn bean_get(env: &dyn TypeEnv, bean: &Bean, prop: &PropertyTokenizer) -> MetaResult<Value> {
    let meta = bean_meta(env, bean)?;
    let readable = meta
        .property(prop.name())
        .map(|p| p.getter.is_some())
        .unwrap_or(false);
    if !readable {
        return Err(MetaError::NoSuchProperty {
            name: prop.name().to_string(),
            class: bean_class_name(env, bean),
        });
    }
    let named = bean.fields.get(prop.name()).cloned().unwrap_or(Value::Null);
    if prop.index().is_none() {
        return Ok(named);
    }
    if named.is_null() {
        // Reading through a missing collection is "nothing here yet".
        return Ok(Value::Null);
    }
    indexed_get(&named, prop)
}

pub(crate) fn bean_set(
    env: &dyn TypeEnv,
    bean: &mut Bean,
    prop: &PropertyTokenizer,
    value: Value,
) -> MetaResult<()> {
    let meta = bean_meta(env, bean)?;
    let writable = meta
        .property(prop.name())
        .map(|p| p.setter.is_some() || prop.index().is_some())
        .unwrap_or(false);
    if !writable {
        return Err(MetaError::NoSuchProperty {
            name: prop.name().to_string(),
            class: bean_class_name(env, bean),
        });
    }
    if prop.index().is_none() {
        bean.fields.insert(prop.name().to_string(), value);
        return Ok(());
    }
    match bean.fields.get_mut(prop.name()) {
        Some(named) if !named.is_null() => indexed_set(named, prop, value),
        _ => Err(MetaError::NullIntermediate {
            path: prop.indexed_name().to_string(),
        }),
    }
}

fn bean_child_mut<'a>(
    env: &dyn TypeEnv,
    bean: &'a mut Bean,
    prop: &PropertyTokenizer,
) -> MetaResult<&'a mut Value> {
    let meta = bean_meta(env, bean)?;
    if meta.property(prop.name()).is_none() {
        return Err(MetaError::NoSuchProperty {
            name: prop.name().to_string(),
            class: bean_class_name(env, bean),
        });
    }
    let slot = bean
        .fields
        .entry(prop.name().to_string())
        .or_insert(Value::Null);
    if prop.index().is_none() {
        return Ok(slot);
    }
    index_mut(slot, prop)
}

/// Index into a sequence value held by a bean property or addressed at the
/// root: lists and arrays take an integer position, maps take the index
/// text as a key.
pub(crate) fn indexed_get(collection: &Value, prop: &PropertyTokenizer) -> MetaResult<Value> {
    match collection {
        Value::List(items) => {
            let index = parse_index(prop)?;
            items.get(index).cloned().ok_or(MetaError::OutOfBounds {
                index,
                len: items.len(),
            })
        }
        Value::Array(items) => {
            let index = parse_index(prop)?;
            items.get(index).cloned().ok_or(MetaError::OutOfBounds {
                index,
                len: items.len(),
            })
        }
        Value::Map(entries) => Ok(entries
            .get(prop.index().unwrap_or_default())
            .cloned()
            .unwrap_or(Value::Null)),
        other => Err(unsupported("indexed access", other.shape_name())),
    }
}

pub(crate) fn indexed_set(
    collection: &mut Value,
    prop: &PropertyTokenizer,
    value: Value,
) -> MetaResult<()> {
    match collection {
        Value::Map(entries) => {
            entries.insert(prop.index().unwrap_or_default().to_string(), value);
            Ok(())
        }
        _ => {
            *index_mut(collection, prop)? = value;
            Ok(())
        }
    }
}

pub(crate) fn index_mut<'a>(
    collection: &'a mut Value,
    prop: &PropertyTokenizer,
) -> MetaResult<&'a mut Value> {
    match collection {
        Value::List(items) => {
            let index = parse_index(prop)?;
            let len = items.len();
            items
                .get_mut(index)
                .ok_or(MetaError::OutOfBounds { index, len })
        }
        Value::Array(items) => {
            let index = parse_index(prop)?;
            let len = items.len();
            items
                .get_mut(index)
                .ok_or(MetaError::OutOfBounds { index, len })
        }
        Value::Map(entries) => Ok(entries
            .entry(prop.index().unwrap_or_default().to_string())
            .or_insert(Value::Null)),
        other => Err(unsupported("indexed access", other.shape_name())),
    }
}

fn seq_index_mut<'a>(items: &'a mut [Value], prop: &PropertyTokenizer) -> MetaResult<&'a mut Value> {
    let index = parse_index(prop)?;
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(MetaError::OutOfBounds { index, len })
}

/// Read-only twin of [`ObjectWrapper::get`], used by the non-mutating
/// traversal paths.
pub(crate) fn read_segment(
    env: &dyn TypeEnv,
    container: &Value,
    prop: &PropertyTokenizer,
) -> MetaResult<Value> {
    match container {
        Value::Bean(bean) => bean_get(env, bean, prop),
        Value::Map(entries) => Ok(map_get(entries, prop)),
        Value::List(_) | Value::Array(_) => {
            if prop.name().is_empty() {
                indexed_get(container, prop)
            } else {
                Err(MetaError::NoSuchProperty {
                    name: prop.name().to_string(),
                    class: container.shape_name().to_string(),
                })
            }
        }
        Value::Null => Ok(Value::Null),
        other => Err(MetaError::NoSuchProperty {
            name: prop.name().to_string(),
            class: other.shape_name().to_string(),
        }),
    }
}
