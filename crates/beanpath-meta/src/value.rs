//! The dynamic value model navigated by [`crate::MetaObject`].
//!
//! A `Value` is one node of a live object graph: a bean instance described
//! by a registered class, an ordered sequence (growable or fixed-size), a
//! string-keyed map, or a scalar. `Null` doubles as Java's `null` and as
//! the "no value" marker returned by reads of absent data.

use std::collections::BTreeMap;

use beanpath_types::{ClassId, PrimitiveType, Type, TypeEnv};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Double(f64),
    String(String),
    /// Growable ordered sequence (`java.util.List`-shaped).
    List(Vec<Value>),
    /// Fixed-size sequence: elements can be replaced in place but never
    /// appended.
    Array(Box<[Value]>),
    Map(BTreeMap<String, Value>),
    Bean(Bean),
}

/// An instance of a class registered in the descriptor table. Property
/// values live in `fields`, keyed by property name; a property missing from
/// the map reads as its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bean {
    pub class: ClassId,
    pub fields: BTreeMap<String, Value>,
}

impl Bean {
    pub fn new(class: ClassId) -> Bean {
        Bean {
            class,
            fields: BTreeMap::new(),
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The Java field default for a declared type: primitive zero/false,
    /// `Null` for everything else.
    pub fn default_for(ty: &Type) -> Value {
        match ty {
            Type::Primitive(PrimitiveType::Boolean) => Value::Boolean(false),
            Type::Primitive(PrimitiveType::Float) | Type::Primitive(PrimitiveType::Double) => {
                Value::Double(0.0)
            }
            Type::Primitive(PrimitiveType::Void) => Value::Null,
            Type::Primitive(_) => Value::Int(0),
            _ => Value::Null,
        }
    }

    /// The best static type recoverable from the runtime shape alone.
    ///
    /// Beans report their (raw) registered class; containers report the raw
    /// well-known interface. Class-level type arguments are erased here,
    /// which mirrors what runtime reflection can see: a type query that
    /// restarts from a live bean therefore loses any parameterized context
    /// the bean was declared with, and resolves against the raw class.
    pub fn static_type(&self, env: &dyn TypeEnv) -> Type {
        let wk = env.well_known();
        match self {
            Value::Null => Type::class(wk.object, vec![]),
            Value::Boolean(_) => Type::Primitive(PrimitiveType::Boolean),
            Value::Int(_) => Type::Primitive(PrimitiveType::Int),
            Value::Double(_) => Type::Primitive(PrimitiveType::Double),
            Value::String(_) => Type::class(wk.string, vec![]),
            Value::List(_) => Type::class(wk.list, vec![]),
            Value::Array(_) => Type::array(Type::class(wk.object, vec![])),
            Value::Map(_) => Type::class(wk.map, vec![]),
            Value::Bean(bean) => Type::class(bean.class, vec![]),
        }
    }

    /// Short shape name for diagnostics.
    pub(crate) fn shape_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "a boolean",
            Value::Int(_) => "an integer",
            Value::Double(_) => "a double",
            Value::String(_) => "a string",
            Value::List(_) => "a list",
            Value::Array(_) => "an array",
            Value::Map(_) => "a map",
            Value::Bean(_) => "a bean",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::String(v)
    }
}
