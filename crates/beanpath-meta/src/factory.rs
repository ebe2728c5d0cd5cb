//! Construction of missing intermediates during deep writes.

use beanpath_types::{is_assignable, ClassKind, PrimitiveType, Type, TypeEnv};

use crate::error::{MetaError, MetaResult};
use crate::meta_class::MetaClass;
use crate::value::{Bean, Value};

/// Creates a fresh value for a resolved declared type. Deep writes consult
/// the factory whenever a path crosses a `null` intermediate; swapping in a
/// custom implementation changes what gets built without touching the
/// navigation logic.
pub trait ObjectFactory {
    fn create(&self, env: &dyn TypeEnv, ty: &Type) -> MetaResult<Value>;
}

/// Default construction rules: collection-compatible classes become empty
/// lists, map-compatible classes empty maps, strings empty strings, and
/// concrete registered classes with a default constructor become beans with
/// every property at its field default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultObjectFactory;

impl ObjectFactory for DefaultObjectFactory {
    fn create(&self, env: &dyn TypeEnv, ty: &Type) -> MetaResult<Value> {
        tracing::trace!(ty = %ty.display(env), "creating value");
        match ty {
            Type::Primitive(PrimitiveType::Void) => {
                Err(not_instantiable(env, ty, "void has no values"))
            }
            Type::Primitive(_) => Ok(Value::default_for(ty)),
            Type::Wildcard(_) => Err(not_instantiable(env, ty, "unresolved wildcard")),
            Type::Var(_) => Err(not_instantiable(env, ty, "unresolved type variable")),
            Type::Array(_) => Err(not_instantiable(env, ty, "array length is unknown")),
            Type::Class(ct) => {
                let wk = env.well_known();
                if is_assignable(env, wk.collection, ct.def) {
                    return Ok(Value::List(Vec::new()));
                }
                if is_assignable(env, wk.map, ct.def) {
                    return Ok(Value::Map(Default::default()));
                }
                if ct.def == wk.string {
                    return Ok(Value::String(String::new()));
                }
                let def = env
                    .class(ct.def)
                    .ok_or_else(|| not_instantiable(env, ty, "class is not registered"))?;
                if def.kind == ClassKind::Interface {
                    return Err(not_instantiable(env, ty, "it is an interface"));
                }
                if def.is_abstract {
                    return Err(not_instantiable(env, ty, "it is abstract"));
                }
                if !def.has_default_constructor() {
                    return Err(not_instantiable(env, ty, "no default constructor"));
                }
                let meta = MetaClass::for_type(env, ty.clone())?;
                let mut bean = Bean::new(ct.def);
                for property in meta.properties() {
                    let declared = property.getter.as_ref().or(property.setter.as_ref());
                    if let Some(declared) = declared {
                        bean.fields
                            .insert(property.name.clone(), Value::default_for(declared));
                    }
                }
                Ok(Value::Bean(bean))
            }
        }
    }
}

fn not_instantiable(env: &dyn TypeEnv, ty: &Type, reason: &str) -> MetaError {
    MetaError::NotInstantiable {
        type_name: ty.display(env).to_string(),
        reason: reason.to_string(),
    }
}
