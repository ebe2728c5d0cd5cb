//! Semantic model of Java-style generic types, the immutable class
//! descriptor table they are interpreted against, and a resolver that
//! substitutes a member's declared type variables with the actual type
//! arguments of a concrete owning instantiation.
//!
//! The model is a closed tagged union: declared generic signatures are
//! captured once as structured data (a [`ClassDef`] per class inside a
//! [`TypeStore`]) and treated as immutable input from then on. All
//! algorithms take a `&dyn TypeEnv` and allocate fresh [`Type`] values;
//! nothing here mutates shared metadata, so concurrent use needs no
//! synchronization.

use std::fmt;

use serde::{Deserialize, Serialize};

mod resolver;
mod store;

pub use resolver::{
    resolve_field_type, resolve_param_types, resolve_return_type, resolve_type, ResolveResult,
    TypeResolveError,
};
pub use store::{
    is_assignable, ClassDef, ClassKind, ConstructorDef, FieldDef, MethodDef, TypeEnv,
    TypeParamDef, TypeStore, WellKnownTypes,
};

/// Identifies a class or interface registered in a [`TypeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(pub(crate) u32);

/// Identifies one type parameter declaration (`T` on some class or
/// interface) registered in a [`TypeStore`].
///
/// Two parameters that happen to share a source name (`T` on `Mid` vs `T`
/// on `Base`) get distinct ids, so identity comparison matches Java's
/// `TypeVariable` equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVarId(pub(crate) u32);

/// The Java primitive types (plus `void` for method returns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }
}

/// A class reference with its actual type arguments.
///
/// `args` is empty for a concrete (or raw) class and non-empty for a
/// parameterized type such as `List<String>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    pub def: ClassId,
    pub args: Vec<Type>,
}

/// A bounded wildcard type argument (`?`, `? extends Number`,
/// `? super Integer`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WildcardType {
    pub lower_bounds: Vec<Type>,
    pub upper_bounds: Vec<Type>,
}

/// A declared or resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Primitive(PrimitiveType),
    Class(ClassType),
    Var(TypeVarId),
    Wildcard(WildcardType),
    Array(Box<Type>),
}

impl Type {
    pub fn class(def: ClassId, args: Vec<Type>) -> Type {
        Type::Class(ClassType { def, args })
    }

    pub fn array(component: Type) -> Type {
        Type::Array(Box::new(component))
    }

    /// The raw class behind a concrete or parameterized class type.
    pub fn raw_class(&self) -> Option<ClassId> {
        match self {
            Type::Class(ct) => Some(ct.def),
            _ => None,
        }
    }

    pub fn is_parameterized(&self) -> bool {
        matches!(self, Type::Class(ct) if !ct.args.is_empty())
    }

    /// Render this type with class and variable names taken from `env`.
    ///
    /// [`Type`] carries ids rather than names, so `Display` needs the store
    /// that issued them; errors and logs go through this.
    pub fn display<'a>(&'a self, env: &'a dyn TypeEnv) -> TypeDisplay<'a> {
        TypeDisplay { ty: self, env }
    }
}

/// Env-assisted [`fmt::Display`] adapter returned by [`Type::display`].
pub struct TypeDisplay<'a> {
    ty: &'a Type,
    env: &'a dyn TypeEnv,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_type(self.ty, self.env, f)
    }
}

fn fmt_type(ty: &Type, env: &dyn TypeEnv, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ty {
        Type::Primitive(p) => f.write_str(p.name()),
        Type::Class(ct) => {
            match env.class(ct.def) {
                Some(def) => f.write_str(&def.name)?,
                None => write!(f, "<class#{}>", ct.def.0)?,
            }
            if let Some((first, rest)) = ct.args.split_first() {
                f.write_str("<")?;
                fmt_type(first, env, f)?;
                for arg in rest {
                    f.write_str(", ")?;
                    fmt_type(arg, env, f)?;
                }
                f.write_str(">")?;
            }
            Ok(())
        }
        Type::Var(id) => match env.type_param(*id) {
            Some(def) => f.write_str(&def.name),
            None => write!(f, "<var#{}>", id.0),
        },
        Type::Wildcard(w) => {
            f.write_str("?")?;
            if let Some(lower) = w.lower_bounds.first() {
                f.write_str(" super ")?;
                fmt_type(lower, env, f)?;
            } else if let Some(upper) = w.upper_bounds.first() {
                f.write_str(" extends ")?;
                fmt_type(upper, env, f)?;
            }
            Ok(())
        }
        Type::Array(component) => {
            fmt_type(component, env, f)?;
            f.write_str("[]")
        }
    }
}
