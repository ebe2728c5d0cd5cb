//! Resolution of declared member types against a concrete owning
//! instantiation.
//!
//! Given `class Sub extends Mid<String>` and `class Mid<T> { T field; }`,
//! resolving `field` with `Sub` as the owning type yields `String`.
//! Inheritance can reintroduce, rename, or partially bind type parameters at
//! each level, so resolution carries translated bindings downward one level
//! at a time rather than attempting a single global substitution.

use thiserror::Error;

use crate::{
    is_assignable, ClassId, ClassType, Type, TypeEnv, TypeVarId, WildcardType,
};

pub type ResolveResult<T> = Result<T, TypeResolveError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeResolveError {
    /// The owning-type context was neither a concrete class nor a
    /// parameterized type.
    #[error("owning type must be a concrete or parameterized class, but was `{0}`")]
    InvalidOwner(String),
    #[error("unknown class id {0:?}")]
    UnknownClass(ClassId),
    #[error("no field named `{field}` on `{class}`")]
    UnknownField { class: String, field: String },
    #[error("no method named `{method}` on `{class}`")]
    UnknownMethod { class: String, method: String },
}

/// Resolve the declared type of `field` (declared on `declaring`) as seen
/// through `src_type`.
pub fn resolve_field_type(
    env: &dyn TypeEnv,
    declaring: ClassId,
    field: &str,
    src_type: &Type,
) -> ResolveResult<Type> {
    let def = env
        .class(declaring)
        .ok_or(TypeResolveError::UnknownClass(declaring))?;
    let field_def = def
        .field(field)
        .ok_or_else(|| TypeResolveError::UnknownField {
            class: def.name.clone(),
            field: field.to_string(),
        })?;
    resolve_type(env, &field_def.ty, src_type, declaring)
}

/// Resolve the declared return type of `method` (declared on `declaring`)
/// as seen through `src_type`.
pub fn resolve_return_type(
    env: &dyn TypeEnv,
    declaring: ClassId,
    method: &str,
    src_type: &Type,
) -> ResolveResult<Type> {
    let def = env
        .class(declaring)
        .ok_or(TypeResolveError::UnknownClass(declaring))?;
    let method_def = def
        .method(method)
        .ok_or_else(|| TypeResolveError::UnknownMethod {
            class: def.name.clone(),
            method: method.to_string(),
        })?;
    resolve_type(env, &method_def.return_type, src_type, declaring)
}

/// Resolve the declared parameter types of `method` (declared on
/// `declaring`) as seen through `src_type`.
pub fn resolve_param_types(
    env: &dyn TypeEnv,
    declaring: ClassId,
    method: &str,
    src_type: &Type,
) -> ResolveResult<Vec<Type>> {
    let def = env
        .class(declaring)
        .ok_or(TypeResolveError::UnknownClass(declaring))?;
    let method_def = def
        .method(method)
        .ok_or_else(|| TypeResolveError::UnknownMethod {
            class: def.name.clone(),
            method: method.to_string(),
        })?;
    method_def
        .params
        .iter()
        .map(|p| resolve_type(env, p, src_type, declaring))
        .collect()
}

/// Shared resolution core: substitute every type variable reachable in `ty`
/// using `src_type` as the owning instantiation of `declaring`.
///
/// The result never contains a `Type::Var`: variables that cannot be bound
/// degrade to their first declared upper bound, or to `Object` when
/// unbounded.
pub fn resolve_type(
    env: &dyn TypeEnv,
    ty: &Type,
    src_type: &Type,
    declaring: ClassId,
) -> ResolveResult<Type> {
    let resolved = resolve(env, ty, src_type, declaring)?;
    let mut in_flight = Vec::new();
    Ok(erase_vars(env, resolved, &mut in_flight))
}

fn resolve(env: &dyn TypeEnv, ty: &Type, src_type: &Type, declaring: ClassId) -> ResolveResult<Type> {
    match ty {
        Type::Var(var) => resolve_type_var(env, *var, src_type, declaring),
        Type::Class(ct) if !ct.args.is_empty() => {
            resolve_class_type(env, ct, src_type, declaring).map(Type::Class)
        }
        Type::Array(component) => {
            let resolved = resolve(env, component, src_type, declaring)?;
            Ok(Type::Array(Box::new(resolved)))
        }
        other => Ok(other.clone()),
    }
}

fn resolve_class_type(
    env: &dyn TypeEnv,
    ct: &ClassType,
    src_type: &Type,
    declaring: ClassId,
) -> ResolveResult<ClassType> {
    let mut args = Vec::with_capacity(ct.args.len());
    for arg in &ct.args {
        let resolved = match arg {
            Type::Wildcard(w) => Type::Wildcard(resolve_wildcard(env, w, src_type, declaring)?),
            other => resolve(env, other, src_type, declaring)?,
        };
        args.push(resolved);
    }
    Ok(ClassType { def: ct.def, args })
}

fn resolve_wildcard(
    env: &dyn TypeEnv,
    wildcard: &WildcardType,
    src_type: &Type,
    declaring: ClassId,
) -> ResolveResult<WildcardType> {
    let resolve_bounds = |bounds: &[Type]| -> ResolveResult<Vec<Type>> {
        bounds
            .iter()
            .map(|b| match b {
                Type::Wildcard(inner) => {
                    resolve_wildcard(env, inner, src_type, declaring).map(Type::Wildcard)
                }
                other => resolve(env, other, src_type, declaring),
            })
            .collect()
    };
    Ok(WildcardType {
        lower_bounds: resolve_bounds(&wildcard.lower_bounds)?,
        upper_bounds: resolve_bounds(&wildcard.upper_bounds)?,
    })
}

fn resolve_type_var(
    env: &dyn TypeEnv,
    var: TypeVarId,
    src_type: &Type,
    declaring: ClassId,
) -> ResolveResult<Type> {
    let src = match src_type {
        Type::Class(ct) => ct,
        other => {
            return Err(TypeResolveError::InvalidOwner(
                other.display(env).to_string(),
            ))
        }
    };
    let clazz = src.def;

    // The owning class is the declaring class itself. A parameterized
    // instantiation binds the variable directly to its actual argument; only
    // a raw owning type degrades it to its first declared upper bound.
    if clazz == declaring {
        if !src.args.is_empty() {
            let def = env
                .class(declaring)
                .ok_or(TypeResolveError::UnknownClass(declaring))?;
            if let Some(i) = def.type_params.iter().position(|p| *p == var) {
                if let Some(actual) = src.args.get(i) {
                    return Ok(actual.clone());
                }
            }
        }
        let bound = env
            .type_param(var)
            .and_then(|def| def.upper_bounds.first().cloned());
        return Ok(bound.unwrap_or_else(|| object(env)));
    }

    let def = env
        .class(clazz)
        .ok_or(TypeResolveError::UnknownClass(clazz))?;

    // Superclass bindings win over interface bindings; interfaces are tried
    // in declaration order, first match wins.
    if let Some(superclass) = &def.super_class {
        if let Some(found) = scan_super_type(env, var, src_type, declaring, clazz, superclass)? {
            return Ok(found);
        }
    }
    for iface in &def.interfaces {
        if let Some(found) = scan_super_type(env, var, src_type, declaring, clazz, iface)? {
            return Ok(found);
        }
    }

    Ok(object(env))
}

fn scan_super_type(
    env: &dyn TypeEnv,
    var: TypeVarId,
    src_type: &Type,
    declaring: ClassId,
    clazz: ClassId,
    superclass: &Type,
) -> ResolveResult<Option<Type>> {
    let Type::Class(parent) = superclass else {
        return Ok(None);
    };

    if parent.args.is_empty() {
        // Plain supertype: nothing to translate, just move the context up
        // one level if it can still reach the declaring class.
        if is_assignable(env, declaring, parent.def) {
            return resolve_type_var(env, var, superclass, declaring).map(Some);
        }
        return Ok(None);
    }

    // Parameterized supertype: substitute any of its arguments that are the
    // current class's own parameters with the actual arguments supplied by
    // `src_type`, threading concrete bindings down a level.
    let parent = match src_type {
        Type::Class(src) if !src.args.is_empty() => {
            translate_parent_args(env, src, clazz, parent)
        }
        _ => parent.clone(),
    };

    if declaring == parent.def {
        if let Some(parent_def) = env.class(parent.def) {
            if let Some(i) = parent_def.type_params.iter().position(|p| *p == var) {
                return Ok(parent.args.get(i).cloned());
            }
        }
    }
    if is_assignable(env, declaring, parent.def) {
        return resolve_type_var(env, var, &Type::Class(parent), declaring).map(Some);
    }

    Ok(None)
}

/// Rewrite `parent`'s type arguments, replacing the variables that coincide
/// with `src_class`'s own declared parameters by the corresponding actual
/// arguments from `src`.
fn translate_parent_args(
    env: &dyn TypeEnv,
    src: &ClassType,
    src_class: ClassId,
    parent: &ClassType,
) -> ClassType {
    let Some(src_def) = env.class(src_class) else {
        return parent.clone();
    };

    let mut changed = false;
    let mut args = Vec::with_capacity(parent.args.len());
    for arg in &parent.args {
        let mut out = arg.clone();
        if let Type::Var(v) = arg {
            if let Some(j) = src_def.type_params.iter().position(|p| p == v) {
                if let Some(actual) = src.args.get(j) {
                    changed = true;
                    out = actual.clone();
                }
            }
        }
        args.push(out);
    }

    if changed {
        ClassType {
            def: parent.def,
            args,
        }
    } else {
        parent.clone()
    }
}

fn object(env: &dyn TypeEnv) -> Type {
    Type::class(env.well_known().object, vec![])
}

/// Replace any variable that survived resolution with its first upper bound
/// (recursively resolved) or `Object`. Callers outside this crate never
/// observe an unresolved variable.
///
/// `in_flight` guards against self-referential bounds
/// (`T extends Comparable<T>`).
fn erase_vars(env: &dyn TypeEnv, ty: Type, in_flight: &mut Vec<TypeVarId>) -> Type {
    match ty {
        Type::Var(var) => {
            if in_flight.contains(&var) {
                return object(env);
            }
            let bound = env
                .type_param(var)
                .and_then(|def| def.upper_bounds.first().cloned());
            match bound {
                Some(bound) => {
                    in_flight.push(var);
                    let erased = erase_vars(env, bound, in_flight);
                    in_flight.pop();
                    erased
                }
                None => object(env),
            }
        }
        Type::Class(ClassType { def, args }) => Type::class(
            def,
            args.into_iter()
                .map(|arg| erase_vars(env, arg, in_flight))
                .collect(),
        ),
        Type::Array(component) => Type::Array(Box::new(erase_vars(env, *component, in_flight))),
        Type::Wildcard(w) => Type::Wildcard(WildcardType {
            lower_bounds: w
                .lower_bounds
                .into_iter()
                .map(|b| erase_vars(env, b, in_flight))
                .collect(),
            upper_bounds: w
                .upper_bounds
                .into_iter()
                .map(|b| erase_vars(env, b, in_flight))
                .collect(),
        }),
        other => other,
    }
}
