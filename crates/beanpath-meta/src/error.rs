use beanpath_types::TypeResolveError;
use thiserror::Error;

pub type MetaResult<T> = Result<T, MetaError>;

/// Navigation and mutation failures, raised at the point of detection and
/// surfaced to the immediate caller unwrapped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetaError {
    /// Index outside a sequence's bounds. The sequence is left unmodified.
    #[error("index {index} out of bounds for sequence of length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// A mutating operation the backing shape cannot perform, e.g. appending
    /// to a fixed-size array.
    #[error("`{op}` is not supported on {target}")]
    UnsupportedOperation { op: &'static str, target: &'static str },

    /// A write reached a missing intermediate while auto-instantiation is
    /// disabled.
    #[error(
        "cannot set value through `{path}` because it is null and auto-instantiation is disabled"
    )]
    NullIntermediate { path: String },

    /// Construction of a missing intermediate failed.
    #[error("cannot instantiate `{type_name}`: {reason}")]
    NotInstantiable { type_name: String, reason: String },

    /// A bean segment named no matching accessor.
    #[error("no property named `{name}` on `{class}`")]
    NoSuchProperty { name: String, class: String },

    /// A sequence was indexed with something that does not parse as an
    /// integer.
    #[error("invalid sequence index `{0}`")]
    InvalidIndex(String),

    #[error(transparent)]
    Resolve(#[from] TypeResolveError),
}
