//! Reflective property-path navigation over a dynamic value model.
//!
//! Paths such as `orders[2].customer.name` are walked one segment at a
//! time across beans, sequences and maps. [`MetaClass`] answers static
//! questions from declared metadata alone (which properties exist, what
//! resolved type a path reads or writes), while [`MetaObject`] navigates a
//! live [`Value`] graph: reads short-circuit to `Null` across missing
//! data, and deep writes can build missing intermediates through an
//! [`ObjectFactory`].
//!
//! Declared types come from a [`beanpath_types::TypeStore`], with generics
//! resolved against the concrete owning type, so `getOrders()` declared as
//! `List<T>` on a supertype reports the substituted element type here.

mod error;
mod factory;
mod meta_class;
mod meta_object;
mod property;
mod value;
mod wrapper;

pub use error::{MetaError, MetaResult};
pub use factory::{DefaultObjectFactory, ObjectFactory};
pub use meta_class::{MetaClass, Property};
pub use meta_object::MetaObject;
pub use property::PropertyTokenizer;
pub use value::{Bean, Value};
pub use wrapper::{BeanWrapper, CollectionWrapper, MapWrapper, ObjectWrapper};
