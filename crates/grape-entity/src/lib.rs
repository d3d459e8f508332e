//! # grape-entity — Entity Presentation
//!
//! Renders application records into output maps through a declared field
//! table, the response-side counterpart of `grape-params`.
//!
//! ## Building Blocks
//!
//! - [`Exposable`]: implemented by records to expose fields by name. This
//!   is an explicit lookup table; the [`exposable!`] macro writes it for
//!   structs whose fields convert into [`Value`](grape_core::Value).
//! - [`Entity`]: an ordered list of [`EntityField`] descriptors. Each one
//!   names a source field and may rename it, compute it, guard it with a
//!   predicate, give it a default or present it through a nested entity.
//! - [`Options`]: caller-supplied flags visible to predicates only.
//!
//! ## Example
//!
//! ```
//! use grape_core::{Map, Value};
//! use grape_entity::{exposable, Entity};
//!
//! struct User {
//!     name: String,
//!     age: i64,
//! }
//!
//! exposable!(User { "name" => name, "age" => age });
//!
//! let mut entity = Entity::new();
//! entity.field("name").as_key("full_name");
//! entity.field("age").when(|_, opts| opts.get("detailed") == Some(&Value::Bool(true)));
//!
//! let user = User { name: "John".into(), age: 30 };
//! let out = entity.present(&user, &Map::new());
//! assert_eq!(out.get("full_name"), Some(&Value::from("John")));
//! assert!(!out.contains_key("age"));
//! ```

pub mod entity;
pub mod expose;

pub use entity::{Entity, EntityField, FieldDoc, Options};
pub use expose::{AsAny, Exposable, Exposed};

/// Implements [`Exposable`] for a struct from a table of output names and
/// field identifiers.
///
/// Every listed field is cloned and converted with `Into<Value>`, so the
/// macro suits scalar fields, strings, vectors of scalars, options and
/// maps. Records holding nested records implement [`Exposable`] by hand and
/// return [`Exposed::record`] for those fields.
///
/// ```
/// use grape_entity::{exposable, Exposable};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// exposable!(Point { "X" => x, "Y" => y });
///
/// let p = Point { x: 1, y: 2 };
/// assert_eq!(p.field_names(), vec!["X", "Y"]);
/// assert!(p.expose("Z").is_none());
/// ```
#[macro_export]
macro_rules! exposable {
    ($ty:ty { $($name:literal => $field:ident),* $(,)? }) => {
        impl $crate::Exposable for $ty {
            fn expose(&self, field: &str) -> ::core::option::Option<$crate::Exposed<'_>> {
                match field {
                    $(
                        $name => ::core::option::Option::Some($crate::Exposed::value(
                            ::core::clone::Clone::clone(&self.$field),
                        )),
                    )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_names(&self) -> ::std::vec::Vec<&str> {
                ::std::vec![$($name),*]
            }
        }
    };
}
