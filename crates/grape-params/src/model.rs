//! # Model Mapping
//!
//! Copies bound input into an application record through an explicit
//! per-type field table.
//!
//! A [`ModelBinding<T>`] lists, for each settable field of `T`, the input
//! key it reads and an accessor returning `&mut` to the field. Field names
//! given in PascalCase are matched against snake_case keys, so
//! `"FirstName"` reads `first_name`. Fields not listed in the table are
//! never touched.
//!
//! ```
//! use grape_core::{Map, Value};
//! use grape_params::{Input, ModelBinding};
//!
//! #[derive(Default)]
//! struct User {
//!     first_name: String,
//!     age: i64,
//! }
//!
//! let binding = ModelBinding::<User>::new()
//!     .field("FirstName", |u| &mut u.first_name)
//!     .field("Age", |u| &mut u.age);
//!
//! let mut map = Map::new();
//! map.insert("first_name".into(), Value::from("Ada"));
//! map.insert("age".into(), Value::Float(36.0));
//!
//! let mut user = User::default();
//! let assigned = Input::from(map).to_model(&mut user, &binding);
//! assert_eq!((assigned, user.first_name.as_str(), user.age), (2, "Ada", 36));
//! ```

use std::fmt;

use grape_core::{Map, Value};

use crate::input::Input;

/// Conversion from a bound value into a record field type.
///
/// Returns `None` when the value's shape is not convertible; the field is
/// then left untouched.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(*i).ok(),
                        Value::Float(f) if f.is_finite() => <$ty>::try_from(f.trunc() as i64).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_number()
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_number().map(|f| f as f32)
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for Map {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl<V: FromValue> FromValue for Option<V> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => V::from_value(other).map(Some),
        }
    }
}

impl<V: FromValue> FromValue for Vec<V> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_array()?.iter().map(V::from_value).collect()
    }
}

type Setter<T> = Box<dyn Fn(&mut T, &Value) -> bool + Send + Sync>;

/// Field table mapping input keys onto fields of `T`.
pub struct ModelBinding<T> {
    fields: Vec<(String, Setter<T>)>,
}

impl<T> fmt::Debug for ModelBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBinding")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> Default for ModelBinding<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T> ModelBinding<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input keys read by this table, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }
}

impl<T: 'static> ModelBinding<T> {
    /// Declares a settable field. `name` is converted with
    /// [`to_snake_case`] to obtain the input key.
    pub fn field<V, F>(mut self, name: &str, accessor: F) -> Self
    where
        V: FromValue + 'static,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        let setter = move |dst: &mut T, value: &Value| match V::from_value(value) {
            Some(converted) => {
                *accessor(dst) = converted;
                true
            }
            None => false,
        };
        self.fields.push((to_snake_case(name), Box::new(setter)));
        self
    }
}

impl Input {
    /// Copies bound values into `dst` according to `binding`.
    ///
    /// Null values never overwrite a field. Values that do not convert to
    /// the field's type are skipped. Returns the number of fields assigned.
    pub fn to_model<T>(&self, dst: &mut T, binding: &ModelBinding<T>) -> usize {
        let mut assigned = 0;
        for (key, setter) in &binding.fields {
            let Some(value) = self.get(key) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            if setter(dst, value) {
                assigned += 1;
            } else {
                tracing::trace!(key = %key, kind = value.type_name(), "skipped incompatible model field");
            }
        }
        assigned
    }
}

/// Converts a PascalCase or camelCase identifier to snake_case.
///
/// An underscore is inserted before an ASCII uppercase letter only when the
/// preceding byte is an ASCII lowercase letter, so runs of capitals stay
/// together: `UserID` becomes `user_id` and `XMLHttpRequest` becomes
/// `xmlhttp_request`.
pub fn to_snake_case(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = String::with_capacity(name.len() * 2);
    for (i, c) in name.char_indices() {
        if c.is_ascii_uppercase() {
            if i > 0 && bytes[i - 1].is_ascii_lowercase() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
