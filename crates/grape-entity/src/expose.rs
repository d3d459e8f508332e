//! # Exposable Records
//!
//! Records are read through [`Exposable::expose`], which returns the named
//! field as an [`Exposed`] view. A view is either a plain [`Value`] or a
//! borrowed record (or a list/map of them), so nested presenters can walk
//! into sub-records without the record being serialized first.
//!
//! A field that does not exist is `None`. A field that exists but holds no
//! record (a `None` option) is `Exposed::Value(Value::Null)`.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};

use grape_core::{Map, Value};

/// Upcast to [`Any`], used for typed transforms and predicates.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A record that exposes its fields by name.
pub trait Exposable: AsAny {
    /// Returns the named field, or `None` if the record has no such field.
    fn expose(&self, field: &str) -> Option<Exposed<'_>>;

    /// Field names in their natural order. Used when a record is rendered
    /// without an entity.
    fn field_names(&self) -> Vec<&str> {
        Vec::new()
    }
}

impl<'a> dyn Exposable + 'a {
    /// Returns the record as `T` if that is its concrete type.
    pub fn downcast_ref<T: Exposable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Renders every field from [`Exposable::field_names`] into a map.
    pub fn to_map(&self) -> Map {
        self.field_names()
            .into_iter()
            .filter_map(|name| {
                let value = self.expose(name)?.into_value();
                Some((name.to_owned(), value))
            })
            .collect()
    }
}

impl Exposable for Map {
    fn expose(&self, field: &str) -> Option<Exposed<'_>> {
        self.get(field).cloned().map(Exposed::Value)
    }

    fn field_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

/// A borrowed view of a record field.
pub enum Exposed<'a> {
    /// A plain value.
    Value(Value),
    /// A nested record.
    Record(&'a dyn Exposable),
    /// A sequence of views.
    List(Vec<Exposed<'a>>),
    /// A string-keyed collection of views.
    Map(BTreeMap<String, Exposed<'a>>),
}

impl std::fmt::Debug for Exposed<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Record(r) => f.debug_tuple("Record").field(&r.field_names()).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Map(map) => f.debug_tuple("Map").field(map).finish(),
        }
    }
}

impl<'a> Exposed<'a> {
    /// Wraps anything convertible into a [`Value`].
    pub fn value(v: impl Into<Value>) -> Self {
        Self::Value(v.into())
    }

    /// Borrows a nested record.
    pub fn record<T: Exposable>(record: &'a T) -> Self {
        Self::Record(record)
    }

    /// Borrows an optional record; `None` becomes `Value(Null)`.
    pub fn optional<T: Exposable>(record: Option<&'a T>) -> Self {
        match record {
            Some(r) => Self::Record(r),
            None => Self::Value(Value::Null),
        }
    }

    /// Borrows a slice of records.
    pub fn records<T: Exposable>(records: &'a [T]) -> Self {
        Self::List(records.iter().map(|r| Self::Record(r)).collect())
    }

    /// Borrows a keyed collection of records.
    pub fn record_map<T: Exposable>(records: &'a HashMap<String, T>) -> Self {
        Self::Map(
            records
                .iter()
                .map(|(k, r)| (k.clone(), Self::Record(r)))
                .collect(),
        )
    }

    /// Returns true when the view holds a zero value.
    ///
    /// Only plain values can be zero. Records, lists and maps never are.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Value(v) => v.is_zero(),
            Self::Record(_) | Self::List(_) | Self::Map(_) => false,
        }
    }

    /// Renders the view into a plain value. Records become objects built
    /// from their [`Exposable::field_names`].
    pub fn into_value(self) -> Value {
        match self {
            Self::Value(v) => v,
            Self::Record(r) => Value::Object(r.to_map()),
            Self::List(items) => Value::Array(items.into_iter().map(Self::into_value).collect()),
            Self::Map(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, v.into_value())).collect())
            }
        }
    }
}

impl From<Value> for Exposed<'_> {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}
