//! # Entity — Output Field Tables
//!
//! An [`Entity`] describes how to render a record into an output map.
//!
//! ## Per-Field Evaluation
//!
//! For each descriptor, in declaration order:
//!
//! 1. If a predicate is set and returns false, the field is omitted.
//! 2. If a transform is set, its result is used verbatim.
//! 3. Otherwise the source field is read from the record. A missing field,
//!    a `None` record or a zero value (`0`, `0.0`, `""`, `false`, null) is
//!    replaced by the default, or null when there is none.
//! 4. If a nested entity is set, the value is presented through it.
//! 5. The result is stored under the output key.
//!
//! Step 3 cannot tell a legitimately zero value from an absent one: a
//! field holding `0` with a default renders the default.

use std::fmt;
use std::sync::Arc;

use grape_core::{Map, Value};
use serde::Serialize;

use crate::expose::{Exposable, Exposed};

/// Presentation options, visible to predicates only.
pub type Options = Map;

type Transform = Arc<dyn Fn(&dyn Exposable) -> Value + Send + Sync>;
type Condition = Arc<dyn Fn(&dyn Exposable, &Options) -> bool + Send + Sync>;

/// One output field.
#[derive(Clone)]
pub struct EntityField {
    name: String,
    key: String,
    transform: Option<Transform>,
    condition: Option<Condition>,
    entity: Option<Arc<Entity>>,
    default: Option<Value>,
    desc: String,
    example: Option<Value>,
}

impl fmt::Debug for EntityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityField")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("transform", &self.transform.is_some())
            .field("condition", &self.condition.is_some())
            .field("entity", &self.entity)
            .field("default", &self.default)
            .field("desc", &self.desc)
            .field("example", &self.example)
            .finish()
    }
}

impl EntityField {
    fn new(name: String) -> Self {
        Self {
            key: name.clone(),
            name,
            transform: None,
            condition: None,
            entity: None,
            default: None,
            desc: String::new(),
            example: None,
        }
    }

    /// Renames the output key.
    pub fn as_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.key = key.into();
        self
    }

    /// Computes the value from the whole record instead of reading the
    /// source field.
    pub fn format_with<F>(&mut self, transform: F) -> &mut Self
    where
        F: Fn(&dyn Exposable) -> Value + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Typed variant of [`EntityField::format_with`]. Records of another
    /// type render null.
    pub fn format_as<T, F>(&mut self, transform: F) -> &mut Self
    where
        T: Exposable,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.format_with(move |obj| match obj.downcast_ref::<T>() {
            Some(record) => transform(record),
            None => {
                tracing::debug!(
                    expected = std::any::type_name::<T>(),
                    "typed transform skipped for a record of another type"
                );
                Value::Null
            }
        })
    }

    /// Includes the field only when `condition` holds.
    pub fn when<F>(&mut self, condition: F) -> &mut Self
    where
        F: Fn(&dyn Exposable, &Options) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    /// Typed variant of [`EntityField::when`]. Records of another type
    /// omit the field.
    pub fn when_as<T, F>(&mut self, condition: F) -> &mut Self
    where
        T: Exposable,
        F: Fn(&T, &Options) -> bool + Send + Sync + 'static,
    {
        self.when(move |obj, options| {
            obj.downcast_ref::<T>()
                .is_some_and(|record| condition(record, options))
        })
    }

    /// Presents the value through a nested entity.
    pub fn with_entity(&mut self, entity: impl Into<Arc<Entity>>) -> &mut Self {
        self.entity = Some(entity.into());
        self
    }

    /// Value used when the source field is missing or zero.
    pub fn default_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    pub fn desc(&mut self, desc: impl Into<String>) -> &mut Self {
        self.desc = desc.into();
        self
    }

    pub fn example(&mut self, example: impl Into<Value>) -> &mut Self {
        self.example = Some(example.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn nested(&self) -> Option<&Entity> {
        self.entity.as_deref()
    }

    fn resolve(&self, obj: &dyn Exposable, options: &Options) -> Value {
        let exposed = match &self.transform {
            Some(transform) => Exposed::Value(transform(obj)),
            None => match obj.expose(&self.name) {
                Some(exposed) if !exposed.is_zero() => exposed,
                _ => Exposed::Value(self.default.clone().unwrap_or_default()),
            },
        };
        match &self.entity {
            Some(entity) => entity.present_nested(exposed, options),
            None => exposed.into_value(),
        }
    }

    fn doc(&self) -> FieldDoc {
        FieldDoc {
            key: self.key.clone(),
            source: self.name.clone(),
            description: self.desc.clone(),
            example: self.example.clone(),
            default: self.default.clone(),
            computed: self.transform.is_some(),
            conditional: self.condition.is_some(),
            nested: self
                .entity
                .as_ref()
                .map(|e| e.documentation())
                .unwrap_or_default(),
        }
    }
}

/// Documentation view of one output field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDoc {
    pub key: String,
    pub source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub computed: bool,
    pub conditional: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<FieldDoc>,
}

/// An ordered output field table.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    fields: Vec<EntityField>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field whose output key defaults to `name`.
    pub fn field(&mut self, name: impl Into<String>) -> &mut EntityField {
        self.fields.push(EntityField::new(name.into()));
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }

    pub fn fields(&self) -> &[EntityField] {
        &self.fields
    }

    /// Renders `obj` into a fresh map.
    pub fn present(&self, obj: &dyn Exposable, options: &Options) -> Map {
        let mut out = Map::new();
        for field in &self.fields {
            if let Some(condition) = &field.condition {
                if !condition(obj, options) {
                    continue;
                }
            }
            out.insert(field.key.clone(), field.resolve(obj, options));
        }
        out
    }

    /// Renders an optional record; `None` yields an empty map.
    pub fn present_optional(&self, obj: Option<&dyn Exposable>, options: &Options) -> Map {
        obj.map(|obj| self.present(obj, options)).unwrap_or_default()
    }

    /// Renders each record, preserving order.
    pub fn present_slice<T: Exposable>(&self, items: &[T], options: &Options) -> Vec<Map> {
        items.iter().map(|item| self.present(item, options)).collect()
    }

    /// Renders a field value through this entity.
    ///
    /// Records are presented. Lists present each record or object element.
    /// Maps and objects keep their keys: record and object values are
    /// presented, other values are kept as they are. Scalars and nulls are
    /// returned unchanged.
    pub fn present_nested(&self, value: Exposed<'_>, options: &Options) -> Value {
        match value {
            Exposed::Record(record) => Value::Object(self.present(record, options)),
            Exposed::List(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.present_element(item, options))
                    .collect(),
            ),
            Exposed::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, entry)| {
                        let value = match entry {
                            Exposed::Record(record) => Value::Object(self.present(record, options)),
                            other => other.into_value(),
                        };
                        (key, value)
                    })
                    .collect(),
            ),
            Exposed::Value(Value::Object(map)) => Value::Object(
                map.into_iter()
                    .map(|(key, entry)| (key, self.present_element(Exposed::Value(entry), options)))
                    .collect(),
            ),
            Exposed::Value(Value::Array(items)) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.present_element(Exposed::Value(item), options))
                    .collect(),
            ),
            Exposed::Value(other) => other,
        }
    }

    fn present_element(&self, item: Exposed<'_>, options: &Options) -> Value {
        match item {
            Exposed::Record(record) => Value::Object(self.present(record, options)),
            Exposed::Value(Value::Object(map)) => Value::Object(self.present(&map, options)),
            other => other.into_value(),
        }
    }

    /// Documentation view of every field, nested entities included.
    pub fn documentation(&self) -> Vec<FieldDoc> {
        self.fields.iter().map(EntityField::doc).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposable;

    #[derive(Debug, Clone, Default)]
    struct User {
        name: String,
        age: i64,
        email: String,
    }

    exposable!(User { "Name" => name, "Age" => age, "Email" => email });

    fn john() -> User {
        User {
            name: "John".into(),
            age: 30,
            email: "john@example.com".into(),
        }
    }

    fn opts(pairs: &[(&str, Value)]) -> Options {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn field_defaults_key_to_name() {
        let mut entity = Entity::new();
        entity.field("Name");
        assert_eq!(entity.fields()[0].name(), "Name");
        assert_eq!(entity.fields()[0].key(), "Name");
    }

    #[test]
    fn duplicate_fields_are_appended() {
        let mut entity = Entity::new();
        entity.field("Name");
        entity.field("Name").as_key("alias");
        assert_eq!(entity.fields().len(), 2);
        let out = entity.present(&john(), &Options::new());
        assert_eq!(out["Name"], Value::from("John"));
        assert_eq!(out["alias"], Value::from("John"));
    }

    #[test]
    fn presents_basic_record() {
        let mut entity = Entity::new();
        entity.field("Name");
        entity.field("Age");
        let out = entity.present(&john(), &Options::new());
        assert_eq!(out["Name"], Value::from("John"));
        assert_eq!(out["Age"], Value::Int(30));
        assert!(!out.contains_key("Email"));
    }

    #[test]
    fn none_record_presents_empty() {
        let mut entity = Entity::new();
        entity.field("Name");
        assert!(entity.present_optional(None, &Options::new()).is_empty());
        let user = john();
        assert_eq!(entity.present_optional(Some(&user), &Options::new()).len(), 1);
    }

    #[test]
    fn renamed_keys() {
        let mut entity = Entity::new();
        entity.field("Name").as_key("full_name");
        entity.field("Age").as_key("user_age");
        let out = entity.present(&john(), &Options::new());
        assert_eq!(out["full_name"], Value::from("John"));
        assert_eq!(out["user_age"], Value::Int(30));
        assert!(!out.contains_key("Name"));
    }

    #[test]
    fn typed_transform() {
        let mut entity = Entity::new();
        entity.field("Name");
        entity
            .field("Age")
            .format_as(|u: &User| Value::Int(u.age + 1));
        let out = entity.present(&john(), &Options::new());
        assert_eq!(out["Age"], Value::Int(31));
    }

    #[test]
    fn typed_transform_on_other_type_is_null() {
        let mut entity = Entity::new();
        entity.field("Age").format_as(|u: &User| Value::Int(u.age));
        let out = entity.present(&Map::new(), &Options::new());
        assert!(out["Age"].is_null());
    }

    #[test]
    fn transform_result_used_verbatim() {
        let mut entity = Entity::new();
        entity
            .field("Missing")
            .default_value("ignored")
            .format_with(|_| Value::from(""));
        let out = entity.present(&john(), &Options::new());
        assert_eq!(out["Missing"], Value::from(""));
    }

    #[test]
    fn condition_on_record() {
        let mut entity = Entity::new();
        entity.field("Name");
        entity.field("Age").when_as(|u: &User, _| u.age >= 18);

        let out = entity.present(&john(), &Options::new());
        assert_eq!(out["Age"], Value::Int(30));

        let minor = User {
            name: "Jane".into(),
            age: 16,
            ..User::default()
        };
        let out = entity.present(&minor, &Options::new());
        assert_eq!(out["Name"], Value::from("Jane"));
        assert!(!out.contains_key("Age"));
    }

    #[test]
    fn conditions_on_options() {
        let mut entity = Entity::new();
        entity.field("Name");
        entity
            .field("Age")
            .when(|_, o| o.get("type") == Some(&Value::from("full")));
        entity
            .field("Email")
            .when(|_, o| o.get("include_email") == Some(&Value::Bool(true)));

        let out = entity.present(&john(), &Options::new());
        assert_eq!(out.len(), 1);

        let out = entity.present(&john(), &opts(&[("type", Value::from("full"))]));
        assert_eq!(out["Age"], Value::Int(30));
        assert!(!out.contains_key("Email"));

        let out = entity.present(&john(), &opts(&[("include_email", Value::Bool(true))]));
        assert!(!out.contains_key("Age"));
        assert_eq!(out["Email"], Value::from("john@example.com"));
    }

    #[test]
    fn zero_values_take_the_default() {
        let mut entity = Entity::new();
        entity.field("Name");
        entity.field("Email").default_value("Unknown");
        entity.field("Age").default_value(18);

        let user = User {
            name: "John".into(),
            ..User::default()
        };
        let out = entity.present(&user, &Options::new());
        assert_eq!(out["Email"], Value::from("Unknown"));
        assert_eq!(out["Age"], Value::Int(18));
    }

    #[test]
    fn missing_field_without_default_is_null() {
        let mut entity = Entity::new();
        entity.field("Nope");
        entity.field("Age");
        let out = entity.present(&User::default(), &Options::new());
        assert!(out["Nope"].is_null());
        assert!(out["Age"].is_null());
    }

    #[test]
    fn options_never_reach_output() {
        let mut entity = Entity::new();
        entity.field("Name");
        let out = entity.present(&john(), &opts(&[("secret", Value::from("x"))]));
        assert!(!out.contains_key("secret"));
    }

    #[test]
    fn nested_value_arrays_present_objects() {
        let mut inner = Entity::new();
        inner.field("city").as_key("City");
        let mut entity = Entity::new();
        entity.field("list").as_key("items").with_entity(inner);

        let mut a = Map::new();
        a.insert("city".into(), Value::from("Bergen"));
        a.insert("zip".into(), Value::from("5003"));
        let mut record = Map::new();
        record.insert(
            "list".into(),
            Value::Array(vec![Value::Object(a), Value::from(7)]),
        );

        let out = entity.present(&record, &Options::new());
        let items = out["items"].as_array().unwrap();
        let first = items[0].as_object().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first["City"], Value::from("Bergen"));
        assert_eq!(items[1], Value::Int(7));
    }

    #[test]
    fn nested_value_objects_keep_their_keys() {
        let mut inner = Entity::new();
        inner.field("city").as_key("City");
        let mut entity = Entity::new();
        entity.field("labels").with_entity(inner.clone());
        entity
            .field("computed")
            .format_with(|_| {
                let mut home = Map::new();
                home.insert("city".into(), Value::from("Tromso"));
                let mut m = Map::new();
                m.insert("home".into(), Value::Object(home));
                Value::Object(m)
            })
            .with_entity(inner);

        let mut home = Map::new();
        home.insert("city".into(), Value::from("Oslo"));
        home.insert("zip".into(), Value::from("0150"));
        let mut labels = Map::new();
        labels.insert("home".into(), Value::Object(home));
        labels.insert("count".into(), Value::Int(2));
        let mut record = Map::new();
        record.insert("labels".into(), Value::Object(labels));

        let out = entity.present(&record, &Options::new());
        let labels = out["labels"].as_object().unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels["count"], Value::Int(2));
        let home = labels["home"].as_object().unwrap();
        assert_eq!(home.len(), 1);
        assert_eq!(home["City"], Value::from("Oslo"));
        assert!(!labels.contains_key("City"));

        let computed = out["computed"].as_object().unwrap();
        assert_eq!(
            computed["home"].as_object().unwrap()["City"],
            Value::from("Tromso")
        );
    }

    struct Team {
        lead: User,
    }

    impl Exposable for Team {
        fn expose(&self, field: &str) -> Option<Exposed<'_>> {
            match field {
                "lead" => Some(Exposed::record(&self.lead)),
                _ => None,
            }
        }
    }

    #[test]
    fn all_zero_nested_record_is_presented() {
        let mut inner = Entity::new();
        inner.field("Name");
        inner.field("Age");
        let mut entity = Entity::new();
        entity
            .field("lead")
            .default_value("vacant")
            .with_entity(inner);

        let team = Team {
            lead: User::default(),
        };
        let out = entity.present(&team, &Options::new());
        let lead = out["lead"].as_object().unwrap();
        assert_eq!(lead.len(), 2);
        assert!(lead["Name"].is_null());
        assert!(lead["Age"].is_null());
    }

    #[test]
    fn present_nested_scalars_unchanged() {
        let entity = Entity::new();
        assert_eq!(
            entity.present_nested(Exposed::value("x"), &Options::new()),
            Value::from("x")
        );
        assert!(entity
            .present_nested(Exposed::Value(Value::Null), &Options::new())
            .is_null());
    }

    #[test]
    fn documentation_view() {
        let mut inner = Entity::new();
        inner.field("city").desc("City name").example("Oslo");
        let mut entity = Entity::new();
        entity
            .field("Name")
            .as_key("name")
            .desc("Full name")
            .example("John");
        entity
            .field("Age")
            .default_value(0)
            .when(|_, _| true)
            .format_with(|_| Value::Null);
        entity.field("address").with_entity(inner);

        let docs = entity.documentation();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].key, "name");
        assert_eq!(docs[0].source, "Name");
        assert_eq!(docs[0].description, "Full name");
        assert_eq!(docs[0].example, Some(Value::from("John")));
        assert!(docs[1].computed && docs[1].conditional);
        assert_eq!(docs[1].default, Some(Value::Int(0)));
        assert_eq!(docs[2].nested.len(), 1);

        let json = serde_json::to_value(&docs[0]).unwrap();
        assert!(json.get("nested").is_none());
        assert_eq!(json["description"], "Full name");
    }
}
