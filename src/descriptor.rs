//! Input schema model: an already-parsed OpenAPI-style object description.
//!
//! A [`SchemaDescriptor`] is the root object schema of a record type; each of
//! its properties is a [`FieldDescriptor`] describing one field's type,
//! nullability, optional format refinement and optional default literal.
//! Nullability is tri-state because the source language distinguishes
//! "unspecified" from an explicit `nullable: false`; both mean REQUIRED.

use indexmap::IndexMap;
use serde_json::Value;

/// Root schema of a record type. The title names the resulting message type.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    pub title: String,
    pub properties: IndexMap<String, FieldDescriptor>,
}

impl SchemaDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            properties: IndexMap::new(),
        }
    }

    /// Append a field, preserving declaration order
    pub fn with_field(mut self, name: impl Into<String>, field: FieldDescriptor) -> Self {
        self.properties.insert(name.into(), field);
        self
    }
}

/// Primitive schema kinds recognized by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Password,
    Email,
    Uuid,
    Date,
    DateTime,
    Integer,
    Number,
    Boolean,
    Binary,
}

/// Value type of a map schema. Free-form maps (unconstrained
/// `additionalProperties`) carry no value schema and cannot be converted.
#[derive(Debug, Clone, PartialEq)]
pub enum MapValue {
    Schema(Box<FieldDescriptor>),
    FreeForm,
}

/// A node in the input schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDescriptor {
    Primitive {
        kind: PrimitiveKind,
        format: Option<String>,
        nullable: Option<bool>,
        default: Option<Value>,
    },
    Object {
        properties: IndexMap<String, FieldDescriptor>,
        nullable: Option<bool>,
    },
    Array {
        items: Box<FieldDescriptor>,
        nullable: Option<bool>,
        default: Option<Value>,
    },
    Map {
        value: MapValue,
        nullable: Option<bool>,
    },
}

impl FieldDescriptor {
    fn primitive(kind: PrimitiveKind) -> Self {
        FieldDescriptor::Primitive {
            kind,
            format: None,
            nullable: None,
            default: None,
        }
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    pub fn password() -> Self {
        Self::primitive(PrimitiveKind::Password)
    }

    pub fn email() -> Self {
        Self::primitive(PrimitiveKind::Email)
    }

    pub fn uuid() -> Self {
        Self::primitive(PrimitiveKind::Uuid)
    }

    pub fn date() -> Self {
        Self::primitive(PrimitiveKind::Date)
    }

    pub fn date_time() -> Self {
        Self::primitive(PrimitiveKind::DateTime)
    }

    pub fn integer() -> Self {
        Self::primitive(PrimitiveKind::Integer)
    }

    pub fn number() -> Self {
        Self::primitive(PrimitiveKind::Number)
    }

    pub fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Boolean)
    }

    pub fn binary() -> Self {
        Self::primitive(PrimitiveKind::Binary)
    }

    pub fn object(properties: IndexMap<String, FieldDescriptor>) -> Self {
        FieldDescriptor::Object {
            properties,
            nullable: None,
        }
    }

    pub fn array(items: FieldDescriptor) -> Self {
        FieldDescriptor::Array {
            items: Box::new(items),
            nullable: None,
            default: None,
        }
    }

    pub fn map(value: FieldDescriptor) -> Self {
        FieldDescriptor::Map {
            value: MapValue::Schema(Box::new(value)),
            nullable: None,
        }
    }

    pub fn free_form_map() -> Self {
        FieldDescriptor::Map {
            value: MapValue::FreeForm,
            nullable: None,
        }
    }

    /// Set the format refinement (only meaningful on primitives)
    pub fn with_format(mut self, fmt: impl Into<String>) -> Self {
        if let FieldDescriptor::Primitive { format, .. } = &mut self {
            *format = Some(fmt.into());
        }
        self
    }

    /// Set the default literal. Primitives and arrays may declare one;
    /// objects and maps may not.
    pub fn with_default(mut self, value: Value) -> Self {
        match &mut self {
            FieldDescriptor::Primitive { default, .. }
            | FieldDescriptor::Array { default, .. } => *default = Some(value),
            FieldDescriptor::Object { .. } | FieldDescriptor::Map { .. } => {}
        }
        self
    }

    /// Mark the field as explicitly nullable
    pub fn nullable(mut self) -> Self {
        match &mut self {
            FieldDescriptor::Primitive { nullable, .. }
            | FieldDescriptor::Object { nullable, .. }
            | FieldDescriptor::Array { nullable, .. }
            | FieldDescriptor::Map { nullable, .. } => *nullable = Some(true),
        }
        self
    }

    pub fn nullable_flag(&self) -> Option<bool> {
        match self {
            FieldDescriptor::Primitive { nullable, .. }
            | FieldDescriptor::Object { nullable, .. }
            | FieldDescriptor::Array { nullable, .. }
            | FieldDescriptor::Map { nullable, .. } => *nullable,
        }
    }

    /// Whether the field may be absent. Unspecified nullability means required.
    pub fn is_nullable(&self) -> bool {
        self.nullable_flag() == Some(true)
    }

    pub fn default_value(&self) -> Option<&Value> {
        match self {
            FieldDescriptor::Primitive { default, .. }
            | FieldDescriptor::Array { default, .. } => default.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_creation() {
        let descriptor = SchemaDescriptor::new("User")
            .with_field("id", FieldDescriptor::integer().with_format("int64"))
            .with_field("name", FieldDescriptor::string().nullable());

        assert_eq!(descriptor.title, "User");
        let names: Vec<_> = descriptor.properties.keys().collect();
        assert_eq!(names, vec!["id", "name"]);
    }

    #[test]
    fn test_nullability_defaults_to_required() {
        let field = FieldDescriptor::string();
        assert_eq!(field.nullable_flag(), None);
        assert!(!field.is_nullable());

        let field = FieldDescriptor::string().nullable();
        assert!(field.is_nullable());
    }

    #[test]
    fn test_defaults_on_primitives_and_arrays() {
        let field = FieldDescriptor::integer().with_default(json!(42));
        assert_eq!(field.default_value(), Some(&json!(42)));

        let field = FieldDescriptor::array(FieldDescriptor::integer());
        assert_eq!(field.default_value(), None);

        let field =
            FieldDescriptor::array(FieldDescriptor::integer()).with_default(json!([0, 1, 2]));
        assert_eq!(field.default_value(), Some(&json!([0, 1, 2])));

        let field = FieldDescriptor::object(IndexMap::new()).with_default(json!({}));
        assert_eq!(field.default_value(), None);
    }

    #[test]
    fn test_nested_descriptor() {
        let mut props = IndexMap::new();
        props.insert("inner".to_string(), FieldDescriptor::string());
        let field = FieldDescriptor::array(FieldDescriptor::object(props)).nullable();

        assert!(field.is_nullable());
        match field {
            FieldDescriptor::Array { items, .. } => {
                assert!(matches!(*items, FieldDescriptor::Object { .. }));
            }
            _ => panic!("expected array"),
        }
    }
}
