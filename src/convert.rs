//! Schema conversion: descriptor tree to Parquet message type.
//!
//! Arrays become the three-level LIST convention
//! (`group (LIST) { repeated group list { element } }`) and maps become the
//! MAP convention
//! (`group (MAP) { repeated group key_value { key; value } }`), with outer
//! repetitions derived from the source schema's nullability. Field order is
//! the descriptor's declaration order; the value writers rely on the
//! positional indices matching it.

use indexmap::IndexMap;
use tracing::debug;

use crate::descriptor::{FieldDescriptor, MapValue, PrimitiveKind, SchemaDescriptor};
use crate::error::{ParquetJsonError, Result};
use crate::schema::{LogicalType, MessageType, ParquetType, PhysicalType, Repetition, TimeUnit};

/// Convert a schema descriptor into a Parquet message type.
///
/// Fails with [`ParquetJsonError::UnsupportedSchema`] when a kind/format
/// combination has no columnar mapping, for free-form maps, and for arrays
/// of maps.
pub fn convert(descriptor: &SchemaDescriptor) -> Result<MessageType> {
    debug!(title = %descriptor.title, "converting schema descriptor to parquet message type");
    let fields = convert_fields(&descriptor.properties)?;
    Ok(MessageType {
        name: descriptor.title.clone(),
        fields,
    })
}

fn convert_fields(properties: &IndexMap<String, FieldDescriptor>) -> Result<Vec<ParquetType>> {
    properties
        .iter()
        .map(|(name, field)| convert_field(name, field))
        .collect()
}

// Unspecified nullability means required; the source language defaults to
// nullable=false.
fn repetition(nullable: Option<bool>) -> Repetition {
    match nullable {
        Some(true) => Repetition::Optional,
        _ => Repetition::Required,
    }
}

fn convert_field(name: &str, field: &FieldDescriptor) -> Result<ParquetType> {
    match field {
        FieldDescriptor::Primitive {
            kind,
            format,
            nullable,
            ..
        } => {
            let (physical, logical) = primitive_mapping(*kind, format.as_deref())?;
            Ok(ParquetType::Primitive {
                name: name.to_string(),
                repetition: repetition(*nullable),
                physical,
                logical,
            })
        }
        FieldDescriptor::Object {
            properties,
            nullable,
        } => Ok(ParquetType::Group {
            name: name.to_string(),
            repetition: repetition(*nullable),
            logical: None,
            fields: convert_fields(properties)?,
        }),
        FieldDescriptor::Array {
            items, nullable, ..
        } => {
            if matches!(items.as_ref(), FieldDescriptor::Map { .. }) {
                return Err(ParquetJsonError::unsupported(format!(
                    "array of maps is not supported (field '{}')",
                    name
                )));
            }
            let element = convert_field("element", items)?;
            Ok(ParquetType::Group {
                name: name.to_string(),
                repetition: repetition(*nullable),
                logical: Some(LogicalType::List),
                fields: vec![ParquetType::Group {
                    name: "list".to_string(),
                    repetition: Repetition::Repeated,
                    logical: None,
                    fields: vec![element],
                }],
            })
        }
        FieldDescriptor::Map { value, nullable } => {
            let value_schema = match value {
                MapValue::Schema(schema) => schema,
                MapValue::FreeForm => {
                    return Err(ParquetJsonError::unsupported(format!(
                        "free-form map has no columnar mapping (field '{}')",
                        name
                    )))
                }
            };
            // Map keys are always strings in the source schema language.
            let key = ParquetType::Primitive {
                name: "key".to_string(),
                repetition: Repetition::Required,
                physical: PhysicalType::Binary,
                logical: Some(LogicalType::String),
            };
            let value_type = convert_field("value", value_schema)?;
            Ok(ParquetType::Group {
                name: name.to_string(),
                repetition: repetition(*nullable),
                logical: Some(LogicalType::Map),
                fields: vec![ParquetType::Group {
                    name: "key_value".to_string(),
                    repetition: Repetition::Repeated,
                    logical: None,
                    fields: vec![key, value_type],
                }],
            })
        }
    }
}

fn primitive_mapping(
    kind: PrimitiveKind,
    format: Option<&str>,
) -> Result<(PhysicalType, Option<LogicalType>)> {
    let format = format.map(|f| f.to_ascii_lowercase());
    match kind {
        PrimitiveKind::String | PrimitiveKind::Password | PrimitiveKind::Email => {
            Ok((PhysicalType::Binary, Some(LogicalType::String)))
        }
        // No dedicated UUID physical type; stored as an annotated string.
        PrimitiveKind::Uuid => Ok((PhysicalType::Binary, Some(LogicalType::String))),
        PrimitiveKind::Date => Ok((PhysicalType::Int32, Some(LogicalType::Date))),
        PrimitiveKind::DateTime => Ok((
            PhysicalType::Int64,
            Some(LogicalType::Timestamp {
                unit: TimeUnit::Millis,
                adjusted_to_utc: true,
            }),
        )),
        PrimitiveKind::Binary => Ok((PhysicalType::Binary, None)),
        PrimitiveKind::Boolean => Ok((PhysicalType::Boolean, None)),
        PrimitiveKind::Integer => match format.as_deref() {
            None | Some("int32") => Ok((PhysicalType::Int32, None)),
            Some("int16") => Ok((
                PhysicalType::Int32,
                Some(LogicalType::Integer {
                    bit_width: 16,
                    signed: false,
                }),
            )),
            Some("int64") => Ok((PhysicalType::Int64, None)),
            Some(other) => Err(ParquetJsonError::unsupported(format!(
                "cannot convert integer: unknown format {}",
                other
            ))),
        },
        PrimitiveKind::Number => match format.as_deref() {
            None | Some("float") => Ok((PhysicalType::Float, None)),
            Some("double") => Ok((PhysicalType::Double, None)),
            Some(other) => Err(ParquetJsonError::unsupported(format!(
                "cannot convert number: unknown format {}",
                other
            ))),
        },
    }
}
