//! Record encoding: walks a JSON value tree in lock-step with a writer tree
//! mirroring the converted schema, emitting structural events to a
//! [`RecordConsumer`].
//!
//! The writer tree is built once per encoder and is immutable afterwards;
//! each node carries its field name and zero-based positional index among its
//! parent's children. Absent or null optional fields emit no events at all.
//! A failure mid-record leaves the sink with a partial event stream, so
//! callers must discard the in-progress output or treat the error as fatal to
//! the current destination; the encoder itself stays usable for subsequent
//! records.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use indexmap::IndexMap;
use jiff::tz::{Offset, TimeZone};
use serde_json::Value;
use tracing::trace;

use crate::convert::convert;
use crate::descriptor::{FieldDescriptor, MapValue, PrimitiveKind, SchemaDescriptor};
use crate::error::{ParquetJsonError, Result};
use crate::schema::{MessageType, ParquetType};
use crate::sink::RecordConsumer;

const SECONDS_PER_DAY: i64 = 86_400;

/// Per-instance encoding options
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Substitute a field's declared default when the field is missing from
    /// the source value
    pub write_default_value: bool,
    /// Substitute a field's declared default when the source value is
    /// explicitly null
    pub write_null_as_default: bool,
}

/// Encodes JSON records against a converted schema.
///
/// Construction converts the descriptor and builds the writer tree once;
/// [`write`](JsonEncoder::write) is then called per record. The encoder is
/// immutable across records and not safe for concurrent use of a single sink.
#[derive(Debug)]
pub struct JsonEncoder {
    schema: MessageType,
    root: Vec<FieldWriter>,
    options: WriteOptions,
}

impl JsonEncoder {
    pub fn new(descriptor: &SchemaDescriptor, options: WriteOptions) -> Result<Self> {
        let schema = convert(descriptor)?;
        let root = build_fields(&descriptor.properties, schema.fields())?;
        Ok(Self {
            schema,
            root,
            options,
        })
    }

    /// The converted schema this encoder writes against
    pub fn schema(&self) -> &MessageType {
        &self.schema
    }

    /// Encode one record as a single `start_message`/`end_message` bracketed
    /// event sequence.
    ///
    /// Fails with [`ParquetJsonError::TypeMismatch`] when a value's shape
    /// disagrees with its writer and [`ParquetJsonError::RequiredFieldMissing`]
    /// when a required field is absent with no substituted default.
    pub fn write<C: RecordConsumer>(&self, record: &Value, consumer: &mut C) -> Result<()> {
        let fields = record.as_object().ok_or_else(|| ParquetJsonError::TypeMismatch {
            field: self.schema.name.clone(),
            expected: "object",
            actual: json_type_name(record).to_string(),
        })?;

        trace!(message = %self.schema.name, "encoding record");
        consumer.start_message();
        write_object_fields(&self.root, fields, consumer, &self.options)?;
        consumer.end_message();
        Ok(())
    }
}

/// One node of the writer tree, bound to its field name and positional index
#[derive(Debug)]
struct FieldWriter {
    name: String,
    index: usize,
    required: bool,
    default: Option<Value>,
    kind: WriterKind,
}

#[derive(Debug)]
enum WriterKind {
    String,
    Binary,
    Int32,
    Int64,
    Float,
    Double,
    Boolean,
    Date,
    DateTime,
    Array(Box<FieldWriter>),
    Map {
        key: Box<FieldWriter>,
        value: Box<FieldWriter>,
    },
    Group(Vec<FieldWriter>),
}

fn build_fields(
    properties: &IndexMap<String, FieldDescriptor>,
    group_fields: &[ParquetType],
) -> Result<Vec<FieldWriter>> {
    properties
        .iter()
        .enumerate()
        .map(|(index, (name, field))| {
            let parquet_type = group_fields
                .iter()
                .find(|t| t.name() == name.as_str())
                .ok_or_else(|| {
                    ParquetJsonError::schema(format!(
                        "converted schema has no field named '{}'",
                        name
                    ))
                })?;
            build_writer(name, index, field, parquet_type)
        })
        .collect()
}

// Mirrors the converter's dispatch so the writer tree's shape is isomorphic
// to the converted schema. The parquet type supplies the nesting context the
// descriptor alone does not carry: array items resolve against the
// "list"/"element" sub-node and map values against "key_value"/"value", so
// nested field indices bind to the item's schema rather than the wrapper's.
fn build_writer(
    name: &str,
    index: usize,
    field: &FieldDescriptor,
    parquet_type: &ParquetType,
) -> Result<FieldWriter> {
    let kind = match field {
        FieldDescriptor::Primitive { kind, format, .. } => {
            scalar_kind(*kind, format.as_deref())?
        }
        FieldDescriptor::Object { properties, .. } => {
            WriterKind::Group(build_fields(properties, parquet_type.fields())?)
        }
        FieldDescriptor::Array { items, .. } => {
            if matches!(items.as_ref(), FieldDescriptor::Map { .. }) {
                return Err(ParquetJsonError::unsupported(format!(
                    "array of maps is not supported (field '{}')",
                    name
                )));
            }
            let element_type = parquet_type
                .field("list")
                .and_then(|list| list.field("element"))
                .ok_or_else(|| {
                    ParquetJsonError::schema(format!(
                        "list group for '{}' is missing its list/element nodes",
                        name
                    ))
                })?;
            WriterKind::Array(Box::new(build_writer("element", 0, items, element_type)?))
        }
        FieldDescriptor::Map { value, .. } => {
            let value_schema = match value {
                MapValue::Schema(schema) => schema,
                MapValue::FreeForm => {
                    return Err(ParquetJsonError::unsupported(format!(
                        "free-form map has no columnar mapping (field '{}')",
                        name
                    )))
                }
            };
            let value_type = parquet_type
                .field("key_value")
                .and_then(|kv| kv.field("value"))
                .ok_or_else(|| {
                    ParquetJsonError::schema(format!(
                        "map group for '{}' is missing its key_value/value nodes",
                        name
                    ))
                })?;
            // Map keys are always strings in the source schema language.
            let key = FieldWriter {
                name: "key".to_string(),
                index: 0,
                required: true,
                default: None,
                kind: WriterKind::String,
            };
            WriterKind::Map {
                key: Box::new(key),
                value: Box::new(build_writer("value", 1, value_schema, value_type)?),
            }
        }
    };

    Ok(FieldWriter {
        name: name.to_string(),
        index,
        required: !field.is_nullable(),
        default: field.default_value().cloned(),
        kind,
    })
}

fn scalar_kind(kind: PrimitiveKind, format: Option<&str>) -> Result<WriterKind> {
    let format = format.map(|f| f.to_ascii_lowercase());
    Ok(match kind {
        PrimitiveKind::String
        | PrimitiveKind::Password
        | PrimitiveKind::Email
        | PrimitiveKind::Uuid => WriterKind::String,
        PrimitiveKind::Binary => WriterKind::Binary,
        PrimitiveKind::Date => WriterKind::Date,
        PrimitiveKind::DateTime => WriterKind::DateTime,
        PrimitiveKind::Boolean => WriterKind::Boolean,
        PrimitiveKind::Integer => match format.as_deref() {
            None | Some("int16") | Some("int32") => WriterKind::Int32,
            Some("int64") => WriterKind::Int64,
            Some(other) => {
                return Err(ParquetJsonError::unsupported(format!(
                    "cannot build writer for integer: unknown format {}",
                    other
                )))
            }
        },
        PrimitiveKind::Number => match format.as_deref() {
            None | Some("float") => WriterKind::Float,
            Some("double") => WriterKind::Double,
            Some(other) => {
                return Err(ParquetJsonError::unsupported(format!(
                    "cannot build writer for number: unknown format {}",
                    other
                )))
            }
        },
    })
}

// Field traversal follows the schema's declared order; source keys without a
// schema field are ignored. Default substitution happens here, before the
// per-field null skip, so a substituted value flows through the normal path.
fn write_object_fields<C: RecordConsumer>(
    writers: &[FieldWriter],
    source: &serde_json::Map<String, Value>,
    consumer: &mut C,
    options: &WriteOptions,
) -> Result<()> {
    for writer in writers {
        match source.get(&writer.name) {
            Some(value) => {
                if value.is_null() && options.write_null_as_default {
                    if let Some(default) = &writer.default {
                        trace!(field = %writer.name, "substituting default for null value");
                        writer.write_field(default, consumer, options)?;
                        continue;
                    }
                }
                writer.write_field(value, consumer, options)?;
            }
            None => {
                if options.write_default_value {
                    if let Some(default) = &writer.default {
                        trace!(field = %writer.name, "substituting default for missing field");
                        writer.write_field(default, consumer, options)?;
                        continue;
                    }
                }
                if writer.required {
                    return Err(ParquetJsonError::RequiredFieldMissing(writer.name.clone()));
                }
            }
        }
    }
    Ok(())
}

impl FieldWriter {
    /// Bracket one present field with `start_field`/`end_field`. Null values
    /// emit nothing; empty and null arrays emit nothing.
    fn write_field<C: RecordConsumer>(
        &self,
        value: &Value,
        consumer: &mut C,
        options: &WriteOptions,
    ) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }

        if let WriterKind::Array(_) = self.kind {
            let items = value
                .as_array()
                .ok_or_else(|| self.mismatch("array", value))?;
            if items.is_empty() {
                return Ok(());
            }
        }

        consumer.start_field(&self.name, self.index);
        self.write_raw(value, consumer, options)?;
        consumer.end_field(&self.name, self.index);
        Ok(())
    }

    /// Emit the value itself, without the enclosing field bracketing
    fn write_raw<C: RecordConsumer>(
        &self,
        value: &Value,
        consumer: &mut C,
        options: &WriteOptions,
    ) -> Result<()> {
        match &self.kind {
            WriterKind::String => {
                let s = value
                    .as_str()
                    .ok_or_else(|| self.mismatch("string", value))?;
                consumer.add_binary(Bytes::copy_from_slice(s.as_bytes()));
            }
            WriterKind::Binary => {
                let s = value
                    .as_str()
                    .ok_or_else(|| self.mismatch("base64 string", value))?;
                let data = BASE64
                    .decode(s)
                    .map_err(|_| self.parse_mismatch("base64 string", s))?;
                consumer.add_binary(Bytes::from(data));
            }
            WriterKind::Int32 => {
                let n = value
                    .as_i64()
                    .and_then(|i| i32::try_from(i).ok())
                    .ok_or_else(|| self.mismatch("32-bit integer", value))?;
                consumer.add_integer(n);
            }
            WriterKind::Int64 => {
                let n = value
                    .as_i64()
                    .ok_or_else(|| self.mismatch("64-bit integer", value))?;
                consumer.add_long(n);
            }
            WriterKind::Float => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| self.mismatch("number", value))?;
                consumer.add_float(n as f32);
            }
            WriterKind::Double => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| self.mismatch("number", value))?;
                consumer.add_double(n);
            }
            WriterKind::Boolean => {
                let b = value
                    .as_bool()
                    .ok_or_else(|| self.mismatch("boolean", value))?;
                consumer.add_boolean(b);
            }
            WriterKind::Date => {
                let s = value
                    .as_str()
                    .ok_or_else(|| self.mismatch("date string", value))?;
                consumer.add_integer(self.epoch_days(s)?);
            }
            WriterKind::DateTime => {
                let s = value
                    .as_str()
                    .ok_or_else(|| self.mismatch("date-time string", value))?;
                let timestamp: jiff::Timestamp = s
                    .parse()
                    .map_err(|_| self.parse_mismatch("RFC 3339 date-time string", s))?;
                consumer.add_long(timestamp.as_millisecond());
            }
            WriterKind::Group(fields) => {
                let object = value
                    .as_object()
                    .ok_or_else(|| self.mismatch("object", value))?;
                consumer.start_group();
                write_object_fields(fields, object, consumer, options)?;
                consumer.end_group();
            }
            WriterKind::Array(item) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| self.mismatch("array", value))?;
                consumer.start_group();
                consumer.start_field("list", 0);
                for element in items {
                    consumer.start_group();
                    consumer.start_field("element", 0);
                    item.write_raw(element, consumer, options)?;
                    consumer.end_field("element", 0);
                    consumer.end_group();
                }
                consumer.end_field("list", 0);
                consumer.end_group();
            }
            WriterKind::Map { key, value: value_writer } => {
                let entries = value
                    .as_object()
                    .ok_or_else(|| self.mismatch("object", value))?;
                consumer.start_group();
                consumer.start_field("key_value", 0);
                for (entry_key, entry_value) in entries {
                    consumer.start_group();
                    let key_value = Value::String(entry_key.clone());
                    key.write_field(&key_value, consumer, options)?;
                    value_writer.write_field(entry_value, consumer, options)?;
                    consumer.end_group();
                }
                consumer.end_field("key_value", 0);
                consumer.end_group();
            }
        }
        Ok(())
    }

    // Days since 1970-01-01 for a calendar date, computed through an
    // epoch-anchored UTC timestamp.
    fn epoch_days(&self, s: &str) -> Result<i32> {
        let date: jiff::civil::Date = s
            .parse()
            .map_err(|_| self.parse_mismatch("ISO 8601 date string", s))?;
        let midnight = date
            .at(0, 0, 0, 0)
            .to_zoned(TimeZone::fixed(Offset::constant(0)))
            .map_err(|_| self.parse_mismatch("ISO 8601 date string", s))?;
        Ok(midnight.timestamp().as_second().div_euclid(SECONDS_PER_DAY) as i32)
    }

    fn mismatch(&self, expected: &'static str, value: &Value) -> ParquetJsonError {
        ParquetJsonError::TypeMismatch {
            field: self.name.clone(),
            expected,
            actual: json_type_name(value).to_string(),
        }
    }

    fn parse_mismatch(&self, expected: &'static str, text: &str) -> ParquetJsonError {
        ParquetJsonError::TypeMismatch {
            field: self.name.clone(),
            expected,
            actual: format!("\"{}\"", text),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
