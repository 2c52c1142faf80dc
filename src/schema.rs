//! Output schema model: a nested Parquet message type.
//!
//! This is a self-contained representation of the converted schema; the
//! physical sink owns the actual storage layout. The [`std::fmt::Display`]
//! impl renders the canonical parquet-mr textual form, which is what the
//! conversion tests assert against.

use std::fmt;

/// Repetition of a field in the converted schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repetition {
    /// Field must have exactly one value
    Required,
    /// Field can have 0 or 1 value
    Optional,
    /// Field can have 0 or more values
    Repeated,
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repetition::Required => write!(f, "required"),
            Repetition::Optional => write!(f, "optional"),
            Repetition::Repeated => write!(f, "repeated"),
        }
    }
}

/// Physical leaf types the converter emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    Float,
    Double,
    Binary,
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalType::Boolean => write!(f, "boolean"),
            PhysicalType::Int32 => write!(f, "int32"),
            PhysicalType::Int64 => write!(f, "int64"),
            PhysicalType::Float => write!(f, "float"),
            PhysicalType::Double => write!(f, "double"),
            PhysicalType::Binary => write!(f, "binary"),
        }
    }
}

/// Timestamp precision. Only milliseconds are produced today; the unit is
/// kept explicit because the annotation prints it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Millis,
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Millis => write!(f, "MILLIS"),
        }
    }
}

/// Logical annotations attached to physical types or groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    String,
    Date,
    Timestamp {
        unit: TimeUnit,
        adjusted_to_utc: bool,
    },
    Integer {
        bit_width: u8,
        signed: bool,
    },
    List,
    Map,
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::String => write!(f, "STRING"),
            LogicalType::Date => write!(f, "DATE"),
            LogicalType::Timestamp {
                unit,
                adjusted_to_utc,
            } => write!(f, "TIMESTAMP({},{})", unit, adjusted_to_utc),
            LogicalType::Integer { bit_width, signed } => {
                write!(f, "INTEGER({},{})", bit_width, signed)
            }
            LogicalType::List => write!(f, "LIST"),
            LogicalType::Map => write!(f, "MAP"),
        }
    }
}

/// A node in the converted schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum ParquetType {
    Primitive {
        name: String,
        repetition: Repetition,
        physical: PhysicalType,
        logical: Option<LogicalType>,
    },
    Group {
        name: String,
        repetition: Repetition,
        logical: Option<LogicalType>,
        fields: Vec<ParquetType>,
    },
}

impl ParquetType {
    pub fn name(&self) -> &str {
        match self {
            ParquetType::Primitive { name, .. } => name,
            ParquetType::Group { name, .. } => name,
        }
    }

    pub fn repetition(&self) -> Repetition {
        match self {
            ParquetType::Primitive { repetition, .. } => *repetition,
            ParquetType::Group { repetition, .. } => *repetition,
        }
    }

    /// Child fields, in declaration order. Empty for primitives.
    pub fn fields(&self) -> &[ParquetType] {
        match self {
            ParquetType::Primitive { .. } => &[],
            ParquetType::Group { fields, .. } => fields,
        }
    }

    /// Look up a child field by name
    pub fn field(&self, name: &str) -> Option<&ParquetType> {
        self.fields().iter().find(|t| t.name() == name)
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        match self {
            ParquetType::Primitive {
                name,
                repetition,
                physical,
                logical,
            } => {
                write!(f, "{}{} {} {}", pad, repetition, physical, name)?;
                if let Some(logical) = logical {
                    write!(f, " ({})", logical)?;
                }
                writeln!(f, ";")
            }
            ParquetType::Group {
                name,
                repetition,
                logical,
                fields,
            } => {
                write!(f, "{}{} group {}", pad, repetition, name)?;
                if let Some(logical) = logical {
                    write!(f, " ({})", logical)?;
                }
                writeln!(f, " {{")?;
                for field in fields {
                    field.fmt_indented(f, indent + 1)?;
                }
                writeln!(f, "{}}}", pad)
            }
        }
    }
}

/// The converted root schema of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct MessageType {
    pub name: String,
    pub fields: Vec<ParquetType>,
}

impl MessageType {
    pub fn fields(&self) -> &[ParquetType] {
        &self.fields
    }

    /// Look up a top-level field by name
    pub fn field(&self, name: &str) -> Option<&ParquetType> {
        self.fields.iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "message {} {{", self.name)?;
        for field in &self.fields {
            field.fmt_indented(f, 1)?;
        }
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, repetition: Repetition) -> ParquetType {
        ParquetType::Primitive {
            name: name.to_string(),
            repetition,
            physical: PhysicalType::Binary,
            logical: Some(LogicalType::String),
        }
    }

    #[test]
    fn test_field_lookup() {
        let message = MessageType {
            name: "Doc".to_string(),
            fields: vec![
                leaf("a", Repetition::Required),
                leaf("b", Repetition::Optional),
            ],
        };

        assert_eq!(message.field("b").map(|t| t.name()), Some("b"));
        assert!(message.field("missing").is_none());
    }

    #[test]
    fn test_display_primitives() {
        let message = MessageType {
            name: "Doc".to_string(),
            fields: vec![
                leaf("title", Repetition::Required),
                ParquetType::Primitive {
                    name: "count".to_string(),
                    repetition: Repetition::Optional,
                    physical: PhysicalType::Int32,
                    logical: None,
                },
            ],
        };

        let expected = "\
message Doc {
  required binary title (STRING);
  optional int32 count;
}
";
        assert_eq!(message.to_string(), expected);
    }

    #[test]
    fn test_display_annotated_group() {
        let message = MessageType {
            name: "Doc".to_string(),
            fields: vec![ParquetType::Group {
                name: "tags".to_string(),
                repetition: Repetition::Required,
                logical: Some(LogicalType::List),
                fields: vec![ParquetType::Group {
                    name: "list".to_string(),
                    repetition: Repetition::Repeated,
                    logical: None,
                    fields: vec![leaf("element", Repetition::Required)],
                }],
            }],
        };

        let expected = "\
message Doc {
  required group tags (LIST) {
    repeated group list {
      required binary element (STRING);
    }
  }
}
";
        assert_eq!(message.to_string(), expected);
    }

    #[test]
    fn test_logical_type_rendering() {
        assert_eq!(
            LogicalType::Timestamp {
                unit: TimeUnit::Millis,
                adjusted_to_utc: true
            }
            .to_string(),
            "TIMESTAMP(MILLIS,true)"
        );
        assert_eq!(
            LogicalType::Integer {
                bit_width: 16,
                signed: false
            }
            .to_string(),
            "INTEGER(16,false)"
        );
    }
}
