//! Schema conversion and record encoding for JSON-shaped data targeting a
//! nested columnar (Parquet) layout.
//!
//! `parquet-json` turns an already-parsed OpenAPI-style object description
//! into a Parquet message type, and encodes JSON value trees against that
//! schema as an ordered stream of structural write events.
//!
//! # Key Components
//!
//! - **Descriptor**: the input schema model ([`SchemaDescriptor`] /
//!   [`FieldDescriptor`]) — named fields, nested objects, arrays, maps,
//!   nullability and default literals
//! - **Conversion**: [`convert`] maps the descriptor onto a [`MessageType`]
//!   honoring the Parquet LIST and MAP nesting conventions
//! - **Encoding**: [`JsonEncoder`] builds a writer tree mirroring the
//!   converted schema once, then walks each record through it, emitting
//!   `start`/`end` and `add_*` calls on a caller-supplied [`RecordConsumer`]
//!
//! The physical storage layout (pages, compression, row groups) belongs
//! entirely to the [`RecordConsumer`] implementation; this crate performs no
//! I/O of its own.
//!
//! # Example
//!
//! ```
//! use parquet_json::{FieldDescriptor, JsonEncoder, SchemaDescriptor, WriteOptions};
//!
//! let descriptor = SchemaDescriptor::new("Event")
//!     .with_field("name", FieldDescriptor::string())
//!     .with_field("count", FieldDescriptor::integer().nullable());
//!
//! let encoder = JsonEncoder::new(&descriptor, WriteOptions::default())?;
//! assert_eq!(encoder.schema().name, "Event");
//! # Ok::<(), parquet_json::ParquetJsonError>(())
//! ```

pub mod convert;
pub mod descriptor;
pub mod error;
pub mod schema;
pub mod sink;
pub mod writer;

#[cfg(test)]
pub mod test_utils;

pub use convert::convert;
pub use descriptor::{FieldDescriptor, MapValue, PrimitiveKind, SchemaDescriptor};
pub use error::{ParquetJsonError, Result};
pub use schema::{LogicalType, MessageType, ParquetType, PhysicalType, Repetition, TimeUnit};
pub use sink::RecordConsumer;
pub use writer::{JsonEncoder, WriteOptions};
