//! Test utilities for parquet-json

#[cfg(test)]
pub mod test {
    use bytes::Bytes;
    use indexmap::IndexMap;
    use serde_json::json;

    use crate::descriptor::{FieldDescriptor, SchemaDescriptor};
    use crate::sink::RecordConsumer;

    /// One recorded sink call, used to assert exact event ordering
    #[derive(Debug, Clone, PartialEq)]
    pub enum SinkEvent {
        StartMessage,
        EndMessage,
        StartGroup,
        EndGroup,
        StartField(String, usize),
        EndField(String, usize),
        Binary(Bytes),
        Integer(i32),
        Long(i64),
        Float(f32),
        Double(f64),
        Boolean(bool),
    }

    /// Sink that records every call in order
    #[derive(Debug, Default)]
    pub struct RecordingConsumer {
        pub events: Vec<SinkEvent>,
    }

    impl RecordingConsumer {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl RecordConsumer for RecordingConsumer {
        fn start_message(&mut self) {
            self.events.push(SinkEvent::StartMessage);
        }

        fn end_message(&mut self) {
            self.events.push(SinkEvent::EndMessage);
        }

        fn start_group(&mut self) {
            self.events.push(SinkEvent::StartGroup);
        }

        fn end_group(&mut self) {
            self.events.push(SinkEvent::EndGroup);
        }

        fn start_field(&mut self, name: &str, index: usize) {
            self.events.push(SinkEvent::StartField(name.to_string(), index));
        }

        fn end_field(&mut self, name: &str, index: usize) {
            self.events.push(SinkEvent::EndField(name.to_string(), index));
        }

        fn add_binary(&mut self, value: Bytes) {
            self.events.push(SinkEvent::Binary(value));
        }

        fn add_integer(&mut self, value: i32) {
            self.events.push(SinkEvent::Integer(value));
        }

        fn add_long(&mut self, value: i64) {
            self.events.push(SinkEvent::Long(value));
        }

        fn add_float(&mut self, value: f32) {
            self.events.push(SinkEvent::Float(value));
        }

        fn add_double(&mut self, value: f64) {
            self.events.push(SinkEvent::Double(value));
        }

        fn add_boolean(&mut self, value: bool) {
            self.events.push(SinkEvent::Boolean(value));
        }
    }

    pub fn start_field(name: &str, index: usize) -> SinkEvent {
        SinkEvent::StartField(name.to_string(), index)
    }

    pub fn end_field(name: &str, index: usize) -> SinkEvent {
        SinkEvent::EndField(name.to_string(), index)
    }

    pub fn binary(s: &str) -> SinkEvent {
        SinkEvent::Binary(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Flat descriptor covering every primitive mapping, with defaults on
    /// everything but the binary field
    pub fn primitives_descriptor() -> SchemaDescriptor {
        SchemaDescriptor::new("TestPrimitives")
            .with_field(
                "key_string",
                FieldDescriptor::string().with_default(json!("a string")),
            )
            .with_field(
                "key_int32",
                FieldDescriptor::integer().nullable().with_default(json!(1)),
            )
            .with_field(
                "key_int64",
                FieldDescriptor::integer()
                    .with_format("int64")
                    .nullable()
                    .with_default(json!(1)),
            )
            .with_field(
                "key_float",
                FieldDescriptor::number().nullable().with_default(json!(1.1)),
            )
            .with_field(
                "key_double",
                FieldDescriptor::number()
                    .with_format("double")
                    .nullable()
                    .with_default(json!(1.101)),
            )
            .with_field(
                "is_true",
                FieldDescriptor::boolean().nullable().with_default(json!(true)),
            )
            .with_field(
                "date",
                FieldDescriptor::date()
                    .nullable()
                    .with_default(json!("2020-01-01")),
            )
            .with_field(
                "datetime",
                FieldDescriptor::date_time()
                    .nullable()
                    .with_default(json!("2020-01-01T01:01:01.000Z")),
            )
            .with_field("key_bytes", FieldDescriptor::binary().nullable())
    }

    /// Object nesting with a date leaf and a list inside the nested group
    pub fn nested_structure_descriptor() -> SchemaDescriptor {
        let mut nested = IndexMap::new();
        nested.insert("key1".to_string(), FieldDescriptor::date());
        nested.insert(
            "key2".to_string(),
            FieldDescriptor::array(FieldDescriptor::integer()),
        );
        SchemaDescriptor::new("TestNestedStructure")
            .with_field("simple_key", FieldDescriptor::integer().nullable())
            .with_field("simple_nested", FieldDescriptor::object(nested))
    }
}
