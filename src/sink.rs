//! Structural write-event contract between the encoder and the columnar sink.

use bytes::Bytes;

/// Receiver of the ordered structural write events for one or more records.
///
/// The encoder emits exactly one `start_message`/`end_message` pair per
/// record, brackets group values with `start_group`/`end_group`, brackets
/// every present field with `start_field`/`end_field` carrying the field's
/// name and its zero-based positional index among its parent's children, and
/// emits exactly one `add_*` call per scalar leaf. Strings are delivered
/// through [`add_binary`](RecordConsumer::add_binary) as UTF-8 bytes.
///
/// Implementations own the physical encoding entirely (pages, compression,
/// row groups); the encoder never buffers events and is not safe for
/// concurrent use of a single sink instance.
pub trait RecordConsumer {
    fn start_message(&mut self);
    fn end_message(&mut self);

    fn start_group(&mut self);
    fn end_group(&mut self);

    fn start_field(&mut self, name: &str, index: usize);
    fn end_field(&mut self, name: &str, index: usize);

    fn add_binary(&mut self, value: Bytes);
    fn add_integer(&mut self, value: i32);
    fn add_long(&mut self, value: i64);
    fn add_float(&mut self, value: f32);
    fn add_double(&mut self, value: f64);
    fn add_boolean(&mut self, value: bool);
}
