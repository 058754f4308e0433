//! Declarative reader for bit-packed structures.
//!
//! A [`Schema`] describes a nested record as a list of named fields, each
//! either a [`Leaf`] with a bit width or a nested group. Parsing consumes
//! bits from a [`ByteStream`] LSB-first within each byte, packing sibling
//! fields contiguously regardless of nesting or byte boundaries. This
//! expresses layouts a byte-aligned reader cannot, such as a 4-bit type
//! followed by four 1-bit flags sharing one byte.
//!
//! The bit position is carried by an explicit [`BitCursor`] owned by the
//! caller, so consecutive parses can either continue mid-byte (by reusing
//! a cursor) or start aligned (with a fresh one).
//!
//! # Example
//!
//! ```
//! use either::Either::Left;
//! use tracklet::bits::{BitCursor, Leaf, Schema};
//! use tracklet::stream::ByteStream;
//!
//! const NIBBLES: Schema = Schema(&[
//!     ("low", Left(Leaf::uint(4))),
//!     ("high", Left(Leaf::uint(4))),
//! ]);
//!
//! let mut stream = ByteStream::new([0x12]);
//! let record = NIBBLES.parse(&mut stream, &mut BitCursor::new())?;
//!
//! assert_eq!(record.uint("low"), 0x2);
//! assert_eq!(record.uint("high"), 0x1);
//! ```

use alloc::vec::Vec;

use either::Either::{self, Left, Right};

use crate::stream::{ByteStream, EndOfStream};

/// Interpretation of a leaf field's accumulated bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// An unsigned integer.
    Uint,
    /// A boolean; any nonzero accumulation is `true`.
    Bool,
}

/// A leaf field: a bit width and an interpretation.
#[derive(Debug, Clone, Copy)]
pub struct Leaf {
    kind: Kind,
    width: u32,
    transform: Option<fn(u64) -> i64>,
}

impl Leaf {
    /// An unsigned integer field of the given bit width.
    pub const fn uint(width: u32) -> Self {
        Self {
            kind: Kind::Uint,
            width,
            transform: None,
        }
    }

    /// A boolean field of the given bit width.
    pub const fn boolean(width: u32) -> Self {
        Self {
            kind: Kind::Bool,
            width,
            transform: None,
        }
    }

    /// A signed integer field: the accumulated bits are passed through
    /// `transform` before assignment into the record.
    pub const fn int(width: u32, transform: fn(u64) -> i64) -> Self {
        Self {
            kind: Kind::Uint,
            width,
            transform: Some(transform),
        }
    }
}

/// A field body: a leaf, or a nested group of fields.
pub type Field<'a> = Either<Leaf, Schema<'a>>;

/// An ordered list of named fields describing a bit-packed structure.
///
/// Schemas are plain data and can be built in `const` context.
#[derive(Debug, Clone, Copy)]
pub struct Schema<'a>(pub &'a [(&'a str, Field<'a>)]);

impl<'a> Schema<'a> {
    /// Parse one structure from the stream, depth-first in declaration
    /// order, consuming bits through `cursor`.
    ///
    /// Fails with [`EndOfStream`] when the schema's total width requires
    /// more bytes than remain.
    pub fn parse(
        &self,
        stream: &mut ByteStream,
        cursor: &mut BitCursor,
    ) -> Result<Record<'a>, EndOfStream> {
        let mut fields = Vec::with_capacity(self.0.len());

        for (name, field) in self.0 {
            let value = match field {
                Left(leaf) if leaf.width == 0 => match leaf.kind {
                    Kind::Uint => Value::Uint(0),
                    Kind::Bool => Value::Bool(false),
                },
                Left(leaf) => {
                    let raw = cursor.read(stream, leaf.width)?;

                    match (leaf.transform, leaf.kind) {
                        (Some(transform), _) => Value::Int(transform(raw)),
                        (None, Kind::Uint) => Value::Uint(raw),
                        (None, Kind::Bool) => Value::Bool(raw != 0),
                    }
                }
                Right(group) => Value::Group(group.parse(stream, cursor)?),
            };

            fields.push((*name, value));
        }

        Ok(Record(fields))
    }
}

/// Bit-granularity read position over a [`ByteStream`].
///
/// Holds at most one partially-consumed byte and the offset of the next
/// unread bit within it; once all eight bits are consumed the byte is
/// discarded and the next read fetches a fresh one from the stream.
#[derive(Debug, Default)]
pub struct BitCursor {
    pending: Option<(u8, u32)>,
}

impl BitCursor {
    /// A cursor with no pending byte, aligned to the stream's cursor.
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Consume `width` bits, LSB-first within each source byte, and
    /// accumulate them into bits `0..width` of the result.
    fn read(&mut self, stream: &mut ByteStream, width: u32) -> Result<u64, EndOfStream> {
        debug_assert!(width <= u64::BITS);

        let mut value = 0;

        for i in 0..width {
            let (byte, offset) = match self.pending {
                Some(pending) => pending,
                None => (stream.read_byte()?, 0),
            };

            value |= u64::from(byte >> offset & 1) << i;

            self.pending = (offset < 7).then_some((byte, offset + 1));
        }

        Ok(value)
    }
}

/// A parsed value: a leaf's interpretation, or a nested record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Uint(u64),
    Int(i64),
    Bool(bool),
    Group(Record<'a>),
}

/// A parsed structure mirroring its schema's shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<'a>(Vec<(&'a str, Value<'a>)>);

impl<'a> Record<'a> {
    /// Retrieve a field's value, if one was parsed under that name.
    pub fn get(&self, name: &str) -> Option<&Value<'a>> {
        self.0
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Retrieve an unsigned integer field.
    ///
    /// # Panics
    ///
    /// Panics if the field is absent or of another kind; the caller owns
    /// the schema, so a mismatch is a programming error.
    pub fn uint(&self, name: &str) -> u64 {
        match self.get(name) {
            Some(Value::Uint(value)) => *value,
            _ => panic!("no unsigned integer field {name:?}"),
        }
    }

    /// Retrieve a transformed signed integer field.
    ///
    /// # Panics
    ///
    /// Panics if the field is absent or of another kind.
    pub fn int(&self, name: &str) -> i64 {
        match self.get(name) {
            Some(Value::Int(value)) => *value,
            _ => panic!("no signed integer field {name:?}"),
        }
    }

    /// Retrieve a boolean field.
    ///
    /// # Panics
    ///
    /// Panics if the field is absent or of another kind.
    pub fn boolean(&self, name: &str) -> bool {
        match self.get(name) {
            Some(Value::Bool(value)) => *value,
            _ => panic!("no boolean field {name:?}"),
        }
    }

    /// Retrieve a nested record.
    ///
    /// # Panics
    ///
    /// Panics if the field is absent or of another kind.
    pub fn group(&self, name: &str) -> &Record<'a> {
        match self.get(name) {
            Some(Value::Group(record)) => record,
            _ => panic!("no group field {name:?}"),
        }
    }
}
