//! Decoding of TWKB point tracks.
//!
//! A track is a bit-packed header, an extended-dimensions varint, a point
//! count, then `count` triples of zigzag-varint deltas (dx, dy, dt).
//! Coordinates and times are fixed-point: accumulated deltas are scaled
//! by a power of ten declared in the header.

use alloc::vec::Vec;

use either::Either::{Left, Right};
use tartan_bitfield::bitfield;
use thiserror::Error;

use crate::bits::{BitCursor, Leaf, Schema};
use crate::stream::{ByteStream, EndOfStream, HexError};
use crate::varint;

/// An error decoding a track.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Malformed hexadecimal input.
    #[error("Malformed hexadecimal input: {0}")]
    Hex(#[from] HexError),
    /// The encoding ended before the declared content.
    #[error(transparent)]
    EndOfStream(#[from] EndOfStream),
    /// The header declares a bounding box, or no extended dimensions.
    #[error("Malformed track data: has a bounding box or is missing extended dimensions.")]
    UnsupportedLayout,
    /// The extended dimensions lack an M (time) value.
    #[error("Malformed track data: M dimension not found.")]
    MissingTime,
}

/// An absolute track point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
    pub time: f64,
}

const HEADER: Schema = Schema(&[
    ("geometry_type", Left(Leaf::uint(4))),
    ("precision", Left(Leaf::int(4, varint::unzigzag))),
    (
        "meta",
        Right(Schema(&[
            ("has_bounding_box", Left(Leaf::boolean(1))),
            ("has_size", Left(Leaf::boolean(1))),
            ("reserved", Left(Leaf::boolean(1))),
            ("has_extended_dimensions", Left(Leaf::boolean(1))),
        ])),
    ),
]);

/// The leading bit-packed fields of a track encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// TWKB geometry type tag.
    pub geometry_type: u8,
    /// Coordinate precision: decimal digits of fixed-point scaling, may
    /// be negative.
    pub precision: i32,
    pub has_bounding_box: bool,
    pub has_size: bool,
    pub has_extended_dimensions: bool,
}

impl Header {
    /// Read the header and metadata flags from the stream.
    pub fn read(stream: &mut ByteStream, cursor: &mut BitCursor) -> Result<Self, EndOfStream> {
        let record = HEADER.parse(stream, cursor)?;
        let meta = record.group("meta");

        Ok(Self {
            geometry_type: record.uint("geometry_type") as u8,
            precision: record.int("precision") as i32,
            has_bounding_box: meta.boolean("has_bounding_box"),
            has_size: meta.boolean("has_size"),
            has_extended_dimensions: meta.boolean("has_extended_dimensions"),
        })
    }
}

/// Decode a track from a byte stream positioned at its header.
///
/// Returns the decoded points in input order. Decoding is atomic: any
/// failure discards all progress.
pub fn decode(stream: &mut ByteStream) -> Result<Vec<Point>, Error> {
    let header = Header::read(stream, &mut BitCursor::new())?;

    if header.has_bounding_box || !header.has_extended_dimensions {
        Err(Error::UnsupportedLayout)?;
    }

    bitfield! {
        struct Dimensions(u8) {
            [1] has_time,
            [5..8] time_precision: u8,
        }
    }

    let dimensions = Dimensions(varint::read(stream)? as u8);

    if !dimensions.has_time() {
        Err(Error::MissingTime)?;
    }

    let fac_xy = pow10(header.precision);
    let fac_m = pow10(dimensions.time_precision() as i32);

    let count = varint::read(stream)?;
    let mut points = Vec::new();

    let mut lx: i64 = 0;
    let mut ly: i64 = 0;
    let mut lt: u64 = 0;

    for _ in 0..count {
        let dx = varint::read_signed(stream)?;
        let dy = varint::read_signed(stream)?;
        let dt = varint::read_signed(stream)?;

        lx += dx;
        ly += dy;
        // Time deltas accumulate by magnitude only.
        lt += dt.unsigned_abs();

        points.push(Point {
            latitude: ly as f64 / fac_xy,
            longitude: lx as f64 / fac_xy,
            time: -(lt as f64) / fac_m * 4000.0,
        });
    }

    Ok(points)
}

/// Decode a track from its hexadecimal encoding.
pub fn decode_hex(hex: &str) -> Result<Vec<Point>, Error> {
    decode(&mut ByteStream::from_hex(hex)?)
}

/// Fixed-point scale factor for a signed decimal precision.
fn pow10(precision: i32) -> f64 {
    let magnitude = 10u64.pow(precision.unsigned_abs()) as f64;

    if precision < 0 {
        1.0 / magnitude
    } else {
        magnitude
    }
}
