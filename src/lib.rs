#![no_std]

//! A decoder for TWKB-encoded point tracks with a time dimension.
//!
//! Tracklet decodes the compact "Tiny Well-Known Binary" track variant:
//! a bit-packed header followed by a stream of delta-compressed,
//! zigzag-and-varint-coded coordinate and time values. Decoding recovers
//! an ordered sequence of [`Point`]s with absolute latitude, longitude,
//! and time.
//!
//! Most users should begin with [`decode_hex`] or [`decode`]. The building
//! blocks are exposed for applications parsing related formats: a cursored
//! byte source in the [`stream`] module, variable-length integer
//! primitives in [`varint`], and a declarative bit-field structure reader
//! in [`bits`].
//!
//! Only the point-track layout with extended (M/time) dimensions and
//! without a bounding box or size prefix is supported; other TWKB
//! geometries are rejected during header validation. Encoding is out of
//! scope.

extern crate alloc;

pub mod bits;
pub mod stream;
pub mod track;
pub mod varint;

pub use track::{Point, decode, decode_hex};
