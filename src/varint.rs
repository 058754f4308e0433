//! Variable-length integer primitives.
//!
//! Signed values are stored zigzag-mapped inside unsigned varints, so
//! every signed read is [`read`] composed with [`unzigzag`]. The same
//! [`unzigzag`] is used as a schema transform when a bit-packed header
//! field carries a zigzag-coded value.

use crate::stream::{ByteStream, EndOfStream};

/// Read an unsigned LEB128 variable-length integer.
///
/// Each byte contributes its low seven bits, least-significant group
/// first; a clear high bit ends the value. Groups past the 64-bit
/// boundary are discarded.
pub fn read(stream: &mut ByteStream) -> Result<u64, EndOfStream> {
    let mut value = 0;
    let mut shift = 0;

    loop {
        let byte = stream.read_byte()?;

        if shift < u64::BITS {
            value |= u64::from(byte & 0x7F) << shift;
        }
        shift += 7;

        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
}

/// Map a zigzag-coded unsigned integer back to its signed value.
///
/// The zigzag mapping interleaves signs (0, -1, 1, -2, 2, ...), keeping
/// small magnitudes small in unsigned form.
pub fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Read a zigzag-coded signed value stored as an unsigned varint.
pub fn read_signed(stream: &mut ByteStream) -> Result<i64, EndOfStream> {
    Ok(unzigzag(read(stream)?))
}
