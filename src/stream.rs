//! Cursored access to an in-memory byte sequence.

use alloc::vec::Vec;

use thiserror::Error;

/// An error converting a hexadecimal string to bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HexError {
    /// Odd number of characters.
    #[error("Odd number of characters in a hex string.")]
    OddLength,
    /// A character outside `0-9a-fA-F`.
    #[error("Invalid hexadecimal digit at offset {0}.")]
    InvalidDigit(usize),
}

/// Unexpectedly reached the end of the byte sequence.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unexpectedly reached the end of the stream (length: {length}, index: {index}).")]
pub struct EndOfStream {
    /// Total length of the underlying byte sequence.
    pub length: usize,
    /// Cursor position at the time of the failed read.
    pub index: usize,
}

/// A byte sequence with a read cursor.
///
/// The cursor only ever moves forward, and only on successful reads: a
/// read requesting more bytes than remain fails without advancing.
#[derive(Debug)]
pub struct ByteStream {
    bytes: Vec<u8>,
    index: usize,
}

impl ByteStream {
    /// Wrap a byte sequence, with the cursor at its start.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            index: 0,
        }
    }

    /// Decode a hexadecimal string (case-insensitive) into a stream.
    pub fn from_hex(hex: &str) -> Result<Self, HexError> {
        let digits = hex.as_bytes();

        if digits.len() % 2 != 0 {
            Err(HexError::OddLength)?;
        }

        let mut bytes = Vec::with_capacity(digits.len() / 2);
        for (i, pair) in digits.chunks_exact(2).enumerate() {
            let high = nibble(pair[0]).ok_or(HexError::InvalidDigit(i * 2))?;
            let low = nibble(pair[1]).ok_or(HexError::InvalidDigit(i * 2 + 1))?;
            bytes.push(high << 4 | low);
        }

        Ok(Self::new(bytes))
    }

    /// Read the byte at the cursor, advancing past it.
    pub fn read_byte(&mut self) -> Result<u8, EndOfStream> {
        let byte = *self.bytes.get(self.index).ok_or(EndOfStream {
            length: self.bytes.len(),
            index: self.index,
        })?;

        self.index += 1;
        Ok(byte)
    }

    /// Read the next `n` bytes, advancing past them.
    pub fn read(&mut self, n: usize) -> Result<&[u8], EndOfStream> {
        let end = self.index + n;
        let bytes = self.bytes.get(self.index..end).ok_or(EndOfStream {
            length: self.bytes.len(),
            index: self.index,
        })?;

        self.index = end;
        Ok(bytes)
    }
}

fn nibble(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
