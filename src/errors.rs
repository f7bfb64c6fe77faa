use crate::ItemKind;
use failure::Fail;
use num_bigint::BigUint;
use std::{fmt, str::Utf8Error};

/// An error encountered when decoding fails.
///
/// Every variant aborts the current decode call; nothing is partially returned.
#[derive(Debug, Clone, PartialEq, Eq, Fail)]
pub enum DecodingError {
    /// The low five bits of a header byte are not legal for the item being read.
    #[fail(display = "invalid additional information for {}: {:#04x}", expected, byte)]
    InvalidLength { expected: ItemKind, byte: u8 },
    /// The high bits of a header byte name no known major type.
    #[fail(display = "unknown type byte: {:#04x}", _0)]
    UnknownType(u8),
    /// A simple-value header with an unrecognised low nibble, including a stray break.
    #[fail(display = "unrecognized simple value: {:#04x}", _0)]
    UnknownSimple(u8),
    /// Half-precision floats are a known encoding this decoder does not implement.
    #[fail(display = "half-precision floats are not supported")]
    UnsupportedHalfFloat,
    /// The input ended before the item did.
    #[fail(
        display = "truncated stream: needed {} bytes, {} remaining",
        needed, remaining
    )]
    Truncated { needed: usize, remaining: usize },
    /// A declared length or count does not fit in a `usize`.
    #[fail(display = "length {} for {} does not fit in a native integer", length, expected)]
    LengthOverflow { expected: ItemKind, length: BigUint },
    /// A chunk of an indefinite-length string has a different major type.
    #[fail(display = "expected {} chunk, found {:#04x}", expected, byte)]
    UnexpectedChunk { expected: ItemKind, byte: u8 },
    /// A text string is not valid UTF-8 under the strict policy.
    #[fail(display = "invalid utf-8 in text string: {}", _0)]
    InvalidUtf8(#[cause] Utf8Error),
    /// Nesting went deeper than the configured limit.
    #[fail(display = "nesting deeper than the limit of {}", _0)]
    DepthLimitExceeded(usize),
}

/// An error encountered when an [`Item`](crate::Item) is read as the wrong kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Fail)]
pub struct ConversionError {
    /// Every kind the accessor would have accepted.
    pub expected: &'static [ItemKind],
    pub found: ItemKind,
}

impl ConversionError {
    /// Creates a new `ConversionError`
    ///
    /// # Arguments
    ///
    /// * `expected` - The kinds the caller would have accepted.
    /// * `found` - The kind the item actually has.
    pub fn new(expected: &'static [ItemKind], found: ItemKind) -> Self { ConversionError { expected, found } }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "expected ")?;
        for (i, kind) in self.expected.iter().enumerate() {
            if i > 0 {
                write!(f, " or ")?;
            }
            write!(f, "{}", kind)?;
        }
        write!(f, ", found {}", self.found)
    }
}
