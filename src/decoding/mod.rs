//! # CBOR decoder
//!
//! Decode functions producing [`Item`] trees.
//!
//! Decoding is a pure transformation of an input slice into an item and the
//! unconsumed rest of the slice. Nothing is kept between calls, so independent inputs
//! may be decoded from any number of threads.
//!
//! # Example
//!
//! ```
//! use cbor_tree::prelude::*;
//!
//! // two top-level items: 0 and "hi"
//! let input = [0x00, 0x62, b'h', b'i'];
//!
//! // decode them one by one
//! let (first, rest) = decode(&input).unwrap();
//! let (second, rest) = decode(rest).unwrap();
//!
//! assert_eq!(first.to_string(), "0");
//! assert_eq!(second.to_str().unwrap(), "hi");
//! assert!(rest.is_empty());
//!
//! // or let a `Decoder` walk the stream
//! let kinds: Vec<ItemKind> = Decoder::new(&input)
//!     .map(|item| item.unwrap().kind())
//!     .collect();
//!
//! assert_eq!(kinds, vec![ItemKind::Uint, ItemKind::Tstr]);
//! ```

#![allow(clippy::inconsistent_digit_grouping)]
use crate::{config::DecodeConfig, errors::DecodingError, Item};
use tracing::trace;

mod constants;
mod de;

/// Decodes one item from the front of `input` using the default [`DecodeConfig`].
///
/// Returns the item and the bytes following it.
///
/// # Arguments
///
/// * `input` - A buffer starting with an encoded item.
///
/// # Example
///
/// ```
/// use cbor_tree::prelude::*;
///
/// // tag 3 wrapping the unsigned integer 5
/// let (item, rest) = decode(&[0xc3, 0x05]).unwrap();
///
/// assert_eq!(item.tag(), Some(3));
/// assert_eq!(item.untagged().to_string(), "5");
/// assert!(rest.is_empty());
/// ```
pub fn decode(input: &[u8]) -> Result<(Item, &[u8]), DecodingError> {
    decode_with(input, &DecodeConfig::default())
}

/// Decodes one item from the front of `input` with an explicit configuration.
///
/// # Arguments
///
/// * `input` - A buffer starting with an encoded item.
/// * `config` - Limits and policies to apply.
pub fn decode_with<'a>(input: &'a [u8], config: &DecodeConfig) -> Result<(Item, &'a [u8]), DecodingError> {
    let mut rest = input;
    let item = de::decode_item(&mut rest, config, 0)?;
    trace!(
        kind = %item.kind(),
        consumed = input.len() - rest.len(),
        "decoded item"
    );
    Ok((item, rest))
}

/// Decodes every top-level item in `input`. The first failure aborts the stream.
///
/// # Example
///
/// ```
/// use cbor_tree::prelude::*;
///
/// assert_eq!(decode_all(&[0xf6, 0xf7]).unwrap(), vec![Item::Null, Item::Undefined]);
///
/// // the second item is a half-precision float
/// assert_eq!(
///     decode_all(&[0xf6, 0xf9, 0x3c, 0x00]),
///     Err(DecodingError::UnsupportedHalfFloat)
/// );
/// ```
pub fn decode_all(input: &[u8]) -> Result<Vec<Item>, DecodingError> { Decoder::new(input).collect() }

/// An iterator over the top-level items of a buffer.
///
/// Yields the first failure and then stops. [`Decoder::remaining`] points at the start
/// of the item that failed, so callers that want per-item reporting can inspect or
/// skip it themselves.
#[derive(Clone, Debug)]
pub struct Decoder<'a> {
    input: &'a [u8],
    config: DecodeConfig,
    failed: bool,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8]) -> Self { Self::with_config(input, DecodeConfig::default()) }

    pub fn with_config(input: &'a [u8], config: DecodeConfig) -> Self {
        Decoder {
            input,
            config,
            failed: false,
        }
    }

    /// The bytes not yet decoded.
    pub fn remaining(&self) -> &'a [u8] { self.input }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<crate::Item, DecodingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.input.is_empty() {
            return None;
        }
        match decode_with(self.input, &self.config) {
            Ok((item, rest)) => {
                self.input = rest;
                Some(Ok(item))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
