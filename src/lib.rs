//! # cbor-tree
//!
//! A structural decoder for the Concise Binary Object Representation (CBOR). Input
//! bytes are turned into a tree of [`Item`]s that remembers not only the values but
//! also how every length and integer was laid out, so that a re-encoder could
//! reproduce the original bytes exactly rather than a canonically minimal form.
//!
//! # Usage
//!
//! ```
//! use cbor_tree::prelude::*;
//!
//! // [1, "a"] followed by a second top-level item, `true`
//! let input = [0x82, 0x01, 0x61, b'a', 0xf5];
//!
//! let (item, rest) = decode(&input).unwrap();
//!
//! assert_eq!(item.to_string(), "[1, \"a\"]");
//! assert_eq!(rest, &[0xf5]);
//!
//! // decode the whole stream at once
//! let items = decode_all(&input).unwrap();
//! assert_eq!(items.len(), 2);
//! assert_eq!(items[1], Item::Bool(true));
//! ```
//!
//! # Header bytes
//!
//! Every item starts with a header byte:
//!
//! | xxx        | xxxxx                  |
//! | ---        | ---                    |
//! | Major type | Additional information |
//!
//! The major types are:
//!
//! | Bits  | Kind                                      |
//! | ---   | ---                                       |
//! | `000` | unsigned integer                          |
//! | `001` | negative integer, `-1 - n`                |
//! | `010` | byte string                               |
//! | `011` | text string                               |
//! | `100` | array                                     |
//! | `101` | map                                       |
//! | `110` | tagged item                               |
//! | `111` | floats and simple values                  |
//!
//! ## Additional information
//!
//! For integers, string lengths, and array and map counts, the low five bits hold
//! either the value itself (`0x00..=0x17`) or select how many big-endian bytes follow
//! (`0x18` to `0x1b` for 1, 2, 4, or 8 bytes). That choice is recorded as a
//! [`Width`]. The value `0x1f` marks an indefinite-length string, array, or map,
//! terminated by the break byte `0xff`.
//!
//! Tags are limited to the low five bits, 0 through 31. Half-precision floats are
//! rejected.

#![warn(
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_copy_implementations,
    missing_debug_implementations,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]

#[macro_use]
mod util;

pub mod config;
pub mod decoding;
pub mod errors;
pub mod float;
pub mod prelude;
pub mod width;

use bytes::Bytes;
use errors::ConversionError;
use float::Float;
use num_bigint::{BigInt, BigUint};
use std::{convert::TryFrom, fmt};
use width::{StrSize, Width};

/// The kind of an [`Item`], used in error messages.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ItemKind {
    Uint,
    Nint,
    Bstr,
    Tstr,
    Array,
    Map,
    Tagged,
    Boolean,
    Null,
    Undefined,
    Float,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Uint => "uint",
            ItemKind::Nint => "nint",
            ItemKind::Bstr => "bstr",
            ItemKind::Tstr => "tstr",
            ItemKind::Array => "array",
            ItemKind::Map => "map",
            ItemKind::Tagged => "tagged",
            ItemKind::Boolean => "boolean",
            ItemKind::Null => "null",
            ItemKind::Undefined => "undefined",
            ItemKind::Float => "float",
        }
    }

    /// Whether the additional information `0x1f` is legal for this kind.
    pub fn allows_indefinite(self) -> bool {
        match self {
            ItemKind::Bstr | ItemKind::Tstr | ItemKind::Array | ItemKind::Map => true,
            _ => false,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.name()) }
}

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
/// A decoded item and the widths its header used.
///
/// # Example
///
/// ```
/// use cbor_tree::prelude::*;
///
/// // 500 needs two following bytes
/// let (item, _) = decode(&[0x19, 0x01, 0xf4]).unwrap();
///
/// match item {
///     Item::Uint { size, value } => {
///         assert_eq!(size, Width::Two);
///         assert_eq!(value, BigUint::from(500u32));
///     }
///     _ => panic!(),
/// }
/// ```
pub enum Item {
    /// Unsigned integer, major type 0.
    Uint { size: Width, value: BigUint },
    /// Negative integer, major type 1. `value` is `-1 - n` for the encoded `n`.
    Nint { size: Width, value: BigInt },
    /// Byte string. Indefinite-length strings are merged into one buffer.
    Bstr { size: StrSize, value: Bytes },
    /// Text string, assembled like a byte string and then decoded as UTF-8.
    ///
    /// Chunk lengths count encoded bytes. Under [`Utf8Policy::Lossy`](crate::config::Utf8Policy::Lossy)
    /// replacement characters can make `value` longer than their sum.
    Tstr { size: StrSize, value: String },
    /// Array. `size` is `None` for the indefinite-length form.
    Array { size: Option<Width>, value: Vec<Item> },
    /// Map, as key/value pairs in stream order. Duplicate keys are kept.
    Map {
        size: Option<Width>,
        value: Vec<(Item, Item)>,
    },
    /// Tagged item. Only tags 0 through 31 are representable.
    Tagged { tag: u8, value: Box<Item> },
    Bool(bool),
    Null,
    Undefined,
    /// Single or double precision float.
    Float(Float),
}

use Item::*;

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Uint { .. } => ItemKind::Uint,
            Nint { .. } => ItemKind::Nint,
            Bstr { .. } => ItemKind::Bstr,
            Tstr { .. } => ItemKind::Tstr,
            Array { .. } => ItemKind::Array,
            Map { .. } => ItemKind::Map,
            Tagged { .. } => ItemKind::Tagged,
            Bool(_) => ItemKind::Boolean,
            Null => ItemKind::Null,
            Undefined => ItemKind::Undefined,
            Float(_) => ItemKind::Float,
        }
    }

    fn mismatch(&self, expected: &'static [ItemKind]) -> ConversionError {
        ConversionError::new(expected, self.kind())
    }

    /// Indicates whether an item is [`Null`].
    ///
    /// # Example
    ///
    /// ```
    /// use cbor_tree::Item::Null;
    ///
    /// assert!(Null.is_null());
    /// ```
    pub fn is_null(&self) -> bool {
        match self {
            Null => true,
            _ => false,
        }
    }

    pub fn is_undefined(&self) -> bool {
        match self {
            Undefined => true,
            _ => false,
        }
    }

    /// Tries to read an unsigned integer.
    pub fn to_biguint(&self) -> Result<&BigUint, ConversionError> {
        match self {
            Uint { value, .. } => Ok(value),
            _ => Err(self.mismatch(&[ItemKind::Uint])),
        }
    }

    /// Reads either integer kind as a signed [`BigInt`].
    ///
    /// # Example
    ///
    /// ```
    /// use cbor_tree::prelude::*;
    ///
    /// let (item, _) = decode(&[0x38, 0x63]).unwrap();
    ///
    /// assert_eq!(item.to_bigint().unwrap(), BigInt::from(-100));
    /// ```
    pub fn to_bigint(&self) -> Result<BigInt, ConversionError> {
        match self {
            Uint { value, .. } => Ok(BigInt::from(value.clone())),
            Nint { value, .. } => Ok(value.clone()),
            _ => Err(self.mismatch(&[ItemKind::Uint, ItemKind::Nint])),
        }
    }

    pub fn to_bytes(&self) -> Result<&Bytes, ConversionError> {
        match self {
            Bstr { value, .. } => Ok(value),
            _ => Err(self.mismatch(&[ItemKind::Bstr])),
        }
    }

    pub fn to_str(&self) -> Result<&str, ConversionError> {
        match self {
            Tstr { value, .. } => Ok(value.as_str()),
            _ => Err(self.mismatch(&[ItemKind::Tstr])),
        }
    }

    /// Tries to read the elements of an array.
    pub fn to_vec(&self) -> Result<&[Item], ConversionError> {
        match self {
            Array { value, .. } => Ok(value.as_slice()),
            _ => Err(self.mismatch(&[ItemKind::Array])),
        }
    }

    /// Tries to read the entries of a map, in stream order.
    pub fn to_pairs(&self) -> Result<&[(Item, Item)], ConversionError> {
        match self {
            Map { value, .. } => Ok(value.as_slice()),
            _ => Err(self.mismatch(&[ItemKind::Map])),
        }
    }

    pub fn to_bool(&self) -> Result<bool, ConversionError> {
        match self {
            Bool(b) => Ok(*b),
            _ => Err(self.mismatch(&[ItemKind::Boolean])),
        }
    }

    pub fn to_f64(&self) -> Result<f64, ConversionError> {
        match self {
            Float(f) => Ok(f.value()),
            _ => Err(self.mismatch(&[ItemKind::Float])),
        }
    }

    /// The tag number, if this is a tagged item.
    pub fn tag(&self) -> Option<u8> {
        match self {
            Tagged { tag, .. } => Some(*tag),
            _ => None,
        }
    }

    /// Strips any number of enclosing tags.
    pub fn untagged(&self) -> &Item {
        let mut item = self;
        while let Tagged { value, .. } = item {
            item = &**value;
        }
        item
    }
}

fn fmt_seq<T>(
    f: &mut fmt::Formatter,
    items: &[T],
    mut each: impl FnMut(&mut fmt::Formatter, &T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i != 0 {
            write!(f, ", ")?;
        }
        each(f, item)?;
    }
    Ok(())
}

fn indefinite_marker(f: &mut fmt::Formatter, size: &Option<Width>) -> fmt::Result {
    if size.is_none() {
        write!(f, "_ ")?;
    }
    Ok(())
}

/// Renders diagnostic notation.
impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Uint { value, .. } => write!(f, "{}", value),
            Nint { value, .. } => write!(f, "{}", value),
            Bstr { size, value } => match size {
                StrSize::Definite(_) => util::fmt_hex(f, value),
                StrSize::Indefinite(chunks) => {
                    write!(f, "(_ ")?;
                    let mut offset: usize = 0;
                    let mut parts = Vec::with_capacity(chunks.len());
                    for chunk in chunks {
                        let end = offset.saturating_add(chunk.len);
                        parts.push(value.get(offset..end));
                        offset = end;
                    }
                    // hand-built items may carry chunk lengths that do not cover the buffer
                    match parts.into_iter().collect::<Option<Vec<&[u8]>>>() {
                        Some(parts) => fmt_seq(f, &parts, |f, part| util::fmt_hex(f, part))?,
                        None => util::fmt_hex(f, value)?,
                    }
                    write!(f, ")")
                }
            },
            Tstr { size, value } => match size {
                StrSize::Definite(_) => write!(f, "{:?}", value),
                StrSize::Indefinite(chunks) => {
                    let mut offset: usize = 0;
                    let mut parts = Vec::with_capacity(chunks.len());
                    for chunk in chunks {
                        let end = offset.saturating_add(chunk.len);
                        parts.push(value.get(offset..end));
                        offset = end;
                    }
                    write!(f, "(_ ")?;
                    // chunk boundaries can fall inside a character after lossy decoding
                    match parts.into_iter().collect::<Option<Vec<&str>>>() {
                        Some(parts) => fmt_seq(f, &parts, |f, part| write!(f, "{:?}", part))?,
                        None => write!(f, "{:?}", value)?,
                    }
                    write!(f, ")")
                }
            },
            Array { size, value } => {
                write!(f, "[")?;
                indefinite_marker(f, size)?;
                fmt_seq(f, value, |f, item| write!(f, "{}", item))?;
                write!(f, "]")
            }
            Map { size, value } => {
                write!(f, "{{")?;
                indefinite_marker(f, size)?;
                fmt_seq(f, value, |f, (k, v)| write!(f, "{}: {}", k, v))?;
                write!(f, "}}")
            }
            Tagged { tag, value } => write!(f, "{}({})", tag, value),
            Bool(b) => write!(f, "{}", b),
            Null => write!(f, "null"),
            Undefined => write!(f, "undefined"),
            Float(fl) => write!(f, "{}", fl),
        }
    }
}

try_from_item!(BigUint, Uint { value, .. } => value);
try_from_item!(Bytes, Bstr { value, .. } => value);
try_from_item!(String, Tstr { value, .. } => value);
try_from_item!(Vec<Item>, Array { value, .. } => value);
try_from_item!(Vec<(Item, Item)>, Map { value, .. } => value);
try_from_item!(bool, Bool(b) => b);
try_from_item!(Float, Float(f) => f);

impl TryFrom<Item> for BigInt {
    type Error = Item;

    fn try_from(item: Item) -> Result<BigInt, Item> {
        match item {
            Uint { value, .. } => Ok(BigInt::from(value)),
            Nint { value, .. } => Ok(value),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::width::{Chunk, Chunks};

    fn uint(n: u32) -> Item {
        Uint {
            size: Width::Inline,
            value: BigUint::from(n),
        }
    }

    fn text(s: &str) -> Item {
        Tstr {
            size: StrSize::Definite(Width::Inline),
            value: s.to_owned(),
        }
    }

    #[test]
    fn trivial_tests() {
        assert!(Null.is_null());
        assert!(!Undefined.is_null());
        assert!(Undefined.is_undefined());

        assert_eq!(uint(5).to_biguint().unwrap(), &BigUint::from(5u32));
        assert_eq!(uint(5).to_bigint().unwrap(), BigInt::from(5));
        assert!(Bool(true).to_bool().unwrap());
        assert_eq!(text("word").to_str().unwrap(), "word");
        assert_eq!(Item::Float(Float::from(0.5f64)).to_f64().unwrap(), 0.5);
    }

    #[test]
    fn wrong_kind() {
        let e = Null.to_vec().unwrap_err();
        assert_eq!(e.expected, &[ItemKind::Array]);
        assert_eq!(e.found, ItemKind::Null);

        assert!(text("a").to_bytes().is_err());
        assert!(uint(1).to_pairs().is_err());

        let e = Null.to_bigint().unwrap_err();
        assert_eq!(e.expected, &[ItemKind::Uint, ItemKind::Nint]);
        assert_eq!(e.to_string(), "expected uint or nint, found null");
    }

    #[test]
    fn owned_conversions() {
        assert_eq!(BigUint::try_from(uint(7)), Ok(BigUint::from(7u32)));
        assert_eq!(String::try_from(text("x")), Ok("x".to_owned()));
        assert_eq!(bool::try_from(Null), Err(Null));

        let neg = Nint {
            size: Width::Inline,
            value: BigInt::from(-3),
        };
        assert_eq!(BigInt::try_from(neg), Ok(BigInt::from(-3)));
    }

    #[test]
    fn tags() {
        let item = Tagged {
            tag: 1,
            value: Box::new(Tagged {
                tag: 2,
                value: Box::new(uint(3)),
            }),
        };
        assert_eq!(item.tag(), Some(1));
        assert_eq!(item.untagged(), &uint(3));
        assert_eq!(uint(3).tag(), None);
    }

    #[test]
    fn diagnostic_notation() {
        let map = Map {
            size: None,
            value: vec![(text("a"), uint(1))],
        };
        assert_eq!(map.to_string(), "{_ \"a\": 1}");

        let arr = Array {
            size: Some(Width::Inline),
            value: vec![uint(1), Null, Undefined, Bool(false)],
        };
        assert_eq!(arr.to_string(), "[1, null, undefined, false]");

        let empty = Array {
            size: None,
            value: vec![],
        };
        assert_eq!(empty.to_string(), "[_ ]");

        let mut chunks = Chunks::new();
        chunks.push(Chunk { len: 1, width: Width::Inline });
        chunks.push(Chunk { len: 2, width: Width::Inline });
        let bstr = Bstr {
            size: StrSize::Indefinite(chunks),
            value: Bytes::from_static(&[0x01, 0x02, 0xff]),
        };
        assert_eq!(bstr.to_string(), "(_ h'01', h'02ff')");

        let tagged = Tagged {
            tag: 3,
            value: Box::new(uint(5)),
        };
        assert_eq!(tagged.to_string(), "3(5)");
    }

    #[test]
    fn display_with_chunks_past_the_buffer() {
        let mut chunks = Chunks::new();
        chunks.push(Chunk { len: 5, width: Width::Inline });
        let bstr = Bstr {
            size: StrSize::Indefinite(chunks.clone()),
            value: Bytes::from_static(&[0x01]),
        };
        assert_eq!(bstr.to_string(), "(_ h'01')");

        chunks.push(Chunk { len: usize::MAX, width: Width::Eight });
        let tstr = Tstr {
            size: StrSize::Indefinite(chunks),
            value: "ab".to_owned(),
        };
        assert_eq!(tstr.to_string(), "(_ \"ab\")");
    }
}
