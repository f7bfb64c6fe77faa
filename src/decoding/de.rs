use super::constants::*;
use crate::{
    config::{DecodeConfig, Utf8Policy},
    errors::DecodingError::{self, *},
    float::Float,
    width::{Chunk, Chunks, StrSize, Width},
    Item, ItemKind,
};
use bytes::{Buf, Bytes, BytesMut};
use num_bigint::{BigInt, BigUint};
use num_traits::{ToPrimitive, Zero};
use tracing::{debug, warn};

/// What the additional information of a header byte resolved to.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Arg {
    /// A value together with the width that carried it.
    Value(BigUint, Width),
    Indefinite,
}

#[inline]
fn ensure(dat: &[u8], len: usize) -> Result<(), DecodingError> {
    if dat.remaining() >= len {
        Ok(())
    } else {
        Err(Truncated {
            needed: len,
            remaining: dat.remaining(),
        })
    }
}

#[inline]
fn peek_byte(dat: &[u8]) -> Result<u8, DecodingError> {
    ensure(dat, 1)?;
    Ok(dat[0])
}

#[inline]
fn take_byte(dat: &mut &[u8]) -> Result<u8, DecodingError> {
    ensure(dat, 1)?;
    Ok(dat.get_u8())
}

#[inline]
fn read_many<'a>(dat: &mut &'a [u8], len: usize) -> Result<&'a [u8], DecodingError> {
    ensure(dat, len)?;
    let all: &'a [u8] = *dat;
    let (head, tail) = all.split_at(len);
    *dat = tail;
    Ok(head)
}

/// Consumes a break byte if one is next.
#[inline]
fn take_break(dat: &mut &[u8]) -> Result<bool, DecodingError> {
    if peek_byte(dat)? == BREAK {
        dat.advance(1);
        Ok(true)
    } else {
        Ok(false)
    }
}

fn check_depth(config: &DecodeConfig, depth: usize) -> Result<(), DecodingError> {
    match config.max_depth {
        Some(limit) if depth > limit => {
            debug!(limit, depth, "nesting depth limit exceeded");
            Err(DepthLimitExceeded(limit))
        }
        _ => Ok(()),
    }
}

/// Narrows a declared length or count for use as a buffer size or loop bound.
fn narrow(len: &BigUint, expected: ItemKind) -> Result<usize, DecodingError> {
    len.to_usize().ok_or_else(|| LengthOverflow {
        expected,
        length: len.clone(),
    })
}

/// Reads the value or length encoded by the additional information of `byte`.
///
/// Following bytes are accumulated most significant first, so eight-byte values never
/// overflow.
pub(crate) fn read_arg(dat: &mut &[u8], byte: u8, expected: ItemKind) -> Result<Arg, DecodingError> {
    let info = byte & MASK_INFO;
    match Width::from_info(info) {
        Some(Width::Inline) => Ok(Arg::Value(BigUint::from(info), Width::Inline)),
        Some(width) => {
            let digits = read_many(dat, width.byte_len())?;
            let value = digits
                .iter()
                .fold(BigUint::zero(), |acc, &dig| (acc << 8usize) | BigUint::from(dig));
            Ok(Arg::Value(value, width))
        }
        None if info == INFO_INDEFINITE && expected.allows_indefinite() => Ok(Arg::Indefinite),
        None => Err(InvalidLength { expected, byte }),
    }
}

fn read_definite(dat: &mut &[u8], byte: u8, expected: ItemKind) -> Result<(BigUint, Width), DecodingError> {
    match read_arg(dat, byte, expected)? {
        Arg::Value(value, width) => Ok((value, width)),
        Arg::Indefinite => Err(InvalidLength { expected, byte }),
    }
}

fn read_uint(dat: &mut &[u8], byte: u8) -> Result<Item, DecodingError> {
    let (value, size) = read_definite(dat, byte, ItemKind::Uint)?;
    Ok(Item::Uint { size, value })
}

fn read_nint(dat: &mut &[u8], byte: u8) -> Result<Item, DecodingError> {
    let (magnitude, size) = read_definite(dat, byte, ItemKind::Nint)?;
    let value = BigInt::from(-1) - BigInt::from(magnitude);
    Ok(Item::Nint { size, value })
}

/// Reads the raw buffer of a byte or text string.
///
/// Indefinite-length strings are reassembled from their chunks. A chunk that is itself
/// indefinite is invalid, but is tolerated: its merged buffer is taken as one chunk and
/// recorded with width [`Width::Eight`], so the original layout is not reproducible.
fn read_string(
    dat: &mut &[u8],
    byte: u8,
    expected: ItemKind,
    config: &DecodeConfig,
    depth: usize,
) -> Result<(StrSize, Bytes), DecodingError> {
    match read_arg(dat, byte, expected)? {
        Arg::Value(len, width) => {
            let len = narrow(&len, expected)?;
            let value = Bytes::copy_from_slice(read_many(dat, len)?);
            Ok((StrSize::Definite(width), value))
        }
        Arg::Indefinite => {
            let mut chunks = Chunks::new();
            let mut buf = BytesMut::new();
            while !take_break(dat)? {
                let head = peek_byte(dat)?;
                if head & MASK_TYPE != byte & MASK_TYPE {
                    return Err(UnexpectedChunk { expected, byte: head });
                }
                check_depth(config, depth + 1)?;
                dat.advance(1);

                let (size, value) = read_string(dat, head, expected, config, depth + 1)?;
                let width = match size {
                    StrSize::Definite(width) => width,
                    StrSize::Indefinite(_) => {
                        warn!(
                            kind = %expected,
                            len = value.len(),
                            "flattening indefinite-length chunk"
                        );
                        Width::Eight
                    }
                };
                chunks.push(Chunk {
                    len: value.len(),
                    width,
                });
                buf.extend_from_slice(&value);
            }
            Ok((StrSize::Indefinite(chunks), buf.freeze()))
        }
    }
}

fn decode_text(buf: Bytes, policy: Utf8Policy) -> Result<String, DecodingError> {
    match policy {
        Utf8Policy::Strict => std::str::from_utf8(&buf)
            .map(str::to_owned)
            .map_err(InvalidUtf8),
        Utf8Policy::Lossy => Ok(String::from_utf8_lossy(&buf).into_owned()),
    }
}

fn read_array(dat: &mut &[u8], byte: u8, config: &DecodeConfig, depth: usize) -> Result<Item, DecodingError> {
    match read_arg(dat, byte, ItemKind::Array)? {
        Arg::Value(count, width) => {
            let count = narrow(&count, ItemKind::Array)?;
            // every element takes at least one byte
            let mut value = Vec::with_capacity(count.min(dat.remaining()));
            for _ in 0..count {
                value.push(decode_item(dat, config, depth + 1)?);
            }
            Ok(Item::Array {
                size: Some(width),
                value,
            })
        }
        Arg::Indefinite => {
            let mut value = Vec::new();
            while !take_break(dat)? {
                value.push(decode_item(dat, config, depth + 1)?);
            }
            Ok(Item::Array { size: None, value })
        }
    }
}

fn read_map(dat: &mut &[u8], byte: u8, config: &DecodeConfig, depth: usize) -> Result<Item, DecodingError> {
    match read_arg(dat, byte, ItemKind::Map)? {
        Arg::Value(count, width) => {
            let count = narrow(&count, ItemKind::Map)?;
            let mut value = Vec::with_capacity(count.min(dat.remaining() / 2));
            for _ in 0..count {
                let key = decode_item(dat, config, depth + 1)?;
                let val = decode_item(dat, config, depth + 1)?;
                value.push((key, val));
            }
            Ok(Item::Map {
                size: Some(width),
                value,
            })
        }
        Arg::Indefinite => {
            let mut value = Vec::new();
            while !take_break(dat)? {
                let key = decode_item(dat, config, depth + 1)?;
                let val = decode_item(dat, config, depth + 1)?;
                value.push((key, val));
            }
            Ok(Item::Map { size: None, value })
        }
    }
}

fn read_tagged(dat: &mut &[u8], byte: u8, config: &DecodeConfig, depth: usize) -> Result<Item, DecodingError> {
    let tag = byte & MASK_INFO;
    let value = decode_item(dat, config, depth + 1)?;
    Ok(Item::Tagged {
        tag,
        value: Box::new(value),
    })
}

fn read_simple(dat: &mut &[u8], byte: u8) -> Result<Item, DecodingError> {
    if byte & MASK_NIBBLE != NIBBLE_SIMPLE {
        return Err(UnknownType(byte));
    }
    match byte {
        SIMPLE_FALSE => Ok(Item::Bool(false)),
        SIMPLE_TRUE => Ok(Item::Bool(true)),
        SIMPLE_NULL => Ok(Item::Null),
        SIMPLE_UNDEFINED => Ok(Item::Undefined),
        HALF => Err(UnsupportedHalfFloat),
        SINGLE => {
            ensure(dat, 4)?;
            Ok(Item::Float(Float::Single(dat.get_u32())))
        }
        DOUBLE => {
            ensure(dat, 8)?;
            Ok(Item::Float(Float::Double(dat.get_u64())))
        }
        _ => Err(UnknownSimple(byte)),
    }
}

/// Decodes one item from the front of `dat`, advancing it past the consumed bytes.
///
/// `depth` is the nesting level of the item; top-level items are at depth 0.
pub(crate) fn decode_item(dat: &mut &[u8], config: &DecodeConfig, depth: usize) -> Result<Item, DecodingError> {
    check_depth(config, depth)?;
    let byte = take_byte(dat)?;
    match byte & MASK_TYPE {
        TYPE_UINT => read_uint(dat, byte),
        TYPE_NINT => read_nint(dat, byte),
        TYPE_BSTR => {
            let (size, value) = read_string(dat, byte, ItemKind::Bstr, config, depth)?;
            Ok(Item::Bstr { size, value })
        }
        TYPE_TSTR => {
            let (size, buf) = read_string(dat, byte, ItemKind::Tstr, config, depth)?;
            let value = decode_text(buf, config.utf8)?;
            Ok(Item::Tstr { size, value })
        }
        TYPE_ARRAY => read_array(dat, byte, config, depth),
        TYPE_MAP => read_map(dat, byte, config, depth),
        TYPE_TAG => read_tagged(dat, byte, config, depth),
        _ => read_simple(dat, byte),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_arg() {
        let dat = &mut &[][..];
        assert_eq!(
            read_arg(dat, 0b000_10111, ItemKind::Uint),
            Ok(Arg::Value(BigUint::from(23u32), Width::Inline))
        );
    }

    #[test]
    fn following_bytes_are_big_endian() {
        let dat = &mut &[0x01, 0x02, 0x03, 0x04, 0xaa][..];
        assert_eq!(
            read_arg(dat, 0x1a, ItemKind::Uint),
            Ok(Arg::Value(BigUint::from(0x0102_0304u32), Width::Four))
        );
        // only the argument bytes are consumed
        assert_eq!(*dat, &[0xaa]);
    }

    #[test]
    fn eight_bytes_do_not_overflow() {
        let dat = &mut &[0xff; 8][..];
        assert_eq!(
            read_arg(dat, 0x1b, ItemKind::Uint),
            Ok(Arg::Value(BigUint::from(u64::MAX), Width::Eight))
        );
    }

    #[test]
    fn indefinite_only_for_containers() {
        let dat = &mut &[][..];
        assert_eq!(read_arg(dat, 0x5f, ItemKind::Bstr), Ok(Arg::Indefinite));
        assert_eq!(read_arg(dat, 0x9f, ItemKind::Array), Ok(Arg::Indefinite));
        assert_eq!(
            read_arg(dat, 0x1f, ItemKind::Uint),
            Err(InvalidLength {
                expected: ItemKind::Uint,
                byte: 0x1f
            })
        );
    }

    #[test]
    fn reserved_info() {
        for byte in 0x1c..=0x1e {
            let dat = &mut &[0; 8][..];
            assert_eq!(
                read_arg(dat, byte, ItemKind::Uint),
                Err(InvalidLength {
                    expected: ItemKind::Uint,
                    byte
                })
            );
        }
    }

    #[test]
    fn short_argument() {
        let dat = &mut &[0x01][..];
        assert_eq!(
            read_arg(dat, 0x19, ItemKind::Uint),
            Err(Truncated {
                needed: 2,
                remaining: 1
            })
        );
    }

    #[test]
    fn narrowing() {
        assert_eq!(narrow(&BigUint::from(7u32), ItemKind::Bstr), Ok(7));

        let huge = BigUint::from(u64::MAX) << 8usize;
        assert_eq!(
            narrow(&huge, ItemKind::Bstr),
            Err(LengthOverflow {
                expected: ItemKind::Bstr,
                length: huge.clone()
            })
        );
    }

    #[test]
    // for completeness
    fn trivial() {
        assert!(read_many(&mut &[][..], 3).is_err());
        assert!(take_byte(&mut &[][..]).is_err());
        assert_eq!(take_break(&mut &[0xff][..]), Ok(true));
        assert_eq!(take_break(&mut &[0x00][..]), Ok(false));
    }
}
